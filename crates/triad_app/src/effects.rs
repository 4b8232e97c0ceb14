use std::sync::{mpsc, Arc};

use triad_core::{Effect, Msg};
use triad_engine::{ClientSettings, EngineError, EngineEvent, EngineHandle, EventSink};
use triad_logging::{triad_debug, triad_info};

use crate::app::Input;

/// Forwards engine events into the app's input queue as core messages.
struct MsgSink {
    tx: mpsc::Sender<Input>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Msg(engine_event_to_msg(event)));
    }
}

pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FanOutCompleted {
            operation,
            kind,
            outcomes,
        } => Msg::SummariesArrived {
            operation,
            kind,
            outcomes,
        },
        EngineEvent::FanOutFailed {
            operation,
            kind,
            message,
        } => Msg::FanOutFailed {
            operation,
            kind,
            message,
        },
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ClientSettings, tx: mpsc::Sender<Input>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FanOut {
                    operation,
                    kind,
                    request,
                } => {
                    triad_info!(
                        "FanOut operation={} kind={:?} url={} text_len={} custom_prompt={}",
                        operation,
                        kind,
                        request.url.as_deref().unwrap_or("-"),
                        request.text.as_deref().map_or(0, str::len),
                        request.prompt.is_some()
                    );
                    self.engine.fan_out(operation, kind, request);
                }
                Effect::ShowNotice(notice) => {
                    // Rendered from the view model.
                    triad_debug!("notice: {}", notice.message());
                }
            }
        }
    }
}
