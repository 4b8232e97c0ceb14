use std::sync::{mpsc, Arc};
use std::thread;

use triad_core::{OperationId, OperationKind, SummaryRequest};

use crate::client::{ClientSettings, ReqwestSummaryClient};
use crate::{run_fan_out, EngineError, EngineEvent, SummaryClient};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    FanOut {
        operation: OperationId,
        kind: OperationKind,
        request: SummaryRequest,
    },
}

/// Runs fan-outs on a background runtime so the caller's loop never blocks.
/// Operations overlap freely; nothing is cancelled when a newer one starts.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let client = ReqwestSummaryClient::new(settings)?;
        Self::with_client(Arc::new(client), sink)
    }

    pub fn with_client(
        client: Arc<dyn SummaryClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, sink.as_ref()).await;
                });
            }
        });

        Ok(Self { cmd_tx })
    }

    pub fn fan_out(&self, operation: OperationId, kind: OperationKind, request: SummaryRequest) {
        let _ = self.cmd_tx.send(EngineCommand::FanOut {
            operation,
            kind,
            request,
        });
    }
}

async fn handle_command(client: &dyn SummaryClient, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FanOut {
            operation,
            kind,
            request,
        } => {
            let event = run_fan_out(client, operation, kind, &request).await;
            sink.emit(event);
        }
    }
}
