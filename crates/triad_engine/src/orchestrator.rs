use triad_core::{
    update, AppState, AppViewModel, ArticleSource, Backend, Effect, InputMode, Msg, OperationId,
    ValidationNotice,
};

use crate::{run_fan_out, EngineEvent, SummaryClient};

/// How an operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// All three backends settled; `failed` lists the ones that got a placeholder.
    Settled {
        operation: OperationId,
        failed: Vec<Backend>,
    },
    /// Input was rejected before any request was issued.
    Rejected(ValidationNotice),
    /// The payload never left the client; every slot shows the error.
    Aborted {
        operation: OperationId,
        message: String,
    },
}

/// One user session: owns the UI state and drives fan-outs to completion.
pub struct Orchestrator<C> {
    state: AppState,
    client: C,
}

impl<C: SummaryClient> Orchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            state: AppState::new(),
            client,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn session_text(&self) -> &str {
        self.state.session_text()
    }

    pub fn select_tab(&mut self, backend: Backend) {
        self.dispatch(Msg::TabSelected(backend));
    }

    pub fn select_input_mode(&mut self, mode: InputMode) {
        self.dispatch(Msg::InputModeSelected(mode));
    }

    /// Applies a message and returns the effects without running them.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }

    pub async fn submit(&mut self, source: ArticleSource, prompt: Option<String>) -> Completion {
        self.dispatch(Msg::InputModeSelected(source.mode()));
        match source {
            ArticleSource::Url(url) => self.dispatch(Msg::UrlInputChanged(url)),
            ArticleSource::RawText(text) => self.dispatch(Msg::TextInputChanged(text)),
        };
        self.dispatch(Msg::PromptInputChanged(prompt.unwrap_or_default()));
        let fallback = match self.state.input_mode() {
            InputMode::Url => ValidationNotice::MissingUrl,
            InputMode::Text => ValidationNotice::MissingText,
        };
        let effects = self.dispatch(Msg::SubmitClicked);
        self.run(effects, fallback).await
    }

    pub async fn refine(&mut self, prompt: impl Into<String>) -> Completion {
        self.dispatch(Msg::FollowUpInputChanged(prompt.into()));
        let effects = self.dispatch(Msg::RefineClicked);
        self.run(effects, ValidationNotice::MissingFollowUp).await
    }

    // Submit and refine each yield exactly one effect.
    async fn run(&mut self, effects: Vec<Effect>, fallback: ValidationNotice) -> Completion {
        let Some(effect) = effects.into_iter().next() else {
            return Completion::Rejected(fallback);
        };
        match effect {
            Effect::ShowNotice(notice) => Completion::Rejected(notice),
            Effect::FanOut {
                operation,
                kind,
                request,
            } => match run_fan_out(&self.client, operation, kind, &request).await {
                EngineEvent::FanOutCompleted {
                    operation,
                    kind,
                    outcomes,
                } => {
                    let failed = outcomes
                        .iter()
                        .filter(|outcome| outcome.result.is_err())
                        .map(|outcome| outcome.backend)
                        .collect();
                    self.dispatch(Msg::SummariesArrived {
                        operation,
                        kind,
                        outcomes,
                    });
                    Completion::Settled { operation, failed }
                }
                EngineEvent::FanOutFailed {
                    operation,
                    kind,
                    message,
                } => {
                    self.dispatch(Msg::FanOutFailed {
                        operation,
                        kind,
                        message: message.clone(),
                    });
                    Completion::Aborted { operation, message }
                }
            },
        }
    }
}
