use crate::Backend;

/// Successful answer from one backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryReply {
    pub summary: String,
    pub article_text: Option<String>,
}

/// Settled result of one backend call; the error carries a diagnostic message only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub backend: Backend,
    pub result: Result<SummaryReply, String>,
}

impl BackendOutcome {
    pub fn success(backend: Backend, reply: SummaryReply) -> Self {
        Self {
            backend,
            result: Ok(reply),
        }
    }

    pub fn failure(backend: Backend, message: impl Into<String>) -> Self {
        Self {
            backend,
            result: Err(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User flipped the URL / text toggle.
    InputModeSelected(crate::InputMode),
    /// User edited the URL box.
    UrlInputChanged(String),
    /// User edited the pasted-text box.
    TextInputChanged(String),
    /// User edited the optional custom instruction for the initial submission.
    PromptInputChanged(String),
    /// User edited the follow-up instruction box.
    FollowUpInputChanged(String),
    /// User submitted the article form.
    SubmitClicked,
    /// User submitted the follow-up form.
    RefineClicked,
    /// User clicked one of the result tabs.
    TabSelected(Backend),
    /// User acknowledged the validation notice.
    NoticeDismissed,
    /// All three backend calls of an operation have settled.
    SummariesArrived {
        operation: crate::OperationId,
        kind: crate::OperationKind,
        outcomes: Vec<BackendOutcome>,
    },
    /// The operation failed before any per-backend result was available.
    FanOutFailed {
        operation: crate::OperationId,
        kind: crate::OperationKind,
        message: String,
    },
}
