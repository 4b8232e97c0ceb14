use crate::ArticleSource;

pub type OperationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Submit,
    Refine,
}

/// Payload sent unchanged to every backend of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryRequest {
    pub url: Option<String>,
    pub text: Option<String>,
    pub prompt: Option<String>,
}

impl SummaryRequest {
    /// Initial request; an empty prompt is left out of the payload.
    pub fn for_source(source: &ArticleSource, prompt: Option<String>) -> Self {
        let prompt = prompt.filter(|p| !p.is_empty());
        match source {
            ArticleSource::Url(url) => Self {
                url: Some(url.clone()),
                text: None,
                prompt,
            },
            ArticleSource::RawText(text) => Self {
                url: None,
                text: Some(text.clone()),
                prompt,
            },
        }
    }

    /// Follow-up request. The text is always sent, even when empty.
    pub fn refinement(text: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            url: None,
            text: Some(text.into()),
            prompt: Some(prompt.into()),
        }
    }
}

/// Blocking notice shown instead of issuing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationNotice {
    MissingUrl,
    MissingText,
    MissingFollowUp,
}

impl ValidationNotice {
    pub fn message(self) -> &'static str {
        match self {
            ValidationNotice::MissingUrl => "Please enter a URL.",
            ValidationNotice::MissingText => "Please paste some text.",
            ValidationNotice::MissingFollowUp => "Please enter a follow-up instruction.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `request` to all three backends and report back once every call settled.
    FanOut {
        operation: OperationId,
        kind: OperationKind,
        request: SummaryRequest,
    },
    ShowNotice(ValidationNotice),
}
