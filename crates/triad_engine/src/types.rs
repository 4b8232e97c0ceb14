use std::fmt;

use triad_core::{BackendOutcome, OperationId, OperationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Every backend call of the operation has settled.
    FanOutCompleted {
        operation: OperationId,
        kind: OperationKind,
        outcomes: Vec<BackendOutcome>,
    },
    /// The operation failed before any backend call was made.
    FanOutFailed {
        operation: OperationId,
        kind: OperationKind,
        message: String,
    },
}

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Failures that take down a whole operation rather than one backend slot.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not encode request payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid server url {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("could not build http client: {0}")]
    Client(String),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
