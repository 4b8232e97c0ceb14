//! Triad core: pure state machine, domain types and view-model helpers.
mod backend;
mod effect;
mod format;
mod msg;
mod state;
mod update;
mod view_model;

pub use backend::{ArticleSource, Backend, InputMode};
pub use effect::{Effect, OperationId, OperationKind, SummaryRequest, ValidationNotice};
pub use format::format_summary;
pub use msg::{BackendOutcome, Msg, SummaryReply};
pub use state::{AppState, ModelResults, REFINING_PLACEHOLDER};
pub use update::{placeholder_for, resolve_session_text, update};
pub use view_model::{AppViewModel, PanelView};
