//! Triad engine: backend client, fan-out/fan-in and effect execution.
mod client;
mod engine;
mod fanout;
mod orchestrator;
mod types;

pub use client::{
    encode_request, ClientSettings, ReqwestSummaryClient, SummaryClient, DEFAULT_BASE_URL,
};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use fanout::{fan_out, run_fan_out};
pub use orchestrator::{Completion, Orchestrator};
pub use types::{BackendError, EngineError, EngineEvent, FailureKind};
