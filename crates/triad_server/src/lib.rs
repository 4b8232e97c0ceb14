//! Triad summary service: one `/summarize/<backend>` endpoint per model.
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod providers;
pub mod routes;
mod server;

pub use config::{mask_key, ProviderConfig, ServerArgs, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use fetch::{ArticleFetcher, FetchError, FetchFailure, FetchSettings, ReqwestArticleFetcher};
pub use providers::{ProviderError, ProviderSet, SummaryProvider, DEFAULT_PROMPT};
pub use routes::{create_router, ServerState};
pub use server::{bind_listener, build_state, run};
