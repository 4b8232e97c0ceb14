use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use triad_core::Backend;
use triad_logging::{triad_info, triad_warn};

use crate::error::{ApiError, ApiResult};
use crate::fetch::ArticleFetcher;
use crate::providers::{ProviderError, ProviderSet, DEFAULT_PROMPT};

pub const EXTRACTION_FAILED: &str = "Could not extract text from URL.";
pub const MISSING_INPUT: &str = "Either URL or text must be provided.";

/// State shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub providers: Arc<ProviderSet>,
    pub fetcher: Arc<dyn ArticleFetcher>,
}

impl ServerState {
    pub fn new(providers: ProviderSet, fetcher: Arc<dyn ArticleFetcher>) -> Self {
        Self {
            providers: Arc::new(providers),
            fetcher,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    pub url: Option<String>,
    pub text: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummarizeResponse {
    pub summary: String,
    pub article_text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub backends: BTreeMap<String, bool>,
}

pub fn create_router() -> Router<ServerState> {
    Router::new()
        .route("/summarize/:backend", post(summarize))
        .route("/health", get(health))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let backends = Backend::ALL
        .into_iter()
        .map(|backend| (backend.id().to_string(), state.providers.is_configured(backend)))
        .collect();
    Json(HealthResponse {
        status: "ok".to_string(),
        backends,
    })
}

async fn summarize(
    State(state): State<ServerState>,
    Path(backend): Path<String>,
    body: Bytes,
) -> ApiResult<Json<SummarizeResponse>> {
    let backend = Backend::from_id(&backend)
        .ok_or_else(|| ApiError::not_found(format!("Unknown backend '{backend}'.")))?;
    let provider = state
        .providers
        .get(backend)
        .ok_or_else(|| ApiError::unavailable(ProviderError::NotConfigured(backend).to_string()))?;

    let request = parse_request(&body)?;
    let article_text = resolve_article(state.fetcher.as_ref(), &request).await?;
    let prompt = request
        .prompt
        .as_deref()
        .filter(|prompt| !prompt.is_empty())
        .unwrap_or(DEFAULT_PROMPT);

    triad_info!(
        "{} summarize article_len={} custom_prompt={}",
        backend.display_name(),
        article_text.len(),
        prompt != DEFAULT_PROMPT
    );
    let summary = provider
        .summarize(prompt, &article_text)
        .await
        .map_err(|err| {
            triad_warn!("{} provider failed: {}", backend.display_name(), err);
            ApiError::bad_gateway(format!(
                "Error generating summary with {}. ({err})",
                backend.display_name()
            ))
        })?;

    Ok(Json(SummarizeResponse {
        summary,
        article_text,
    }))
}

fn parse_request(body: &[u8]) -> ApiResult<SummarizeRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SummarizeRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::bad_request(format!("Invalid JSON body: {err}")))
}

/// A non-empty URL wins over text; whitespace-only extractions count as empty.
async fn resolve_article(
    fetcher: &dyn ArticleFetcher,
    request: &SummarizeRequest,
) -> ApiResult<String> {
    if let Some(url) = request.url.as_deref().filter(|url| !url.is_empty()) {
        return match fetcher.fetch_text(url).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                triad_warn!("no paragraph text at {}", url);
                Err(ApiError::bad_request(EXTRACTION_FAILED))
            }
            Err(err) => {
                triad_warn!("fetching {} failed: {}", url, err);
                Err(ApiError::bad_request(EXTRACTION_FAILED))
            }
        };
    }
    match request.text.as_deref() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::bad_request(MISSING_INPUT)),
    }
}
