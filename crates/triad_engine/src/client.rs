use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use triad_core::{Backend, SummaryReply, SummaryRequest};
use url::Url;

use crate::{BackendError, EngineError, FailureKind};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request limit. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait SummaryClient: Send + Sync {
    /// Posts an already encoded payload to one backend endpoint.
    async fn summarize(&self, backend: Backend, body: Bytes) -> Result<SummaryReply, BackendError>;
}

#[derive(Serialize)]
struct RequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
}

#[derive(Deserialize)]
struct ReplyBody {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    article_text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Serializes the shared payload once per fan-out.
pub fn encode_request(request: &SummaryRequest) -> Result<Bytes, EngineError> {
    let body = RequestBody {
        url: request.url.as_deref(),
        text: request.text.as_deref(),
        prompt: request.prompt.as_deref(),
    };
    Ok(Bytes::from(serde_json::to_vec(&body)?))
}

#[derive(Debug, Clone)]
pub struct ReqwestSummaryClient {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestSummaryClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, EngineError> {
        let base = parse_base_url(&settings.base_url)?;
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn endpoint(&self, backend: Backend) -> Result<Url, BackendError> {
        self.base
            .join(&format!("summarize/{}", backend.id()))
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SummaryClient for ReqwestSummaryClient {
    async fn summarize(&self, backend: Backend, body: Bytes) -> Result<SummaryReply, BackendError> {
        let endpoint = self.endpoint(backend)?;
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail,
            ));
        }

        let reply: ReplyBody = serde_json::from_slice(&bytes)
            .map_err(|err| BackendError::new(FailureKind::InvalidResponse, err.to_string()))?;
        Ok(SummaryReply {
            summary: reply.summary,
            article_text: reply.article_text,
        })
    }
}

// Keeps a trailing slash so joining `summarize/<id>` appends instead of replacing.
fn parse_base_url(raw: &str) -> Result<Url, EngineError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| EngineError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_leaves_out_absent_fields() {
        let request = SummaryRequest {
            url: Some("https://example.com".into()),
            text: None,
            prompt: None,
        };
        let body = encode_request(&request).unwrap();
        assert_eq!(&body[..], br#"{"url":"https://example.com"}"#);
    }

    #[test]
    fn refinement_payload_keeps_empty_text() {
        let body = encode_request(&SummaryRequest::refinement("", "Shorter")).unwrap();
        assert_eq!(&body[..], br#"{"text":"","prompt":"Shorter"}"#);
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let settings = ClientSettings {
            base_url: "http://localhost:5000/api".into(),
            ..ClientSettings::default()
        };
        let client = ReqwestSummaryClient::new(&settings).unwrap();
        assert_eq!(
            client.endpoint(Backend::ChatGpt).unwrap().as_str(),
            "http://localhost:5000/api/summarize/chatgpt"
        );
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let settings = ClientSettings {
            base_url: "not a url".into(),
            ..ClientSettings::default()
        };
        assert!(matches!(
            ReqwestSummaryClient::new(&settings),
            Err(EngineError::InvalidBaseUrl { .. })
        ));
    }
}
