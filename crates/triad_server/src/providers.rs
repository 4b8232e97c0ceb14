//! Upstream model APIs. Each provider turns `(prompt, article)` into summary text.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use triad_core::Backend;
use url::Url;

use crate::config::{ProviderConfig, ServerConfig};

pub const DEFAULT_PROMPT: &str = "You are an AI assistant tasked with generating concise, \
executive-level summaries of articles related to Artificial Intelligence. Given a URL link to an \
article or copy/pasted text, create a paragraph-form summary that is roughly 5 to 10 sentences in \
length. Your summary should highlight key changes, their implications, and clearly explain why \
these developments matter to executive-level stakeholders. Prioritize clarity, relevance, and \
impact, ensuring executives quickly grasp the significance of the information.";

pub const OPENAI_SYSTEM_MESSAGE: &str = "You are a helpful assistant. You will be given an \
article and an instruction. Follow the instruction based on the article provided.";

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("{} API key not configured.", .0.display_name())]
    NotConfigured(Backend),
    #[error("invalid provider endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Network(String),
    #[error("unexpected upstream response: {0}")]
    InvalidResponse(String),
}

#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn summarize(&self, prompt: &str, article: &str) -> Result<String, ProviderError>;
}

/// `{prompt}\n\nArticle:\n\n{article}`
pub fn gemini_message(prompt: &str, article: &str) -> String {
    format!("{prompt}\n\nArticle:\n\n{article}")
}

/// `Instruction: {prompt}\n\nArticle:\n\n{article}`
pub fn instruction_message(prompt: &str, article: &str) -> String {
    format!("Instruction: {prompt}\n\nArticle:\n\n{article}")
}

/// Configured providers, one optional slot per backend.
#[derive(Clone, Default)]
pub struct ProviderSet {
    gemini: Option<Arc<dyn SummaryProvider>>,
    chatgpt: Option<Arc<dyn SummaryProvider>>,
    claude: Option<Arc<dyn SummaryProvider>>,
}

impl ProviderSet {
    /// Builds a provider for every backend that has an API key.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| ProviderError::Network(err.to_string()))?;

        let mut set = Self::default();
        if config.gemini.is_configured() {
            set = set.with(
                Backend::Gemini,
                Arc::new(GeminiProvider::new(config.gemini.clone(), client.clone())),
            );
        }
        if config.openai.is_configured() {
            set = set.with(
                Backend::ChatGpt,
                Arc::new(OpenAiProvider::new(config.openai.clone(), client.clone())),
            );
        }
        if config.anthropic.is_configured() {
            set = set.with(
                Backend::Claude,
                Arc::new(AnthropicProvider::new(config.anthropic.clone(), client)),
            );
        }
        Ok(set)
    }

    pub fn with(mut self, backend: Backend, provider: Arc<dyn SummaryProvider>) -> Self {
        *self.slot_mut(backend) = Some(provider);
        self
    }

    pub fn get(&self, backend: Backend) -> Option<&Arc<dyn SummaryProvider>> {
        match backend {
            Backend::Gemini => self.gemini.as_ref(),
            Backend::ChatGpt => self.chatgpt.as_ref(),
            Backend::Claude => self.claude.as_ref(),
        }
    }

    pub fn is_configured(&self, backend: Backend) -> bool {
        self.get(backend).is_some()
    }

    fn slot_mut(&mut self, backend: Backend) -> &mut Option<Arc<dyn SummaryProvider>> {
        match backend {
            Backend::Gemini => &mut self.gemini,
            Backend::ChatGpt => &mut self.chatgpt,
            Backend::Claude => &mut self.claude,
        }
    }
}

fn api_key(config: &ProviderConfig, backend: Backend) -> Result<&str, ProviderError> {
    config
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or(ProviderError::NotConfigured(backend))
}

fn join_endpoint(base: &str, path: &str) -> Result<Url, ProviderError> {
    Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))
        .map_err(|err| ProviderError::InvalidEndpoint(err.to_string()))
}

#[derive(Deserialize)]
struct UpstreamError {
    error: UpstreamErrorDetail,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

async fn post_json<T: Serialize + ?Sized>(
    request: reqwest::RequestBuilder,
    body: &T,
) -> Result<Bytes, ProviderError> {
    let payload =
        serde_json::to_vec(body).map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;
    let response = request
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let message = serde_json::from_slice::<UpstreamError>(&bytes)
            .map(|err| err.error.message)
            .unwrap_or_else(|_| status.to_string());
        return Err(ProviderError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(bytes)
}

fn parse<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(bytes).map_err(|err| ProviderError::InvalidResponse(err.to_string()))
}

fn non_empty(text: String) -> Result<String, ProviderError> {
    if text.is_empty() {
        Err(ProviderError::InvalidResponse("no text in response".into()))
    } else {
        Ok(text)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(err.to_string())
    }
}

// --- Gemini -----------------------------------------------------------------

pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self, key: &str) -> Result<Url, ProviderError> {
        let mut url = join_endpoint(
            &self.config.base_url,
            &format!("v1beta/models/{}:generateContent", self.config.model),
        )?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SummaryProvider for GeminiProvider {
    async fn summarize(&self, prompt: &str, article: &str) -> Result<String, ProviderError> {
        let key = api_key(&self.config, Backend::Gemini)?;
        let message = gemini_message(prompt, article);
        let body = GeminiRequest {
            contents: [GeminiContent {
                parts: [GeminiPart { text: &message }],
            }],
        };
        let bytes = post_json(self.client.post(self.endpoint(key)?), &body).await?;
        let response: GeminiResponse = parse(&bytes)?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        non_empty(text)
    }
}

// --- OpenAI -----------------------------------------------------------------

pub struct OpenAiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for OpenAiProvider {
    async fn summarize(&self, prompt: &str, article: &str) -> Result<String, ProviderError> {
        let key = api_key(&self.config, Backend::ChatGpt)?;
        let user = instruction_message(prompt, article);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: OPENAI_SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        };
        let endpoint = join_endpoint(&self.config.base_url, "v1/chat/completions")?;
        let request = self
            .client
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {key}"));
        let bytes = post_json(request, &body).await?;
        let response: ChatResponse = parse(&bytes)?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        non_empty(text)
    }
}

// --- Anthropic --------------------------------------------------------------

pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait::async_trait]
impl SummaryProvider for AnthropicProvider {
    async fn summarize(&self, prompt: &str, article: &str) -> Result<String, ProviderError> {
        let key = api_key(&self.config, Backend::Claude)?;
        let user = instruction_message(prompt, article);
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: [ChatMessage {
                role: "user",
                content: &user,
            }],
        };
        let endpoint = join_endpoint(&self.config.base_url, "v1/messages")?;
        let request = self
            .client
            .post(endpoint)
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let bytes = post_json(request, &body).await?;
        let response: MessagesResponse = parse(&bytes)?;
        let text = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<String>();
        non_empty(text)
    }
}
