//! Server configuration: listen address from the command line, provider
//! credentials and endpoints from the environment.

use clap::Parser;
use triad_core::Backend;

use crate::fetch::FetchSettings;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

pub const GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const OPENAI_MODEL: &str = "gpt-4o";
pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Parser, Debug, Clone)]
#[command(name = "triad_server")]
#[command(about = "Summarizes articles with Gemini, ChatGPT and Claude", long_about = None)]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Log destination: file, terminal or both.
    #[arg(long, default_value = "terminal")]
    pub log: String,

    /// Log level filter (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,
}

/// Endpoint and credential for one upstream model API.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

// Keys never reach the log in clear text.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub fetch: FetchSettings,
}

impl ServerConfig {
    pub fn from_env(args: &ServerArgs) -> Self {
        Self::from_lookup(args, |name| std::env::var(name).ok())
    }

    /// Builds the config from `args` and a variable lookup; blank values count as unset.
    pub fn from_lookup(args: &ServerArgs, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let provider = |key: &str, base: &str, default_base: &str, model: &str, default_model: &str| {
            ProviderConfig {
                api_key: var(key),
                base_url: var(base).unwrap_or_else(|| default_base.to_string()),
                model: var(model).unwrap_or_else(|| default_model.to_string()),
            }
        };

        Self {
            host: args.host.clone(),
            port: args.port,
            gemini: provider(
                "GOOGLE_API_KEY",
                "GEMINI_BASE_URL",
                GEMINI_BASE_URL,
                "GEMINI_MODEL",
                GEMINI_MODEL,
            ),
            openai: provider(
                "OPENAI_API_KEY",
                "OPENAI_BASE_URL",
                OPENAI_BASE_URL,
                "OPENAI_MODEL",
                OPENAI_MODEL,
            ),
            anthropic: provider(
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_BASE_URL",
                ANTHROPIC_BASE_URL,
                "ANTHROPIC_MODEL",
                ANTHROPIC_MODEL,
            ),
            fetch: FetchSettings::default(),
        }
    }

    pub fn provider(&self, backend: Backend) -> &ProviderConfig {
        match backend {
            Backend::Gemini => &self.gemini,
            Backend::ChatGpt => &self.openai,
            Backend::Claude => &self.anthropic,
        }
    }

    /// Host and port as handed to the resolver; `[::1]` style brackets are dropped.
    pub fn bind_target(&self) -> (&str, u16) {
        let host = self.host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host);
        (host, self.port)
    }
}

/// Shows the first and last four characters of keys longer than eight.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "Key too short".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
