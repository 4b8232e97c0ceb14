use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use triad_engine::ClientSettings;
use triad_logging::LogDestination;

#[derive(Parser, Debug, Clone)]
#[command(name = "triad")]
#[command(about = "Compare article summaries from Gemini, ChatGPT and Claude", long_about = None)]
pub struct AppArgs {
    /// RON file with default settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the summary server.
    #[arg(long)]
    pub server: Option<String>,

    /// Log destination: file, terminal or both.
    #[arg(long)]
    pub log: Option<String>,

    /// Log level filter.
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,

    /// Per-request limit. Unset waits indefinitely.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

/// Settings file contents; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub log: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown log destination '{0}' (expected file, terminal or both)")]
    UnknownLogDestination(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub log: LogDestination,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Defaults, then the file named by `--config`, then the remaining flags.
    pub fn resolve(args: &AppArgs) -> Result<Self, ConfigError> {
        let file = match args.config.as_deref() {
            Some(path) => load_file(path)?,
            None => FileConfig::default(),
        };

        let mut client = ClientSettings::default();
        if let Some(url) = args.server.clone().or(file.server_url) {
            client.base_url = url;
        }
        if let Some(secs) = args.connect_timeout_secs.or(file.connect_timeout_secs) {
            client.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = args.request_timeout_secs.or(file.request_timeout_secs) {
            client.request_timeout = Some(Duration::from_secs(secs));
        }

        let log = match args.log.as_deref().or(file.log.as_deref()) {
            Some(raw) => LogDestination::parse(raw)
                .ok_or_else(|| ConfigError::UnknownLogDestination(raw.to_string()))?,
            None => LogDestination::default(),
        };

        Ok(Self {
            client,
            log,
            log_level: args.log_level,
        })
    }
}

pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
