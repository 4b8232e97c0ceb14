mod app;
mod command;
mod config;
mod effects;
mod ui;

use clap::Parser;
use triad_logging::triad_info;

use crate::config::{AppArgs, AppConfig};

fn main() -> anyhow::Result<()> {
    let args = AppArgs::parse();
    let config = AppConfig::resolve(&args)?;
    triad_logging::initialize(config.log, config.log_level, None);
    triad_info!("triad starting, server={}", config.client.base_url);

    app::run(&config)
}
