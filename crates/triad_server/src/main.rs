use clap::Parser;
use triad_logging::LogDestination;
use triad_server::{ServerArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    let destination = LogDestination::parse(&args.log)
        .ok_or_else(|| anyhow::anyhow!("unknown log destination '{}'", args.log))?;
    triad_logging::initialize(destination, args.log_level, None);

    let config = ServerConfig::from_env(&args);
    triad_server::run(config).await
}
