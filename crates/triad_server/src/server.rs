use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use triad_core::Backend;
use triad_logging::{triad_error, triad_info, triad_warn};

use crate::config::{mask_key, ServerConfig};
use crate::fetch::ReqwestArticleFetcher;
use crate::providers::ProviderSet;
use crate::routes::{create_router, ServerState};

pub fn build_state(config: &ServerConfig) -> anyhow::Result<ServerState> {
    let providers = ProviderSet::from_config(config).context("building provider clients")?;
    let fetcher =
        ReqwestArticleFetcher::new(config.fetch.clone()).context("building article fetcher")?;
    Ok(ServerState::new(providers, Arc::new(fetcher)))
}

/// Resolves the configured host, so names like `localhost` work as well as IP literals.
pub async fn bind_listener(config: &ServerConfig) -> anyhow::Result<TcpListener> {
    let (host, port) = config.bind_target();
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))
}

/// Binds the listener and serves until Ctrl+C or SIGTERM.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    for backend in Backend::ALL {
        let provider = config.provider(backend);
        match provider.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => triad_info!(
                "{} enabled: model={} base_url={} key={}",
                backend.display_name(),
                provider.model,
                provider.base_url,
                mask_key(key)
            ),
            None => triad_warn!("{} disabled: API key not set", backend.display_name()),
        }
    }

    let app = create_router().with_state(build_state(&config)?);
    let listener = bind_listener(&config).await?;

    triad_info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            triad_error!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                triad_error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    triad_info!("shutdown signal received");
}
