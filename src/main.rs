//! OpenHuman MCP Gateway - Binary Entry Point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use openhuman_mcp::api::{create_router, GatewayState};
use openhuman_mcp::config::GatewayConfig;
use openhuman_mcp::logging::init_tracing;
use openhuman_mcp::rate_limit::InMemoryRateLimitStore;

/// How often expired rate limit windows are dropped
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::parse();
    init_tracing(&config.log_level, config.log_format);

    let store = Arc::new(InMemoryRateLimitStore::new(config.rate_window()));
    let state = Arc::new(
        GatewayState::from_config(&config, store.clone()).context("invalid configuration")?,
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "purged expired rate limit windows");
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.backend_url,
        endpoint = %config.endpoint_path,
        tools = state.server.catalog().len(),
        "OpenHuman MCP gateway listening"
    );

    let app = create_router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context("server error")?;

    tracing::info!("gateway stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, after telling open event streams to finish
async fn shutdown_signal(state: Arc<GatewayState>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!(streams = state.streams.active(), "shutting down");
    state.shutdown();
}
