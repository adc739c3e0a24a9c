//! The `exifdb serve` command: run the HTTP API.

use anyhow::Context;
use clap::Args;
use exifdb::{create_router, AppState};
use exifdb_core::{Config, MongoConnector};
use std::sync::Arc;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(long, env = "EXIFDB_BIND")]
    pub bind: Option<String>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    let bind = config.server.bind.clone();

    // Store settings are checked per request, not here
    if config.store.host.is_none() {
        tracing::warn!("No store host configured (DB_HOST); uploads and lookups will fail");
    }

    let connector = Arc::new(MongoConnector::new(config.store.clone()));
    let state = AppState::new(config, connector).context("failed to initialize service")?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
