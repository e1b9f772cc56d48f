//! Predictive maintenance API server
//!
//! Loads the engine and naval artifact pairs once, then serves predictions
//! with feature attributions until interrupted.

use anyhow::Result;
use maint_api::{api, config::ServiceConfig};
use maint_lib::{ArtifactLayout, ArtifactStore, PredictionService, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting maint-api");

    let config = ServiceConfig::load()?;
    info!(
        artifact_root = %config.artifact_root.display(),
        addr = %config.socket_addr(),
        "Service configured"
    );

    let logger = StructuredLogger::new("maint-api");

    // Artifacts load before the listener binds; missing ones only disable their domain
    let layout = ArtifactLayout::new(&config.artifact_root);
    let store = ArtifactStore::load_with_logger(&layout, &logger);
    let service = PredictionService::with_logger(store, logger.clone());

    let addr = config.socket_addr();
    logger.log_startup(SERVICE_VERSION, &addr, &service.ready_domains());

    let state = Arc::new(api::AppState::new(service));
    api::serve(&addr, state, shutdown_signal()).await?;

    logger.log_shutdown("SIGINT received");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
