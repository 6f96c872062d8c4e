//! Starts the tax HTTP service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tax_api::config::Config;
use tax_api::logging::init_logging;
use tax_api::state::AppState;
use tax_core::calculations::TaxCalculator;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;
    debug!(port = config.port, database = %config.database, "loaded configuration");

    let repo = tax_db_sqlite::open(&config.database, config.seeds.as_deref())
        .await
        .with_context(|| format!("Failed to open database: {}", config.database))?;

    let state = AppState::new(
        Arc::new(repo),
        TaxCalculator::default(),
        config.admin_credentials(),
    );
    let app = tax_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("tax API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
