//! Easel - a collaborative whiteboard backend
//!
//! This application accepts drawing commands for configured rooms, keeps them
//! in an in-memory event log, and routes image payloads through a registry of
//! named transforms with an identity fallback.

use std::sync::Arc;

use easel::error::Result;
use easel::{api, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(config::Config::from_env()?);

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server.log_level, &config.server.environment)?;

    // Log configuration
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Easel");

    // Start the HTTP server
    api::server::create_server(config).await?;

    tracing::info!("Easel shutdown complete");
    Ok(())
}
