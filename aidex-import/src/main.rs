//! aidex-import - Catalog Import Microservice
//!
//! Pulls candidate tool listings from external catalogs, normalizes and
//! deduplicates them against the directory, and stages new entries for
//! operator review. Exposes an HTTP API for triggering runs, cooperative
//! stop, run history, and pending-tool curation.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aidex_import::config::ServiceConfig;
use aidex_import::services::ImportCoordinator;
use aidex_import::sources::build_sources;
use aidex_import::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting aidex-import (Catalog Import) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve configuration (env, TOML, defaults)
    let config = ServiceConfig::load();
    info!("Database: {}", config.db_path.display());
    info!(
        "Sources: {}",
        config
            .sources
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Step 2: Open or create database
    let db_pool = aidex_common::db::init_database_pool(&config.db_path).await?;
    info!("Database connection established");

    // Step 3: Build source adapters and the coordinator
    let sources = build_sources(&config.sources);
    if sources.is_empty() {
        tracing::warn!("No usable import sources configured");
    }
    let coordinator = ImportCoordinator::new(db_pool.clone(), sources);

    // Create application state
    let state = AppState::new(db_pool, coordinator);

    // Build router
    let app = aidex_import::build_router(state);

    // Start server
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
