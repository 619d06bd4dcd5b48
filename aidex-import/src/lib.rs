//! aidex-import library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod sources;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::RunStatus;
use crate::services::ImportCoordinator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Import coordinator with the configured source adapters
    pub coordinator: Arc<ImportCoordinator>,
    /// Status of the current or most recent run (None before the first run)
    pub run_status: Arc<RwLock<Option<RunStatus>>>,
    /// Cancellation token for the active run, tagged with its run id
    ///
    /// The mutex around this slot is the concurrency guard: start checks
    /// and installs the token under one lock, so two runs can never be
    /// admitted concurrently. The run id tag lets a finished run release
    /// the slot without clobbering a token a newer run installed in the
    /// meantime.
    pub active_token: Arc<Mutex<Option<(Uuid, CancellationToken)>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last run-level error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, coordinator: ImportCoordinator) -> Self {
        Self {
            db,
            coordinator: Arc::new(coordinator),
            run_status: Arc::new(RwLock::new(None)),
            active_token: Arc::new(Mutex::new(None)),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Release the active-token slot on behalf of a finished run
    ///
    /// No-op unless the slot still belongs to `run_id`: the run's terminal
    /// status transition and this cleanup are separate await points, so a
    /// new run may already have been admitted and installed its own token.
    pub async fn release_token(&self, run_id: Uuid) {
        let mut slot = self.active_token.lock().await;
        if slot.as_ref().map_or(false, |(id, _)| *id == run_id) {
            *slot = None;
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::import_routes())
        .merge(api::tool_routes())
        .merge(api::health_routes())
        .with_state(state)
}
