//! Import run API handlers
//!
//! POST /import/start, POST /import/stop, GET /import/status,
//! GET /import/logs

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::import_logs::{self, ImportLog},
    error::{ApiError, ApiResult},
    models::{RunState, RunStatus},
    AppState,
};

/// POST /import/start request
#[derive(Debug, Default, Deserialize)]
pub struct StartImportRequest {
    /// Run a single named source; None runs all configured sources
    pub source: Option<String>,
}

/// POST /import/start response
#[derive(Debug, Serialize)]
pub struct StartImportResponse {
    pub run_id: Uuid,
    pub state: RunState,
    pub sources: Vec<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// POST /import/stop response
#[derive(Debug, Serialize)]
pub struct StopImportResponse {
    /// Whether a running import was signalled to stop
    pub stopping: bool,
}

/// GET /import/status response
#[derive(Debug, Serialize)]
pub struct ImportStatusResponse {
    /// True when no run is in progress
    pub idle: bool,
    /// Current or most recent run, None before the first run
    pub run: Option<RunStatus>,
}

/// GET /import/logs query parameters
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /import/logs response
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<ImportLog>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// POST /import/start
///
/// Begin an import run in a background task. Returns 409 if a run is
/// already in progress.
pub async fn start_import(
    State(state): State<AppState>,
    request: Option<Json<StartImportRequest>>,
) -> ApiResult<Json<StartImportResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    if let Some(name) = &request.source {
        if !state.coordinator.has_source(name) {
            return Err(ApiError::NotFound(format!("Unknown source: {}", name)));
        }
    }

    // Concurrency guard: check and install the token under one lock so two
    // concurrent start requests cannot both be admitted.
    let mut token_slot = state.active_token.lock().await;

    let already_running = state
        .run_status
        .read()
        .await
        .as_ref()
        .map_or(false, |run| !run.is_terminal());
    if already_running {
        return Err(ApiError::Conflict(
            "Import run already in progress".to_string(),
        ));
    }

    let run_sources = match &request.source {
        Some(name) => vec![name.clone()],
        None => state.coordinator.source_names(),
    };

    let run_status = RunStatus::new(run_sources.clone());
    let response = StartImportResponse {
        run_id: run_status.run_id,
        state: run_status.state,
        sources: run_sources,
        started_at: run_status.started_at,
    };

    let cancel_token = tokio_util::sync::CancellationToken::new();
    *token_slot = Some((run_status.run_id, cancel_token.clone()));

    *state.run_status.write().await = Some(run_status);
    drop(token_slot);

    tracing::info!(
        run_id = %response.run_id,
        source = %request.source.as_deref().unwrap_or("all"),
        "Import run started"
    );

    let state_clone = state.clone();
    let source_filter = request.source.clone();
    let run_id = response.run_id;
    tokio::spawn(async move {
        if let Err(e) = execute_run(state_clone, source_filter, cancel_token, run_id).await {
            tracing::error!(run_id = %run_id, error = %e, "Import run background task failed");
        }
    });

    Ok(Json(response))
}

/// POST /import/stop
///
/// Idempotent cooperative stop: signals the active run, if any, to halt at
/// its next per-record check point. Has no effect when idle.
pub async fn stop_import(State(state): State<AppState>) -> Json<StopImportResponse> {
    let token_slot = state.active_token.lock().await;

    let mut stopping = false;
    if let Some((_, token)) = token_slot.as_ref() {
        let mut guard = state.run_status.write().await;
        if let Some(run) = guard.as_mut() {
            if !run.is_terminal() {
                token.cancel();
                run.transition_to(RunState::Stopping);
                stopping = true;
                tracing::info!(run_id = %run.run_id, "Stop requested for import run");
            }
        }
    }

    Json(StopImportResponse { stopping })
}

/// GET /import/status
pub async fn get_import_status(State(state): State<AppState>) -> Json<ImportStatusResponse> {
    let run = state.run_status.read().await.clone();
    let idle = run.as_ref().map_or(true, |r| r.is_terminal());

    Json(ImportStatusResponse { idle, run })
}

/// GET /import/logs
///
/// Paginated run history, newest first.
pub async fn list_import_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<LogsResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

    let logs = import_logs::list_logs(&state.db, page, per_page).await?;
    let total = import_logs::count_logs(&state.db).await?;

    Ok(Json(LogsResponse {
        logs,
        page,
        per_page,
        total,
    }))
}

/// Background task wrapper for a run
///
/// Ensures the run is marked Failed on a run-level error and that the
/// active token slot is always released.
async fn execute_run(
    state: AppState,
    source_filter: Option<String>,
    cancel_token: tokio_util::sync::CancellationToken,
    run_id: Uuid,
) -> anyhow::Result<()> {
    let result = state
        .coordinator
        .run(
            source_filter.as_deref(),
            cancel_token,
            state.run_status.clone(),
        )
        .await;

    // Release the guard regardless of outcome; conditional on the run id
    // so a newer run's token is never clobbered
    state.release_token(run_id).await;

    match result {
        Ok(reports) => {
            tracing::info!(
                run_id = %run_id,
                sources = reports.len(),
                "Import run finished"
            );
            Ok(())
        }
        Err(e) => {
            let mut guard = state.run_status.write().await;
            if let Some(run) = guard.as_mut() {
                run.transition_to(RunState::Failed);
            }
            drop(guard);

            *state.last_error.write().await = Some(e.to_string());
            Err(e)
        }
    }
}

/// Build import run routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/import/start", post(start_import))
        .route("/import/stop", post(stop_import))
        .route("/import/status", get(get_import_status))
        .route("/import/logs", get(list_import_logs))
}
