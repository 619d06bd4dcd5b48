//! Pending tool review API handlers
//!
//! GET /tools/pending, POST /tools/:id/approve, DELETE /tools/:id
//!
//! Plain CRUD over persisted tools: approval flips `verified` to true,
//! rejection deletes the record. Neither touches the import pipeline.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::tools,
    error::{ApiError, ApiResult},
    AppState,
};

/// One pending tool in the review listing
#[derive(Debug, Serialize)]
pub struct PendingTool {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub website: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<String>,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
    pub source: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// GET /tools/pending response
#[derive(Debug, Serialize)]
pub struct PendingToolsResponse {
    pub tools: Vec<PendingTool>,
}

/// POST /tools/:id/approve response
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub id: Uuid,
    pub verified: bool,
}

/// GET /tools/pending
///
/// List unverified tools awaiting operator review, newest first.
pub async fn list_pending_tools(State(state): State<AppState>) -> ApiResult<Json<PendingToolsResponse>> {
    let pending = tools::list_pending(&state.db).await?;

    let tools = pending
        .into_iter()
        .map(|t| PendingTool {
            id: t.id,
            name: t.name,
            slug: t.slug,
            website: t.website,
            tagline: t.tagline,
            description: t.description,
            pricing: t.pricing,
            tags: t.tags,
            logo_url: t.logo_url,
            source: t.source,
            created_at: t.created_at,
        })
        .collect();

    Ok(Json(PendingToolsResponse { tools }))
}

/// POST /tools/:id/approve
pub async fn approve_tool(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApproveResponse>> {
    if !tools::approve_tool(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Tool not found: {}", id)));
    }

    tracing::info!(tool_id = %id, "Tool approved");

    Ok(Json(ApproveResponse { id, verified: true }))
}

/// DELETE /tools/:id
///
/// Reject a tool: removes the record entirely.
pub async fn reject_tool(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::http::StatusCode> {
    if !tools::delete_tool(&state.db, id).await? {
        return Err(ApiError::NotFound(format!("Tool not found: {}", id)));
    }

    tracing::info!(tool_id = %id, "Tool rejected and deleted");

    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Build tool review routes
pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/tools/pending", get(list_pending_tools))
        .route("/tools/:id/approve", post(approve_tool))
        .route("/tools/:id", delete(reject_tool))
}
