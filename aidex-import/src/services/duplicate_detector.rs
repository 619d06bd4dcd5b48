//! Duplicate detection
//!
//! Decides whether a normalized tool corresponds to an existing persisted
//! tool. Match keys in priority order: exact slug, then exact normalized
//! website domain. First match wins; when a slug match and a different
//! domain match both exist, the slug match takes precedence. No fuzzy
//! matching: near-duplicate names with different slugs and domains are
//! distinct tools by design.

use anyhow::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::tools;
use crate::models::NormalizedTool;

/// Duplicate detection outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// No existing tool matches; the record is new
    New,
    /// The record resolves to this existing tool
    Existing(Uuid),
}

/// Detect whether `tool` matches an existing persisted tool
pub async fn detect(pool: &SqlitePool, tool: &NormalizedTool) -> Result<Match> {
    if let Some(existing) = tools::load_tool_by_slug(pool, &tool.slug).await? {
        return Ok(Match::Existing(existing.id));
    }

    if let Some(existing) = tools::load_tool_by_domain(pool, &tool.website_domain).await? {
        return Ok(Match::Existing(existing.id));
    }

    Ok(Match::New)
}
