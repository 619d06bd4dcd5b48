//! Import log database operations
//!
//! One append-only row per source per run. Rows are written when a run
//! finishes (completed or stopped) and are never mutated or deleted by the
//! pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use aidex_common::Result;

use crate::models::SourceCounters;

/// Persisted run outcome for one source
#[derive(Debug, Clone, Serialize)]
pub struct ImportLog {
    pub id: Uuid,
    pub source: String,
    pub fetched: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Append one import log row from a source's run counters
pub async fn insert_log(pool: &SqlitePool, counters: &SourceCounters) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let errors = serde_json::to_string(&counters.errors)
        .map_err(|e| aidex_common::Error::Internal(format!("Failed to serialize errors: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO import_logs (id, source, fetched, imported, skipped, errors, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&counters.source)
    .bind(counters.fetched as i64)
    .bind(counters.imported as i64)
    .bind(counters.skipped as i64)
    .bind(&errors)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(id)
}

/// List import logs, newest first, paginated
///
/// `page` is 1-based; `per_page` is clamped to 1..=200.
pub async fn list_logs(pool: &SqlitePool, page: u32, per_page: u32) -> Result<Vec<ImportLog>> {
    let per_page = per_page.clamp(1, 200) as i64;
    let offset = (page.max(1) as i64 - 1) * per_page;

    let rows = sqlx::query(
        r#"
        SELECT id, source, fetched, imported, skipped, errors, created_at
        FROM import_logs
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut logs = Vec::with_capacity(rows.len());
    for row in rows {
        let id_str: String = row.get("id");
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| aidex_common::Error::Internal(format!("Failed to parse log id: {}", e)))?;

        let errors_json: String = row.get("errors");
        let errors: Vec<String> = serde_json::from_str(&errors_json)
            .map_err(|e| aidex_common::Error::Internal(format!("Failed to parse errors: {}", e)))?;

        let created_at_str: String = row.get("created_at");
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| aidex_common::Error::Internal(format!("Failed to parse created_at: {}", e)))?
            .with_timezone(&Utc);

        logs.push(ImportLog {
            id,
            source: row.get("source"),
            fetched: row.get::<i64, _>("fetched") as usize,
            imported: row.get::<i64, _>("imported") as usize,
            skipped: row.get::<i64, _>("skipped") as usize,
            errors,
            created_at,
        });
    }

    Ok(logs)
}

/// Count total import log rows
pub async fn count_logs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM import_logs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        aidex_common::db::init::create_import_logs_table(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let pool = setup_pool().await;

        for (i, source) in ["alpha", "beta", "gamma"].iter().enumerate() {
            let mut counters = SourceCounters::new(*source);
            counters.fetched = i + 1;
            insert_log(&pool, &counters).await.unwrap();
            // created_at has second precision via RFC3339; id DESC breaks ties
        }

        let logs = list_logs(&pool, 1, 50).await.unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(count_logs(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let pool = setup_pool().await;

        for _ in 0..5 {
            insert_log(&pool, &SourceCounters::new("alpha")).await.unwrap();
        }

        let page1 = list_logs(&pool, 1, 2).await.unwrap();
        assert_eq!(page1.len(), 2);

        let page3 = list_logs(&pool, 3, 2).await.unwrap();
        assert_eq!(page3.len(), 1);

        // Page 0 treated as page 1, per_page 0 clamped to 1
        let clamped = list_logs(&pool, 0, 0).await.unwrap();
        assert_eq!(clamped.len(), 1);
    }

    #[tokio::test]
    async fn test_error_list_round_trip() {
        let pool = setup_pool().await;

        let mut counters = SourceCounters::new("alpha");
        counters.errors = vec!["slug conflict: chatgpt".to_string()];
        insert_log(&pool, &counters).await.unwrap();

        let logs = list_logs(&pool, 1, 10).await.unwrap();
        assert_eq!(logs[0].errors, vec!["slug conflict: chatgpt".to_string()]);
    }
}
