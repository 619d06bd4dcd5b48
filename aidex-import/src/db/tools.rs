//! Tool database operations
//!
//! Persisted tool records, keyed lookups for duplicate detection, the
//! non-destructive import merge, and the pending-review CRUD used by the
//! admin surface.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::NormalizedTool;

/// Durable tool record
#[derive(Debug, Clone)]
pub struct PersistedTool {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub website: String,
    pub website_domain: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<String>,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
    pub source: String,
    pub verified: bool,
    pub featured: bool,
    pub trending: bool,
    pub editors_choice: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn row_to_tool(row: &sqlx::sqlite::SqliteRow) -> Result<PersistedTool> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)?;

    let tags_json: String = row.get("tags");
    let tags: Vec<String> = serde_json::from_str(&tags_json)?;

    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc);

    let updated_at_str: String = row.get("updated_at");
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)?.with_timezone(&Utc);

    Ok(PersistedTool {
        id,
        name: row.get("name"),
        slug: row.get("slug"),
        website: row.get("website"),
        website_domain: row.get("website_domain"),
        tagline: row.get("tagline"),
        description: row.get("description"),
        pricing: row.get("pricing"),
        tags,
        logo_url: row.get("logo_url"),
        source: row.get("source"),
        verified: row.get::<i64, _>("verified") != 0,
        featured: row.get::<i64, _>("featured") != 0,
        trending: row.get::<i64, _>("trending") != 0,
        editors_choice: row.get::<i64, _>("editors_choice") != 0,
        created_at,
        updated_at,
    })
}

const TOOL_COLUMNS: &str = "id, name, slug, website, website_domain, tagline, description, \
                            pricing, tags, logo_url, source, verified, featured, trending, \
                            editors_choice, created_at, updated_at";

/// Insert a newly imported tool
///
/// New rows always start unverified; curation flags default to 0. Atomic
/// per record: a slug collision fails the single INSERT and nothing is
/// written.
pub async fn insert_tool(pool: &SqlitePool, tool: &NormalizedTool) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now().to_rfc3339();
    let tags = serde_json::to_string(&tool.tags)?;

    sqlx::query(
        r#"
        INSERT INTO tools (
            id, name, slug, website, website_domain, tagline, description,
            pricing, tags, logo_url, source, verified, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&tool.name)
    .bind(&tool.slug)
    .bind(&tool.website)
    .bind(&tool.website_domain)
    .bind(&tool.tagline)
    .bind(&tool.description)
    .bind(tool.pricing.as_str())
    .bind(&tags)
    .bind(&tool.logo_url)
    .bind(&tool.source)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Load tool by slug (for duplicate detection)
pub async fn load_tool_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<PersistedTool>> {
    let row = sqlx::query(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE slug = ?"))
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_tool).transpose()
}

/// Load tool by normalized website domain (for duplicate detection)
pub async fn load_tool_by_domain(pool: &SqlitePool, domain: &str) -> Result<Option<PersistedTool>> {
    let row = sqlx::query(&format!(
        "SELECT {TOOL_COLUMNS} FROM tools WHERE website_domain = ? LIMIT 1"
    ))
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_tool).transpose()
}

/// Load tool by id
pub async fn load_tool(pool: &SqlitePool, id: Uuid) -> Result<Option<PersistedTool>> {
    let row = sqlx::query(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?"))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_tool).transpose()
}

/// Merge normalized fields into an existing tool (non-destructive)
///
/// A field already present (non-empty) on the existing record is preserved;
/// only currently empty fields are filled from the normalized value.
/// Repeated imports must not silently erase curator edits, so the UPDATE
/// never lists `verified`, `featured`, `trending`, or `editors_choice`, and
/// `name`/`slug`/`website`/`source` of the existing record are kept as-is.
pub async fn merge_tool(pool: &SqlitePool, id: Uuid, tool: &NormalizedTool) -> Result<()> {
    let existing = load_tool(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Tool not found for merge: {}", id))?;

    let fill = |old: &Option<String>, new: &Option<String>| -> Option<String> {
        match old {
            Some(v) if !v.trim().is_empty() => Some(v.clone()),
            _ => new.clone(),
        }
    };

    let merged_tagline = fill(&existing.tagline, &tool.tagline);
    let merged_description = fill(&existing.description, &tool.description);
    let merged_logo_url = fill(&existing.logo_url, &tool.logo_url);

    // Pricing counts as empty when absent or still unclassified
    let merged_pricing = match existing.pricing.as_deref() {
        Some(p) if !p.is_empty() && p != "unknown" => existing.pricing.clone(),
        _ => Some(tool.pricing.as_str().to_string()),
    };

    let merged_tags = if existing.tags.is_empty() {
        serde_json::to_string(&tool.tags)?
    } else {
        serde_json::to_string(&existing.tags)?
    };

    sqlx::query(
        r#"
        UPDATE tools
        SET tagline = ?,
            description = ?,
            pricing = ?,
            tags = ?,
            logo_url = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&merged_tagline)
    .bind(&merged_description)
    .bind(&merged_pricing)
    .bind(&merged_tags)
    .bind(&merged_logo_url)
    .bind(Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    tracing::debug!(
        tool_id = %id,
        slug = %existing.slug,
        "Merged import fields into existing tool"
    );

    Ok(())
}

/// List pending (unverified) tools, newest first
pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<PersistedTool>> {
    let rows = sqlx::query(&format!(
        "SELECT {TOOL_COLUMNS} FROM tools WHERE verified = 0 ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_tool).collect()
}

/// Approve a pending tool (flips verified to true)
///
/// Returns false if no tool with that id exists.
pub async fn approve_tool(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("UPDATE tools SET verified = 1, updated_at = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Reject (delete) a tool record
pub async fn delete_tool(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tools WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count total tools in database
pub async fn count_tools(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tools")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pricing;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        aidex_common::db::init::create_tools_table(&pool).await.unwrap();
        pool
    }

    fn sample_tool(slug: &str, domain: &str) -> NormalizedTool {
        NormalizedTool {
            name: "Sample Tool".to_string(),
            slug: slug.to_string(),
            website: format!("https://{domain}"),
            website_domain: domain.to_string(),
            tagline: Some("A sample tagline".to_string()),
            description: Some("Sample description".to_string()),
            pricing: Pricing::Freemium,
            tags: vec!["chat".to_string()],
            logo_url: None,
            source: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_by_slug() {
        let pool = setup_pool().await;
        let tool = sample_tool("sample-tool", "sample.example.com");

        let id = insert_tool(&pool, &tool).await.expect("insert failed");

        let loaded = load_tool_by_slug(&pool, "sample-tool")
            .await
            .unwrap()
            .expect("tool not found");

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.source, "test");
        assert!(!loaded.verified, "imports must be created unverified");
    }

    #[tokio::test]
    async fn test_lookup_by_domain() {
        let pool = setup_pool().await;
        insert_tool(&pool, &sample_tool("sample-tool", "sample.example.com"))
            .await
            .unwrap();

        let found = load_tool_by_domain(&pool, "sample.example.com").await.unwrap();
        assert!(found.is_some());

        let missing = load_tool_by_domain(&pool, "other.example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_merge_preserves_existing_fields() {
        let pool = setup_pool().await;
        let mut original = sample_tool("sample-tool", "sample.example.com");
        original.description = Some("A".to_string());
        let id = insert_tool(&pool, &original).await.unwrap();

        let mut incoming = sample_tool("sample-tool", "sample.example.com");
        incoming.description = Some("B".to_string());
        incoming.logo_url = Some("https://sample.example.com/logo.png".to_string());

        merge_tool(&pool, id, &incoming).await.unwrap();

        let merged = load_tool(&pool, id).await.unwrap().unwrap();
        assert_eq!(merged.description.as_deref(), Some("A"), "non-empty field preserved");
        assert_eq!(
            merged.logo_url.as_deref(),
            Some("https://sample.example.com/logo.png"),
            "empty field filled from import"
        );
    }

    #[tokio::test]
    async fn test_merge_never_touches_admin_flags() {
        let pool = setup_pool().await;
        let id = insert_tool(&pool, &sample_tool("sample-tool", "sample.example.com"))
            .await
            .unwrap();

        // Curator approves and features the tool
        sqlx::query("UPDATE tools SET verified = 1, featured = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&pool)
            .await
            .unwrap();

        merge_tool(&pool, id, &sample_tool("sample-tool", "sample.example.com"))
            .await
            .unwrap();

        let after = load_tool(&pool, id).await.unwrap().unwrap();
        assert!(after.verified);
        assert!(after.featured);
    }

    #[tokio::test]
    async fn test_approve_and_reject() {
        let pool = setup_pool().await;
        let id = insert_tool(&pool, &sample_tool("sample-tool", "sample.example.com"))
            .await
            .unwrap();

        assert_eq!(list_pending(&pool).await.unwrap().len(), 1);

        assert!(approve_tool(&pool, id).await.unwrap());
        assert!(list_pending(&pool).await.unwrap().is_empty());

        assert!(delete_tool(&pool, id).await.unwrap());
        assert_eq!(count_tools(&pool).await.unwrap(), 0);

        // Idempotent on missing rows
        assert!(!approve_tool(&pool, id).await.unwrap());
        assert!(!delete_tool(&pool, id).await.unwrap());
    }
}
