//! Database initialization
//!
//! Creates the SQLite database and the tables shared by the aidex services.
//! Table creation is split into per-table helpers so tests can build just
//! the schema they need on an in-memory pool.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the database file, creating it if missing, and runs table
/// initialization.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize all aidex tables
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    create_tools_table(pool).await?;
    create_import_logs_table(pool).await?;

    tracing::info!("Database tables initialized (tools, import_logs)");

    Ok(())
}

/// Create the tools table
///
/// `slug` carries the uniqueness invariant for the whole directory.
/// `website_domain` is the normalized host (lowercased, `www.` stripped)
/// kept alongside the raw website URL so duplicate detection is a plain
/// indexed equality query.
pub async fn create_tools_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tools (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            website TEXT NOT NULL,
            website_domain TEXT NOT NULL,
            tagline TEXT,
            description TEXT,
            pricing TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            logo_url TEXT,
            source TEXT NOT NULL,
            verified INTEGER NOT NULL DEFAULT 0,
            featured INTEGER NOT NULL DEFAULT 0,
            trending INTEGER NOT NULL DEFAULT 0,
            editors_choice INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tools_website_domain ON tools(website_domain)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tools_verified ON tools(verified)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the import_logs table
///
/// Append-only: one row per source per import run, written when the run
/// finishes (including stopped runs). Never mutated afterwards.
pub async fn create_import_logs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS import_logs (
            id TEXT PRIMARY KEY,
            source TEXT NOT NULL,
            fetched INTEGER NOT NULL DEFAULT 0,
            imported INTEGER NOT NULL DEFAULT 0,
            skipped INTEGER NOT NULL DEFAULT 0,
            errors TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_import_logs_created_at ON import_logs(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}
