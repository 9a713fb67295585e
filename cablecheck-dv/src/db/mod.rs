//! Database access for cablecheck-dv
//!
//! SQLite database in the resolved root folder, shared key/value settings
//! table plus the cable design records.

pub mod designs;
pub mod settings;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    // Enable foreign keys and WAL for concurrent readers
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Initialize cablecheck-dv tables (idempotent, safe to call repeatedly).
///
/// Public so integration tests can run against an in-memory pool.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // Key/value settings table (oracle API key, tunables)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Stored cable design records, looked up by public design_id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cable_designs (
            id TEXT PRIMARY KEY,
            design_id TEXT NOT NULL UNIQUE,
            standard TEXT,
            voltage TEXT,
            conductor_material TEXT,
            conductor_class TEXT,
            csa REAL,
            insulation_material TEXT,
            insulation_thickness REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (settings, cable_designs)");

    Ok(())
}
