//! Database module for SQLite persistence.
//!
//! SQLite holds templates and the incident tracking tables.

mod repository;
mod templates;

pub use repository::*;
pub use templates::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Take the database write lock inside `tx` with a no-op update of one row.
///
/// Must be the first statement of a read-modify-write transaction, so a
/// concurrent writer waits instead of merging into the same stale row.
/// Returns false when the row does not exist.
pub(crate) async fn lock_row(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("UPDATE {table} SET id = id WHERE id = ?"))
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            severity TEXT NOT NULL DEFAULT 'medium',
            status TEXT NOT NULL DEFAULT 'investigating',
            data TEXT NOT NULL DEFAULT '{}' CHECK (json_valid(data)),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evidence_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
            filename TEXT NOT NULL,
            original_name TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'other',
            description TEXT,
            source TEXT,
            file_size INTEGER,
            mime_type TEXT,
            is_verified INTEGER NOT NULL DEFAULT 0,
            uploaded_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incident_timelines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            severity TEXT NOT NULL DEFAULT 'medium',
            type TEXT NOT NULL DEFAULT 'update',
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incident_cross_references (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
            related_incident_id INTEGER NOT NULL REFERENCES incidents(id) ON DELETE CASCADE,
            relationship TEXT NOT NULL DEFAULT 'related',
            description TEXT,
            created_at TEXT NOT NULL,
            CHECK (incident_id <> related_incident_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_incidents_created_at ON incidents(created_at);
        CREATE INDEX IF NOT EXISTS idx_evidence_incident ON evidence_files(incident_id);
        CREATE INDEX IF NOT EXISTS idx_timeline_incident ON incident_timelines(incident_id);
        CREATE INDEX IF NOT EXISTS idx_cross_refs_incident ON incident_cross_references(incident_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
