//! Database migrations
//!
//! Each migration has a unique version number and is applied in order.
//! Applied migrations are tracked in the `_migrations` table.

use std::future::Future;
use std::pin::Pin;

use libsql::Connection;
use tracing::info;

mod v001_initial_schema;
mod v002_contact_relay_status;

pub type MigrationFn =
    fn(&Connection) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send + '_>>;

pub struct Migration {
    /// Sequential, starting at 1.
    pub version: u32,
    pub description: &'static str,
    pub apply: MigrationFn,
    pub rollback: MigrationFn,
}

pub fn all_migrations() -> Vec<Migration> {
    vec![
        v001_initial_schema::migration(),
        v002_contact_relay_status::migration(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<u32>,
    pub pending: Vec<u32>,
}

/// Apply all pending migrations, returning the versions applied now.
pub async fn apply_all(conn: &Connection) -> Result<Vec<u32>, String> {
    init_migrations_table(conn).await?;

    let applied = get_applied_versions(conn).await?;
    let mut newly_applied = Vec::new();

    for migration in all_migrations() {
        if applied.contains(&migration.version) {
            continue;
        }

        apply_migration(conn, &migration).await?;
        info!(
            version = migration.version,
            description = migration.description,
            "applied migration"
        );
        newly_applied.push(migration.version);
    }

    Ok(newly_applied)
}

pub async fn rollback_last(conn: &Connection) -> Result<Option<u32>, String> {
    let applied = get_applied_versions(conn).await?;

    if let Some(&last_version) = applied.last() {
        let migrations = all_migrations();
        if let Some(migration) = migrations.iter().find(|m| m.version == last_version) {
            rollback_migration(conn, migration).await?;
            info!(version = last_version, "rolled back migration");
            return Ok(Some(last_version));
        }
    }

    Ok(None)
}

pub async fn current_version(conn: &Connection) -> Result<u32, String> {
    let applied = get_applied_versions(conn).await?;
    Ok(applied.last().copied().unwrap_or(0))
}

pub async fn get_applied_versions(conn: &Connection) -> Result<Vec<u32>, String> {
    let mut rows = conn
        .query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='_migrations'",
            (),
        )
        .await
        .map_err(|e| e.to_string())?;

    if rows.next().await.map_err(|e| e.to_string())?.is_none() {
        return Ok(Vec::new());
    }
    drop(rows);

    let mut applied: Vec<u32> = Vec::new();
    let mut rows = conn
        .query("SELECT version FROM _migrations ORDER BY version", ())
        .await
        .map_err(|e| e.to_string())?;

    while let Some(row) = rows.next().await.map_err(|e| e.to_string())? {
        let version: i64 = row.get(0).map_err(|e| e.to_string())?;
        applied.push(version as u32);
    }

    Ok(applied)
}

pub async fn status(conn: &Connection) -> Result<MigrationStatus, String> {
    let applied = get_applied_versions(conn).await?;
    let pending = all_migrations()
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .map(|m| m.version)
        .collect();

    Ok(MigrationStatus { applied, pending })
}

// ============================================================================
// Internal
// ============================================================================

async fn init_migrations_table(conn: &Connection) -> Result<(), String> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;
    Ok(())
}

async fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), String> {
    (migration.apply)(conn).await?;

    conn.execute(
        "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, datetime('now'))",
        libsql::params![migration.version as i64, migration.description],
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(())
}

async fn rollback_migration(conn: &Connection, migration: &Migration) -> Result<(), String> {
    (migration.rollback)(conn).await?;

    conn.execute(
        "DELETE FROM _migrations WHERE version = ?1",
        libsql::params![migration.version as i64],
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(())
}
