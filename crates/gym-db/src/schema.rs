use anyhow::Result;
use sqlx::{Connection as SqlConnection, Executor};
use thiserror::Error as ThisError;

use crate::Connection;

/// Schema migrations, applied in order. The position in the
/// list is the schema version after the migration ran.
const MIGRATIONS: &[&str] = &[include_str!("../db/migrations/0001_members.sql")];

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum MigrationError {
    #[error("Database schema version {0} is newer than the supported version {1}")]
    UnknownVersion(u32, u32),
}

/// The schema version this build expects
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Read the schema version of the database.
pub async fn version(conn: &Connection) -> Result<u32> {
    let mut conn = conn.lock().await;
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    Ok(version as u32)
}

/// Apply all pending migrations. Each migration runs in its own
/// transaction together with the version bump.
pub async fn migrate(conn: &Connection) -> Result<u32> {
    let current = version(conn).await?;
    let latest = latest_version();
    if current > latest {
        return Err(MigrationError::UnknownVersion(current, latest).into());
    }

    let mut conn = conn.lock().await;
    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let next = idx as u32 + 1;
        log::info!("migrating database schema to version {}", next);

        let mut tx = conn.begin().await?;
        (&mut *tx).execute(*sql).await?;
        (&mut *tx)
            .execute(format!("PRAGMA user_version = {}", next).as_str())
            .await?;
        tx.commit().await?;
    }

    Ok(latest)
}
