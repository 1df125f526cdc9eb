//! Key-value schema versions.
//!
//! Each entry upgrades the schema by one version. Pending entries run in a
//! single transaction that also bumps `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Table holding one row per storage key.
pub const KV_TABLE: &str = "kv_entries";

const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Returns the newest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Upgrades `conn` to `latest_version` and checks the key-value table.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `MissingTable` when the version is current but `kv_entries` is absent.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    if from < latest {
        let tx = conn.transaction()?;
        for (version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > from) {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
        }
        tx.commit()?;
        info!("event=db_migrate module=db status=ok from={from} to={latest}");
    }

    ensure_kv_table(conn, latest)
}

fn ensure_kv_table(conn: &Connection, db_version: u32) -> DbResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(DbError::MissingTable {
            table: KV_TABLE,
            db_version,
        })
    }
}
