use rusqlite::Connection;
use todoflow_core::db::migrations::{latest_version, schema_version, KV_TABLE};
use todoflow_core::db::{open_db, open_db_in_memory, DbError};
use todoflow_core::{KvStorage, SqliteKvStorage, StorageError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, KV_TABLE);
}

#[test]
fn file_storage_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoflow.db");

    let first = SqliteKvStorage::open(&path).unwrap();
    first.set("tasks_state_v1", "[]").unwrap();
    drop(first);

    let second = SqliteKvStorage::open(&path).unwrap();
    assert_eq!(second.get("tasks_state_v1").unwrap().as_deref(), Some("[]"));

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let storage_err = SqliteKvStorage::open(&path).err().unwrap();
    assert!(matches!(
        storage_err,
        StorageError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn current_version_without_kv_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::MissingTable { table: KV_TABLE, .. }
    ));
    assert!(err.to_string().contains("kv_entries"));
}

#[test]
fn reopening_current_schema_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("current.db");
    SqliteKvStorage::open(&path)
        .unwrap()
        .set("onboardingCompleted", "true")
        .unwrap();

    let conn = open_db(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
