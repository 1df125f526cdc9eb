//! Local key-value storage contracts.
//!
//! # Responsibility
//! - Define the `get`/`set` contract the persistence bridge writes through.
//! - Isolate SQL details behind the `KvStorage` trait.
//!
//! # Invariants
//! - `set` overwrites any prior value for the key.
//! - Implementations are shareable across the save worker threads.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteKvStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a key-value storage backend.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// A previous writer panicked while holding the connection lock.
    Poisoned,
    /// Backend-specific failure outside the SQLite path.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "storage connection lock poisoned"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-to-string storage scoped to the device/user session.
pub trait KvStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
