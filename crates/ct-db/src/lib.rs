//! Storage layer for the can tracker.
//!
//! Provides a [`KvStore`] backed by `rusqlite`.
//!
//! # Thread Safety
//!
//! [`SqliteStore`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A store can be moved between threads but not shared without external
//! synchronization. The tracker is single-threaded, so this is never needed.
//!
//! # Schema
//!
//! A single `kv` table maps string keys to string values. Values are opaque
//! here; the tracker stores one JSON document per key. `updated_at` records
//! the last write in ISO 8601 (UTC) and is informational only.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use ct_core::KvStore;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// SQLite-backed key-value store.
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

/// A stored key with its last-write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: String,
    pub bytes: usize,
    pub updated_at: String,
}

impl SqliteStore {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(store)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Lists stored keys, ordered by key.
    pub fn keys(&self) -> Result<Vec<KeyRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, length(CAST(value AS BLOB)), updated_at FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| {
            let bytes: i64 = row.get(1)?;
            Ok(KeyRecord {
                key: row.get(0)?,
                bytes: usize::try_from(bytes).unwrap_or_default(),
                updated_at: row.get(2)?,
            })
        })?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KvStore for SqliteStore {
    type Error = DbError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?", params![key])?;
        Ok(())
    }
}
