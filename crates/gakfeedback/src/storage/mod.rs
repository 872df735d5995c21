//! Storage layer for gakfeedback.
//!
//! This module provides the key-value slot abstraction the feedback store
//! persists into, and its `SQLite`-backed implementation. Each slot holds
//! one serialized value and is always replaced as a whole.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// A key-value store of whole serialized values.
///
/// Writes replace the previous value for the key entirely. A key that was
/// never written (or was removed) reads as `None`.
pub trait Slot {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// `SQLite`-backed slot storage.
///
/// One row per key in the `slots` table.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let (slot_count, stored_bytes): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM slots",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            slot_count: u64::try_from(slot_count).unwrap_or(0),
            stored_bytes: u64::try_from(stored_bytes).unwrap_or(0),
            db_size_bytes,
        })
    }
}

impl Slot for Storage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        debug!(key, found = value.is_some(), "Read slot");
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        debug!(key, removed = affected > 0, "Removed slot");
        Ok(affected > 0)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys holding a value.
    pub slot_count: u64,
    /// Total size of the stored values in bytes.
    pub stored_bytes: u64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_read_missing_key() {
        let storage = create_test_storage();
        assert_eq!(storage.read("absent").unwrap(), None);
    }

    #[test]
    fn test_write_and_read() {
        let storage = create_test_storage();
        storage.write("k", "[1,2,3]").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_write_replaces_whole_value() {
        let storage = create_test_storage();
        storage.write("k", "first value").unwrap();
        storage.write("k", "2").unwrap();

        assert_eq!(storage.read("k").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.stats().unwrap().slot_count, 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = create_test_storage();
        storage.write("a", "1").unwrap();
        storage.write("b", "2").unwrap();
        storage.remove("a").unwrap();

        assert_eq!(storage.read("a").unwrap(), None);
        assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_remove() {
        let storage = create_test_storage();
        storage.write("k", "v").unwrap();

        assert!(storage.remove("k").unwrap());
        assert!(!storage.remove("k").unwrap());
        assert_eq!(storage.read("k").unwrap(), None);
    }

    #[test]
    fn test_unicode_value() {
        let storage = create_test_storage();
        storage.write("k", "Orçamentação 💡").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("Orçamentação 💡"));
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_storage().stats().unwrap();
        assert_eq!(stats.slot_count, 0);
        assert_eq!(stats.stored_bytes, 0);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_counts_bytes() {
        let storage = create_test_storage();
        storage.write("a", "1234").unwrap();
        storage.write("b", "ç").unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.slot_count, 2);
        assert_eq!(stats.stored_bytes, 6);
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("feedback.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.write("k", "persisted").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("persisted"));
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/feedback.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }
}
