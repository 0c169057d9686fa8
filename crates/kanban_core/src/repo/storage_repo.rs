//! Local key/value storage contracts and implementations.
//!
//! # Responsibility
//! - Provide a browser-style `getItem/setItem/removeItem` API for snapshots.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - One key maps to at most one value; `set_item` overwrites.
//! - Values are stored verbatim; interpretation belongs to the snapshot codec.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "local storage failure: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
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

/// Key/value store holding serialized snapshots.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: LocalStorage + ?Sized> LocalStorage for &mut S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// SQLite-backed local storage over the `local_storage` table.
pub struct SqliteLocalStorage {
    conn: Connection,
}

impl SqliteLocalStorage {
    /// Wraps a connection opened through `db::open_db`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the storage file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl LocalStorage for SqliteLocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-process storage for tests and throwaway sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocalStorage {
    items: BTreeMap<String, String>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LocalStorage, MemoryLocalStorage, SqliteLocalStorage};

    fn exercise(storage: &mut dyn LocalStorage) {
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "one").unwrap();
        storage.set_item("k", "two").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("two"));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn memory_storage_overwrites_and_removes() {
        let mut storage = MemoryLocalStorage::new();
        exercise(&mut storage);
        assert!(storage.is_empty());
    }

    #[test]
    fn sqlite_storage_overwrites_and_removes() {
        let mut storage = SqliteLocalStorage::open_in_memory().unwrap();
        exercise(&mut storage);
    }

    #[test]
    fn sqlite_storage_keeps_one_row_per_key() {
        let mut storage = SqliteLocalStorage::open_in_memory().unwrap();
        storage.set_item("Saved Tasks", "a").unwrap();
        storage.set_item("Saved Tasks", "b").unwrap();
        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM local_storage;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
