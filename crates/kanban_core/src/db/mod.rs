//! SQLite file that backs board local storage.
//!
//! `open_db` returns a connection whose `local_storage` table is ready for
//! reads and writes. Files stamped with a newer storage layout are refused
//! untouched, so an older build never rewrites a board it cannot read.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;

pub use open::{open_db, open_db_in_memory, STORAGE_SCHEMA_VERSION};

/// Environment variable overriding the storage file location.
pub const DB_PATH_ENV: &str = "KANBAN_DB_PATH";
/// File name used under the temp dir when no override is set.
pub const DEFAULT_DB_FILE_NAME: &str = "kanban_board.sqlite3";

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or talking to the storage file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's `user_version` is ahead of what this build lays out.
    NewerStorageSchema { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NewerStorageSchema { found, supported } => write!(
                f,
                "board storage uses layout {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Returns the storage path from `KANBAN_DB_PATH`, falling back to
/// `<temp_dir>/kanban_board.sqlite3` when unset or blank.
pub fn resolve_db_path() -> PathBuf {
    match std::env::var(DB_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}
