//! Connection bootstrap for the local storage file.
//!
//! # Invariants
//! - Returned connections carry the `local_storage` table.
//! - Every open attempt emits exactly one terminal `db_open` event.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout stamped into `PRAGMA user_version` by this build.
pub const STORAGE_SCHEMA_VERSION: u32 = 1;

const LOCAL_STORAGE_TABLE: &str = "CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Opens the storage file and lays out the `local_storage` table.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory store with the same layout.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    // Another process may hold the file while persisting its own board.
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_storage_schema(conn)
}

fn ensure_storage_schema(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > STORAGE_SCHEMA_VERSION {
        return Err(DbError::NewerStorageSchema {
            found,
            supported: STORAGE_SCHEMA_VERSION,
        });
    }
    if found == STORAGE_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(LOCAL_STORAGE_TABLE)?;
    tx.pragma_update(None, "user_version", STORAGE_SCHEMA_VERSION)?;
    tx.commit()?;
    info!("event=storage_schema module=db status=ok from={found} to={STORAGE_SCHEMA_VERSION}");
    Ok(())
}
