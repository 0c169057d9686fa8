//! Core domain logic for the kanban board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{
    add_task, move_task, remove_task, Board, BoardChange, BoardValidationError, Column, ColumnKey,
    ParseColumnKeyError, Task, TaskId,
};
pub use model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use repo::storage_repo::{
    LocalStorage, MemoryLocalStorage, SqliteLocalStorage, StorageError, StorageResult,
};
pub use service::board_service::{
    load_board, BoardError, BoardObserver, BoardResult, BoardService, PendingTransfer, STORAGE_KEY,
};
pub use service::task_ids::{next_task_id, now_epoch_ms};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
