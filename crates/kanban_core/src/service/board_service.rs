//! Board state manager.
//!
//! # Responsibility
//! - Own the authoritative board for one session.
//! - Apply add/remove/move transitions and persist every change.
//! - Hold the transient drag transfer and the selected input column.
//! - Notify observers with the new snapshot after each change.
//!
//! # Invariants
//! - Each mutation replaces the board with a new value; no partial updates.
//! - A new board becomes visible only after it was written to storage.
//! - No-op transitions neither write storage nor notify observers.
//! - The pending transfer is cleared by every drop and by cancel.

use crate::model::board::{Board, BoardChange, ColumnKey, TaskId};
use crate::model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use crate::repo::storage_repo::{LocalStorage, StorageError};
use crate::service::task_ids::{next_task_id, now_epoch_ms};
use log::{debug, info, warn};
use mockable::{Clock, DefaultClock};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Well-known storage key holding the board snapshot.
pub const STORAGE_KEY: &str = "Saved Tasks";

pub type BoardResult<T> = Result<T, BoardError>;

/// Failure surfaced by the board service.
///
/// Malformed stored snapshots are not errors: they are logged and replaced
/// with the default board.
#[derive(Debug)]
pub enum BoardError {
    Storage(StorageError),
    Snapshot(SnapshotError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<StorageError> for BoardError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<SnapshotError> for BoardError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Receives the "snapshot updated" signal.
pub trait BoardObserver: Send {
    fn snapshot_updated(&mut self, board: &Board);
}

impl<F> BoardObserver for F
where
    F: FnMut(&Board) + Send,
{
    fn snapshot_updated(&mut self, board: &Board) {
        self(board)
    }
}

/// Drag started on a card and not yet dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransfer {
    pub source: ColumnKey,
    pub task_id: TaskId,
}

/// Reads the stored board, falling back to the default board.
///
/// A missing entry is the normal first-run path. An unreadable entry is
/// logged as a warning and also yields the default board.
///
/// # Errors
/// - Returns `BoardError::Storage` only when the backend itself fails.
pub fn load_board<S: LocalStorage + ?Sized>(storage: &S) -> BoardResult<Board> {
    let Some(raw) = storage.get_item(STORAGE_KEY)? else {
        info!("event=board_load module=service status=ok source=default reason=missing");
        return Ok(Board::default());
    };

    match decode_snapshot(&raw) {
        Ok(board) => {
            info!(
                "event=board_load module=service status=ok source=storage tasks={}",
                board.task_count()
            );
            Ok(board)
        }
        Err(err) => {
            warn!(
                "event=snapshot_decode module=service status=error source=default bytes={} error={}",
                raw.len(),
                err
            );
            Ok(Board::default())
        }
    }
}

/// Session-scoped owner of the board and its storage.
pub struct BoardService<S: LocalStorage> {
    storage: S,
    board: Board,
    clock: Box<dyn Clock + Send>,
    selected_column: ColumnKey,
    pending: Option<PendingTransfer>,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl<S: LocalStorage> BoardService<S> {
    /// Hydrates the board from `storage` using the wall clock for new ids.
    pub fn initialize(storage: S) -> BoardResult<Self> {
        Self::initialize_with_clock(storage, DefaultClock)
    }

    /// Hydrates the board from `storage` with a caller-provided clock.
    pub fn initialize_with_clock(
        storage: S,
        clock: impl Clock + Send + 'static,
    ) -> BoardResult<Self> {
        let board = load_board(&storage)?;
        Ok(Self {
            storage,
            board,
            clock: Box::new(clock),
            selected_column: ColumnKey::Todo,
            pending: None,
            observers: Vec::new(),
        })
    }

    /// Current snapshot for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Registers an observer called after every applied change.
    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn selected_column(&self) -> ColumnKey {
        self.selected_column
    }

    /// Chooses the column that `submit_task` adds to.
    pub fn select_column(&mut self, key: ColumnKey) {
        self.selected_column = key;
    }

    /// Adds `content` to the selected column.
    pub fn submit_task(&mut self, content: &str) -> BoardResult<Option<TaskId>> {
        self.add_task(self.selected_column, content)
    }

    /// Appends a task to `key`.
    ///
    /// Returns `None` when `content` is blank; nothing is written then.
    pub fn add_task(&mut self, key: ColumnKey, content: &str) -> BoardResult<Option<TaskId>> {
        let id = next_task_id(&self.board, now_epoch_ms(self.clock.as_ref()));
        let change = self.apply(|board| board.apply_add(key, content, id))?;
        Ok(match change {
            BoardChange::Added(id) => Some(id),
            _ => None,
        })
    }

    /// Deletes task `id` from `key`; returns whether a task was removed.
    pub fn remove_task(&mut self, key: ColumnKey, id: TaskId) -> BoardResult<bool> {
        let change = self.apply(|board| board.apply_remove(key, id))?;
        Ok(change.is_changed())
    }

    /// Transfers task `id` from `source` to the end of `target`.
    pub fn move_task(
        &mut self,
        source: ColumnKey,
        target: ColumnKey,
        id: TaskId,
    ) -> BoardResult<bool> {
        let change = self.apply(|board| board.apply_move(source, target, id))?;
        Ok(change.is_changed())
    }

    /// Records the card being dragged, replacing any earlier pending drag.
    pub fn drag_start(&mut self, source: ColumnKey, task_id: TaskId) {
        debug!("event=drag_start module=service source={source} task_id={task_id}");
        self.pending = Some(PendingTransfer { source, task_id });
    }

    pub fn pending_transfer(&self) -> Option<PendingTransfer> {
        self.pending
    }

    pub fn cancel_drag(&mut self) {
        self.pending = None;
    }

    /// Completes the pending drag onto `target`.
    ///
    /// Without a pending drag this is a no-op. The pending drag is consumed
    /// even when the move itself turns out to be a no-op.
    pub fn drop_on(&mut self, target: ColumnKey) -> BoardResult<bool> {
        let Some(transfer) = self.pending.take() else {
            return Ok(false);
        };
        self.move_task(transfer.source, target, transfer.task_id)
    }

    /// Replaces the board with the seed board and persists it.
    pub fn reset(&mut self) -> BoardResult<()> {
        self.pending = None;
        self.commit(Board::default())
    }

    /// Writes the current board under [`STORAGE_KEY`], overwriting any prior value.
    pub fn persist(&mut self) -> BoardResult<()> {
        write_snapshot(&mut self.storage, &self.board)
    }

    fn apply(
        &mut self,
        transition: impl FnOnce(&mut Board) -> BoardChange,
    ) -> BoardResult<BoardChange> {
        let mut next = self.board.clone();
        let change = transition(&mut next);
        if change.is_changed() {
            self.commit(next)?;
        }
        Ok(change)
    }

    fn commit(&mut self, next: Board) -> BoardResult<()> {
        write_snapshot(&mut self.storage, &next)?;
        self.board = next;
        for observer in &mut self.observers {
            observer.snapshot_updated(&self.board);
        }
        Ok(())
    }
}

fn write_snapshot<S: LocalStorage>(storage: &mut S, board: &Board) -> BoardResult<()> {
    let started_at = Instant::now();
    let encoded = encode_snapshot(board)?;
    storage.set_item(STORAGE_KEY, &encoded)?;
    debug!(
        "event=board_persist module=service status=ok tasks={} bytes={} duration_ms={}",
        board.task_count(),
        encoded.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}
