//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the board interaction surface (submit, select, delete, drag, drop)
//!   to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All calls share one process-wide board session backed by one storage file.
//! - Column keys cross the boundary as wire names (`todo|inProgress|done`).

use kanban_core::db::resolve_db_path;
use kanban_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Board, BoardService, ColumnKey, SqliteLocalStorage, TaskId,
};
use log::warn;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

type Session = BoardService<SqliteLocalStorage>;

static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceCell<Mutex<Session>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One card as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub id: i64,
    pub content: String,
}

/// One lane as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnView {
    /// Wire key (`todo|inProgress|done`).
    pub key: String,
    /// Display title.
    pub name: String,
    pub items: Vec<BoardTaskItem>,
}

/// Full board view returned after every call that may change state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshotResponse {
    pub ok: bool,
    /// Lanes in display order; empty when `ok == false`.
    pub columns: Vec<BoardColumnView>,
    /// Column used by `board_submit_task`.
    pub selected_column: String,
    /// Pending drag as `(column, task_id)`, if any.
    pub dragging: Option<(String, i64)>,
    pub message: String,
}

/// Result of one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    pub ok: bool,
    /// Whether the board changed (false for silent no-ops).
    pub changed: bool,
    /// Created task id for add/submit.
    pub task_id: Option<i64>,
    pub message: String,
}

impl BoardActionResponse {
    fn applied(changed: bool, task_id: Option<i64>) -> Self {
        Self {
            ok: true,
            changed,
            task_id,
            message: if changed {
                "Board updated.".to_string()
            } else {
                "No change.".to_string()
            },
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current board for rendering.
///
/// # FFI contract
/// - Sync call, DB-backed on first use only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardSnapshotResponse {
    match with_session(|session| Ok(to_snapshot_response(session))) {
        Ok(response) => response,
        Err(err) => BoardSnapshotResponse {
            ok: false,
            columns: Vec::new(),
            selected_column: String::new(),
            dragging: None,
            message: format!("board_snapshot failed: {err}"),
        },
    }
}

/// Adds a task to `column`. Blank text is a silent no-op (`changed=false`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(column: String, content: String) -> BoardActionResponse {
    run_action("board_add_task", |session| {
        let key = parse_column(&column)?;
        let id = session
            .add_task(key, &content)
            .map_err(|err| err.to_string())?;
        Ok((id.is_some(), id.map(|TaskId(raw)| raw)))
    })
}

/// Adds a task to the currently selected column.
#[flutter_rust_bridge::frb(sync)]
pub fn board_submit_task(content: String) -> BoardActionResponse {
    run_action("board_submit_task", |session| {
        let id = session.submit_task(&content).map_err(|err| err.to_string())?;
        Ok((id.is_some(), id.map(|TaskId(raw)| raw)))
    })
}

/// Chooses the column used by `board_submit_task`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_select_column(column: String) -> BoardActionResponse {
    run_action("board_select_column", |session| {
        session.select_column(parse_column(&column)?);
        Ok((false, None))
    })
}

/// Deletes task `task_id` from `column`; unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn board_remove_task(column: String, task_id: i64) -> BoardActionResponse {
    run_action("board_remove_task", |session| {
        let key = parse_column(&column)?;
        let changed = session
            .remove_task(key, TaskId(task_id))
            .map_err(|err| err.to_string())?;
        Ok((changed, None))
    })
}

/// Starts dragging `task_id` out of `column`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drag_start(column: String, task_id: i64) -> BoardActionResponse {
    run_action("board_drag_start", |session| {
        session.drag_start(parse_column(&column)?, TaskId(task_id));
        Ok((false, None))
    })
}

/// Drops the pending drag onto `column` and clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drop(column: String) -> BoardActionResponse {
    run_action("board_drop", |session| {
        let key = parse_column(&column)?;
        let changed = session.drop_on(key).map_err(|err| err.to_string())?;
        Ok((changed, None))
    })
}

/// Abandons the pending drag, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn board_cancel_drag() -> BoardActionResponse {
    run_action("board_cancel_drag", |session| {
        session.cancel_drag();
        Ok((false, None))
    })
}

/// Replaces the board with the seed board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reset() -> BoardActionResponse {
    run_action("board_reset", |session| {
        session.reset().map_err(|err| err.to_string())?;
        Ok((true, None))
    })
}

fn run_action(
    name: &str,
    action: impl FnOnce(&mut Session) -> Result<(bool, Option<i64>), String>,
) -> BoardActionResponse {
    match with_session(action) {
        Ok((changed, task_id)) => BoardActionResponse::applied(changed, task_id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={name} error={err}");
            BoardActionResponse::failure(format!("{name} failed: {err}"))
        }
    }
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, String>) -> Result<T, String> {
    let session = SESSION.get_or_try_init(|| -> Result<Mutex<Session>, String> {
        let storage = SqliteLocalStorage::open(resolve_board_db_path())
            .map_err(|err| format!("board storage open failed: {err}"))?;
        let service = BoardService::initialize(storage)
            .map_err(|err| format!("board init failed: {err}"))?;
        Ok(Mutex::new(service))
    })?;
    let mut guard = session
        .lock()
        .map_err(|_| "board session lock poisoned".to_string())?;
    f(&mut *guard)
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH.get_or_init(resolve_db_path).clone()
}

fn parse_column(value: &str) -> Result<ColumnKey, String> {
    value.parse::<ColumnKey>().map_err(|err| err.to_string())
}

fn to_snapshot_response(session: &Session) -> BoardSnapshotResponse {
    BoardSnapshotResponse {
        ok: true,
        columns: to_column_views(session.board()),
        selected_column: session.selected_column().as_str().to_string(),
        dragging: session
            .pending_transfer()
            .map(|transfer| (transfer.source.as_str().to_string(), transfer.task_id.0)),
        message: format!("{} task(s).", session.board().task_count()),
    }
}

fn to_column_views(board: &Board) -> Vec<BoardColumnView> {
    board
        .columns()
        .map(|(key, column)| BoardColumnView {
            key: key.as_str().to_string(),
            name: column.name.clone(),
            items: column
                .items
                .iter()
                .map(|task| BoardTaskItem {
                    id: task.id.0,
                    content: task.content.clone(),
                })
                .collect(),
        })
        .collect()
}
