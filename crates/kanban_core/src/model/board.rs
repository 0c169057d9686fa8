//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical task/column/board shapes shared by every front end.
//! - Provide the pure add/remove/move transitions over a board value.
//!
//! # Invariants
//! - A board always holds exactly the three fixed columns.
//! - Every `TaskId` appears at most once across the whole board.
//! - Task content is never blank after trimming.
//! - Transfers append to the end of the target column and keep id/content.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier of one task card.
///
/// Seed tasks use small integers; generated tasks use epoch-millisecond
/// values, so the wire form stays a plain JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Text as submitted by the user (not trimmed).
    pub content: String,
}

impl Task {
    pub fn new(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Closed set of board lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    /// Not started yet.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl ColumnKey {
    /// All keys in board display order.
    pub const ALL: [ColumnKey; 3] = [ColumnKey::Todo, ColumnKey::InProgress, ColumnKey::Done];

    /// Wire name used in snapshots and front-end payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    /// Human-readable lane title.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name one of the fixed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColumnKeyError(pub String);

impl Display for ParseColumnKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown column `{}`; expected todo|inProgress|done",
            self.0
        )
    }
}

impl Error for ParseColumnKeyError {}

impl FromStr for ColumnKey {
    type Err = ParseColumnKeyError;

    /// Accepts the wire names plus snake/kebab spellings of `inProgress`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "todo" => Ok(Self::Todo),
            "inProgress" | "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseColumnKeyError(other.to_string())),
        }
    }
}

/// One lane: its display name and its ordered cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub items: Vec<Task>,
}

impl Column {
    /// Creates an empty lane titled with the key's display name.
    pub fn empty(key: ColumnKey) -> Self {
        Self {
            name: key.display_name().to_string(),
            items: Vec::new(),
        }
    }

    fn position_of(&self, id: TaskId) -> Option<usize> {
        self.items.iter().position(|task| task.id == id)
    }
}

/// Invariant violations detected by [`Board::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    /// The same id is held by more than one card.
    DuplicateTaskId(TaskId),
    /// A card carries blank content.
    EmptyContent { column: ColumnKey, id: TaskId },
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTaskId(id) => write!(f, "task id {id} appears more than once"),
            Self::EmptyContent { column, id } => {
                write!(f, "task {id} in column `{column}` has empty content")
            }
        }
    }
}

impl Error for BoardValidationError {}

/// Result of applying one transition to a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    /// A task with this id was appended.
    Added(TaskId),
    /// This task was taken off the board.
    Removed(Task),
    /// A task now sits at the end of `to`.
    Moved {
        id: TaskId,
        from: ColumnKey,
        to: ColumnKey,
    },
    /// The transition was a no-op; the board is untouched.
    Unchanged,
}

impl BoardChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Full board state: exactly one column per [`ColumnKey`].
///
/// Keys are struct fields, so a board with a missing lane cannot be built.
/// The serde shape is the snapshot layout `{todo, inProgress, done}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    todo: Column,
    in_progress: Column,
    done: Column,
}

impl Default for Board {
    /// Seed board used on first run and after an unreadable snapshot.
    fn default() -> Self {
        Self {
            todo: Column {
                name: ColumnKey::Todo.display_name().to_string(),
                items: vec![Task::new(TaskId(1), "Learning Next.js")],
            },
            in_progress: Column {
                name: ColumnKey::InProgress.display_name().to_string(),
                items: vec![Task::new(TaskId(2), "Learning React")],
            },
            done: Column {
                name: ColumnKey::Done.display_name().to_string(),
                items: vec![Task::new(TaskId(3), "Learning TypeScript")],
            },
        }
    }
}

impl Board {
    /// Creates a board with three empty lanes.
    pub fn empty() -> Self {
        Self {
            todo: Column::empty(ColumnKey::Todo),
            in_progress: Column::empty(ColumnKey::InProgress),
            done: Column::empty(ColumnKey::Done),
        }
    }

    pub fn column(&self, key: ColumnKey) -> &Column {
        match key {
            ColumnKey::Todo => &self.todo,
            ColumnKey::InProgress => &self.in_progress,
            ColumnKey::Done => &self.done,
        }
    }

    fn column_mut(&mut self, key: ColumnKey) -> &mut Column {
        match key {
            ColumnKey::Todo => &mut self.todo,
            ColumnKey::InProgress => &mut self.in_progress,
            ColumnKey::Done => &mut self.done,
        }
    }

    /// Iterates lanes in display order.
    pub fn columns(&self) -> impl Iterator<Item = (ColumnKey, &Column)> {
        ColumnKey::ALL.into_iter().map(|key| (key, self.column(key)))
    }

    pub fn task_count(&self) -> usize {
        self.columns().map(|(_, column)| column.items.len()).sum()
    }

    pub fn max_task_id(&self) -> Option<TaskId> {
        self.columns()
            .flat_map(|(_, column)| column.items.iter().map(|task| task.id))
            .max()
    }

    /// Locates a card anywhere on the board.
    pub fn find_task(&self, id: TaskId) -> Option<(ColumnKey, &Task)> {
        self.columns().find_map(|(key, column)| {
            column
                .items
                .iter()
                .find(|task| task.id == id)
                .map(|task| (key, task))
        })
    }

    /// Verifies id uniqueness and non-blank content across all lanes.
    pub fn check_invariants(&self) -> Result<(), BoardValidationError> {
        let mut seen = BTreeSet::new();
        for (key, column) in self.columns() {
            for task in &column.items {
                if !seen.insert(task.id) {
                    return Err(BoardValidationError::DuplicateTaskId(task.id));
                }
                if task.content.trim().is_empty() {
                    return Err(BoardValidationError::EmptyContent {
                        column: key,
                        id: task.id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Appends a new card to `key`.
    ///
    /// Blank content is rejected silently. An `id` already on the board is
    /// also rejected so the uniqueness invariant can never be broken here.
    pub fn apply_add(&mut self, key: ColumnKey, content: &str, id: TaskId) -> BoardChange {
        if content.trim().is_empty() || self.find_task(id).is_some() {
            return BoardChange::Unchanged;
        }
        self.column_mut(key).items.push(Task::new(id, content));
        BoardChange::Added(id)
    }

    /// Removes card `id` from lane `key`; missing cards are a no-op.
    pub fn apply_remove(&mut self, key: ColumnKey, id: TaskId) -> BoardChange {
        let column = self.column_mut(key);
        match column.position_of(id) {
            Some(index) => BoardChange::Removed(column.items.remove(index)),
            None => BoardChange::Unchanged,
        }
    }

    /// Transfers card `id` from `source` to the end of `target`.
    ///
    /// Same-lane drops and stale references (card not in `source`) are no-ops.
    pub fn apply_move(&mut self, source: ColumnKey, target: ColumnKey, id: TaskId) -> BoardChange {
        if source == target {
            return BoardChange::Unchanged;
        }
        let from = self.column_mut(source);
        let Some(index) = from.position_of(id) else {
            return BoardChange::Unchanged;
        };
        let task = from.items.remove(index);
        self.column_mut(target).items.push(task);
        BoardChange::Moved {
            id,
            from: source,
            to: target,
        }
    }
}

/// Returns `board` with a new card appended to `key`, or an equal board when
/// `content` is blank.
pub fn add_task(board: &Board, key: ColumnKey, content: &str, id: TaskId) -> Board {
    let mut next = board.clone();
    next.apply_add(key, content, id);
    next
}

/// Returns `board` without card `id` in lane `key`.
pub fn remove_task(board: &Board, key: ColumnKey, id: TaskId) -> Board {
    let mut next = board.clone();
    next.apply_remove(key, id);
    next
}

/// Returns `board` with card `id` transferred from `source` to `target`.
pub fn move_task(board: &Board, source: ColumnKey, target: ColumnKey, id: TaskId) -> Board {
    let mut next = board.clone();
    next.apply_move(source, target, id);
    next
}

#[cfg(test)]
mod tests {
    use super::{
        add_task, move_task, remove_task, Board, BoardChange, BoardValidationError, ColumnKey,
        Task, TaskId,
    };

    fn ids(board: &Board, key: ColumnKey) -> Vec<i64> {
        board.column(key).items.iter().map(|task| task.id.0).collect()
    }

    #[test]
    fn default_board_seeds_one_task_per_column() {
        let board = Board::default();
        assert_eq!(
            board.column(ColumnKey::Todo).items,
            vec![Task::new(TaskId(1), "Learning Next.js")]
        );
        assert_eq!(ids(&board, ColumnKey::InProgress), vec![2]);
        assert_eq!(ids(&board, ColumnKey::Done), vec![3]);
        assert_eq!(board.column(ColumnKey::InProgress).name, "In Progress");
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn column_key_parses_wire_and_snake_names() {
        assert_eq!("todo".parse::<ColumnKey>(), Ok(ColumnKey::Todo));
        assert_eq!("inProgress".parse::<ColumnKey>(), Ok(ColumnKey::InProgress));
        assert_eq!("in_progress".parse::<ColumnKey>(), Ok(ColumnKey::InProgress));
        let err = "backlog".parse::<ColumnKey>().unwrap_err();
        assert!(err.to_string().contains("backlog"));
    }

    #[test]
    fn add_rejects_whitespace_only_content() {
        let board = Board::default();
        assert_eq!(add_task(&board, ColumnKey::Todo, "  \t", TaskId(10)), board);
    }

    #[test]
    fn add_keeps_submitted_text_and_appends() {
        let board = add_task(&Board::default(), ColumnKey::Done, " Ship it", TaskId(10));
        let done = &board.column(ColumnKey::Done).items;
        assert_eq!(done.last(), Some(&Task::new(TaskId(10), " Ship it")));
        assert_eq!(board.task_count(), 4);
    }

    #[test]
    fn add_refuses_id_already_on_board() {
        let mut board = Board::default();
        assert_eq!(
            board.apply_add(ColumnKey::Done, "dup", TaskId(1)),
            BoardChange::Unchanged
        );
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn remove_only_matches_named_column() {
        let board = Board::default();
        assert_eq!(remove_task(&board, ColumnKey::Done, TaskId(1)), board);

        let removed = remove_task(&board, ColumnKey::Todo, TaskId(1));
        assert!(removed.column(ColumnKey::Todo).items.is_empty());
        assert_eq!(remove_task(&removed, ColumnKey::Todo, TaskId(1)), removed);
    }

    #[test]
    fn move_appends_to_end_of_target() {
        let board = move_task(&Board::default(), ColumnKey::Todo, ColumnKey::Done, TaskId(1));
        assert!(board.column(ColumnKey::Todo).items.is_empty());
        assert_eq!(ids(&board, ColumnKey::Done), vec![3, 1]);
        assert_eq!(
            board.find_task(TaskId(1)).map(|(key, task)| (key, task.content.as_str())),
            Some((ColumnKey::Done, "Learning Next.js"))
        );
    }

    #[test]
    fn move_to_same_column_or_with_stale_id_is_noop() {
        let board = Board::default();
        assert_eq!(
            move_task(&board, ColumnKey::Todo, ColumnKey::Todo, TaskId(1)),
            board
        );
        assert_eq!(
            move_task(&board, ColumnKey::Todo, ColumnKey::Done, TaskId(999)),
            board
        );
        assert_eq!(
            move_task(&board, ColumnKey::InProgress, ColumnKey::Done, TaskId(1)),
            board
        );
    }

    #[test]
    fn check_invariants_reports_duplicates_and_blank_content() {
        let mut board = Board::empty();
        board.column_mut(ColumnKey::Todo).items.push(Task::new(TaskId(5), "a"));
        board.column_mut(ColumnKey::Done).items.push(Task::new(TaskId(5), "b"));
        assert_eq!(
            board.check_invariants(),
            Err(BoardValidationError::DuplicateTaskId(TaskId(5)))
        );

        let mut blank = Board::empty();
        blank
            .column_mut(ColumnKey::InProgress)
            .items
            .push(Task::new(TaskId(7), "   "));
        assert_eq!(
            blank.check_invariants(),
            Err(BoardValidationError::EmptyContent {
                column: ColumnKey::InProgress,
                id: TaskId(7),
            })
        );
    }
}
