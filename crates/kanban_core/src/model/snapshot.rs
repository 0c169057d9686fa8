//! Versioned snapshot codec for persisted boards.
//!
//! # Responsibility
//! - Encode a board into the deterministic stored text form.
//! - Decode stored text back into a validated board.
//!
//! # Invariants
//! - Encoded output is always the current envelope version.
//! - Decoding never returns a board that fails `Board::check_invariants()`.
//! - Unversioned (legacy) payloads are read as a bare column map.

use crate::model::board::{Board, BoardValidationError};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Envelope version written by this binary.
pub const SNAPSHOT_VERSION: u64 = 1;

const VERSION_FIELD: &str = "version";
const COLUMNS_FIELD: &str = "columns";

/// Failure while encoding or decoding a stored snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Payload is not JSON, or does not match the board shape.
    Json(serde_json::Error),
    /// Envelope declares a version this binary cannot read.
    UnsupportedVersion { found: Value, supported: u64 },
    /// Versioned envelope without a `columns` payload.
    MissingColumns,
    /// Shape is fine but board invariants do not hold.
    Invalid(BoardValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed board snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "snapshot version {found} is not supported (expected {supported})"
            ),
            Self::MissingColumns => write!(f, "snapshot envelope has no `columns` field"),
            Self::Invalid(err) => write!(f, "invalid board snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::MissingColumns => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<BoardValidationError> for SnapshotError {
    fn from(value: BoardValidationError) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    columns: &'a Board,
}

/// Serializes `board` as `{"version":1,"columns":{"todo":..,"inProgress":..,"done":..}}`.
///
/// Field order is fixed by the struct layout, so equal boards always encode
/// to identical text.
pub fn encode_snapshot(board: &Board) -> Result<String, SnapshotError> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        columns: board,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parses stored text into a board and validates it.
///
/// # Errors
/// - `Json` when the text is not JSON or a column/task has the wrong shape.
/// - `UnsupportedVersion` for envelopes from another schema version.
/// - `Invalid` when ids repeat or a task has blank content.
pub fn decode_snapshot(raw: &str) -> Result<Board, SnapshotError> {
    let mut value: Value = serde_json::from_str(raw)?;

    let version = value.get_mut(VERSION_FIELD).map(Value::take);
    let columns = match version {
        Some(version) => {
            if version.as_u64() != Some(SNAPSHOT_VERSION) {
                return Err(SnapshotError::UnsupportedVersion {
                    found: version,
                    supported: SNAPSHOT_VERSION,
                });
            }
            value
                .get_mut(COLUMNS_FIELD)
                .map(Value::take)
                .ok_or(SnapshotError::MissingColumns)?
        }
        None => value,
    };

    let board: Board = serde_json::from_value(columns)?;
    board.check_invariants()?;
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, SnapshotError};
    use crate::model::board::{add_task, Board, ColumnKey, TaskId};

    #[test]
    fn encode_uses_versioned_envelope_with_fixed_key_order() {
        let encoded = encode_snapshot(&Board::default()).unwrap();
        assert!(encoded.starts_with(r#"{"version":1,"columns":{"todo":{"name":"To Do","items":[{"id":1,"content":"Learning Next.js"}]},"inProgress":"#));
        assert_eq!(encoded, encode_snapshot(&Board::default()).unwrap());
    }

    #[test]
    fn decode_round_trips_encoded_board() {
        let board = add_task(
            &Board::default(),
            ColumnKey::InProgress,
            "write docs",
            TaskId(1_700_000_000_000),
        );
        let decoded = decode_snapshot(&encode_snapshot(&board).unwrap()).unwrap();
        assert_eq!(decoded, board);
    }

    #[test]
    fn decode_accepts_unversioned_column_map() {
        let legacy = r#"{
            "todo": {"name": "To Do", "items": []},
            "inProgress": {"name": "In Progress", "items": [{"id": 1712345678901, "content": "legacy"}]},
            "done": {"name": "Done", "items": []}
        }"#;
        let board = decode_snapshot(legacy).unwrap();
        assert_eq!(
            board.find_task(TaskId(1_712_345_678_901)).map(|(key, _)| key),
            Some(ColumnKey::InProgress)
        );
    }

    #[test]
    fn decode_rejects_missing_column() {
        let raw = r#"{"todo": {"name": "To Do", "items": []}, "done": {"name": "Done", "items": []}}"#;
        assert!(matches!(decode_snapshot(raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn decode_rejects_non_array_items() {
        let raw = r#"{"version":1,"columns":{
            "todo": {"name": "To Do", "items": {}},
            "inProgress": {"name": "In Progress", "items": []},
            "done": {"name": "Done", "items": []}
        }}"#;
        assert!(matches!(decode_snapshot(raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn decode_rejects_unknown_version_and_missing_columns() {
        assert!(matches!(
            decode_snapshot(r#"{"version":2,"columns":{}}"#),
            Err(SnapshotError::UnsupportedVersion { supported: 1, .. })
        ));
        assert!(matches!(
            decode_snapshot(r#"{"version":1}"#),
            Err(SnapshotError::MissingColumns)
        ));
    }

    #[test]
    fn decode_rejects_duplicate_ids_across_columns() {
        let raw = r#"{
            "todo": {"name": "To Do", "items": [{"id": 4, "content": "a"}]},
            "inProgress": {"name": "In Progress", "items": []},
            "done": {"name": "Done", "items": [{"id": 4, "content": "b"}]}
        }"#;
        let err = decode_snapshot(raw).unwrap_err();
        assert!(matches!(err, SnapshotError::Invalid(_)));
        assert!(err.to_string().contains("appears more than once"));
    }

    #[test]
    fn decode_rejects_non_json_text() {
        assert!(matches!(
            decode_snapshot("not json"),
            Err(SnapshotError::Json(_))
        ));
    }
}
