//! Task id allocation.
//!
//! Ids are epoch-millisecond timestamps, bumped past the largest id already
//! on the board, so two tasks added within the same millisecond still get
//! distinct, strictly increasing ids.

use crate::model::board::{Board, TaskId};
use mockable::Clock;
use std::collections::BTreeSet;

/// Current instant of `clock` in epoch milliseconds.
pub fn now_epoch_ms(clock: &(impl Clock + ?Sized)) -> i64 {
    clock.utc().timestamp_millis()
}

/// Returns `max(now_ms, largest id on board + 1)`.
///
/// When the largest id is already `i64::MAX` there is nothing above it, so
/// the smallest positive id not on the board is used instead.
pub fn next_task_id(board: &Board, now_ms: i64) -> TaskId {
    let Some(TaskId(max)) = board.max_task_id() else {
        return TaskId(now_ms.max(1));
    };
    match max.checked_add(1) {
        Some(floor) => TaskId(now_ms.max(floor)),
        None => smallest_unused_id(board),
    }
}

fn smallest_unused_id(board: &Board) -> TaskId {
    let used = board
        .columns()
        .flat_map(|(_, column)| column.items.iter().map(|task| task.id.0))
        .collect::<BTreeSet<_>>();
    let mut candidate = 1;
    for id in used.range(1..) {
        if *id != candidate {
            break;
        }
        candidate += 1;
    }
    TaskId(candidate)
}
