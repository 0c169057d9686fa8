//! Board domain model and its stored form.
//!
//! # Responsibility
//! - Define the task/column/board data structures used by every caller.
//! - Own the snapshot codec that maps a board to and from stored text.
//!
//! # Invariants
//! - The board always has exactly the `todo`, `inProgress` and `done` lanes.
//! - A task lives in exactly one lane at a time.

pub mod board;
pub mod snapshot;
