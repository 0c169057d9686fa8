//! Persistence layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the key/value storage contract the board service persists into.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Storage APIs move opaque text; they never parse snapshots.

pub mod storage_repo;
