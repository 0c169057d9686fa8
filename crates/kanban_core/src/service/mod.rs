//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate board transitions, id allocation and persistence.
//! - Keep UI/FFI/CLI front ends decoupled from storage details.

pub mod board_service;
pub mod task_ids;
