// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by user-facing runtime operations.
///
/// Session-host and persistence failures never appear here: the former
/// degrade to "no data" and the latter are logged and swallowed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("project path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("agent not found: {0}")]
    AgentNotFound(String),
    #[error("agent is not completed: {0}")]
    NotCompleted(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("failed to deliver to {name}: {reason}")]
    DeliveryFailed { name: String, reason: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
