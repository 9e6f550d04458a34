// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session host adapters (tmux)

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, ListingHold, SessionCall};

use async_trait::async_trait;
use av_core::{SessionKey, SessionSnapshot};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for the terminal multiplexer that hosts agent sessions.
///
/// Sessions are addressed by name. Callers treat every error as "no data";
/// nothing here is allowed to take down a poll cycle.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// List live sessions. A host with no server running yields an empty list.
    async fn list_sessions(&self) -> Result<Vec<SessionSnapshot>, SessionError>;

    /// Start a detached session named `name` in `cwd` running `cmd`
    async fn spawn(&self, name: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError>;

    /// Send literal text to a session (no key interpretation)
    async fn send_literal(&self, name: &str, text: &str) -> Result<(), SessionError>;

    /// Send a single named key
    async fn send_key(&self, name: &str, key: SessionKey) -> Result<(), SessionError>;

    /// Kill a session. An already-absent session is not an error.
    async fn kill(&self, name: &str) -> Result<(), SessionError>;

    /// Check if a session exists
    async fn is_alive(&self, name: &str) -> Result<bool, SessionError>;

    /// Capture the last `lines` lines of the pane, optionally keeping escape sequences
    async fn capture_output(
        &self,
        name: &str,
        lines: u32,
        with_escapes: bool,
    ) -> Result<String, SessionError>;

    /// OS process id of the session's pane process
    async fn pane_pid(&self, name: &str) -> Result<Option<u32>, SessionError>;

    /// Current working directory of the session's pane
    async fn pane_current_path(&self, name: &str) -> Result<Option<PathBuf>, SessionError>;
}
