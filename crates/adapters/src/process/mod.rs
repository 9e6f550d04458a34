// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process table inspection: is the agent running under a session's pane?

mod ps;
mod tree;

pub use ps::PsAdapter;
pub use tree::{AgentMatcher, ProcessTree};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessAdapter;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from process table operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("process listing failed: {0}")]
    ListFailed(String),
}

/// Adapter over the OS process table
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Snapshot the full process table as a parent → children tree
    async fn build_tree(&self) -> Result<ProcessTree, ProcessError>;

    /// Whether `pid` is a live process.
    ///
    /// When liveness cannot be determined this reports `true`: a false
    /// "dead" would complete a healthy agent.
    async fn is_alive(&self, pid: u32) -> bool;
}

/// Extract the executable name from an agent command line.
///
/// `"/usr/local/bin/claude --dangerously-skip-permissions"` → `"claude"`.
pub fn extract_process_name(command: &str) -> String {
    command
        .split_whitespace()
        .next()
        .and_then(|first| first.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("claude")
        .to_string()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
