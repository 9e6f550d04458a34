// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live multiplexer session data (recomputed every poll, never persisted).

use serde::{Deserialize, Serialize};

/// One live tmux session as reported by the session host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub name: String,
    /// Last activity, epoch milliseconds
    pub activity_ms: u64,
    /// Creation time, epoch milliseconds
    pub created_ms: u64,
}

impl SessionSnapshot {
    pub fn new(name: impl Into<String>, activity_ms: u64, created_ms: u64) -> Self {
        Self {
            name: name.into(),
            activity_ms,
            created_ms,
        }
    }

    /// Parse one `name|activity|created` line (seconds) from `tmux list-sessions -F`.
    pub fn parse_tmux_line(line: &str) -> Option<Self> {
        let mut parts = line.trim().rsplitn(3, '|');
        let created = parts.next()?.trim().parse::<u64>().ok()?;
        let activity = parts.next()?.trim().parse::<u64>().ok()?;
        let name = parts.next()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, activity * 1000, created * 1000))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
