// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregated per-agent views handed to clients

use crate::patterns::Patterns;
use av_core::{ansi, AgentRecord, AgentState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pane lines captured for the activity preview
pub const ACTIVITY_LINES: u32 = 30;

/// Pane lines returned by an output dump
pub const OUTPUT_LINES: u32 = 200;

/// Meaningful lines kept in the activity preview
const ACTIVITY_KEEP: usize = 3;

/// One agent as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub name: String,
    pub label: String,
    pub project_path: PathBuf,
    pub prompt: String,
    pub state: AgentState,
    pub created_at: u64,
    pub idle_since: Option<u64>,
    pub completed_at: Option<u64>,
    /// Last few meaningful pane lines, escape sequences intact
    #[serde(default)]
    pub last_activity: String,
    #[serde(default)]
    pub discovered: bool,
}

impl AgentSummary {
    pub fn new(name: &str, record: &AgentRecord, last_activity: String) -> Self {
        let label = if record.label.is_empty() {
            name.to_string()
        } else {
            record.label.clone()
        };
        Self {
            name: name.to_string(),
            label,
            project_path: record.project_path.clone(),
            prompt: record.prompt.clone(),
            state: record.state,
            created_at: record.created_at,
            idle_since: record.idle_since,
            completed_at: record.completed_at,
            last_activity,
            discovered: record.discovered,
        }
    }
}

/// Pane dump in both plain and raw form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub output: String,
    pub raw: String,
}

impl AgentOutput {
    pub fn from_raw(raw: String) -> Self {
        Self {
            output: ansi::normalize(&raw),
            raw,
        }
    }
}

/// The last few meaningful raw lines of `raw`, oldest first.
///
/// Blank lines and UI noise are skipped by their normalized text; the kept
/// lines retain their escape sequences for rendering.
pub fn last_activity(raw: &str, patterns: &Patterns) -> String {
    let mut kept: Vec<&str> = raw
        .lines()
        .rev()
        .filter(|line| {
            let plain = ansi::normalize(line);
            let plain = plain.trim();
            !plain.is_empty() && !patterns.is_activity_noise(plain)
        })
        .take(ACTIVITY_KEEP)
        .collect();
    kept.reverse();
    kept.join("\n")
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
