// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable per-agent metadata and its transition rules.
//!
//! Every state write goes through [`AgentRecord::apply_state`] (or one of
//! the explicit control helpers below) so the timestamp invariants hold:
//!
//! - `idle_since` is set iff `state == Idle`
//! - `completed_at` is set iff `state == Completed`
//! - a completed record only leaves `Completed` through [`AgentRecord::respawn`]

use crate::agent::AgentState;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A state change that the orchestrator must act on (notify, kill).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// Entered `Completed` from any other state
    Completed,
    /// Entered `Idle` from any other state
    Idle,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Completed => "completed",
            Transition::Idle => "idle",
        }
    }
}

/// Registry entry for one agent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub label: String,
    #[serde(default)]
    pub project_path: PathBuf,
    #[serde(default)]
    pub prompt: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub state: AgentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_since: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_sent_at: Option<u64>,
    #[serde(default)]
    pub initial_prompt_sent: bool,
    #[serde(default)]
    pub discovered: bool,
    #[serde(default)]
    pub label_refreshed: bool,
}

impl AgentRecord {
    /// Record for an agent started by an explicit spawn request.
    pub fn spawned(
        label: impl Into<String>,
        project_path: impl Into<PathBuf>,
        prompt: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            label: label.into(),
            project_path: project_path.into(),
            prompt: prompt.into(),
            created_at: now_ms,
            state: AgentState::Running,
            idle_since: None,
            completed_at: None,
            last_message_sent_at: None,
            initial_prompt_sent: false,
            discovered: false,
            label_refreshed: false,
        }
    }

    /// Record for a live session found by passive discovery.
    ///
    /// The label starts as the session name and is upgraded later.
    pub fn discovered(
        session_name: &str,
        project_path: impl Into<PathBuf>,
        session_created_ms: u64,
    ) -> Self {
        Self {
            discovered: true,
            ..Self::spawned(session_name, project_path, "", session_created_ms)
        }
    }

    /// Apply a freshly classified state.
    ///
    /// Returns the transition of interest when the record newly entered
    /// `Idle` or `Completed`. Settled states return `None`, which is what
    /// keeps notifications to one per transition. `Unknown` is ignored, and
    /// a completed record is never moved back to another state here.
    pub fn apply_state(&mut self, state: AgentState, now_ms: u64) -> Option<Transition> {
        let previous = self.state;
        if state == AgentState::Unknown || previous == AgentState::Completed {
            return None;
        }

        self.state = state;
        match state {
            AgentState::Completed => {
                self.idle_since = None;
                self.last_message_sent_at = None;
                self.completed_at.get_or_insert(now_ms);
                Some(Transition::Completed)
            }
            AgentState::Idle if previous != AgentState::Idle => {
                self.idle_since = Some(now_ms);
                Some(Transition::Idle)
            }
            AgentState::Idle => None,
            AgentState::Running | AgentState::Unknown => {
                if previous == AgentState::Idle {
                    self.idle_since = None;
                    self.last_message_sent_at = None;
                }
                None
            }
        }
    }

    /// Finalize after an explicit kill. Always stamps `completed_at`.
    pub fn finalize_killed(&mut self, now_ms: u64) {
        self.state = AgentState::Completed;
        self.idle_since = None;
        self.last_message_sent_at = None;
        self.completed_at = Some(now_ms);
    }

    /// Reset a completed record for a fresh session with a new prompt.
    pub fn respawn(&mut self, prompt: impl Into<String>) {
        self.state = AgentState::Running;
        self.prompt = prompt.into();
        self.idle_since = None;
        self.completed_at = None;
        self.last_message_sent_at = None;
    }

    /// Note that a message was just delivered to the live session.
    pub fn message_sent(&mut self, now_ms: u64) {
        self.state = AgentState::Running;
        self.last_message_sent_at = Some(now_ms);
        self.idle_since = None;
    }

    /// True while the label is still the placeholder given at discovery.
    pub fn needs_label_refresh(&self, name: &str) -> bool {
        self.discovered
            && self.label == name
            && !self.label_refreshed
            && self.state != AgentState::Completed
    }
}

#[cfg(test)]
#[path = "agent_record_tests.rs"]
mod tests;
