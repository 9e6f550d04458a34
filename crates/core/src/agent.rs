// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent naming and lifecycle state.
//!
//! An agent is identified by the name of the tmux session hosting it. The
//! name is the registry key and the tmux target for every session call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

crate::define_id! {
    /// Name of the tmux session hosting an agent (unique registry key).
    pub struct AgentName;
}

/// Lifecycle state of an agent, as derived by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Agent is working, starting up, or showing no idle evidence
    #[default]
    Running,
    /// Agent is waiting at its prompt or on an approval question
    Idle,
    /// Session or process is gone (or the agent was killed)
    Completed,
    /// No registry record exists for the session
    Unknown,
}

impl AgentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentState::Running => "running",
            AgentState::Idle => "idle",
            AgentState::Completed => "completed",
            AgentState::Unknown => "unknown",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AgentState::Completed)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named key that can be sent to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKey {
    Up,
    Down,
    Enter,
    Escape,
}

impl SessionKey {
    /// Key name as understood by `tmux send-keys`.
    pub fn as_tmux(&self) -> &'static str {
        match self {
            SessionKey::Up => "Up",
            SessionKey::Down => "Down",
            SessionKey::Enter => "Enter",
            SessionKey::Escape => "Escape",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tmux())
    }
}

impl FromStr for SessionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Up" => Ok(SessionKey::Up),
            "Down" => Ok(SessionKey::Down),
            "Enter" => Ok(SessionKey::Enter),
            "Escape" => Ok(SessionKey::Escape),
            other => Err(format!("unsupported key: {}", other)),
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
