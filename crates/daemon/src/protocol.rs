// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC Protocol for daemon communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

use std::path::PathBuf;

use av_engine::AgentSummary;
use serde::{Deserialize, Serialize};

#[path = "protocol_wire.rs"]
mod wire;
pub use wire::{
    decode, encode, read_message, read_request, read_response, write_message, write_request,
    write_response, ProtocolError, DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};

/// Request from CLI to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Run a poll pass and return every agent
    ListAgents,

    /// Start a new agent session
    Spawn { project_path: String, prompt: String },

    /// Send a message or a single key to an agent.
    ///
    /// A completed agent is respawned with the message as its new prompt.
    Send {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Terminate an agent session and mark it completed
    Kill { name: String },

    /// Remove one completed record
    Cleanup { name: String },

    /// Remove every completed record
    CleanupCompleted,

    /// Kill and remove every idle agent
    KillIdle,

    /// Dump recent pane output of one agent
    Output { name: String },

    /// Distinct project paths, most recent first
    RecentProjects,

    /// Send a test notification through the configured channels
    NotifyTest,

    /// Turn this connection into a push channel of agent lists
    Subscribe,

    /// Request daemon shutdown
    Shutdown,
}

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Full aggregated agent list
    Agents { agents: Vec<AgentSummary> },

    /// A new agent session was started
    Spawned { name: String },

    /// Input delivered to a live session
    Sent,

    /// A completed agent was brought back with a new prompt
    Respawned,

    Killed,

    /// Number of records removed
    Cleaned { count: usize },

    Output { output: String, raw: String },

    Projects { paths: Vec<PathBuf> },

    /// Generic success
    Ok,

    /// Daemon is shutting down
    ShuttingDown,

    /// Error response
    Error { message: String },
}

impl Response {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Response::Error {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
