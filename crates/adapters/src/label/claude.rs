// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summarizer backed by a one-shot agent CLI call (`claude --print`).

use super::{LabelAdapter, LabelError};
use crate::env;
use crate::subprocess::run_with_input;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

pub const DEFAULT_LABEL_COMMAND: &str = "claude --print --model haiku";

#[derive(Clone, Debug)]
pub struct ClaudeLabelAdapter {
    command: String,
    timeout: Duration,
}

impl Default for ClaudeLabelAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_COMMAND)
    }
}

impl ClaudeLabelAdapter {
    /// `command` is split on whitespace; the prompt goes to stdin.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: env::label_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LabelAdapter for ClaudeLabelAdapter {
    async fn summarize(&self, instruction: &str, text: &str) -> Result<String, LabelError> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| LabelError::Failed("empty label command".to_string()))?;
        let mut cmd = Command::new(program);
        cmd.args(parts);

        let input = format!("{}\n\n{}", instruction, text);
        let output = run_with_input(cmd, &input, self.timeout, "label command")
            .await
            .map_err(LabelError::Failed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LabelError::Failed(format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if reply.is_empty() {
            return Err(LabelError::Empty);
        }
        tracing::debug!(reply = %reply, "summarizer replied");
        Ok(reply)
    }
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
