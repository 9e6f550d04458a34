// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{SessionAdapter, SessionError};
use crate::env;
use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use av_core::{SessionKey, SessionSnapshot};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

const LIST_FORMAT: &str = "#{session_name}|#{session_activity}|#{session_created}";

/// Tmux-based session adapter
#[derive(Clone)]
pub struct TmuxAdapter {
    timeout: Duration,
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self {
            timeout: env::tmux_timeout(),
        }
    }
}

impl TmuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run a tmux command and return the output, returning `NotFound` on failure.
    async fn output(&self, args: &[&str], description: &str) -> Result<std::process::Output, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(args);
        let output = run_with_timeout(cmd, self.timeout, description)
            .await
            .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            let target = args
                .windows(2)
                .find(|w| w[0] == "-t")
                .map(|w| w[1].trim_start_matches('=').trim_end_matches(':'))
                .unwrap_or("unknown");
            return Err(SessionError::NotFound(target.to_string()));
        }
        Ok(output)
    }

    /// Run a tmux command, discarding its output.
    async fn run(&self, args: &[&str], description: &str) -> Result<(), SessionError> {
        self.output(args, description).await.map(|_| ())
    }

    async fn display(&self, name: &str, format: &str, description: &str) -> Result<Option<String>, SessionError> {
        let output = self
            .output(&["display-message", "-t", &pane(name), "-p", format], description)
            .await?;
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

/// Exact-match session target (`=name`), so `agent-fix` never resolves to
/// `agent-fix-bug` through tmux's prefix matching.
fn exact(name: &str) -> String {
    format!("={}", name)
}

/// Exact-match pane target (`=name:`): the active pane of that session only
fn pane(name: &str) -> String {
    format!("={}:", name)
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn list_sessions(&self) -> Result<Vec<SessionSnapshot>, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["list-sessions", "-F", LIST_FORMAT]);
        let output = run_with_timeout(cmd, self.timeout, "tmux list-sessions")
            .await
            .map_err(SessionError::CommandFailed)?;

        // Non-zero exit means no server is running
        if !output.status.success() {
            return Ok(Vec::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(SessionSnapshot::parse_tmux_line)
            .collect())
    }

    async fn spawn(&self, name: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        // Precondition: cwd must exist
        if !cwd.is_dir() {
            return Err(SessionError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let mut tmux_cmd = Command::new("tmux");
        tmux_cmd
            .args(["new-session", "-d", "-s", name, "-c"])
            .arg(cwd)
            .arg(cmd);

        let output = run_with_timeout(tmux_cmd, self.timeout, "tmux new-session")
            .await
            .map_err(SessionError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = name, stderr = %stderr, "tmux spawn failed");
            return Err(SessionError::SpawnFailed(stderr.trim().to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session = name, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(())
    }

    async fn send_literal(&self, name: &str, text: &str) -> Result<(), SessionError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        self.run(
            &["send-keys", "-t", &pane(name), "-l", "--", text],
            "tmux send-keys literal",
        )
        .await
    }

    async fn send_key(&self, name: &str, key: SessionKey) -> Result<(), SessionError> {
        self.run(
            &["send-keys", "-t", &pane(name), key.as_tmux()],
            "tmux send-keys",
        )
        .await
    }

    async fn kill(&self, name: &str) -> Result<(), SessionError> {
        // Ignore failure: the session might already be gone
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &exact(name)]);
        let _ = run_with_timeout(cmd, self.timeout, "tmux kill-session").await;
        Ok(())
    }

    async fn is_alive(&self, name: &str) -> Result<bool, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", &exact(name)]);
        let output = run_with_timeout(cmd, self.timeout, "tmux has-session")
            .await
            .map_err(SessionError::CommandFailed)?;
        Ok(output.status.success())
    }

    async fn capture_output(
        &self,
        name: &str,
        lines: u32,
        with_escapes: bool,
    ) -> Result<String, SessionError> {
        let start = format!("-{}", lines);
        let target = pane(name);
        let mut args = vec!["capture-pane", "-t", target.as_str(), "-p", "-S", start.as_str()];
        if with_escapes {
            args.push("-e");
        }
        let output = self.output(&args, "tmux capture-pane").await?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn pane_pid(&self, name: &str) -> Result<Option<u32>, SessionError> {
        let output = self
            .output(
                &["list-panes", "-t", &pane(name), "-F", "#{pane_pid}"],
                "tmux list-panes",
            )
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .and_then(|line| line.trim().parse::<u32>().ok()))
    }

    async fn pane_current_path(&self, name: &str) -> Result<Option<PathBuf>, SessionError> {
        Ok(self
            .display(name, "#{pane_current_path}", "tmux display-message")
            .await?
            .map(PathBuf::from))
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
