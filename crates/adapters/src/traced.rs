// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::session::{SessionAdapter, SessionError};
use async_trait::async_trait;
use av_core::{SessionKey, SessionSnapshot};
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Wrapper that adds tracing to any SessionAdapter
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn list_sessions(&self) -> Result<Vec<SessionSnapshot>, SessionError> {
        let result = self.inner.list_sessions().await;
        match &result {
            Ok(sessions) => tracing::trace!(count = sessions.len(), "listed sessions"),
            Err(e) => tracing::warn!(error = %e, "list sessions failed"),
        }
        result
    }

    async fn spawn(&self, name: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        async {
            tracing::info!(cmd, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(name, cwd, cmd).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "session created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("session.spawn", name, cwd = %cwd.display()))
        .await
    }

    async fn send_literal(&self, name: &str, text: &str) -> Result<(), SessionError> {
        tracing::info_span!("session.send", name)
            .in_scope(|| tracing::debug!(input_len = text.len(), "sending"));
        let result = self.inner.send_literal(name, text).await;
        if let Err(ref e) = result {
            tracing::error!(name, error = %e, "send failed");
        }
        result
    }

    async fn send_key(&self, name: &str, key: SessionKey) -> Result<(), SessionError> {
        let result = self.inner.send_key(name, key).await;
        if let Err(ref e) = result {
            tracing::error!(name, %key, error = %e, "send_key failed");
        }
        result
    }

    async fn kill(&self, name: &str) -> Result<(), SessionError> {
        let result = self.inner.kill(name).await;
        tracing::info_span!("session.kill", name).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed (may be expected)"),
        });
        result
    }

    async fn is_alive(&self, name: &str) -> Result<bool, SessionError> {
        let result = self.inner.is_alive(name).await;
        tracing::trace!(name, alive = ?result.as_ref().ok(), "checked");
        result
    }

    async fn capture_output(
        &self,
        name: &str,
        lines: u32,
        with_escapes: bool,
    ) -> Result<String, SessionError> {
        let result = self.inner.capture_output(name, lines, with_escapes).await;
        tracing::debug_span!("session.capture", name, lines).in_scope(|| {
            tracing::trace!(
                captured_len = result.as_ref().map(|s| s.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn pane_pid(&self, name: &str) -> Result<Option<u32>, SessionError> {
        self.inner.pane_pid(name).await
    }

    async fn pane_current_path(&self, name: &str) -> Result<Option<PathBuf>, SessionError> {
        self.inner.pane_current_path(name).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
