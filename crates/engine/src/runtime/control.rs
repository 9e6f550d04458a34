// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing control operations: spawn, send, kill, cleanup

use super::Runtime;
use crate::error::RuntimeError;
use crate::readiness::await_ready;
use crate::summary::{AgentOutput, OUTPUT_LINES};
use av_adapters::{
    LabelAdapter, NotifyAdapter, NotifyError, ProcessAdapter, SessionAdapter, SessionError,
};
use av_core::{
    fast_label, session_name_for, time_token, AgentName, AgentRecord, AgentState, Clock,
    SessionKey,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// What a client asked to deliver to an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendPayload {
    Message(String),
    Key(SessionKey),
}

impl SendPayload {
    /// A non-blank message wins over a key; neither is invalid.
    pub fn from_parts(message: Option<&str>, key: Option<&str>) -> Result<Self, RuntimeError> {
        if let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) {
            return Ok(SendPayload::Message(message.to_string()));
        }
        match key {
            Some(key) => key
                .parse()
                .map(SendPayload::Key)
                .map_err(RuntimeError::InvalidRequest),
            None => Err(RuntimeError::InvalidRequest(
                "message or key is required".to_string(),
            )),
        }
    }
}

/// How a send was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered to the live session
    Sent,
    /// The agent had completed; a fresh session was started and the
    /// message will follow once it is ready
    Respawned,
}

/// Expand `~`, make absolute, and require the directory to exist
fn resolve_project_path(raw: &str) -> Result<PathBuf, RuntimeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RuntimeError::InvalidRequest(
            "project path is required".to_string(),
        ));
    }
    let expanded = match raw.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    };
    let path = std::path::absolute(&expanded).unwrap_or(expanded);
    if !path.exists() {
        return Err(RuntimeError::PathNotFound(path));
    }
    Ok(path)
}

impl<S, P, N, L, C> Runtime<S, P, N, L, C>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    /// Start a new agent session in `project_path` and return its name.
    ///
    /// The record is created before returning. The label upgrade and the
    /// initial prompt delivery continue in the background.
    pub async fn spawn(&self, project_path: &str, prompt: &str) -> Result<String, RuntimeError> {
        let path = resolve_project_path(project_path)?;
        let _gate = self.gate.lock().await;
        let now = self.clock.epoch_ms();
        let label = fast_label(prompt, now);
        let name = self.unique_session_name(&label, now).await;

        tracing::info!(session = %name, path = %path.display(), "spawning agent");
        self.sessions
            .spawn(&name, &path, &self.config.agent_command)
            .await
            .map_err(|e| RuntimeError::SpawnFailed(e.to_string()))?;

        let record = AgentRecord::spawned(label, path.clone(), prompt, now);
        self.mutate_registry(|r| r.upsert(AgentName::new(name.as_str()), record));

        self.spawn_cwd_check(name.clone(), path);
        if !prompt.trim().is_empty() {
            self.spawn_label_upgrade(name.clone(), prompt.to_string());
            self.spawn_delivery(name.clone(), prompt.to_string(), true);
        }
        Ok(name)
    }

    async fn unique_session_name(&self, label: &str, now_ms: u64) -> String {
        let base = session_name_for(&self.config.session_prefix, label);
        let live = self.sessions.list_sessions().await.unwrap_or_default();
        let taken =
            live.iter().any(|s| s.name == base) || self.lock_registry(|r| r.contains(&base));
        if taken {
            format!("{}-{}", base, time_token(now_ms))
        } else {
            base
        }
    }

    /// Deliver a message or key to an agent, respawning it first when a
    /// message is sent to a completed agent.
    ///
    /// A failed delivery leaves the record untouched.
    pub async fn send(&self, name: &str, payload: SendPayload) -> Result<SendOutcome, RuntimeError> {
        let _gate = self.gate.lock().await;
        let record = self
            .get_record(name)
            .ok_or_else(|| RuntimeError::AgentNotFound(name.to_string()))?;

        let result = match payload {
            SendPayload::Message(text) if record.state.is_completed() => {
                return self.respawn(name, &record, text).await;
            }
            SendPayload::Key(_) if record.state.is_completed() => {
                return Err(RuntimeError::InvalidRequest(format!(
                    "cannot send a key to completed agent {}",
                    name
                )));
            }
            SendPayload::Message(text) => {
                tracing::info!(session = %name, chars = text.chars().count(), "sending message");
                self.deliver(name, &text).await
            }
            SendPayload::Key(key) => {
                tracing::info!(session = %name, %key, "sending key");
                self.sessions.send_key(name, key).await
            }
        };

        result.map_err(|e| RuntimeError::DeliveryFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let now = self.clock.epoch_ms();
        self.update_record(name, |record| record.message_sent(now));
        Ok(SendOutcome::Sent)
    }

    /// Send a single key to a live agent.
    pub async fn send_key(&self, name: &str, key: SessionKey) -> Result<SendOutcome, RuntimeError> {
        self.send(name, SendPayload::Key(key)).await
    }

    async fn respawn(
        &self,
        name: &str,
        record: &AgentRecord,
        message: String,
    ) -> Result<SendOutcome, RuntimeError> {
        let cwd = if record.project_path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            record.project_path.clone()
        };

        if let Err(e) = self.sessions.kill(name).await {
            tracing::debug!(session = %name, error = %e, "no stale session to kill");
        }
        self.sessions
            .spawn(name, &cwd, &self.config.agent_command)
            .await
            .map_err(|e| RuntimeError::SpawnFailed(e.to_string()))?;

        tracing::info!(session = %name, path = %cwd.display(), "respawned agent");
        self.update_record(name, |record| record.respawn(message.as_str()));
        self.spawn_delivery(name.to_string(), message, false);
        Ok(SendOutcome::Respawned)
    }

    /// Literal text followed by a submit keystroke
    async fn deliver(&self, name: &str, text: &str) -> Result<(), SessionError> {
        self.sessions.send_literal(name, text).await?;
        self.sessions.send_key(name, SessionKey::Enter).await
    }

    /// Wait for the agent to be ready, then deliver `message` regardless.
    fn spawn_delivery(&self, name: String, message: String, initial_prompt: bool) {
        let runtime = self.clone();
        tokio::spawn(async move {
            let ready = await_ready(
                &runtime.sessions,
                &name,
                runtime.patterns(),
                runtime.config.readiness,
            )
            .await;
            if !ready {
                tracing::warn!(session = %name, "agent not ready before timeout, sending anyway");
            }
            if let Err(e) = runtime.deliver(&name, &message).await {
                tracing::warn!(session = %name, error = %e, "prompt delivery failed");
            }
            if initial_prompt {
                runtime.update_record(&name, |record| record.initial_prompt_sent = true);
            }
        });
    }

    fn spawn_cwd_check(&self, name: String, expected: PathBuf) {
        let sessions = self.sessions.clone();
        let delay = self.config.spawn_check_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(Some(actual)) = sessions.pane_current_path(&name).await {
                if !same_dir(&actual, &expected) {
                    tracing::warn!(
                        session = %name,
                        expected = %expected.display(),
                        actual = %actual.display(),
                        "session started in unexpected directory"
                    );
                }
            }
        });
    }

    /// Terminate an agent's session and mark it completed.
    ///
    /// Returns whether a record existed. A missing session is not an error.
    pub async fn kill(&self, name: &str) -> bool {
        let _gate = self.gate.lock().await;
        if let Err(e) = self.sessions.kill(name).await {
            tracing::debug!(session = %name, error = %e, "kill failed");
        }
        let now = self.clock.epoch_ms();
        let existed = self
            .update_record(name, |record| record.finalize_killed(now))
            .is_some();
        tracing::info!(session = %name, existed, "killed agent");
        existed
    }

    /// Remove one completed record.
    pub fn cleanup(&self, name: &str) -> Result<(), RuntimeError> {
        self.mutate_registry(|r| match r.get(name).map(|record| record.state) {
            None => Err(RuntimeError::AgentNotFound(name.to_string())),
            Some(AgentState::Completed) => {
                r.delete(name);
                Ok(())
            }
            Some(_) => Err(RuntimeError::NotCompleted(name.to_string())),
        })
    }

    /// Remove every completed record, returning how many were removed.
    pub fn cleanup_completed(&self) -> usize {
        self.mutate_registry(|r| {
            let names: Vec<AgentName> = r
                .iter()
                .filter(|(_, record)| record.state.is_completed())
                .map(|(name, _)| name.clone())
                .collect();
            for name in &names {
                r.delete(name.as_str());
            }
            names.len()
        })
    }

    /// Kill and remove every idle agent, returning how many were removed.
    pub async fn kill_idle(&self) -> usize {
        let _gate = self.gate.lock().await;
        let idle: Vec<AgentName> = self.lock_registry(|r| {
            r.iter()
                .filter(|(_, record)| record.state == AgentState::Idle)
                .map(|(name, _)| name.clone())
                .collect()
        });
        for name in &idle {
            if let Err(e) = self.sessions.kill(name.as_str()).await {
                tracing::debug!(session = %name, error = %e, "kill failed");
            }
        }
        self.mutate_registry(|r| {
            for name in &idle {
                r.delete(name.as_str());
            }
        });
        tracing::info!(count = idle.len(), "killed idle agents");
        idle.len()
    }

    /// Plain and raw dump of the pane. An unreachable session yields empty output.
    pub async fn output(&self, name: &str) -> AgentOutput {
        let raw = self
            .sessions
            .capture_output(name, OUTPUT_LINES, true)
            .await
            .unwrap_or_default();
        AgentOutput::from_raw(raw)
    }

    /// Distinct project paths, most recently used first.
    pub fn recent_projects(&self) -> Vec<PathBuf> {
        let mut latest: HashMap<PathBuf, u64> = HashMap::new();
        self.lock_registry(|r| {
            for (_, record) in r.iter() {
                if record.project_path.as_os_str().is_empty() {
                    continue;
                }
                let seen = latest.entry(record.project_path.clone()).or_insert(0);
                *seen = (*seen).max(record.created_at);
            }
        });
        let mut paths: Vec<(PathBuf, u64)> = latest.into_iter().collect();
        paths.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        paths.into_iter().map(|(path, _)| path).collect()
    }

    /// Send a sample completion notification and report the outcome.
    pub async fn notify_test(&self) -> Result<(), NotifyError> {
        let now = self.clock.epoch_ms();
        let mut record = AgentRecord::spawned(
            "test-task",
            std::env::current_dir().unwrap_or_default(),
            "This is a test notification from the agent viewer",
            now,
        );
        record.finalize_killed(now);
        let notification = crate::dispatcher::compose(&record, av_core::Transition::Completed);
        self.dispatcher.send_now(&notification).await
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    a == b
        || match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
