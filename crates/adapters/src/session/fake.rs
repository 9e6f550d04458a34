// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use av_core::{SessionKey, SessionSnapshot};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

/// Recorded session call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Spawn {
        name: String,
        cwd: PathBuf,
        cmd: String,
    },
    SendLiteral {
        name: String,
        text: String,
    },
    SendKey {
        name: String,
        key: SessionKey,
    },
    Kill {
        name: String,
    },
    CaptureOutput {
        name: String,
        lines: u32,
        with_escapes: bool,
    },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub name: String,
    pub cwd: PathBuf,
    pub cmd: String,
    /// Current pane text
    pub output: String,
    /// Pane texts to show on subsequent captures, one per capture
    pub frames: VecDeque<String>,
    pub pid: Option<u32>,
    pub activity_ms: u64,
    pub created_ms: u64,
}

/// Pauses one `list_sessions` call after it has taken its snapshot
#[derive(Clone, Default)]
pub struct ListingHold {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl ListingHold {
    /// Wait until the held listing has been taken
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held listing return
    pub fn release(&self) {
        self.release.notify_one();
    }
}

struct FakeSessionState {
    sessions: BTreeMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    fail_sends: bool,
    fail_spawns: bool,
    next_pid: u32,
    listing_hold: Option<ListingHold>,
}

/// Fake session adapter for testing
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                sessions: BTreeMap::new(),
                calls: Vec::new(),
                fail_sends: false,
                fail_spawns: false,
                next_pid: 1000,
                listing_hold: None,
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls other than captures (the interesting side effects)
    pub fn actions(&self) -> Vec<SessionCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, SessionCall::CaptureOutput { .. }))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Get a session by name
    pub fn get_session(&self, name: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(name).cloned()
    }

    pub fn session_names(&self) -> Vec<String> {
        self.inner.lock().sessions.keys().cloned().collect()
    }

    /// Add a pre-existing session, returning its pane pid
    pub fn add_session(&self, name: &str, cwd: impl Into<PathBuf>, created_ms: u64) -> u32 {
        let mut inner = self.inner.lock();
        inner.next_pid += 1;
        let pid = inner.next_pid;
        inner.sessions.insert(
            name.to_string(),
            FakeSession {
                name: name.to_string(),
                cwd: cwd.into(),
                cmd: String::new(),
                output: String::new(),
                frames: VecDeque::new(),
                pid: Some(pid),
                activity_ms: created_ms,
                created_ms,
            },
        );
        pid
    }

    /// Remove a session as if it exited on its own
    pub fn remove_session(&self, name: &str) {
        self.inner.lock().sessions.remove(name);
    }

    /// Set the pane text every capture returns
    pub fn set_output(&self, name: &str, output: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.output = output.to_string();
            session.frames.clear();
        }
    }

    /// Queue pane texts shown one per capture; the last frame sticks
    pub fn push_frames(&self, name: &str, frames: &[&str]) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session
                .frames
                .extend(frames.iter().map(|f| f.to_string()));
        }
    }

    pub fn set_pid(&self, name: &str, pid: Option<u32>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.pid = pid;
        }
    }

    /// Make every send fail with `NotFound`
    pub fn set_fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }

    pub fn set_fail_spawns(&self, fail: bool) {
        self.inner.lock().fail_spawns = fail;
    }

    /// Hold the next `list_sessions` call until released. The listing
    /// reflects the sessions alive when it was entered.
    pub fn hold_next_listing(&self) -> ListingHold {
        let hold = ListingHold::default();
        self.inner.lock().listing_hold = Some(hold.clone());
        hold
    }

    /// Text sent to a session so far (literal sends only)
    pub fn sent_text(&self, name: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SessionCall::SendLiteral { name: n, text } if n == name => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Keys sent to a session so far
    pub fn sent_keys(&self, name: &str) -> Vec<SessionKey> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SessionCall::SendKey { name: n, key } if n == name => Some(key),
                _ => None,
            })
            .collect()
    }

    fn check_send(&self, inner: &FakeSessionState, name: &str) -> Result<(), SessionError> {
        if inner.fail_sends || !inner.sessions.contains_key(name) {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn list_sessions(&self) -> Result<Vec<SessionSnapshot>, SessionError> {
        let (snapshot, hold) = {
            let mut inner = self.inner.lock();
            let snapshot: Vec<SessionSnapshot> = inner
                .sessions
                .values()
                .map(|s| SessionSnapshot::new(s.name.clone(), s.activity_ms, s.created_ms))
                .collect();
            (snapshot, inner.listing_hold.take())
        };
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        Ok(snapshot)
    }

    async fn spawn(&self, name: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();

        inner.calls.push(SessionCall::Spawn {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
        });

        if inner.fail_spawns {
            return Err(SessionError::SpawnFailed("spawn disabled".to_string()));
        }
        if inner.sessions.contains_key(name) {
            return Err(SessionError::SpawnFailed(format!(
                "duplicate session: {}",
                name
            )));
        }

        inner.next_pid += 1;
        let pid = inner.next_pid;
        inner.sessions.insert(
            name.to_string(),
            FakeSession {
                name: name.to_string(),
                cwd: cwd.to_path_buf(),
                cmd: cmd.to_string(),
                output: String::new(),
                frames: VecDeque::new(),
                pid: Some(pid),
                activity_ms: 0,
                created_ms: 0,
            },
        );
        Ok(())
    }

    async fn send_literal(&self, name: &str, text: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendLiteral {
            name: name.to_string(),
            text: text.to_string(),
        });
        self.check_send(&inner, name)
    }

    async fn send_key(&self, name: &str, key: SessionKey) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendKey {
            name: name.to_string(),
            key,
        });
        self.check_send(&inner, name)
    }

    async fn kill(&self, name: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill {
            name: name.to_string(),
        });
        inner.sessions.remove(name);
        Ok(())
    }

    async fn is_alive(&self, name: &str) -> Result<bool, SessionError> {
        Ok(self.inner.lock().sessions.contains_key(name))
    }

    async fn capture_output(
        &self,
        name: &str,
        lines: u32,
        with_escapes: bool,
    ) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::CaptureOutput {
            name: name.to_string(),
            lines,
            with_escapes,
        });

        let session = inner
            .sessions
            .get_mut(name)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))?;
        if let Some(frame) = session.frames.pop_front() {
            session.output = frame;
        }

        let all: Vec<&str> = session.output.lines().collect();
        let start = all.len().saturating_sub(lines as usize);
        Ok(all[start..].join("\n"))
    }

    async fn pane_pid(&self, name: &str) -> Result<Option<u32>, SessionError> {
        self.inner
            .lock()
            .sessions
            .get(name)
            .map(|s| s.pid)
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }

    async fn pane_current_path(&self, name: &str) -> Result<Option<PathBuf>, SessionError> {
        self.inner
            .lock()
            .sessions
            .get(name)
            .map(|s| Some(s.cwd.clone()))
            .ok_or_else(|| SessionError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
