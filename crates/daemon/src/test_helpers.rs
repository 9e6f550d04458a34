// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime wired to fake adapters for daemon tests

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use av_adapters::{
    AgentMatcher, FakeLabelAdapter, FakeNotifyAdapter, FakeProcessAdapter, FakeSessionAdapter,
};
use av_core::{AgentName, AgentRecord, Clock, FakeClock};
use av_engine::{ReadinessConfig, Runtime, RuntimeConfig, RuntimeDeps, DEFAULT_AGENT_COMMAND};
use av_storage::Registry;
use parking_lot::Mutex;
use tempfile::TempDir;

pub type TestRuntime = Runtime<
    FakeSessionAdapter,
    FakeProcessAdapter,
    FakeNotifyAdapter,
    FakeLabelAdapter,
    FakeClock,
>;

pub struct TestContext {
    pub runtime: TestRuntime,
    pub clock: FakeClock,
    pub sessions: FakeSessionAdapter,
    pub notifier: FakeNotifyAdapter,
    pub project: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let sessions = FakeSessionAdapter::new();
        let notifier = FakeNotifyAdapter::new();
        let clock = FakeClock::new();
        let mut config = RuntimeConfig::new(
            DEFAULT_AGENT_COMMAND,
            AgentMatcher::new("claude").unwrap(),
        );
        config.readiness = ReadinessConfig {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(20),
        };
        config.spawn_check_delay = Duration::from_millis(1);

        let runtime = Runtime::new(
            RuntimeDeps {
                sessions: sessions.clone(),
                processes: FakeProcessAdapter::new(),
                notifier: notifier.clone(),
                labeler: FakeLabelAdapter::new(),
                registry: Arc::new(Mutex::new(Registry::in_memory())),
            },
            clock.clone(),
            config,
        );

        Self {
            runtime,
            clock,
            sessions,
            notifier,
            project: TempDir::new().unwrap(),
        }
    }

    pub fn project_path(&self) -> &Path {
        self.project.path()
    }

    /// A spawned agent old enough to be classified from its pane
    pub fn add_agent(&self, name: &str, pane: &str) {
        self.sessions.add_session(name, self.project_path(), 0);
        self.sessions.set_output(name, pane);
        let created = self.clock.epoch_ms() - 60_000;
        self.runtime.registry().lock().upsert(
            AgentName::new(name),
            AgentRecord::spawned(name, self.project_path(), "do the task", created),
        );
    }
}
