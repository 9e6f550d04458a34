// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime tests

mod classify;
mod cleanup;
mod discovery;
mod labels;
mod send;
mod spawn;

use super::*;
use crate::readiness::ReadinessConfig;
use av_adapters::{
    AgentMatcher, FakeLabelAdapter, FakeNotifyAdapter, FakeProcessAdapter, FakeSessionAdapter,
};
use av_core::{AgentName, AgentRecord, FakeClock};
use av_storage::Registry;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

type TestRuntime = Runtime<
    FakeSessionAdapter,
    FakeProcessAdapter,
    FakeNotifyAdapter,
    FakeLabelAdapter,
    FakeClock,
>;

/// Test context holding the runtime, its fakes, and a project directory
struct TestContext {
    runtime: TestRuntime,
    clock: FakeClock,
    sessions: FakeSessionAdapter,
    processes: FakeProcessAdapter,
    notifier: FakeNotifyAdapter,
    labeler: FakeLabelAdapter,
    project: TempDir,
}

impl TestContext {
    fn project_path(&self) -> &Path {
        self.project.path()
    }

    fn project_str(&self) -> String {
        self.project.path().display().to_string()
    }

    fn record(&self, name: &str) -> AgentRecord {
        self.runtime.get_record(name).unwrap()
    }

    fn insert(&self, name: &str, record: AgentRecord) {
        self.runtime
            .registry()
            .lock()
            .upsert(AgentName::new(name), record);
    }

    /// A spawned agent old enough to be classified from its pane
    fn add_agent(&self, name: &str, pane: &str) -> u32 {
        let pid = self.sessions.add_session(name, self.project_path(), 0);
        self.sessions.set_output(name, pane);
        let created = self.clock.epoch_ms() - 60_000;
        self.insert(
            name,
            AgentRecord::spawned(name, self.project_path(), "do the task", created),
        );
        pid
    }
}

fn test_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::new(
        DEFAULT_AGENT_COMMAND,
        AgentMatcher::new("claude").unwrap(),
    );
    config.readiness = ReadinessConfig {
        interval: Duration::from_millis(1),
        timeout: Duration::from_millis(50),
    };
    config.spawn_check_delay = Duration::from_millis(1);
    config
}

fn setup() -> TestContext {
    setup_with_registry(Registry::in_memory())
}

fn setup_with_registry(registry: Registry) -> TestContext {
    let sessions = FakeSessionAdapter::new();
    let processes = FakeProcessAdapter::new();
    let notifier = FakeNotifyAdapter::new();
    let labeler = FakeLabelAdapter::new();
    let clock = FakeClock::new();
    let runtime = Runtime::new(
        RuntimeDeps {
            sessions: sessions.clone(),
            processes: processes.clone(),
            notifier: notifier.clone(),
            labeler: labeler.clone(),
            registry: Arc::new(Mutex::new(registry)),
        },
        clock.clone(),
        test_config(),
    );

    TestContext {
        runtime,
        clock,
        sessions,
        processes,
        notifier,
        labeler,
        project: TempDir::new().unwrap(),
    }
}

/// Yield to background tasks until `check` holds (or give up after ~2s)
async fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

/// Give already-spawned background tasks a chance to run
async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[test]
fn config_defaults() {
    let config = RuntimeConfig::new("claude", AgentMatcher::new("claude").unwrap());
    assert_eq!(config.session_prefix, "agent-");
    assert_eq!(config.readiness, ReadinessConfig::default());
    assert_eq!(config.spawn_check_delay, Duration::from_secs(1));
}

#[tokio::test]
async fn mutations_persist_to_disk() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("registry.json");
    let ctx = setup_with_registry(Registry::load(&path).unwrap());

    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "")
        .await
        .unwrap();

    let reloaded = Registry::load(&path).unwrap();
    assert!(reloaded.contains(&name));
}
