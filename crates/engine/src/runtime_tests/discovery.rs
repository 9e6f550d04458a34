// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use av_core::AgentState;

/// Host a live session whose pane runs `child` under a shell
fn add_foreign_session(ctx: &TestContext, name: &str, child: &str) -> u32 {
    let pid = ctx.sessions.add_session(name, "/work/repo", 500);
    ctx.processes.add_process(pid, 1, "-zsh");
    ctx.processes.add_process(pid + 10_000, pid, child);
    pid
}

#[tokio::test]
async fn agent_session_is_discovered() {
    let ctx = setup();
    add_foreign_session(&ctx, "work", "/usr/local/bin/claude --resume");

    let agents = ctx.runtime.list_agents().await;

    assert_eq!(agents.len(), 1);
    let agent = &agents[0];
    assert_eq!(agent.name, "work");
    assert_eq!(agent.label, "work");
    assert!(agent.discovered);
    assert_eq!(agent.project_path, Path::new("/work/repo"));
    assert_eq!(agent.created_at, 500);
    assert_eq!(agent.state, AgentState::Running);
}

#[tokio::test]
async fn foreign_processes_are_not_agents() {
    for child in [
        "vim claude.md",
        "node agent-viewer --claude",
        "claude-monitor --watch",
    ] {
        let ctx = setup();
        add_foreign_session(&ctx, "scratch", child);
        assert!(ctx.runtime.list_agents().await.is_empty(), "{child}");
    }
}

#[tokio::test]
async fn non_agent_sessions_are_rechecked_after_ttl() {
    let ctx = setup();
    add_foreign_session(&ctx, "scratch", "htop");

    ctx.runtime.list_agents().await;
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.processes.builds(), 1);

    ctx.clock.advance(Duration::from_secs(31));
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.processes.builds(), 2);
}

#[tokio::test]
async fn registered_sessions_are_never_rediscovered() {
    let ctx = setup();
    add_foreign_session(&ctx, "work", "claude");

    ctx.runtime.list_agents().await;
    ctx.runtime.list_agents().await;

    assert_eq!(ctx.runtime.registry().lock().len(), 1);
    assert_eq!(ctx.processes.builds(), 1);
}

#[tokio::test]
async fn process_listing_failure_discovers_nothing() {
    let ctx = setup();
    add_foreign_session(&ctx, "work", "claude");
    ctx.processes.set_fail_listing(true);

    assert!(ctx.runtime.list_agents().await.is_empty());
}

#[tokio::test]
async fn vanished_session_is_swept_to_completed_once() {
    let ctx = setup();
    ctx.add_agent("agent-a", "working");
    ctx.sessions.remove_session("agent-a");

    ctx.runtime.list_agents().await;
    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Completed);
    assert_eq!(record.completed_at, Some(ctx.clock.epoch_ms()));

    ctx.clock.advance(Duration::from_secs(3));
    ctx.runtime.list_agents().await;
    assert!(wait_for(|| ctx.notifier.calls().len() == 1).await);
    settle().await;

    let calls = ctx.notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Task Completed");
    assert!(ctx.sessions.actions().is_empty());
    assert_eq!(
        ctx.record("agent-a").completed_at,
        Some(ctx.clock.epoch_ms() - 3_000)
    );
}

#[tokio::test]
async fn completed_records_stay_listed() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;

    let agents = ctx.runtime.list_agents().await;
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].state, AgentState::Completed);
    assert_eq!(agents[0].last_activity, "");
}
