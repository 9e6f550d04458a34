// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use av_adapters::SessionCall;
use av_core::AgentState;

#[tokio::test]
async fn awaiting_input_notifies_idle_exactly_once() {
    let ctx = setup();
    ctx.add_agent("agent-a", "Edit src/auth.rs\nDo you want to proceed? (y/n)");

    for _ in 0..3 {
        let agents = ctx.runtime.list_agents().await;
        assert_eq!(agents[0].state, AgentState::Idle);
        ctx.clock.advance(Duration::from_secs(3));
    }
    settle().await;

    let calls = ctx.notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Task Waiting for Input");
    assert!(calls[0].message.contains("Task: agent-a"));
}

#[tokio::test]
async fn idle_since_is_kept_while_idle_and_cleared_on_resume() {
    let ctx = setup();
    ctx.add_agent("agent-a", "> ");
    ctx.runtime.list_agents().await;
    let idle_at = ctx.clock.epoch_ms();

    ctx.clock.advance(Duration::from_secs(3));
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").idle_since, Some(idle_at));

    ctx.sessions
        .set_output("agent-a", "✻ Thinking… (esc to interrupt)");
    ctx.runtime.list_agents().await;
    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.idle_since, None);
}

#[tokio::test]
async fn young_agent_is_running_whatever_the_pane_shows() {
    let ctx = setup();
    ctx.sessions.add_session("agent-a", ctx.project_path(), 0);
    ctx.sessions.set_output("agent-a", "> ");
    ctx.insert(
        "agent-a",
        AgentRecord::spawned("a", ctx.project_path(), "p", ctx.clock.epoch_ms() - 14_000),
    );

    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Running);

    ctx.clock.advance(Duration::from_secs(2));
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Idle);
}

#[tokio::test]
async fn dead_pane_process_completes_and_reaps_session() {
    let ctx = setup();
    let pid = ctx.add_agent("agent-a", "> ");
    ctx.processes.set_dead(pid);

    ctx.runtime.list_agents().await;

    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Completed);
    assert!(record.completed_at.is_some());
    assert!(ctx
        .sessions
        .actions()
        .contains(&SessionCall::Kill { name: "agent-a".to_string() }));
    assert!(wait_for(|| ctx.notifier.calls().len() == 1).await);
    assert_eq!(ctx.notifier.calls()[0].title, "Task Completed");
}

#[tokio::test]
async fn pane_without_pid_counts_as_dead() {
    let ctx = setup();
    ctx.add_agent("agent-a", "working");
    ctx.sessions.set_pid("agent-a", None);

    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Completed);
}

#[tokio::test]
async fn completed_agents_are_not_captured_again() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;
    ctx.sessions.clear_calls();

    ctx.runtime.list_agents().await;
    assert!(ctx.sessions.calls().is_empty());
}

#[tokio::test]
async fn summaries_carry_last_activity() {
    let ctx = setup();
    ctx.add_agent("agent-a", "⏺ Edited src/lib.rs\n⏺ Ran cargo test\n────\n> ");

    let agents = ctx.runtime.list_agents().await;
    assert_eq!(agents[0].last_activity, "⏺ Edited src/lib.rs\n⏺ Ran cargo test");
    assert_eq!(agents[0].label, "agent-a");
    assert_eq!(agents[0].prompt, "do the task");
}

#[tokio::test]
async fn notification_failure_does_not_block_transition() {
    let ctx = setup();
    ctx.notifier.set_fail(true);
    ctx.add_agent("agent-a", "> ");

    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Idle);
    assert!(wait_for(|| ctx.notifier.calls().len() == 1).await);
    assert_eq!(ctx.record("agent-a").state, AgentState::Idle);
}
