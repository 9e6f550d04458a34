// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::RuntimeError;
use av_adapters::SessionCall;
use av_core::AgentState;

#[tokio::test]
async fn kill_finalizes_record_and_session() {
    let ctx = setup();
    ctx.add_agent("agent-a", "working");

    assert!(ctx.runtime.kill("agent-a").await);

    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Completed);
    assert_eq!(record.completed_at, Some(ctx.clock.epoch_ms()));
    assert!(ctx.sessions.get_session("agent-a").is_none());
}

#[tokio::test]
async fn kill_always_restamps_completion() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;

    ctx.clock.advance(Duration::from_secs(60));
    ctx.runtime.kill("agent-a").await;
    assert_eq!(ctx.record("agent-a").completed_at, Some(ctx.clock.epoch_ms()));
}

#[tokio::test]
async fn kill_without_record_still_terminates_session() {
    let ctx = setup();
    ctx.sessions.add_session("stray", "/tmp", 0);

    assert!(!ctx.runtime.kill("stray").await);
    assert_eq!(
        ctx.sessions.actions(),
        vec![SessionCall::Kill { name: "stray".to_string() }]
    );
}

#[tokio::test]
async fn cleanup_requires_completed_state() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");

    assert!(matches!(
        ctx.runtime.cleanup("agent-a"),
        Err(RuntimeError::NotCompleted(_))
    ));
    assert!(matches!(
        ctx.runtime.cleanup("ghost"),
        Err(RuntimeError::AgentNotFound(_))
    ));

    ctx.runtime.kill("agent-a").await;
    ctx.runtime.cleanup("agent-a").unwrap();
    assert!(ctx.runtime.get_record("agent-a").is_none());
}

#[tokio::test]
async fn cleanup_completed_counts_removed_records() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.add_agent("agent-b", "");
    ctx.add_agent("agent-c", "");
    ctx.runtime.kill("agent-a").await;
    ctx.runtime.kill("agent-c").await;

    assert_eq!(ctx.runtime.cleanup_completed(), 2);
    assert_eq!(
        ctx.runtime.registry().lock().list_names(),
        vec![AgentName::new("agent-b")]
    );
    assert_eq!(ctx.runtime.cleanup_completed(), 0);
}

#[tokio::test]
async fn kill_idle_kills_and_removes_idle_agents() {
    let ctx = setup();
    ctx.add_agent("agent-a", "> ");
    ctx.add_agent("agent-b", "✻ Working (esc to interrupt)");
    ctx.add_agent("agent-c", "Anything else?");
    ctx.runtime.list_agents().await;
    ctx.sessions.clear_calls();

    assert_eq!(ctx.runtime.kill_idle().await, 2);

    assert_eq!(ctx.sessions.session_names(), vec!["agent-b"]);
    assert_eq!(
        ctx.runtime.registry().lock().list_names(),
        vec![AgentName::new("agent-b")]
    );
}

#[tokio::test]
async fn output_returns_plain_and_raw() {
    let ctx = setup();
    ctx.add_agent("agent-a", "\x1b[1mbuilding\x1b[0m");

    let out = ctx.runtime.output("agent-a").await;
    assert_eq!(out.output, "building");
    assert_eq!(out.raw, "\x1b[1mbuilding\x1b[0m");
    assert_eq!(
        ctx.sessions.calls(),
        vec![SessionCall::CaptureOutput {
            name: "agent-a".to_string(),
            lines: 200,
            with_escapes: true,
        }]
    );

    let missing = ctx.runtime.output("ghost").await;
    assert_eq!(missing.output, "");
}

#[tokio::test]
async fn recent_projects_are_distinct_newest_first() {
    let ctx = setup();
    ctx.insert("a", AgentRecord::spawned("a", "/old", "", 100));
    ctx.insert("b", AgentRecord::spawned("b", "/new", "", 300));
    ctx.insert("c", AgentRecord::spawned("c", "/old", "", 200));
    ctx.insert("d", AgentRecord::discovered("d", "", 400));

    assert_eq!(
        ctx.runtime.recent_projects(),
        vec![PathBuf::from("/new"), PathBuf::from("/old")]
    );
}

#[tokio::test]
async fn notify_test_reports_delivery_outcome() {
    let ctx = setup();
    ctx.runtime.notify_test().await.unwrap();
    assert_eq!(ctx.notifier.calls()[0].title, "Task Completed");

    ctx.notifier.set_fail(true);
    assert!(ctx.runtime.notify_test().await.is_err());
}
