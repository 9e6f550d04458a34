// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use av_adapters::FakeNotifyAdapter;
use av_core::AgentState;

fn record() -> AgentRecord {
    AgentRecord::spawned("fix-login-bug", "/work/app", "fix the login bug", 10_000)
}

#[test]
fn completed_body_uses_completion_time() {
    let mut r = record();
    r.apply_state(AgentState::Completed, 10_000 + 192_000);

    let n = compose(&r, Transition::Completed);
    assert_eq!(n.title, "Task Completed");
    assert_eq!(
        n.body,
        "Task: fix-login-bug\nProject: /work/app\nDuration: 3m 12s\n\nPrompt:\nfix the login bug"
    );
}

#[test]
fn idle_body_uses_idle_time() {
    let mut r = record();
    r.apply_state(AgentState::Idle, 55_000);

    let n = compose(&r, Transition::Idle);
    assert_eq!(n.title, "Task Waiting for Input");
    assert!(n.body.contains("Duration: 45s"), "{}", n.body);
}

#[test]
fn long_prompt_is_truncated_and_cleaned() {
    let mut r = record();
    r.prompt = format!("line one\n\tline two {}", "x".repeat(400));

    let body = compose(&r, Transition::Completed).body;
    let prompt = body.split("Prompt:\n").nth(1).unwrap();
    assert!(prompt.starts_with("line oneline two"));
    assert!(prompt.ends_with("..."));
    assert!(prompt.chars().count() <= 300 + 3);
}

#[test]
fn empty_fields_read_unknown() {
    let r = AgentRecord::discovered("", "", 0);
    let body = compose(&r, Transition::Idle).body;
    assert!(body.starts_with("Task: unknown\nProject: unknown\nDuration: 0s"));
}

#[tokio::test]
async fn dispatch_delivers_once() {
    let notifier = FakeNotifyAdapter::new();
    let dispatcher = Dispatcher::new(notifier.clone());
    let mut r = record();
    r.apply_state(AgentState::Idle, 20_000);

    dispatcher
        .dispatch("agent-fix", &r, Transition::Idle)
        .await
        .unwrap();

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "Task Waiting for Input");
}

#[tokio::test]
async fn delivery_failure_is_contained() {
    let notifier = FakeNotifyAdapter::new();
    notifier.set_fail(true);
    let dispatcher = Dispatcher::new(notifier.clone());

    dispatcher
        .dispatch("agent-fix", &record(), Transition::Completed)
        .await
        .unwrap();
    assert_eq!(notifier.calls().len(), 1);
}
