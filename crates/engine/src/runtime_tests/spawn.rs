// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::RuntimeError;
use av_adapters::SessionCall;
use av_core::{AgentState, SessionKey};

#[tokio::test]
async fn spawn_registers_running_record_with_fast_label() {
    let ctx = setup();
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();

    assert_eq!(name, "agent-fix-login-bug");
    let record = ctx.record(&name);
    assert_eq!(record.label, "fix-login-bug");
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.prompt, "fix the login bug");
    assert!(!record.initial_prompt_sent);
    assert!(!record.discovered);

    let session = ctx.sessions.get_session(&name).unwrap();
    assert_eq!(session.cmd, DEFAULT_AGENT_COMMAND);
    assert_eq!(session.cwd, ctx.project_path());
}

#[tokio::test]
async fn initial_prompt_is_delivered_once_ready() {
    let ctx = setup();
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();
    ctx.sessions.set_output(&name, "Welcome\n> ");

    assert!(wait_for(|| ctx.record(&name).initial_prompt_sent).await);
    assert_eq!(ctx.sessions.sent_text(&name), vec!["fix the login bug"]);
    assert_eq!(ctx.sessions.sent_keys(&name), vec![SessionKey::Enter]);
}

#[tokio::test]
async fn startup_dialog_is_dismissed_before_prompt() {
    let ctx = setup();
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "add tests")
        .await
        .unwrap();
    ctx.sessions.push_frames(
        &name,
        &[
            "Do you trust the files in this folder?\n1. No, exit\n2. Yes, I accept\nEnter to confirm",
            "❯ ",
        ],
    );

    assert!(wait_for(|| ctx.record(&name).initial_prompt_sent).await);
    assert_eq!(
        ctx.sessions.sent_keys(&name),
        vec![SessionKey::Down, SessionKey::Enter, SessionKey::Enter]
    );
    assert_eq!(ctx.sessions.sent_text(&name), vec!["add tests"]);
}

#[tokio::test]
async fn prompt_is_sent_even_when_readiness_times_out() {
    let ctx = setup();
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "refactor parser")
        .await
        .unwrap();
    ctx.sessions.set_output(&name, "Loading...");

    assert!(wait_for(|| ctx.record(&name).initial_prompt_sent).await);
    assert_eq!(ctx.sessions.sent_text(&name), vec!["refactor parser"]);
}

#[tokio::test]
async fn missing_project_path_fails_without_side_effects() {
    let ctx = setup();
    let missing = ctx.project_path().join("does-not-exist");

    let err = ctx
        .runtime
        .spawn(&missing.display().to_string(), "anything")
        .await
        .unwrap_err();

    assert!(matches!(err, RuntimeError::PathNotFound(p) if p == missing));
    assert!(ctx.sessions.calls().is_empty());
    assert!(ctx.runtime.registry().lock().is_empty());
}

#[tokio::test]
async fn colliding_name_gets_time_suffix() {
    let ctx = setup();
    ctx.insert(
        "agent-fix-login-bug",
        AgentRecord::spawned("fix-login-bug", ctx.project_path(), "", 0),
    );

    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();

    let suffix = name.strip_prefix("agent-fix-login-bug-").unwrap();
    assert_eq!(suffix.len(), 4);
    assert_eq!(ctx.runtime.registry().lock().len(), 2);
}

#[tokio::test]
async fn live_session_with_same_name_also_collides() {
    let ctx = setup();
    ctx.sessions.add_session("agent-fix-login-bug", "/elsewhere", 0);

    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();
    assert_ne!(name, "agent-fix-login-bug");
}

#[tokio::test]
async fn host_spawn_failure_leaves_no_record() {
    let ctx = setup();
    ctx.sessions.set_fail_spawns(true);

    let err = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix it")
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::SpawnFailed(_)));
    assert!(ctx.runtime.registry().lock().is_empty());
}

#[tokio::test]
async fn empty_prompt_spawns_without_delivery_or_summary() {
    let ctx = setup();
    let name = ctx.runtime.spawn(&ctx.project_str(), "").await.unwrap();
    assert!(name.starts_with("agent-task-"));

    settle().await;
    assert!(ctx.labeler.calls().is_empty());
    assert!(ctx.sessions.sent_text(&name).is_empty());
    assert!(!ctx.record(&name).initial_prompt_sent);
    assert!(ctx
        .sessions
        .actions()
        .iter()
        .all(|c| matches!(c, SessionCall::Spawn { .. })));
}

#[tokio::test]
async fn spawn_during_a_pass_is_not_swept_as_completed() {
    let ctx = setup();
    let hold = ctx.sessions.hold_next_listing();

    let pass = tokio::spawn({
        let runtime = ctx.runtime.clone();
        async move { runtime.list_agents().await }
    });
    hold.entered().await;

    let spawn = tokio::spawn({
        let runtime = ctx.runtime.clone();
        let path = ctx.project_str();
        async move { runtime.spawn(&path, "").await }
    });
    settle().await;
    hold.release();

    pass.await.unwrap();
    let name = spawn.await.unwrap().unwrap();
    ctx.runtime.list_agents().await;
    settle().await;

    let record = ctx.record(&name);
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.completed_at, None);
    assert!(ctx.sessions.get_session(&name).is_some());
    assert!(ctx.notifier.calls().is_empty());
}
