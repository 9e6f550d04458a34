// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const PANE: &str = "⏺ Reading src/auth/session.rs\n⏺ Updating token refresh logic\n> ";

#[tokio::test]
async fn spawn_label_is_upgraded_from_summary() {
    let ctx = setup();
    ctx.labeler.push_reply("  Login Bug Fix!\n");

    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "please fix the login bug on mobile")
        .await
        .unwrap();

    assert!(wait_for(|| ctx.record(&name).label == "login-bug-fix").await);
    let call = &ctx.labeler.calls()[0];
    assert!(call.instruction.contains("summarizing this coding task"));
    assert_eq!(call.text, "please fix the login bug on mobile");
}

#[tokio::test]
async fn summarizer_failure_keeps_fast_label() {
    let ctx = setup();
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();

    assert!(wait_for(|| ctx.labeler.calls().len() == 1).await);
    settle().await;
    assert_eq!(ctx.record(&name).label, "fix-login-bug");
}

#[tokio::test]
async fn unusable_summary_keeps_fast_label() {
    let ctx = setup();
    ctx.labeler.push_reply("??");
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();

    assert!(wait_for(|| ctx.labeler.calls().len() == 1).await);
    settle().await;
    assert_eq!(ctx.record(&name).label, "fix-login-bug");
}

#[tokio::test]
async fn upgrade_skips_deleted_record() {
    let ctx = setup();
    ctx.labeler.push_reply("login-fix");
    let name = ctx
        .runtime
        .spawn(&ctx.project_str(), "fix the login bug")
        .await
        .unwrap();
    ctx.runtime.registry().lock().delete(&name);

    assert!(wait_for(|| ctx.labeler.calls().len() == 1).await);
    settle().await;
    assert!(ctx.runtime.get_record(&name).is_none());
}

fn discover(ctx: &TestContext, pane: &str) {
    let pid = ctx.sessions.add_session("work", "/repo", 0);
    ctx.processes.add_process(pid, 1, "claude");
    ctx.sessions.set_output("work", pane);
}

#[tokio::test]
async fn discovered_agent_is_labeled_from_pane_output() {
    let ctx = setup();
    discover(&ctx, PANE);
    ctx.labeler.push_reply("token refresh fix");

    ctx.runtime.list_agents().await;

    assert!(wait_for(|| ctx.record("work").label == "token-refresh-fix").await);
    let record = ctx.record("work");
    assert!(record.label_refreshed);
    let call = &ctx.labeler.calls()[0];
    assert!(call.instruction.contains("terminal output"));
    assert!(call.text.starts_with("⏺ Reading src/auth/session.rs"));
}

#[tokio::test]
async fn short_output_defers_discovered_label() {
    let ctx = setup();
    discover(&ctx, "> ");

    ctx.runtime.list_agents().await;
    settle().await;

    assert!(ctx.labeler.calls().is_empty());
    assert!(!ctx.record("work").label_refreshed);
}

#[tokio::test]
async fn failed_discovered_label_is_retried_next_pass() {
    let ctx = setup();
    discover(&ctx, PANE);
    ctx.labeler.push_failure();

    ctx.runtime.list_agents().await;
    assert!(
        wait_for(|| ctx.labeler.calls().len() == 1 && !ctx.record("work").label_refreshed).await
    );
    assert_eq!(ctx.record("work").label, "work");

    ctx.labeler.push_reply("auth work");
    ctx.runtime.list_agents().await;
    assert!(wait_for(|| ctx.record("work").label == "auth-work").await);
    assert_eq!(ctx.labeler.calls().len(), 2);
}

#[tokio::test]
async fn rejected_discovered_label_is_not_retried() {
    let ctx = setup();
    discover(&ctx, PANE);
    ctx.labeler.push_reply("!");

    ctx.runtime.list_agents().await;
    assert!(wait_for(|| ctx.labeler.calls().len() == 1).await);
    settle().await;

    ctx.runtime.list_agents().await;
    settle().await;
    assert_eq!(ctx.labeler.calls().len(), 1);
    assert_eq!(ctx.record("work").label, "work");
}
