// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::RuntimeError;
use av_adapters::SessionCall;
use av_core::{AgentState, SessionKey};

fn message(text: &str) -> SendPayload {
    SendPayload::Message(text.to_string())
}

#[tokio::test]
async fn send_to_live_agent_marks_it_running() {
    let ctx = setup();
    ctx.add_agent("agent-a", "> ");
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Idle);

    let outcome = ctx
        .runtime
        .send("agent-a", message("now add docs"))
        .await
        .unwrap();

    assert_eq!(outcome, SendOutcome::Sent);
    assert_eq!(ctx.sessions.sent_text("agent-a"), vec!["now add docs"]);
    assert_eq!(ctx.sessions.sent_keys("agent-a"), vec![SessionKey::Enter]);
    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.idle_since, None);
    assert_eq!(record.last_message_sent_at, Some(ctx.clock.epoch_ms()));
}

#[tokio::test]
async fn recently_messaged_agent_stays_running() {
    let ctx = setup();
    ctx.add_agent("agent-a", "> ");
    ctx.runtime
        .send("agent-a", message("continue"))
        .await
        .unwrap();

    ctx.clock.advance(Duration::from_secs(5));
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Running);

    ctx.clock.advance(Duration::from_secs(6));
    ctx.runtime.list_agents().await;
    assert_eq!(ctx.record("agent-a").state, AgentState::Idle);
}

#[tokio::test]
async fn failed_delivery_leaves_record_untouched() {
    let ctx = setup();
    ctx.add_agent("agent-a", "> ");
    ctx.runtime.list_agents().await;
    let before = ctx.record("agent-a");
    ctx.sessions.set_fail_sends(true);

    let err = ctx
        .runtime
        .send("agent-a", message("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, RuntimeError::DeliveryFailed { ref name, .. } if name == "agent-a"));
    assert_eq!(ctx.record("agent-a"), before);
}

#[tokio::test]
async fn send_to_unknown_agent_is_not_found() {
    let ctx = setup();
    let err = ctx
        .runtime
        .send("ghost", message("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::AgentNotFound(_)));
}

#[tokio::test]
async fn message_to_completed_agent_respawns_it() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;
    ctx.sessions.clear_calls();

    let outcome = ctx
        .runtime
        .send("agent-a", message("try again"))
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Respawned);

    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.prompt, "try again");
    assert_eq!(record.completed_at, None);
    assert_eq!(record.idle_since, None);

    let spawns: Vec<SessionCall> = ctx
        .sessions
        .calls()
        .into_iter()
        .filter(|c| matches!(c, SessionCall::Spawn { .. }))
        .collect();
    assert_eq!(
        spawns,
        vec![SessionCall::Spawn {
            name: "agent-a".to_string(),
            cwd: ctx.project_path().to_path_buf(),
            cmd: DEFAULT_AGENT_COMMAND.to_string(),
        }]
    );

    ctx.sessions.set_output("agent-a", "> ");
    assert!(wait_for(|| ctx.sessions.sent_text("agent-a") == vec!["try again"]).await);
}

#[tokio::test]
async fn respawn_replaces_a_lingering_session() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime
        .registry()
        .lock()
        .get_mut("agent-a")
        .unwrap()
        .apply_state(AgentState::Completed, 1);

    ctx.runtime
        .send("agent-a", message("again"))
        .await
        .unwrap();

    let actions = ctx.sessions.actions();
    assert!(matches!(&actions[0], SessionCall::Kill { name } if name == "agent-a"));
    assert!(matches!(&actions[1], SessionCall::Spawn { name, .. } if name == "agent-a"));
    assert_eq!(ctx.sessions.session_names(), vec!["agent-a"]);
}

#[tokio::test]
async fn key_is_sent_to_live_agent() {
    let ctx = setup();
    ctx.add_agent("agent-a", "1. Allow once\n2. Deny");

    let outcome = ctx
        .runtime
        .send_key("agent-a", SessionKey::Down)
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Sent);
    assert_eq!(ctx.sessions.sent_keys("agent-a"), vec![SessionKey::Down]);
    assert!(ctx.sessions.sent_text("agent-a").is_empty());
}

#[tokio::test]
async fn key_to_completed_agent_is_rejected() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;

    let err = ctx
        .runtime
        .send_key("agent-a", SessionKey::Enter)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidRequest(_)));
}

#[tokio::test]
async fn respawn_during_a_pass_is_not_swept_as_completed() {
    let ctx = setup();
    ctx.add_agent("agent-a", "");
    ctx.runtime.kill("agent-a").await;
    let hold = ctx.sessions.hold_next_listing();

    let pass = tokio::spawn({
        let runtime = ctx.runtime.clone();
        async move { runtime.list_agents().await }
    });
    hold.entered().await;

    let send = tokio::spawn({
        let runtime = ctx.runtime.clone();
        async move { runtime.send("agent-a", message("try again")).await }
    });
    settle().await;
    hold.release();

    pass.await.unwrap();
    assert_eq!(send.await.unwrap().unwrap(), SendOutcome::Respawned);
    settle().await;

    let record = ctx.record("agent-a");
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.completed_at, None);
    assert_eq!(ctx.sessions.session_names(), vec!["agent-a"]);
    assert!(ctx.notifier.calls().is_empty());
}
