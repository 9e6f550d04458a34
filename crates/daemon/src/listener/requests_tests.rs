// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::TestContext;
use av_core::{AgentState, SessionKey};
use std::time::Duration;

struct Harness {
    ctx: TestContext,
    poller: Poller<
        av_adapters::FakeSessionAdapter,
        av_adapters::FakeProcessAdapter,
        av_adapters::FakeNotifyAdapter,
        av_adapters::FakeLabelAdapter,
        av_core::FakeClock,
    >,
    shutdown: Notify,
}

impl Harness {
    fn new() -> Self {
        let ctx = TestContext::new();
        let poller = Poller::new(ctx.runtime.clone());
        Self {
            ctx,
            poller,
            shutdown: Notify::new(),
        }
    }

    async fn call(&self, request: Request) -> Response {
        handle_request(request, &self.poller, &self.shutdown).await
    }
}

fn error_message(response: Response) -> String {
    match response {
        Response::Error { message } => message,
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn ping_and_hello() {
    let h = Harness::new();
    assert_eq!(h.call(Request::Ping).await, Response::Pong);
    assert_eq!(
        h.call(Request::Hello {
            version: "0.0.0".to_string()
        })
        .await,
        Response::Hello {
            version: PROTOCOL_VERSION.to_string()
        }
    );
}

#[tokio::test]
async fn list_agents_runs_a_pass() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let Response::Agents { agents } = h.call(Request::ListAgents).await else {
        panic!("expected agents");
    };

    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].name, "agent-a");
    assert_eq!(agents[0].state, AgentState::Idle);
    assert_eq!(h.poller.subscribe().borrow().len(), 1);
}

#[tokio::test]
async fn spawn_creates_a_prefixed_session() {
    let h = Harness::new();
    let response = h
        .call(Request::Spawn {
            project_path: h.ctx.project_path().display().to_string(),
            prompt: "fix the login bug".to_string(),
        })
        .await;

    let Response::Spawned { name } = response else {
        panic!("expected spawned, got {:?}", response);
    };
    assert!(name.starts_with("agent-"), "{name}");
    assert!(h.ctx.sessions.get_session(&name).is_some());
    assert!(h.ctx.runtime.get_record(&name).is_some());
}

#[tokio::test]
async fn spawn_into_missing_directory_fails() {
    let h = Harness::new();
    let missing = h.ctx.project_path().join("nope");
    let message = error_message(
        h.call(Request::Spawn {
            project_path: missing.display().to_string(),
            prompt: "anything".to_string(),
        })
        .await,
    );
    assert!(message.contains("does not exist"), "{message}");
    assert!(h.ctx.sessions.session_names().is_empty());
}

#[tokio::test]
async fn send_message_to_live_agent() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let response = h
        .call(Request::Send {
            name: "agent-a".to_string(),
            message: Some("  run the tests  ".to_string()),
            key: None,
        })
        .await;

    assert_eq!(response, Response::Sent);
    assert_eq!(h.ctx.sessions.sent_text("agent-a"), vec!["run the tests"]);
}

#[tokio::test]
async fn send_key_to_live_agent() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let response = h
        .call(Request::Send {
            name: "agent-a".to_string(),
            message: None,
            key: Some("Escape".to_string()),
        })
        .await;

    assert_eq!(response, Response::Sent);
    assert_eq!(h.ctx.sessions.sent_keys("agent-a"), vec![SessionKey::Escape]);
}

#[tokio::test]
async fn send_message_to_completed_agent_respawns() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");
    assert_eq!(
        h.call(Request::Kill {
            name: "agent-a".to_string()
        })
        .await,
        Response::Killed
    );

    let response = h
        .call(Request::Send {
            name: "agent-a".to_string(),
            message: Some("try again".to_string()),
            key: None,
        })
        .await;

    assert_eq!(response, Response::Respawned);
    let record = h.ctx.runtime.get_record("agent-a").unwrap();
    assert_eq!(record.state, AgentState::Running);
    assert_eq!(record.prompt, "try again");
}

#[tokio::test]
async fn send_rejections() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let empty = error_message(
        h.call(Request::Send {
            name: "agent-a".to_string(),
            message: Some("   ".to_string()),
            key: None,
        })
        .await,
    );
    assert!(empty.contains("invalid request"), "{empty}");

    let unknown = error_message(
        h.call(Request::Send {
            name: "agent-missing".to_string(),
            message: Some("hello".to_string()),
            key: None,
        })
        .await,
    );
    assert!(unknown.contains("agent not found"), "{unknown}");
}

#[tokio::test]
async fn failed_delivery_reports_error_and_keeps_state() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");
    h.call(Request::ListAgents).await;
    h.ctx.sessions.set_fail_sends(true);

    let message = error_message(
        h.call(Request::Send {
            name: "agent-a".to_string(),
            message: Some("hello".to_string()),
            key: None,
        })
        .await,
    );

    assert!(message.contains("failed to deliver"), "{message}");
    let record = h.ctx.runtime.get_record("agent-a").unwrap();
    assert_eq!(record.state, AgentState::Idle);
    assert_eq!(record.last_message_sent_at, None);
}

#[tokio::test]
async fn kill_marks_completed_and_tolerates_unknown_names() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let response = h
        .call(Request::Kill {
            name: "agent-a".to_string(),
        })
        .await;
    assert_eq!(response, Response::Killed);
    let record = h.ctx.runtime.get_record("agent-a").unwrap();
    assert_eq!(record.state, AgentState::Completed);
    assert!(h.ctx.sessions.get_session("agent-a").is_none());

    h.ctx.sessions.add_session("agent-b", "/tmp", 0);
    let response = h
        .call(Request::Kill {
            name: "agent-b".to_string(),
        })
        .await;
    assert_eq!(response, Response::Killed);
    assert!(h.ctx.sessions.get_session("agent-b").is_none());
    assert!(h.ctx.runtime.get_record("agent-b").is_none());

    let response = h
        .call(Request::Kill {
            name: "ghost".to_string(),
        })
        .await;
    assert_eq!(response, Response::Killed);
}

#[tokio::test]
async fn cleanup_only_removes_completed_records() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let message = error_message(
        h.call(Request::Cleanup {
            name: "agent-a".to_string(),
        })
        .await,
    );
    assert!(message.contains("not completed"), "{message}");

    h.call(Request::Kill {
        name: "agent-a".to_string(),
    })
    .await;
    let response = h
        .call(Request::Cleanup {
            name: "agent-a".to_string(),
        })
        .await;
    assert_eq!(response, Response::Cleaned { count: 1 });
    assert!(h.ctx.runtime.get_record("agent-a").is_none());
}

#[tokio::test]
async fn bulk_cleanup_and_kill_idle_report_counts() {
    let h = Harness::new();
    h.ctx.add_agent("agent-done", "> ");
    h.ctx.add_agent("agent-idle", "> ");
    h.ctx.add_agent("agent-busy", "✻ Working… (esc to interrupt)");
    h.call(Request::Kill {
        name: "agent-done".to_string(),
    })
    .await;
    h.call(Request::ListAgents).await;

    assert_eq!(
        h.call(Request::CleanupCompleted).await,
        Response::Cleaned { count: 1 }
    );
    assert_eq!(h.call(Request::KillIdle).await, Response::Cleaned { count: 1 });

    let names = h.ctx.runtime.registry().lock().list_names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].as_str(), "agent-busy");
}

#[tokio::test]
async fn output_of_known_agent() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "\x1b[1mDone\x1b[0m\n> ");

    let response = h
        .call(Request::Output {
            name: "agent-a".to_string(),
        })
        .await;

    let Response::Output { output, raw } = response else {
        panic!("expected output, got {:?}", response);
    };
    assert!(output.contains("Done"));
    assert!(!output.contains('\x1b'));
    assert!(raw.contains('\x1b'));
}

#[tokio::test]
async fn output_of_unknown_agent_is_an_error() {
    let h = Harness::new();
    let message = error_message(
        h.call(Request::Output {
            name: "agent-x".to_string(),
        })
        .await,
    );
    assert!(message.contains("agent not found"), "{message}");
}

#[tokio::test]
async fn recent_projects_lists_registered_paths() {
    let h = Harness::new();
    h.ctx.add_agent("agent-a", "> ");

    let response = h.call(Request::RecentProjects).await;

    assert_eq!(
        response,
        Response::Projects {
            paths: vec![h.ctx.project_path().to_path_buf()]
        }
    );
}

#[tokio::test]
async fn notify_test_reports_channel_outcome() {
    let h = Harness::new();
    assert_eq!(h.call(Request::NotifyTest).await, Response::Ok);
    assert_eq!(h.ctx.notifier.calls().len(), 1);

    h.ctx.notifier.set_fail(true);
    let message = error_message(h.call(Request::NotifyTest).await);
    assert!(message.contains("notification failed"), "{message}");
}

#[tokio::test]
async fn shutdown_signals_the_main_loop() {
    let h = Harness::new();
    assert_eq!(h.call(Request::Shutdown).await, Response::ShuttingDown);
    tokio::time::timeout(Duration::from_secs(1), h.shutdown.notified())
        .await
        .unwrap();
}
