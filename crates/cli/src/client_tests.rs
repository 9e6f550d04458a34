// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use av_core::AgentState;
use av_daemon::protocol::{read_request, write_response};
use tokio::net::UnixListener;

const WAIT: Duration = Duration::from_secs(2);

/// Serve one connection per canned response, returning the requests seen.
fn fake_daemon(
    responses: Vec<Response>,
) -> (
    tempfile::TempDir,
    DaemonClient,
    tokio::task::JoinHandle<Vec<Request>>,
) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for response in responses {
            let (stream, _) = listener.accept().await.unwrap();
            let (mut reader, mut writer) = stream.into_split();
            seen.push(read_request(&mut reader, WAIT).await.unwrap());
            write_response(&mut writer, &response, WAIT).await.unwrap();
        }
        seen
    });
    (dir, DaemonClient::at(path), handle)
}

fn summary(name: &str, state: AgentState) -> AgentSummary {
    AgentSummary {
        name: name.to_string(),
        label: name.trim_start_matches("agent-").to_string(),
        project_path: PathBuf::from("/work/app"),
        prompt: "fix the tests".to_string(),
        state,
        created_at: 1_000,
        idle_since: None,
        completed_at: None,
        last_activity: String::new(),
        discovered: false,
    }
}

#[tokio::test]
async fn list_agents_returns_daemon_entries() {
    let (_dir, client, server) = fake_daemon(vec![Response::Agents {
        agents: vec![summary("agent-a", AgentState::Running)],
    }]);

    let agents = client.list_agents().await.unwrap();

    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].name, "agent-a");
    assert_eq!(server.await.unwrap(), vec![Request::ListAgents]);
}

#[tokio::test]
async fn send_input_maps_both_outcomes() {
    let (_dir, client, server) = fake_daemon(vec![Response::Sent, Response::Respawned]);

    let first = client
        .send_input("agent-a", Some("hello"), None)
        .await
        .unwrap();
    let second = client
        .send_input("agent-a", None, Some("Escape"))
        .await
        .unwrap();

    assert_eq!(first, Delivery::Sent);
    assert_eq!(second, Delivery::Respawned);
    let seen = server.await.unwrap();
    assert_eq!(
        seen[1],
        Request::Send {
            name: "agent-a".to_string(),
            message: None,
            key: Some("Escape".to_string()),
        }
    );
}

#[tokio::test]
async fn daemon_error_becomes_rejection() {
    let (_dir, client, _server) = fake_daemon(vec![Response::Error {
        message: "agent not found: agent-x".to_string(),
    }]);

    let err = client.kill("agent-x").await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(err.to_string(), "agent not found: agent-x");
}

#[tokio::test]
async fn mismatched_response_is_unexpected() {
    let (_dir, client, _server) = fake_daemon(vec![Response::Pong]);

    let err = client.kill_idle().await.unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedResponse));
}

#[tokio::test]
async fn counted_requests_return_count() {
    let (_dir, client, server) = fake_daemon(vec![
        Response::Cleaned { count: 1 },
        Response::Cleaned { count: 3 },
    ]);

    assert_eq!(client.cleanup("agent-a").await.unwrap(), 1);
    assert_eq!(client.cleanup_completed().await.unwrap(), 3);
    assert_eq!(
        server.await.unwrap(),
        vec![
            Request::Cleanup {
                name: "agent-a".to_string()
            },
            Request::CleanupCompleted,
        ]
    );
}

#[tokio::test]
async fn subscription_yields_frames_until_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.sock");
    let listener = UnixListener::bind(&path).unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        assert_eq!(
            read_request(&mut reader, WAIT).await.unwrap(),
            Request::Subscribe
        );
        for agents in [vec![], vec![summary("agent-a", AgentState::Idle)]] {
            write_response(&mut writer, &Response::Agents { agents }, WAIT)
                .await
                .unwrap();
        }
    });

    let client = DaemonClient::at(path);
    let mut stream = client.subscribe().await.unwrap();

    assert_eq!(stream.next().await.unwrap().unwrap().len(), 0);
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second[0].state, AgentState::Idle);
    assert!(stream.next().await.unwrap().is_none());
}
