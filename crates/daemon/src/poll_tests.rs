// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::TestContext;
use av_core::AgentState;

#[tokio::test]
async fn pass_publishes_to_subscribers() {
    let ctx = TestContext::new();
    ctx.add_agent("agent-a", "> ");
    let poller = Poller::new(ctx.runtime.clone());
    let mut rx = poller.subscribe();
    assert!(rx.borrow_and_update().is_empty());

    let agents = poller.pass().await;

    assert!(rx.has_changed().unwrap());
    let published = rx.borrow_and_update().clone();
    assert_eq!(published, agents);
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].state, AgentState::Idle);
}

#[tokio::test]
async fn run_keeps_publishing() {
    let ctx = TestContext::new();
    ctx.add_agent("agent-a", "✻ Working… (esc to interrupt)");
    let poller = Arc::new(Poller::new(ctx.runtime.clone()));
    let mut rx = poller.subscribe();

    let task = tokio::spawn(Arc::clone(&poller).run(Duration::from_millis(5)));
    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.borrow_and_update()[0].state, AgentState::Running);
    }
    task.abort();
}

#[tokio::test]
async fn subscriber_sees_latest_list_on_subscribe() {
    let ctx = TestContext::new();
    ctx.add_agent("agent-a", "> ");
    let poller = Poller::new(ctx.runtime.clone());
    poller.pass().await;

    let rx = poller.subscribe();
    assert_eq!(rx.borrow().len(), 1);
}
