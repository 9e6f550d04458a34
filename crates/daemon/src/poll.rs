// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic poll pass and the push channel fed by it.

use std::sync::Arc;
use std::time::Duration;

use av_adapters::{LabelAdapter, NotifyAdapter, ProcessAdapter, SessionAdapter};
use av_core::Clock;
use av_engine::{AgentSummary, Runtime};
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;

/// Latest aggregated agent list
pub type AgentList = Arc<Vec<AgentSummary>>;

/// Runs poll passes one at a time and publishes each result.
///
/// Passes requested by clients and by the timer share one gate, so two
/// passes never interleave.
pub struct Poller<S, P, N, L, C: Clock> {
    runtime: Runtime<S, P, N, L, C>,
    gate: Mutex<()>,
    latest: watch::Sender<AgentList>,
}

impl<S, P, N, L, C> Poller<S, P, N, L, C>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    pub fn new(runtime: Runtime<S, P, N, L, C>) -> Self {
        let (latest, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            runtime,
            gate: Mutex::new(()),
            latest,
        }
    }

    pub fn runtime(&self) -> &Runtime<S, P, N, L, C> {
        &self.runtime
    }

    /// Run one pass and publish its result to subscribers.
    pub async fn pass(&self) -> AgentList {
        let _gate = self.gate.lock().await;
        let agents = Arc::new(self.runtime.list_agents().await);
        self.latest.send_replace(Arc::clone(&agents));
        agents
    }

    pub fn subscribe(&self) -> watch::Receiver<AgentList> {
        self.latest.subscribe()
    }

    /// Run passes forever at `interval`.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let agents = self.pass().await;
            tracing::debug!(
                agents = agents.len(),
                subscribers = self.latest.receiver_count(),
                "published agent list"
            );
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
