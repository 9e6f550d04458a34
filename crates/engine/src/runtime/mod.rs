// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the agent lifecycle engine

mod control;
mod discovery;
mod labels;

pub use control::{SendOutcome, SendPayload};

use crate::classifier::Classifier;
use crate::dispatcher::Dispatcher;
use crate::non_agent_cache::NonAgentCache;
use crate::patterns::Patterns;
use crate::readiness::ReadinessConfig;
use av_adapters::{AgentMatcher, LabelAdapter, NotifyAdapter, ProcessAdapter, SessionAdapter};
use av_core::{AgentRecord, Clock, Transition};
use av_storage::Registry;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Agent command used when none is configured
pub const DEFAULT_AGENT_COMMAND: &str = "claude --dangerously-skip-permissions";

/// Prefix of session names created by spawn
pub const DEFAULT_SESSION_PREFIX: &str = "agent-";

/// Runtime behaviour configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Command started in every new session
    pub agent_command: String,
    /// Recognises the agent binary in a session's process tree
    pub agent_matcher: AgentMatcher,
    pub session_prefix: String,
    pub patterns: Patterns,
    pub readiness: ReadinessConfig,
    /// Delay before checking a new session's working directory
    pub spawn_check_delay: Duration,
}

impl RuntimeConfig {
    pub fn new(agent_command: impl Into<String>, agent_matcher: AgentMatcher) -> Self {
        Self {
            agent_command: agent_command.into(),
            agent_matcher,
            session_prefix: DEFAULT_SESSION_PREFIX.to_string(),
            patterns: Patterns::default(),
            readiness: ReadinessConfig::default(),
            spawn_check_delay: Duration::from_secs(1),
        }
    }
}

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, P, N, L> {
    pub sessions: S,
    pub processes: P,
    pub notifier: N,
    pub labeler: L,
    pub registry: Arc<Mutex<Registry>>,
}

/// Orchestrates agent sessions: discovery, classification, control.
///
/// Cheap to clone; background tasks carry their own clone. The registry
/// lock is only ever held for synchronous sections, never across an await.
/// Poll passes and the operations that start sessions or change state hold
/// `gate` for their whole duration, so a pass never works from a session
/// listing that predates a spawn, respawn, send or kill.
pub struct Runtime<S, P, N, L, C: Clock> {
    pub(crate) sessions: S,
    pub(crate) processes: P,
    pub(crate) dispatcher: Dispatcher<N>,
    pub(crate) labeler: L,
    pub(crate) registry: Arc<Mutex<Registry>>,
    pub(crate) non_agents: Arc<Mutex<NonAgentCache>>,
    pub(crate) classifier: Classifier,
    pub(crate) clock: C,
    pub(crate) config: Arc<RuntimeConfig>,
    pub(crate) gate: Arc<tokio::sync::Mutex<()>>,
}

impl<S: Clone, P: Clone, N: Clone, L: Clone, C: Clock> Clone for Runtime<S, P, N, L, C> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            processes: self.processes.clone(),
            dispatcher: self.dispatcher.clone(),
            labeler: self.labeler.clone(),
            registry: Arc::clone(&self.registry),
            non_agents: Arc::clone(&self.non_agents),
            classifier: self.classifier.clone(),
            clock: self.clock.clone(),
            config: Arc::clone(&self.config),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S, P, N, L, C> Runtime<S, P, N, L, C>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    pub fn new(deps: RuntimeDeps<S, P, N, L>, clock: C, config: RuntimeConfig) -> Self {
        Self {
            sessions: deps.sessions,
            processes: deps.processes,
            dispatcher: Dispatcher::new(deps.notifier),
            labeler: deps.labeler,
            registry: deps.registry,
            non_agents: Arc::new(Mutex::new(NonAgentCache::new())),
            classifier: Classifier::new(config.patterns.clone()),
            clock,
            config: Arc::new(config),
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<Mutex<Registry>> {
        Arc::clone(&self.registry)
    }

    /// Snapshot of one record
    pub fn get_record(&self, name: &str) -> Option<AgentRecord> {
        self.lock_registry(|r| r.get(name).cloned())
    }

    pub(crate) fn patterns(&self) -> &Patterns {
        &self.config.patterns
    }

    pub(crate) fn lock_registry<T>(&self, f: impl FnOnce(&Registry) -> T) -> T {
        let guard = self.registry.lock();
        f(&guard)
    }

    pub(crate) fn persist_registry(&self) {
        persist(&self.registry.lock());
    }

    /// Mutate the registry and persist the whole document
    pub(crate) fn mutate_registry<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> T {
        let mut guard = self.registry.lock();
        let out = f(&mut guard);
        persist(&guard);
        out
    }

    /// Mutate one record if it still exists, then persist
    pub(crate) fn update_record<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut AgentRecord) -> T,
    ) -> Option<T> {
        let mut guard = self.registry.lock();
        let out = guard.get_mut(name).map(f);
        if out.is_some() {
            persist(&guard);
        }
        out
    }

    /// Side effects of a fresh transition: reap the session on completion
    /// and notify. Notification delivery is not awaited.
    pub(crate) async fn on_transition(
        &self,
        name: &str,
        record: &AgentRecord,
        transition: Transition,
        session_live: bool,
    ) {
        tracing::info!(session = %name, state = transition.as_str(), "agent transition");
        if transition == Transition::Completed && session_live {
            if let Err(e) = self.sessions.kill(name).await {
                tracing::debug!(session = %name, error = %e, "kill on completion failed");
            }
        }
        self.dispatcher.dispatch(name, record, transition);
    }
}

/// Persist failures are logged; the in-memory registry stays authoritative
pub(crate) fn persist(registry: &Registry) {
    if let Err(e) = registry.persist() {
        tracing::warn!(error = %e, "failed to persist registry");
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;
