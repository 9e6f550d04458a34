// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The poll pass: discovery, dead-session sweep, classification

use super::Runtime;
use crate::classifier::{PaneSample, Vitals, CAPTURE_LINES};
use crate::summary::{last_activity, AgentSummary, ACTIVITY_LINES};
use av_adapters::{LabelAdapter, NotifyAdapter, ProcessAdapter, ProcessTree, SessionAdapter};
use av_core::{AgentName, AgentRecord, AgentState, Clock, SessionSnapshot, Transition};
use std::collections::HashSet;

impl<S, P, N, L, C> Runtime<S, P, N, L, C>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    /// Run one pass and return every registered agent.
    ///
    /// Discovery runs before classification so new agents are classified
    /// in the same pass. Nothing here fails: unreachable sessions and
    /// processes count as "no data".
    pub async fn list_agents(&self) -> Vec<AgentSummary> {
        let _gate = self.gate.lock().await;
        let sessions = match self.sessions.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                // Sweeping against an unknown session list would complete every agent
                tracing::warn!(error = %e, "session listing failed, skipping pass");
                return self.summaries_without_pass();
            }
        };
        let live: HashSet<&str> = sessions.iter().map(|s| s.name.as_str()).collect();

        self.discover(&sessions).await;
        self.sweep_dead(&live).await;
        self.refresh_discovered_labels();

        let mut agents = Vec::new();
        for name in self.lock_registry(|r| r.list_names()) {
            if let Some(summary) = self.classify_and_apply(&name, &live).await {
                agents.push(summary);
            }
        }

        self.persist_registry();
        tracing::debug!(agents = agents.len(), "poll pass complete");
        agents
    }

    /// Register live sessions that host the agent and are not yet known.
    async fn discover(&self, sessions: &[SessionSnapshot]) {
        let now = self.clock.epoch_ms();
        let candidates: Vec<&SessionSnapshot> = {
            let registry = self.registry.lock();
            let mut cache = self.non_agents.lock();
            sessions
                .iter()
                .filter(|s| !registry.contains(&s.name) && !cache.is_fresh(&s.name, now))
                .collect()
        };
        if candidates.is_empty() {
            return;
        }

        let tree = match self.processes.build_tree().await {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(error = %e, "process listing failed");
                ProcessTree::default()
            }
        };

        for session in candidates {
            self.inspect_candidate(session, &tree, now).await;
        }
    }

    async fn inspect_candidate(&self, session: &SessionSnapshot, tree: &ProcessTree, now: u64) {
        let name = session.name.as_str();
        let pid = match self.sessions.pane_pid(name).await {
            Ok(Some(pid)) => pid,
            Ok(None) | Err(_) => return,
        };

        if !tree.has_agent_descendant(pid, &self.config.agent_matcher) {
            self.non_agents.lock().insert(name, now);
            return;
        }

        let cwd = self
            .sessions
            .pane_current_path(name)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let record = AgentRecord::discovered(name, cwd, session.created_ms);

        let inserted = self.mutate_registry(|r| {
            if r.contains(name) {
                return false;
            }
            r.upsert(AgentName::new(name), record);
            true
        });
        if inserted {
            tracing::info!(session = %name, "discovered agent session");
            self.non_agents.lock().remove(name);
        }
    }

    /// Complete every unfinished record whose session is gone.
    async fn sweep_dead(&self, live: &HashSet<&str>) {
        let now = self.clock.epoch_ms();
        let completed: Vec<(String, AgentRecord)> = self.mutate_registry(|r| {
            let names: Vec<AgentName> = r
                .iter()
                .filter(|(name, record)| {
                    !live.contains(name.as_str()) && !record.state.is_completed()
                })
                .map(|(name, _)| name.clone())
                .collect();
            names
                .into_iter()
                .filter_map(|name| {
                    let record = r.get_mut(name.as_str())?;
                    record.apply_state(AgentState::Completed, now)?;
                    Some((name.into_string(), record.clone()))
                })
                .collect()
        });

        for (name, record) in completed {
            self.on_transition(&name, &record, Transition::Completed, false)
                .await;
        }
    }

    /// Classify one record, apply the result, and build its summary.
    async fn classify_and_apply(
        &self,
        name: &AgentName,
        live: &HashSet<&str>,
    ) -> Option<AgentSummary> {
        let name = name.as_str();
        let record = self.get_record(name)?;
        if record.state.is_completed() {
            return Some(AgentSummary::new(name, &record, String::new()));
        }

        let now = self.clock.epoch_ms();
        let session_live = live.contains(name);
        let vitals = Vitals {
            session_live,
            pid_alive: session_live && self.pane_process_alive(name).await,
            age_ms: now.saturating_sub(record.created_at),
            since_last_message_ms: record.last_message_sent_at.map(|at| now.saturating_sub(at)),
        };

        let verdict = match self.classifier.from_vitals(&vitals) {
            Some(verdict) => verdict,
            None => {
                let raw = self
                    .sessions
                    .capture_output(name, CAPTURE_LINES, false)
                    .await
                    .unwrap_or_default();
                self.classifier.from_pane(&PaneSample::from_capture(&raw))
            }
        };
        tracing::debug!(session = %name, state = %verdict.state, rule = verdict.rule, "classified");

        let (record, transition) = {
            let mut registry = self.registry.lock();
            let record = registry.get_mut(name)?;
            let transition = record.apply_state(verdict.state, now);
            (record.clone(), transition)
        };
        if let Some(transition) = transition {
            self.on_transition(name, &record, transition, session_live)
                .await;
        }

        let activity = if record.state.is_completed() {
            String::new()
        } else {
            self.sessions
                .capture_output(name, ACTIVITY_LINES, true)
                .await
                .map(|raw| last_activity(&raw, self.patterns()))
                .unwrap_or_default()
        };
        Some(AgentSummary::new(name, &record, activity))
    }

    /// Whether the session's pane process is alive. A failed lookup is no
    /// evidence of death; a pane without a pid is.
    async fn pane_process_alive(&self, name: &str) -> bool {
        match self.sessions.pane_pid(name).await {
            Ok(Some(pid)) => self.processes.is_alive(pid).await,
            Ok(None) => false,
            Err(e) => {
                tracing::debug!(session = %name, error = %e, "pane pid lookup failed");
                true
            }
        }
    }

    /// Summaries straight from the registry, without touching any session
    fn summaries_without_pass(&self) -> Vec<AgentSummary> {
        self.lock_registry(|r| {
            r.iter()
                .map(|(name, record)| AgentSummary::new(name.as_str(), record, String::new()))
                .collect()
        })
    }
}
