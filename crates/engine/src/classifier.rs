// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent state classification.
//!
//! A classification is two ordered rule tables. The vitals rules look only
//! at session liveness and the record's timers, and are checked first so a
//! pane capture is skipped whenever they decide. The pane rules then look
//! at a normalized capture. The first rule to return a state wins; if none
//! does the agent is `Running`, so `Idle` and `Completed` always need
//! positive evidence.

use crate::patterns::Patterns;
use av_core::{ansi, AgentState};

/// Startup output is ignored for this long after a record is created
pub const STARTUP_GRACE_MS: u64 = 15_000;

/// The agent gets this long to react to a delivered message
pub const MESSAGE_SETTLE_MS: u64 = 10_000;

/// Pane lines captured per classification
pub const CAPTURE_LINES: u32 = 50;

/// Trailing lines considered "recent" by the text rules
const RECENT_LINES: usize = 8;

/// Facts about a session that need no pane capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub session_live: bool,
    pub pid_alive: bool,
    /// Milliseconds since the record was created
    pub age_ms: u64,
    /// Milliseconds since the last delivered message, if any
    pub since_last_message_ms: Option<u64>,
}

/// Normalized, trimmed, non-blank lines of one pane capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneSample {
    lines: Vec<String>,
}

impl PaneSample {
    pub fn from_capture(raw: &str) -> Self {
        Self {
            lines: ansi::content_lines(raw),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn recent_text(&self) -> String {
        tail(&self.lines, RECENT_LINES).join("\n")
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// The decided state and the name of the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub state: AgentState,
    pub rule: &'static str,
}

type VitalsRule = (&'static str, fn(&Vitals) -> Option<AgentState>);
type PaneRule = (&'static str, fn(&Patterns, &PaneSample) -> Option<AgentState>);

const VITALS_RULES: &[VitalsRule] = &[
    ("session-gone", session_gone),
    ("process-dead", process_dead),
    ("startup-grace", startup_grace),
    ("recent-message", recent_message),
];

const PANE_RULES: &[PaneRule] = &[
    ("no-output", no_output),
    ("busy-marker", busy_marker),
    ("only-chrome", only_chrome),
    ("idle-prompt", idle_prompt),
    ("awaiting-input", awaiting_input),
];

fn session_gone(v: &Vitals) -> Option<AgentState> {
    (!v.session_live).then_some(AgentState::Completed)
}

fn process_dead(v: &Vitals) -> Option<AgentState> {
    (!v.pid_alive).then_some(AgentState::Completed)
}

fn startup_grace(v: &Vitals) -> Option<AgentState> {
    (v.age_ms < STARTUP_GRACE_MS).then_some(AgentState::Running)
}

fn recent_message(v: &Vitals) -> Option<AgentState> {
    v.since_last_message_ms
        .filter(|ms| *ms < MESSAGE_SETTLE_MS)
        .map(|_| AgentState::Running)
}

fn no_output(_: &Patterns, s: &PaneSample) -> Option<AgentState> {
    s.lines.is_empty().then_some(AgentState::Running)
}

fn busy_marker(p: &Patterns, s: &PaneSample) -> Option<AgentState> {
    p.is_busy(&s.recent_text()).then_some(AgentState::Running)
}

fn only_chrome(p: &Patterns, s: &PaneSample) -> Option<AgentState> {
    content(p, s).is_empty().then_some(AgentState::Running)
}

/// Last substantive line is a prompt or an invitation
fn idle_prompt(p: &Patterns, s: &PaneSample) -> Option<AgentState> {
    content(p, s)
        .last()
        .filter(|line| p.is_idle_prompt(line))
        .map(|_| AgentState::Idle)
}

/// Recent substantive lines ask a question
fn awaiting_input(p: &Patterns, s: &PaneSample) -> Option<AgentState> {
    let content = content(p, s);
    p.is_awaiting_input(&tail(&content, RECENT_LINES).join("\n"))
        .then_some(AgentState::Idle)
}

/// Lines left after dropping persistent UI chrome
fn content<'a>(patterns: &Patterns, sample: &'a PaneSample) -> Vec<&'a str> {
    sample
        .lines
        .iter()
        .map(String::as_str)
        .filter(|line| !patterns.is_chrome(line))
        .collect()
}

/// Stateless classifier over a compiled pattern set.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    patterns: Patterns,
}

impl Classifier {
    pub fn new(patterns: Patterns) -> Self {
        Self { patterns }
    }

    /// Decide from vitals alone, or `None` when the pane must be inspected.
    pub fn from_vitals(&self, vitals: &Vitals) -> Option<Verdict> {
        VITALS_RULES
            .iter()
            .find_map(|&(rule, check)| check(vitals).map(|state| Verdict { state, rule }))
    }

    pub fn from_pane(&self, sample: &PaneSample) -> Verdict {
        PANE_RULES
            .iter()
            .find_map(|&(rule, check)| {
                check(&self.patterns, sample).map(|state| Verdict { state, rule })
            })
            .unwrap_or(Verdict {
                state: AgentState::Running,
                rule: "default",
            })
    }

    /// Full classification when the capture is already at hand.
    pub fn classify(&self, vitals: &Vitals, sample: &PaneSample) -> Verdict {
        self.from_vitals(vitals)
            .unwrap_or_else(|| self.from_pane(sample))
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
