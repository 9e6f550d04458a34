// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Literal phrase patterns the classifier and readiness poller look for.
//!
//! These match the wording of one agent CLI's terminal UI and change when
//! that UI does, so they are configuration (`[patterns]` in the config
//! file). Every pattern is a case-insensitive regex. Line patterns are
//! tested against one trimmed line; text patterns against several recent
//! lines joined with `\n`.

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid {field} pattern: {source}")]
pub struct PatternError {
    field: &'static str,
    #[source]
    source: regex::Error,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Raw pattern lists as they appear in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Status line the agent prints only while working (text)
    pub busy: Vec<String>,
    /// Persistent UI lines ignored when looking for content (line)
    pub chrome: Vec<String>,
    /// Last content line showing the agent waits at its prompt (line)
    pub idle_prompt: Vec<String>,
    /// Recent content asking the user a question (text)
    pub awaiting_input: Vec<String>,
    /// Lines skipped when summarizing recent activity (line)
    pub activity_noise: Vec<String>,
    /// Marker of a startup dialog that wants a confirm keystroke (text)
    pub confirm_marker: Vec<String>,
    /// Two-option startup dialogs where the second option must be picked (text)
    pub trust_dialogs: Vec<[String; 2]>,
    /// Last line showing the agent accepts input (line)
    pub ready_prompt: Vec<String>,
    /// Invitation phrasing shown once the agent is ready (text)
    pub ready_phrase: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            busy: strings(&["esc to interrupt"]),
            chrome: strings(&[
                "bypass permissions",
                r"shift.?tab to cycle",
                r"ctrl.?t to hide",
                r"^[─━═]+$",
                r"^❯\s*$",
            ]),
            idle_prompt: strings(&[
                r"^>\s*$",
                r"^\$\s*$",
                r"^❯\s*$",
                r"^❯\s+\S",
                "has completed",
                "what.*would.*like",
                "anything.*else",
                "can i help",
                "waiting for input",
            ]),
            awaiting_input: strings(&[
                r"Allow\s+(once|always)",
                "do you want to proceed",
                "shall I proceed",
                "should I proceed",
                "approve|deny|reject",
                "yes.*no.*always allow",
                r"\(y/n\)",
                "enter a value|enter to confirm",
                "select.*option",
                "choose.*from",
                "press enter to send",
            ]),
            activity_noise: strings(&[
                "bypass permissions",
                r"shift.?tab to cycle",
                r"ctrl.?t to hide",
                "press enter to send",
                "waiting for input",
                r"^[>❯$]\s*$",
                r"^[─━═]+$",
            ]),
            confirm_marker: strings(&["Enter to confirm"]),
            trust_dialogs: vec![
                ["No, exit".to_string(), "Yes, I accept".to_string()],
                [
                    "Exit and fix manually".to_string(),
                    "Continue without".to_string(),
                ],
            ],
            ready_prompt: strings(&[r"^>\s*$", r"^❯\s*$", r"^❯\s+\S"]),
            ready_phrase: strings(&["what.*would.*like", "can i help"]),
        }
    }
}

/// Compiled, shareable form of [`PatternConfig`].
#[derive(Debug, Clone)]
pub struct Patterns {
    inner: Arc<Compiled>,
}

#[derive(Debug)]
struct Compiled {
    busy: RegexSet,
    chrome: RegexSet,
    idle_prompt: RegexSet,
    awaiting_input: RegexSet,
    activity_noise: RegexSet,
    confirm_marker: RegexSet,
    trust_dialogs: Vec<(Regex, Regex)>,
    ready_prompt: RegexSet,
    ready_phrase: RegexSet,
}

#[allow(clippy::expect_used)]
static BUILTIN: LazyLock<Patterns> = LazyLock::new(|| {
    Patterns::compile(&PatternConfig::default()).expect("built-in patterns are valid")
});

impl Default for Patterns {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

fn set(field: &'static str, patterns: &[String]) -> Result<RegexSet, PatternError> {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError { field, source })
}

fn one(field: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError { field, source })
}

impl Patterns {
    pub fn compile(config: &PatternConfig) -> Result<Self, PatternError> {
        let trust_dialogs = config
            .trust_dialogs
            .iter()
            .map(|[first, second]| {
                Ok((one("trust_dialogs", first)?, one("trust_dialogs", second)?))
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        Ok(Self {
            inner: Arc::new(Compiled {
                busy: set("busy", &config.busy)?,
                chrome: set("chrome", &config.chrome)?,
                idle_prompt: set("idle_prompt", &config.idle_prompt)?,
                awaiting_input: set("awaiting_input", &config.awaiting_input)?,
                activity_noise: set("activity_noise", &config.activity_noise)?,
                confirm_marker: set("confirm_marker", &config.confirm_marker)?,
                trust_dialogs,
                ready_prompt: set("ready_prompt", &config.ready_prompt)?,
                ready_phrase: set("ready_phrase", &config.ready_phrase)?,
            }),
        })
    }

    pub fn is_busy(&self, text: &str) -> bool {
        self.inner.busy.is_match(text)
    }

    pub fn is_chrome(&self, line: &str) -> bool {
        self.inner.chrome.is_match(line)
    }

    pub fn is_idle_prompt(&self, line: &str) -> bool {
        self.inner.idle_prompt.is_match(line)
    }

    pub fn is_awaiting_input(&self, text: &str) -> bool {
        self.inner.awaiting_input.is_match(text)
    }

    pub fn is_activity_noise(&self, line: &str) -> bool {
        self.inner.activity_noise.is_match(line)
    }

    pub fn has_confirm_marker(&self, text: &str) -> bool {
        self.inner.confirm_marker.is_match(text)
    }

    /// Whether both options of any known two-option dialog are on screen
    pub fn is_trust_dialog(&self, text: &str) -> bool {
        self.inner
            .trust_dialogs
            .iter()
            .any(|(first, second)| first.is_match(text) && second.is_match(text))
    }

    pub fn is_ready_prompt(&self, line: &str) -> bool {
        self.inner.ready_prompt.is_match(line)
    }

    pub fn is_ready_phrase(&self, text: &str) -> bool {
        self.inner.ready_phrase.is_match(text)
    }
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
