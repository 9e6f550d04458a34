// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup readiness polling.
//!
//! A freshly spawned agent may stop at a trust dialog or an informational
//! prompt before it accepts input. The poller samples the pane, answers
//! those screens with keystrokes, and reports once the agent looks ready.

use crate::patterns::Patterns;
use av_adapters::SessionAdapter;
use av_core::{ansi, SessionKey};
use std::time::Duration;

/// Pane lines sampled per readiness check
const SAMPLE_LINES: u32 = 30;

/// Trailing lines a startup screen is recognised in
const RECENT_LINES: usize = 8;

/// Pause between the arrow key and the confirm key on a trust dialog
const KEY_GAP: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ReadinessConfig {
    fn attempts(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        self.timeout.as_millis().div_ceil(interval).max(1) as u32
    }
}

/// What one pane sample shows during startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupScreen {
    /// Two-option dialog; the second option must be chosen
    TrustDialog,
    /// Dismissable screen waiting for a confirm keystroke
    InfoPrompt,
    Ready,
    NotReady,
}

/// Assess one normalized pane sample.
pub fn assess_startup(normalized: &str, patterns: &Patterns) -> StartupScreen {
    let lines: Vec<&str> = normalized
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();
    let Some(last) = lines.last() else {
        return StartupScreen::NotReady;
    };
    let recent = lines[lines.len().saturating_sub(RECENT_LINES)..].join("\n");

    if patterns.has_confirm_marker(&recent) {
        if patterns.is_trust_dialog(&recent) {
            return StartupScreen::TrustDialog;
        }
        return StartupScreen::InfoPrompt;
    }
    if patterns.is_busy(&recent)
        || patterns.is_ready_prompt(last.trim())
        || patterns.is_ready_phrase(&recent)
    {
        return StartupScreen::Ready;
    }
    StartupScreen::NotReady
}

/// Poll `name` until the agent is ready for input or the timeout passes.
///
/// Returns `false` on timeout. Capture and key failures count as a
/// sample with no evidence.
pub async fn await_ready<S: SessionAdapter>(
    sessions: &S,
    name: &str,
    patterns: &Patterns,
    config: ReadinessConfig,
) -> bool {
    for _ in 0..config.attempts() {
        tokio::time::sleep(config.interval).await;

        let raw = match sessions.capture_output(name, SAMPLE_LINES, false).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(session = %name, error = %e, "readiness capture failed");
                continue;
            }
        };

        match assess_startup(&ansi::normalize(&raw), patterns) {
            StartupScreen::TrustDialog => {
                tracing::info!(session = %name, "accepting startup trust dialog");
                press(sessions, name, SessionKey::Down).await;
                tokio::time::sleep(KEY_GAP).await;
                press(sessions, name, SessionKey::Enter).await;
            }
            StartupScreen::InfoPrompt => {
                tracing::info!(session = %name, "dismissing startup prompt");
                press(sessions, name, SessionKey::Enter).await;
            }
            StartupScreen::Ready => return true,
            StartupScreen::NotReady => {}
        }
    }
    false
}

/// A failed keystroke is logged; the next sample decides what happens.
async fn press<S: SessionAdapter>(sessions: &S, name: &str, key: SessionKey) {
    if let Err(e) = sessions.send_key(name, key).await {
        tracing::warn!(session = %name, %key, error = %e, "startup keystroke failed");
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
