// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background label upgrades

use super::Runtime;
use av_adapters::{LabelAdapter, NotifyAdapter, ProcessAdapter, SessionAdapter};
use av_core::{ansi, sanitize_label, Clock};

const TASK_INSTRUCTION: &str = "Generate a short label (2-4 lowercase words, hyphenated, \
no quotes) summarizing this coding task. Reply with ONLY the label.";

const OUTPUT_INSTRUCTION: &str = "This is terminal output from a Claude Code AI agent working \
on a coding task. Generate a short label (2-4 lowercase words, hyphenated, no quotes) \
summarizing what this agent is doing. Reply with ONLY the label.";

/// Prompt characters sent to the summarizer
const PROMPT_CHARS: usize = 300;

/// Pane characters sent to the summarizer
const OUTPUT_CHARS: usize = 500;

/// Pane lines captured for a discovered agent's label
const OUTPUT_LINES: u32 = 30;

/// Less pane text than this is not worth summarizing yet
const MIN_OUTPUT_CHARS: usize = 20;

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
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
    /// Replace a spawned agent's keyword label with a summarized one.
    ///
    /// Any failure keeps the current label.
    pub(crate) fn spawn_label_upgrade(&self, name: String, prompt: String) {
        let runtime = self.clone();
        tokio::spawn(async move {
            let reply = runtime
                .labeler
                .summarize(TASK_INSTRUCTION, truncate_chars(&prompt, PROMPT_CHARS))
                .await;
            let label = match reply.map(|raw| sanitize_label(&raw)) {
                Ok(Some(label)) => label,
                Ok(None) => {
                    tracing::debug!(session = %name, "summarized label rejected");
                    return;
                }
                Err(e) => {
                    tracing::debug!(session = %name, error = %e, "label upgrade failed");
                    return;
                }
            };
            runtime.update_record(&name, |record| {
                if record.label != label {
                    tracing::info!(session = %name, from = %record.label, to = %label, "label upgraded");
                    record.label = label;
                }
            });
        });
    }

    /// Start a label refresh for every discovered agent still named after
    /// its session.
    pub(crate) fn refresh_discovered_labels(&self) {
        let pending: Vec<String> = self.lock_registry(|r| {
            r.iter()
                .filter(|(name, record)| record.needs_label_refresh(name.as_str()))
                .map(|(name, _)| name.to_string())
                .collect()
        });
        for name in pending {
            let runtime = self.clone();
            tokio::spawn(async move { runtime.refresh_discovered_label(&name).await });
        }
    }

    pub(crate) async fn refresh_discovered_label(&self, name: &str) {
        let raw = match self.sessions.capture_output(name, OUTPUT_LINES, false).await {
            Ok(raw) => raw,
            Err(_) => return,
        };
        let output = ansi::normalize(&raw);
        let output = output.trim();
        if output.chars().count() < MIN_OUTPUT_CHARS {
            tracing::debug!(session = %name, "not enough output to label yet");
            return;
        }

        // Claim the refresh; another task may have got here first
        let claimed = self
            .update_record(name, |record| {
                if !record.needs_label_refresh(name) {
                    return false;
                }
                record.label_refreshed = true;
                true
            })
            .unwrap_or(false);
        if !claimed {
            return;
        }

        match self
            .labeler
            .summarize(OUTPUT_INSTRUCTION, truncate_chars(output, OUTPUT_CHARS))
            .await
        {
            Ok(raw) => match sanitize_label(&raw) {
                Some(label) => {
                    self.update_record(name, |record| {
                        tracing::info!(session = %name, label = %label, "labeled discovered agent");
                        record.label = label;
                    });
                }
                None => tracing::debug!(session = %name, reply = %raw, "summarized label rejected"),
            },
            Err(e) => {
                tracing::debug!(session = %name, error = %e, "discovered label failed, will retry");
                self.update_record(name, |record| record.label_refreshed = false);
            }
        }
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
