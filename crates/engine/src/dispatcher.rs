// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition notifications.
//!
//! The runtime calls [`Dispatcher::dispatch`] only from the code path that
//! observed a fresh transition, so one transition yields one notification.
//! Delivery runs in its own task; its outcome is logged and otherwise
//! ignored.

use av_adapters::{NotifyAdapter, NotifyError};
use av_core::{format_duration, AgentRecord, Transition};
use tokio::task::JoinHandle;

/// Prompt characters included in a notification body
const PROMPT_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() {
        "unknown"
    } else {
        s
    }
}

fn prompt_preview(prompt: &str) -> String {
    let mut preview: String = prompt
        .chars()
        .take(PROMPT_PREVIEW_CHARS)
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string();
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Build the notification for `record` entering `transition`.
pub fn compose(record: &AgentRecord, transition: Transition) -> Notification {
    let title = match transition {
        Transition::Completed => "Task Completed",
        Transition::Idle => "Task Waiting for Input",
    };
    let ended_at = record.completed_at.or(record.idle_since);
    let duration_secs = ended_at
        .map(|end| end.saturating_sub(record.created_at) / 1000)
        .unwrap_or(0);

    let body = format!(
        "Task: {}\nProject: {}\nDuration: {}\n\nPrompt:\n{}",
        or_unknown(&record.label),
        or_unknown(&record.project_path.to_string_lossy()),
        format_duration(duration_secs),
        prompt_preview(&record.prompt),
    );

    Notification {
        title: title.to_string(),
        body,
    }
}

/// Fire-and-forget delivery through one notification adapter.
#[derive(Clone)]
pub struct Dispatcher<N> {
    notifier: N,
}

impl<N: NotifyAdapter> Dispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Deliver the notification for a fresh transition in the background.
    pub fn dispatch(
        &self,
        name: &str,
        record: &AgentRecord,
        transition: Transition,
    ) -> JoinHandle<()> {
        let notification = compose(record, transition);
        tracing::info!(session = %name, kind = transition.as_str(), "notifying");
        self.deliver(name.to_string(), notification)
    }

    /// Deliver an arbitrary notification in the background.
    pub fn deliver(&self, name: String, notification: Notification) -> JoinHandle<()> {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            match notifier
                .notify(&notification.title, &notification.body)
                .await
            {
                Ok(()) => {}
                Err(NotifyError::NotConfigured) => {
                    tracing::debug!(session = %name, "no notification channel configured");
                }
                Err(e) => {
                    tracing::warn!(session = %name, error = %e, "notification failed");
                }
            }
        })
    }

    /// Deliver and wait for the outcome.
    pub async fn send_now(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.notifier
            .notify(&notification.title, &notification.body)
            .await
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
