// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification channels for agent state changes.
//!
//! Each channel delivers a title and a plain-text body. `NotifyChannels`
//! fans one notification out to every configured channel.

mod channels;
mod desktop;
mod telegram;

pub use channels::NotifyChannels;
pub use desktop::DesktopNotifyAdapter;
pub use telegram::{TelegramConfig, TelegramNotifyAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Why a channel could not deliver
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The channel is disabled or missing credentials
    #[error("channel not configured")]
    NotConfigured,
    #[error("delivery failed: {0}")]
    SendFailed(String),
}

#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Deliver one notification. Callers log failures and move on.
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}
