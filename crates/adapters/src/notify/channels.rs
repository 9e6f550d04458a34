// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out over the configured notification channels.

use super::{DesktopNotifyAdapter, NotifyAdapter, NotifyError, TelegramNotifyAdapter};
use async_trait::async_trait;

/// Delivers each notification to every enabled channel.
///
/// Succeeds if any channel delivered. With no channel enabled the result is
/// [`NotifyError::NotConfigured`].
#[derive(Clone, Default)]
pub struct NotifyChannels {
    telegram: Option<TelegramNotifyAdapter>,
    desktop: Option<DesktopNotifyAdapter>,
}

impl NotifyChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_telegram(mut self, telegram: TelegramNotifyAdapter) -> Self {
        self.telegram = telegram.is_configured().then_some(telegram);
        self
    }

    pub fn with_desktop(mut self, desktop: DesktopNotifyAdapter) -> Self {
        self.desktop = Some(desktop);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.telegram.is_none() && self.desktop.is_none()
    }
}

#[async_trait]
impl NotifyAdapter for NotifyChannels {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut last_err = None;
        let mut delivered = false;

        if let Some(telegram) = &self.telegram {
            match telegram.notify(title, message).await {
                Ok(()) => delivered = true,
                Err(e) => {
                    tracing::warn!(channel = "telegram", error = %e, "notification failed");
                    last_err = Some(e);
                }
            }
        }
        if let Some(desktop) = &self.desktop {
            match desktop.notify(title, message).await {
                Ok(()) => delivered = true,
                Err(e) => {
                    tracing::warn!(channel = "desktop", error = %e, "notification failed");
                    last_err = Some(e);
                }
            }
        }

        match (delivered, last_err) {
            (true, _) => Ok(()),
            (false, Some(e)) => Err(e),
            (false, None) => Err(NotifyError::NotConfigured),
        }
    }
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;
