// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Telegram bot notification channel.

use super::{NotifyAdapter, NotifyError};
use crate::subprocess::NOTIFY_TIMEOUT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// `[telegram]` section of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub enabled: bool,
}

impl TelegramConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct TelegramNotifyAdapter {
    config: TelegramConfig,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifyAdapter {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Point the adapter at a different Bot API host
    pub fn with_api_base(config: TelegramConfig, api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            config,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_usable()
    }
}

#[async_trait]
impl NotifyAdapter for TelegramNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        if !self.is_configured() {
            return Err(NotifyError::NotConfigured);
        }

        let text = format!("{}\n\n{}", title, message);
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.config.chat_id,
                text: &text,
            })
            .send()
            .await
            // reqwest errors embed the URL, which carries the token
            .map_err(|e| NotifyError::SendFailed(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::SendFailed(format!("HTTP {} {}", status.as_u16(), body.trim())));
        }

        tracing::info!(length = text.len(), "telegram notification sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;
