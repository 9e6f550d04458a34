// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Label summarizer adapters

mod claude;

pub use claude::{ClaudeLabelAdapter, DEFAULT_LABEL_COMMAND};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLabelAdapter, LabelCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from label generation
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("summarizer failed: {0}")]
    Failed(String),
    #[error("summarizer returned no output")]
    Empty,
}

/// Asks an auxiliary model for a short summary of some text.
#[async_trait]
pub trait LabelAdapter: Clone + Send + Sync + 'static {
    /// Return the model's raw (trimmed) reply to `instruction` applied to `text`
    async fn summarize(&self, instruction: &str, text: &str) -> Result<String, LabelError>;
}
