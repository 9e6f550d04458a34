// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake summarizer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LabelAdapter, LabelError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Recorded summarize call
#[derive(Debug, Clone)]
pub struct LabelCall {
    pub instruction: String,
    pub text: String,
}

struct FakeLabelState {
    calls: Vec<LabelCall>,
    /// Scripted replies, consumed in order; `None` means fail
    replies: VecDeque<Option<String>>,
}

/// Scripted summarizer. Without scripted replies every call fails.
#[derive(Clone)]
pub struct FakeLabelAdapter {
    inner: Arc<Mutex<FakeLabelState>>,
}

impl Default for FakeLabelAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLabelState {
                calls: Vec::new(),
                replies: VecDeque::new(),
            })),
        }
    }
}

impl FakeLabelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: &str) {
        self.inner.lock().replies.push_back(Some(reply.to_string()));
    }

    pub fn push_failure(&self) {
        self.inner.lock().replies.push_back(None);
    }

    pub fn calls(&self) -> Vec<LabelCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl LabelAdapter for FakeLabelAdapter {
    async fn summarize(&self, instruction: &str, text: &str) -> Result<String, LabelError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LabelCall {
            instruction: instruction.to_string(),
            text: text.to_string(),
        });
        match inner.replies.pop_front() {
            Some(Some(reply)) => Ok(reply),
            Some(None) | None => Err(LabelError::Failed("fake failure".to_string())),
        }
    }
}
