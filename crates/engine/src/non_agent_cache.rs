// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived memory of sessions known not to host an agent

use std::collections::HashMap;

/// How long a negative result is trusted
pub const NON_AGENT_TTL_MS: u64 = 30_000;

/// Session names whose process tree had no agent, with the time they were
/// checked. Entries expire lazily on lookup.
#[derive(Debug, Default)]
pub struct NonAgentCache {
    checked_at: HashMap<String, u64>,
}

impl NonAgentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` was found agent-free less than the TTL ago.
    pub fn is_fresh(&mut self, name: &str, now_ms: u64) -> bool {
        match self.checked_at.get(name) {
            Some(at) if now_ms.saturating_sub(*at) < NON_AGENT_TTL_MS => true,
            Some(_) => {
                self.checked_at.remove(name);
                false
            }
            None => false,
        }
    }

    pub fn insert(&mut self, name: &str, now_ms: u64) {
        self.checked_at.insert(name.to_string(), now_ms);
    }

    pub fn remove(&mut self, name: &str) {
        self.checked_at.remove(name);
    }

    pub fn len(&self) -> usize {
        self.checked_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked_at.is_empty()
    }
}

#[cfg(test)]
#[path = "non_agent_cache_tests.rs"]
mod tests;
