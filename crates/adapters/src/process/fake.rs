// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessAdapter, ProcessError, ProcessTree};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

struct FakeProcessState {
    tree: ProcessTree,
    dead: HashSet<u32>,
    fail_listing: bool,
    builds: usize,
}

/// Scripted process table. Every pid is alive unless marked dead.
#[derive(Clone)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
}

impl Default for FakeProcessAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeProcessState {
                tree: ProcessTree::default(),
                dead: HashSet::new(),
                fail_listing: false,
                builds: 0,
            })),
        }
    }
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process to the table
    pub fn add_process(&self, pid: u32, ppid: u32, command: &str) {
        self.inner.lock().tree.insert(pid, ppid, command);
    }

    pub fn set_dead(&self, pid: u32) {
        self.inner.lock().dead.insert(pid);
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.inner.lock().fail_listing = fail;
    }

    /// Number of times the process table was listed
    pub fn builds(&self) -> usize {
        self.inner.lock().builds
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn build_tree(&self) -> Result<ProcessTree, ProcessError> {
        let mut inner = self.inner.lock();
        inner.builds += 1;
        if inner.fail_listing {
            return Err(ProcessError::ListFailed("ps unavailable".to_string()));
        }
        Ok(inner.tree.clone())
    }

    async fn is_alive(&self, pid: u32) -> bool {
        !self.inner.lock().dead.contains(&pid)
    }
}
