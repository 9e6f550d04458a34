// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable map of session name → agent record.
//!
//! The registry is the single owner of agent records. Callers mutate
//! through it and then [`Registry::persist`] the whole document; there are
//! no partial writes.

use crate::persist::{load_or_rotate, save_atomic, PersistError};
use av_core::{AgentName, AgentRecord};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Registry {
    path: Option<PathBuf>,
    records: IndexMap<AgentName, AgentRecord>,
}

impl Registry {
    /// Registry without a backing file (persist is a no-op)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file starts empty; a corrupt one is
    /// moved aside and also starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let records = load_or_rotate(&path)?.unwrap_or_default();
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&AgentRecord> {
        self.records.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AgentRecord> {
        self.records.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Insert or replace, returning the previous record
    pub fn upsert(&mut self, name: AgentName, record: AgentRecord) -> Option<AgentRecord> {
        self.records.insert(name, record)
    }

    /// Remove a record, keeping the order of the rest
    pub fn delete(&mut self, name: &str) -> Option<AgentRecord> {
        self.records.shift_remove(name)
    }

    pub fn list_names(&self) -> Vec<AgentName> {
        self.records.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentName, &AgentRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the whole registry to its backing file.
    pub fn persist(&self) -> Result<(), PersistError> {
        match &self.path {
            Some(path) => save_atomic(path, &self.records),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
