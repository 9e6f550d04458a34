// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_within_ttl() {
    let mut cache = NonAgentCache::new();
    cache.insert("vim", 1_000);
    assert!(cache.is_fresh("vim", 1_000));
    assert!(cache.is_fresh("vim", 1_000 + NON_AGENT_TTL_MS - 1));
    assert!(!cache.is_fresh("other", 1_000));
}

#[test]
fn expired_entries_are_dropped_on_lookup() {
    let mut cache = NonAgentCache::new();
    cache.insert("vim", 1_000);
    assert!(!cache.is_fresh("vim", 1_000 + NON_AGENT_TTL_MS));
    assert!(cache.is_empty());
}

#[test]
fn reinsert_restarts_the_window() {
    let mut cache = NonAgentCache::new();
    cache.insert("vim", 0);
    cache.insert("vim", 20_000);
    assert!(cache.is_fresh("vim", 40_000));
    assert_eq!(cache.len(), 1);

    cache.remove("vim");
    assert!(!cache.is_fresh("vim", 40_000));
}
