// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use indexmap::IndexMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId;
}

#[test]
fn display_and_accessors() {
    let id = TestId::new("agent-fix-login");
    assert_eq!(id.as_str(), "agent-fix-login");
    assert_eq!(id.to_string(), "agent-fix-login");
    assert_eq!(id.clone().into_string(), "agent-fix-login");
}

#[test]
fn compares_with_str() {
    let id = TestId::from("agent-a");
    assert!(id == *"agent-a");
    assert_eq!(id, "agent-a");
    assert_eq!(id, TestId::from("agent-a".to_string()));
}

#[test]
fn serializes_as_bare_string() {
    let id = TestId::new("agent-a");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"agent-a\"");
    let back: TestId = serde_json::from_str("\"agent-b\"").unwrap();
    assert_eq!(back, "agent-b");
}

#[test]
fn map_lookup_by_str() {
    let mut map = IndexMap::new();
    map.insert(TestId::new("agent-a"), 1);
    assert_eq!(map.get("agent-a"), Some(&1));
    assert_eq!(map.get("agent-b"), None);
}

#[test]
fn ordering_follows_string() {
    let mut ids = vec![TestId::new("b"), TestId::new("a")];
    ids.sort();
    assert_eq!(ids[0], "a");
}
