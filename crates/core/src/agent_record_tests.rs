// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn record() -> AgentRecord {
    AgentRecord::spawned("fix-login-bug", "/tmp/project", "fix the login bug", 1_000)
}

fn assert_invariants(r: &AgentRecord) {
    assert_eq!(r.idle_since.is_some(), r.state == AgentState::Idle, "{:?}", r);
    assert_eq!(
        r.completed_at.is_some(),
        r.state == AgentState::Completed,
        "{:?}",
        r
    );
}

#[test]
fn spawned_record_starts_running() {
    let r = record();
    assert_eq!(r.state, AgentState::Running);
    assert!(!r.initial_prompt_sent);
    assert!(!r.discovered);
    assert_invariants(&r);
}

#[test]
fn discovered_record_uses_session_name_as_label() {
    let r = AgentRecord::discovered("my-session", "/work", 500);
    assert!(r.discovered);
    assert_eq!(r.label, "my-session");
    assert_eq!(r.created_at, 500);
    assert!(r.needs_label_refresh("my-session"));
}

#[test]
fn idle_transition_fires_once() {
    let mut r = record();
    assert_eq!(r.apply_state(AgentState::Idle, 2_000), Some(Transition::Idle));
    assert_eq!(r.idle_since, Some(2_000));
    assert_eq!(r.apply_state(AgentState::Idle, 5_000), None);
    assert_eq!(r.idle_since, Some(2_000));
    assert_invariants(&r);
}

#[test]
fn leaving_idle_clears_timers() {
    let mut r = record();
    r.apply_state(AgentState::Idle, 2_000);
    r.last_message_sent_at = Some(1_500);
    assert_eq!(r.apply_state(AgentState::Running, 3_000), None);
    assert_eq!(r.idle_since, None);
    assert_eq!(r.last_message_sent_at, None);
    assert_invariants(&r);
}

#[test]
fn running_to_running_keeps_last_message_timestamp() {
    let mut r = record();
    r.message_sent(2_000);
    assert_eq!(r.apply_state(AgentState::Running, 3_000), None);
    assert_eq!(r.last_message_sent_at, Some(2_000));
}

#[test]
fn completion_fires_once_and_first_timestamp_wins() {
    let mut r = record();
    r.apply_state(AgentState::Idle, 2_000);
    assert_eq!(
        r.apply_state(AgentState::Completed, 3_000),
        Some(Transition::Completed)
    );
    assert_eq!(r.completed_at, Some(3_000));
    assert_eq!(r.apply_state(AgentState::Completed, 9_000), None);
    assert_eq!(r.completed_at, Some(3_000));
    assert_invariants(&r);
}

#[test]
fn completed_record_is_never_reclassified() {
    let mut r = record();
    r.apply_state(AgentState::Completed, 3_000);
    assert_eq!(r.apply_state(AgentState::Running, 4_000), None);
    assert_eq!(r.apply_state(AgentState::Idle, 5_000), None);
    assert_eq!(r.state, AgentState::Completed);
    assert_invariants(&r);
}

#[test]
fn unknown_is_ignored() {
    let mut r = record();
    assert_eq!(r.apply_state(AgentState::Unknown, 2_000), None);
    assert_eq!(r.state, AgentState::Running);
}

#[test]
fn kill_always_stamps_completion() {
    let mut r = record();
    r.apply_state(AgentState::Completed, 3_000);
    r.finalize_killed(7_000);
    assert_eq!(r.completed_at, Some(7_000));
    assert_invariants(&r);
}

#[test]
fn respawn_resets_to_running() {
    let mut r = record();
    r.apply_state(AgentState::Completed, 3_000);
    r.respawn("try again");
    assert_eq!(r.state, AgentState::Running);
    assert_eq!(r.prompt, "try again");
    assert_eq!(r.completed_at, None);
    assert_invariants(&r);
}

#[test]
fn message_sent_clears_idle() {
    let mut r = record();
    r.apply_state(AgentState::Idle, 2_000);
    r.message_sent(3_000);
    assert_eq!(r.state, AgentState::Running);
    assert_eq!(r.last_message_sent_at, Some(3_000));
    assert_invariants(&r);
}

#[test]
fn serializes_camel_case_and_omits_empty_timestamps() {
    let json = serde_json::to_value(record()).unwrap();
    assert_eq!(json["projectPath"], "/tmp/project");
    assert_eq!(json["initialPromptSent"], false);
    assert_eq!(json["state"], "running");
    assert!(json.get("idleSince").is_none());
    assert!(json.get("completedAt").is_none());
}

#[test]
fn deserializes_sparse_legacy_entry() {
    let r: AgentRecord =
        serde_json::from_str(r#"{"label":"x","state":"idle","idleSince":5}"#).unwrap();
    assert_eq!(r.state, AgentState::Idle);
    assert_eq!(r.idle_since, Some(5));
    assert!(!r.discovered);
    assert_eq!(r.project_path, PathBuf::new());
}
