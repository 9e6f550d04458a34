// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn keeps_last_three_meaningful_lines_in_order() {
    let raw = "one\ntwo\nthree\nfour\n\n> \n";
    assert_eq!(last_activity(raw, &Patterns::default()), "two\nthree\nfour");
}

#[test]
fn skips_noise_but_keeps_escapes() {
    let raw = concat!(
        "\x1b[32m⏺ Edited src/lib.rs\x1b[0m\n",
        "────────────\n",
        "❯ \n",
        "⏵⏵ bypass permissions on (shift+tab to cycle)\n",
        "  press enter to send\n",
    );
    assert_eq!(
        last_activity(raw, &Patterns::default()),
        "\x1b[32m⏺ Edited src/lib.rs\x1b[0m"
    );
}

#[test]
fn empty_pane_has_no_activity() {
    assert_eq!(last_activity("", &Patterns::default()), "");
}

#[test]
fn summary_falls_back_to_name_for_empty_label() {
    let mut record = AgentRecord::spawned("", "/p", "do it", 5);
    record.apply_state(AgentState::Idle, 9);
    let summary = AgentSummary::new("agent-x", &record, String::new());
    assert_eq!(summary.label, "agent-x");
    assert_eq!(summary.idle_since, Some(9));
    assert_eq!(summary.state, AgentState::Idle);
}

#[test]
fn summary_serializes_null_timestamps() {
    let record = AgentRecord::spawned("fix", "/p", "fix", 5);
    let json = serde_json::to_value(AgentSummary::new("agent-fix", &record, "x".into())).unwrap();
    assert_eq!(json["projectPath"], "/p");
    assert_eq!(json["lastActivity"], "x");
    assert!(json["idleSince"].is_null());
    assert!(json["completedAt"].is_null());
}

#[test]
fn output_carries_both_forms() {
    let out = AgentOutput::from_raw("\x1b[1mhi\x1b[0m".to_string());
    assert_eq!(out.output, "hi");
    assert_eq!(out.raw, "\x1b[1mhi\x1b[0m");
}
