// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn settled() -> Vitals {
    Vitals {
        session_live: true,
        pid_alive: true,
        age_ms: 60_000,
        since_last_message_ms: None,
    }
}

fn classify(pane: &str) -> Verdict {
    Classifier::default().classify(&settled(), &PaneSample::from_capture(pane))
}

#[yare::parameterized(
    session_gone = { Vitals { session_live: false, ..settled() }, AgentState::Completed, "session-gone" },
    process_dead = { Vitals { pid_alive: false, ..settled() }, AgentState::Completed, "process-dead" },
    young        = { Vitals { age_ms: 14_999, ..settled() }, AgentState::Running, "startup-grace" },
    just_sent    = { Vitals { since_last_message_ms: Some(9_999), ..settled() }, AgentState::Running, "recent-message" },
    gone_beats_grace = { Vitals { session_live: false, age_ms: 0, ..settled() }, AgentState::Completed, "session-gone" },
)]
fn vitals_decide(vitals: Vitals, state: AgentState, rule: &str) {
    let verdict = Classifier::default().from_vitals(&vitals).unwrap();
    assert_eq!(verdict.state, state);
    assert_eq!(verdict.rule, rule);
}

#[yare::parameterized(
    grace_over   = { Vitals { age_ms: 15_000, ..settled() } },
    message_old  = { Vitals { since_last_message_ms: Some(10_000), ..settled() } },
)]
fn vitals_defer_to_pane(vitals: Vitals) {
    assert_eq!(Classifier::default().from_vitals(&vitals), None);
}

#[test]
fn grace_window_ignores_idle_looking_pane() {
    let vitals = Vitals {
        age_ms: 1_000,
        ..settled()
    };
    let verdict =
        Classifier::default().classify(&vitals, &PaneSample::from_capture("done\n❯ \n"));
    assert_eq!(verdict.state, AgentState::Running);
}

#[yare::parameterized(
    empty        = { "", "no-output" },
    blank_lines  = { "\n   \n\n", "no-output" },
    busy         = { "⏺ Reading files\n✻ Thinking… (esc to interrupt)\n>", "busy-marker" },
    chrome_only  = { "────────\n⏵⏵ bypass permissions on (shift+tab to cycle)\n", "only-chrome" },
    working_text = { "⏺ Running the test suite\n  cargo test", "default" },
)]
fn pane_running(pane: &str, rule: &str) {
    let verdict = classify(pane);
    assert_eq!(verdict.state, AgentState::Running);
    assert_eq!(verdict.rule, rule);
}

#[yare::parameterized(
    bare_glyph_before_chrome = { "⏺ Done. All tests pass.\n> \n────────\n⏵⏵ bypass permissions on" , "idle-prompt" },
    shell_prompt  = { "output\n$ ", "idle-prompt" },
    glyph_input   = { "⏺ Fixed\n────────\n❯ try again\n────────", "idle-prompt" },
    help_phrase   = { "Anything else I can help with?", "idle-prompt" },
    proceed       = { "Edit src/main.rs\nDo you want to proceed? (y/n)", "awaiting-input" },
    approval_menu = { "Allow tool use?\n1. Allow once\n2. Allow always\n3. Deny\nchoose an option", "awaiting-input" },
)]
fn pane_idle(pane: &str, rule: &str) {
    let verdict = classify(pane);
    assert_eq!(verdict.state, AgentState::Idle);
    assert_eq!(verdict.rule, rule);
}

#[test]
fn ansi_sequences_are_stripped_before_matching() {
    let verdict = classify("\x1b[1m⏺ Done\x1b[0m\n\x1b[2m>\x1b[0m \n");
    assert_eq!(verdict.state, AgentState::Idle);
}

#[test]
fn busy_marker_only_counts_in_recent_lines() {
    let mut pane = String::from("(esc to interrupt)\n");
    for i in 0..10 {
        pane.push_str(&format!("line {i}\n"));
    }
    pane.push_str("> \n");
    assert_eq!(classify(&pane).state, AgentState::Idle);
}

#[test]
fn classification_is_deterministic() {
    let sample = PaneSample::from_capture("Do you want to proceed? (y/n)");
    let classifier = Classifier::default();
    let first = classifier.classify(&settled(), &sample);
    for _ in 0..5 {
        assert_eq!(classifier.classify(&settled(), &sample), first);
    }
}

#[test]
fn custom_patterns_change_the_verdict() {
    let config = crate::patterns::PatternConfig {
        busy: vec!["compiling".to_string()],
        ..Default::default()
    };
    let classifier = Classifier::new(Patterns::compile(&config).unwrap());
    let sample = PaneSample::from_capture("Compiling foo\n>");
    assert_eq!(
        classifier.classify(&settled(), &sample).rule,
        "busy-marker"
    );
}
