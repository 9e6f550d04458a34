// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builtin_patterns_compile() {
    assert!(Patterns::compile(&PatternConfig::default()).is_ok());
}

#[yare::parameterized(
    bypass    = { "⏵⏵ bypass permissions on (shift+tab to cycle)" },
    cycle     = { "shift-tab to cycle" },
    hide      = { "ctrl+t to hide todos" },
    rule      = { "────────────" },
    heavy     = { "━━━━" },
    empty_glyph = { "❯ " },
)]
fn chrome_lines(line: &str) {
    assert!(Patterns::default().is_chrome(line));
}

#[yare::parameterized(
    angle       = { ">" },
    dollar      = { "$ " },
    glyph_input = { "❯ fix the tests" },
    completed   = { "The migration has completed." },
    anything    = { "Is there anything else?" },
    help        = { "How can I help you today?" },
)]
fn idle_prompt_lines(line: &str) {
    assert!(Patterns::default().is_idle_prompt(line));
}

#[yare::parameterized(
    plain_output = { "Compiling crate v0.1.0" },
    angle_text   = { "> quoted text" },
)]
fn not_idle_prompt(line: &str) {
    assert!(!Patterns::default().is_idle_prompt(line));
}

#[yare::parameterized(
    yes_no     = { "Do you want to proceed? (y/n)" },
    allow      = { "1. Allow once" },
    approve    = { "Approve this plan?" },
    select     = { "Select an option:" },
    upper_case = { "SHALL I PROCEED" },
)]
fn awaiting_input_text(text: &str) {
    assert!(Patterns::default().is_awaiting_input(text));
}

#[test]
fn trust_dialog_needs_both_options() {
    let p = Patterns::default();
    assert!(p.is_trust_dialog("1. No, exit\n2. Yes, I accept\nEnter to confirm"));
    assert!(p.is_trust_dialog("Exit and fix manually\nContinue without these settings"));
    assert!(!p.is_trust_dialog("1. No, exit"));
}

#[test]
fn busy_marker_is_case_insensitive() {
    assert!(Patterns::default().is_busy("✻ Thinking… (ESC to interrupt)"));
}

#[test]
fn invalid_pattern_names_its_field() {
    let config = PatternConfig {
        chrome: vec!["(unclosed".to_string()],
        ..PatternConfig::default()
    };
    let err = Patterns::compile(&config).unwrap_err();
    assert!(err.to_string().contains("chrome"), "{err}");
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config: PatternConfig = toml::from_str(r#"busy = ["working\\.\\.\\."]"#).unwrap();
    assert_eq!(config.busy, vec![r"working\.\.\.".to_string()]);
    assert_eq!(config.chrome, PatternConfig::default().chrome);

    let p = Patterns::compile(&config).unwrap();
    assert!(p.is_busy("working..."));
    assert!(!p.is_busy("esc to interrupt"));
}
