// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple         = { "fix the login bug",                           "fix-login-bug" },
    punctuation    = { "Fix: the login-page bug!",                    "fix-loginpage-bug" },
    four_keywords  = { "add retry logic to uploader and the parser",  "add-retry-logic-uploader" },
    politeness     = { "please make it faster",                       "faster" },
    digits         = { "upgrade tokio to 1 40",                       "upgrade-tokio-1-40" },
)]
fn fast_label_keywords(prompt: &str, expected: &str) {
    assert_eq!(fast_label(prompt, 0), expected);
}

#[test]
fn fast_label_falls_back_to_timestamp() {
    assert_eq!(fast_label("", 35), "task-z");
    assert_eq!(fast_label("the and of", 36), "task-10");
}

#[yare::parameterized(
    clean          = { "fix-login-bug",            Some("fix-login-bug") },
    spaces         = { "Fix Login Bug",            Some("fix-login-bug") },
    quoted         = { "\"refactor-parser\"\n",    Some("refactor-parser") },
    dashes         = { "--add--tests--",           Some("add-tests") },
    too_short      = { "ab",                       None },
    empty          = { "!!!",                      None },
)]
fn sanitize(raw: &str, expected: Option<&str>) {
    assert_eq!(sanitize_label(raw).as_deref(), expected);
}

#[test]
fn sanitize_rejects_long_output() {
    let long = "word ".repeat(20);
    assert_eq!(sanitize_label(&long), None);
}

#[test]
fn session_name_replaces_unsafe_characters() {
    assert_eq!(session_name_for("agent-", "fix.login bug"), "agent-fix-login-bug");
}

#[test]
fn time_token_is_last_four_base36_digits() {
    // 36^4 + 1 = "10001" in base36
    assert_eq!(time_token(1_679_617), "0001");
    assert_eq!(time_token(35), "z");
}
