// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_tmux_format_line() {
    let s = SessionSnapshot::parse_tmux_line("agent-fix-bug|1700000100|1700000000").unwrap();
    assert_eq!(s.name, "agent-fix-bug");
    assert_eq!(s.activity_ms, 1_700_000_100_000);
    assert_eq!(s.created_ms, 1_700_000_000_000);
}

#[test]
fn name_may_contain_pipes() {
    let s = SessionSnapshot::parse_tmux_line("odd|name|5|6").unwrap();
    assert_eq!(s.name, "odd|name");
}

#[yare::parameterized(
    empty          = { "" },
    missing_fields = { "name|5" },
    bad_number     = { "name|x|6" },
    no_name        = { "|5|6" },
)]
fn rejects_malformed_lines(line: &str) {
    assert!(SessionSnapshot::parse_tmux_line(line).is_none());
}
