// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

fn peek_to_string(name: &str, output: &str) -> String {
    let mut buf = Vec::new();
    write_peek_frame(&mut buf, name, output).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
#[serial]
fn peek_frame_wraps_output() {
    std::env::set_var("NO_COLOR", "1");

    let framed = peek_to_string("agent-a", "line one\nline two\n");

    assert_eq!(
        framed,
        "╭────── peek: agent-a ──────\nline one\nline two\n╰────── end peek ──────\n"
    );
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn peek_frame_terminates_unfinished_line() {
    std::env::set_var("NO_COLOR", "1");

    let framed = peek_to_string("agent-a", "> ");

    assert!(framed.contains("\n> \n╰"), "{framed:?}");
    std::env::remove_var("NO_COLOR");
}

#[parameterized(
    never = { 0, 5_000, "-" },
    seconds = { 1_000, 46_000, "45s" },
    minutes = { 1_000, 193_000, "3m 12s" },
    hours = { 1_000, 7_501_000, "2h 05m" },
    clock_skew = { 9_000, 1_000, "0s" },
)]
fn age_formatting(since: u64, now: u64, expected: &str) {
    assert_eq!(format_age(since, now), expected);
}
