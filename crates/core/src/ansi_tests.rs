// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    plain          = { "hello world",                      "hello world" },
    sgr_color      = { "\x1b[31mred\x1b[0m text",          "red text" },
    private_mode   = { "\x1b[?25lhidden\x1b[?25h",         "hidden" },
    colon_truecolor = { "\x1b[38:2:255:0:0mred\x1b[0m",   "red" },
    colon_underline = { "\x1b[4:3mwavy\x1b[4:0m",         "wavy" },
    osc_title      = { "\x1b]0;my title\x07prompt",        "prompt" },
    osc_st         = { "\x1b]8;;http://x\x1b\\link",       "link" },
    charset        = { "\x1b(Bbox",                        "box" },
    keypad_mode    = { "\x1b=after",                       "after" },
    raw_controls   = { "a\x00b\x07c\x08d",                 "abcd" },
    carriage_ret   = { "line\r\nnext",                     "line\nnext" },
    tab_kept       = { "a\tb",                             "a\tb" },
    unicode_kept   = { "\x1b[1m❯\x1b[0m ─── ✻",            "❯ ─── ✻" },
    lone_escape    = { "end\x1b",                          "end" },
    newline_intact = { "one\x1b\ntwo",                     "one\ntwo" },
)]
fn strips_sequences(raw: &str, expected: &str) {
    assert_eq!(normalize(raw), expected);
}

#[yare::parameterized(
    nested_escape = { "\x1b\x1b[31mx" },
    mixed         = { "\x1b[2J\x1b[H\x1b]2;t\x07> \x1b[7m \x1b[27m\r\n" },
    broken_osc    = { "\x1b]unterminated\nnext line" },
    garbage       = { "\x1b[\x1b]\x1b(\x1b" },
)]
fn normalize_is_idempotent(raw: &str) {
    let once = normalize(raw);
    assert_eq!(normalize(&once), once);
    assert!(!once.contains('\x1b'));
}

#[test]
fn line_count_is_preserved() {
    let raw = "\x1b[32mone\x1b[0m\n\ntwo\n\x1b[1mthree\x1b[0m";
    assert_eq!(normalize(raw).lines().count(), raw.lines().count());
}

#[test]
fn content_lines_drops_blank_lines() {
    let lines = content_lines("  first  \n\n\x1b[0m   \nsecond\n");
    assert_eq!(lines, vec!["first", "second"]);
}
