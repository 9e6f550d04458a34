// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal output normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Escape sequences: CSI, BEL/ST-terminated OSC, charset designators, and
/// two-byte escapes. None of the alternatives may consume a newline.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\x1b\[[0-?]*[ -/]*[@-~]",
        r"|\x1b\][^\x07\x1b\n]*(?:\x07|\x1b\\)",
        r"|\x1b[()*+][A-Za-z0-9]",
        r"|\x1b[^\[\]()*+\n]",
    ))
    .expect("constant regex pattern is valid")
});

/// Control bytes other than tab and newline (includes ESC and DEL).
#[allow(clippy::expect_used)]
static CONTROL_BYTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").expect("constant regex pattern is valid")
});

/// Strip terminal control sequences from captured pane text.
///
/// Printable content and line structure are preserved. The output contains
/// no ESC byte, so `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let without_sequences = ESCAPE_SEQUENCE.replace_all(raw, "");
    CONTROL_BYTES
        .replace_all(&without_sequences, "")
        .into_owned()
}

/// Normalize and split into trimmed, non-blank lines.
pub fn content_lines(raw: &str) -> Vec<String> {
    normalize(raw)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "ansi_tests.rs"]
mod tests;
