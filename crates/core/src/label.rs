// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable agent labels and session names.

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "in", "on", "at", "to", "for", "of", "with", "and", "or", "but", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "can", "that", "this", "it", "its", "i", "me", "my", "we",
    "our", "you", "your", "they", "them", "their", "he", "him", "his", "she", "her", "from",
    "by", "as", "all", "so", "if", "then", "than", "too", "very", "just", "about", "up", "out",
    "into", "over", "please", "make",
];

/// Maximum number of keywords kept in a fast label.
const MAX_KEYWORDS: usize = 4;

/// Keyword label derived from a prompt without any external call.
///
/// Falls back to `task-<base36 ms>` when no keyword survives filtering.
pub fn fast_label(prompt: &str, now_ms: u64) -> String {
    let cleaned: String = prompt
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w))
        .take(MAX_KEYWORDS)
        .collect();

    if words.is_empty() {
        format!("task-{}", to_base36(now_ms))
    } else {
        words.join("-")
    }
}

/// Clean model output into a hyphenated label.
///
/// Returns `None` when the result is too short or too long to be useful.
pub fn sanitize_label(raw: &str) -> Option<String> {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
        .collect();

    let label = kept
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    (label.len() > 2 && label.len() < 60).then_some(label)
}

/// Session name for a label: `<prefix><label>` restricted to tmux-safe characters.
pub fn session_name_for(prefix: &str, label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '-',
        })
        .collect();
    format!("{}{}", prefix, safe)
}

/// Short disambiguation token: the last four base36 digits of `now_ms`.
pub fn time_token(now_ms: u64) -> String {
    let full = to_base36(now_ms);
    let start = full.len().saturating_sub(4);
    full[start..].to_string()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
