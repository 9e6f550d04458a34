// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single tmux invocation (default: 5000ms).
pub fn tmux_timeout() -> Duration {
    parse_duration_ms("AV_TMUX_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for one summarizer invocation (default: 15000ms).
pub fn label_timeout() -> Duration {
    parse_duration_ms("AV_LABEL_TIMEOUT_MS").unwrap_or(Duration::from_secs(15))
}
