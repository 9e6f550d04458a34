// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// Resolve state directory: AV_STATE_DIR > XDG_STATE_HOME/av > ~/.local/state/av
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("AV_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("av"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/av"))
}

/// Config file override
pub fn config_path() -> Option<PathBuf> {
    std::env::var("AV_CONFIG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Interval between poll passes (default: 3000ms)
pub fn poll_interval() -> Duration {
    parse_duration_ms("AV_POLL_MS").unwrap_or(Duration::from_secs(3))
}

/// How long a new session may take to show its input prompt (default: 30000ms)
pub fn ready_timeout() -> Duration {
    parse_duration_ms("AV_READY_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
