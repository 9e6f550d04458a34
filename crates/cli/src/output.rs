// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write a peek frame with box-drawing characters around pane output.
pub fn write_peek_frame(out: &mut impl Write, name: &str, output: &str) -> std::io::Result<()> {
    writeln!(
        out,
        "╭────── {} ──────",
        crate::color::header(&format!("peek: {}", name))
    )?;
    write!(out, "{}", output)?;
    if !output.is_empty() && !output.ends_with('\n') {
        writeln!(out)?;
    }
    writeln!(out, "╰────── {} ──────", crate::color::header("end peek"))
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Format the time between two epoch-ms stamps (e.g. "5s", "3m 12s")
pub fn format_age(since_ms: u64, now_ms: u64) -> String {
    if since_ms == 0 {
        return "-".to_string();
    }
    av_core::format_duration(now_ms.saturating_sub(since_ms) / 1000)
}
