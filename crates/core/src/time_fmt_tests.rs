// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::format_duration;

#[yare::parameterized(
    zero           = { 0,     "0s" },
    max_seconds    = { 59,    "59s" },
    one_minute     = { 60,    "1m 0s" },
    minutes        = { 192,   "3m 12s" },
    one_hour       = { 3600,  "1h 00m" },
    hour_minutes   = { 7500,  "2h 05m" },
)]
fn duration(secs: u64, expected: &str) {
    assert_eq!(format_duration(secs), expected);
}
