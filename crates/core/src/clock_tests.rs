// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_shared_state() {
    let clock = FakeClock::at(10_000);
    let other = clock.clone();
    clock.advance(Duration::from_secs(15));
    assert_eq!(other.epoch_ms(), 25_000);
}

#[test]
fn since_saturates_for_future_timestamps() {
    let clock = FakeClock::at(10_000);
    assert_eq!(clock.since_ms(4_000), 6_000);
    assert_eq!(clock.since_ms(20_000), 0);
}

#[test]
fn system_clock_is_after_2020() {
    assert!(SystemClock.epoch_ms() > 1_577_836_800_000);
}
