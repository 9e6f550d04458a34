// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! av-core: Domain types for the agent viewer

pub mod agent;
pub mod agent_record;
pub mod ansi;
pub mod clock;
pub mod id;
pub mod label;
pub mod session;
pub mod time_fmt;

pub use agent::{AgentName, AgentState, SessionKey};
pub use agent_record::{AgentRecord, Transition};
pub use ansi::normalize;
pub use clock::{Clock, FakeClock, SystemClock};
pub use label::{fast_label, sanitize_label, session_name_for, time_token};
pub use session::SessionSnapshot;
pub use time_fmt::format_duration;
