// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: tmux, the process table, notification
//! channels, and the label summarizer.

mod env;
pub mod label;
pub mod notify;
pub mod process;
pub mod session;
pub mod subprocess;
pub mod traced;

pub use label::{ClaudeLabelAdapter, LabelAdapter, LabelError};
pub use notify::{
    DesktopNotifyAdapter, NotifyAdapter, NotifyChannels, NotifyError, TelegramConfig,
    TelegramNotifyAdapter,
};
pub use process::{
    extract_process_name, AgentMatcher, ProcessAdapter, ProcessError, ProcessTree, PsAdapter,
};
pub use session::{SessionAdapter, SessionError, TmuxAdapter};
pub use traced::TracedSession;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use label::{FakeLabelAdapter, LabelCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSession, FakeSessionAdapter, ListingHold, SessionCall};
