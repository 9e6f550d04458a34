// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Agent lifecycle engine: classification, readiness, notifications and
//! the orchestrator that drives agent sessions.

pub mod classifier;
mod dispatcher;
mod error;
mod non_agent_cache;
pub mod patterns;
pub mod readiness;
mod runtime;
mod summary;

pub use classifier::{Classifier, PaneSample, Verdict, Vitals};
pub use dispatcher::{compose, Dispatcher, Notification};
pub use error::RuntimeError;
pub use non_agent_cache::NonAgentCache;
pub use patterns::{PatternConfig, PatternError, Patterns};
pub use readiness::{assess_startup, await_ready, ReadinessConfig, StartupScreen};
pub use runtime::{
    Runtime, RuntimeConfig, RuntimeDeps, SendOutcome, SendPayload, DEFAULT_AGENT_COMMAND,
    DEFAULT_SESSION_PREFIX,
};
pub use summary::{last_activity, AgentOutput, AgentSummary};
