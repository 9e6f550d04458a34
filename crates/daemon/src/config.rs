// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML configuration file.
//!
//! Every section and key is optional; a missing file is the same as an
//! empty one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use av_adapters::label::DEFAULT_LABEL_COMMAND;
use av_adapters::{
    extract_process_name, AgentMatcher, ClaudeLabelAdapter, DesktopNotifyAdapter, NotifyChannels,
    TelegramConfig, TelegramNotifyAdapter,
};
use av_engine::{
    PatternConfig, PatternError, Patterns, ReadinessConfig, RuntimeConfig, DEFAULT_AGENT_COMMAND,
    DEFAULT_SESSION_PREFIX,
};
use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("invalid agent process name '{name}': {reason}")]
    ProcessName { name: String, reason: String },
}

/// `[agent]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    /// Command started in every new session
    pub command: String,
    /// Executable looked for in session process trees; derived from
    /// `command` when unset
    pub process_name: Option<String>,
    pub session_prefix: String,
    /// One-shot summarizer used for smart labels
    pub label_command: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            command: DEFAULT_AGENT_COMMAND.to_string(),
            process_name: None,
            session_prefix: DEFAULT_SESSION_PREFIX.to_string(),
            label_command: DEFAULT_LABEL_COMMAND.to_string(),
        }
    }
}

/// `[notify]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotifySection {
    pub desktop: bool,
}

/// Parsed config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: AgentSection,
    pub patterns: PatternConfig,
    pub telegram: TelegramConfig,
    pub notify: NotifySection,
}

impl FileConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn process_name(&self) -> String {
        match self.agent.process_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => extract_process_name(&self.agent.command),
        }
    }

    /// Build the runtime configuration, compiling every pattern up front.
    pub fn runtime_config(&self, ready_timeout: Duration) -> Result<RuntimeConfig, ConfigError> {
        let name = self.process_name();
        let matcher = AgentMatcher::new(&name).map_err(|e| ConfigError::ProcessName {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        let mut config = RuntimeConfig::new(self.agent.command.clone(), matcher);
        config.session_prefix = self.agent.session_prefix.clone();
        config.patterns = Patterns::compile(&self.patterns)?;
        config.readiness = ReadinessConfig {
            timeout: ready_timeout,
            ..ReadinessConfig::default()
        };
        Ok(config)
    }

    pub fn notifier(&self) -> NotifyChannels {
        let channels =
            NotifyChannels::new().with_telegram(TelegramNotifyAdapter::new(self.telegram.clone()));
        if self.notify.desktop {
            channels.with_desktop(DesktopNotifyAdapter::new())
        } else {
            channels
        }
    }

    pub fn labeler(&self) -> ClaudeLabelAdapter {
        ClaudeLabelAdapter::new(self.agent.label_command.clone())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
