// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ps`-backed process adapter

use super::{ProcessAdapter, ProcessError, ProcessTree};
use crate::subprocess::{run_with_timeout, PS_TIMEOUT};
use async_trait::async_trait;
use tokio::process::Command;

#[derive(Clone, Copy, Debug, Default)]
pub struct PsAdapter;

impl PsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for PsAdapter {
    async fn build_tree(&self) -> Result<ProcessTree, ProcessError> {
        let mut cmd = Command::new("ps");
        cmd.args(["-ax", "-o", "pid=", "-o", "ppid=", "-o", "command="]);
        let output = run_with_timeout(cmd, PS_TIMEOUT, "ps")
            .await
            .map_err(ProcessError::ListFailed)?;
        if !output.status.success() {
            return Err(ProcessError::ListFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(ProcessTree::parse(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn is_alive(&self, pid: u32) -> bool {
        let mut cmd = Command::new("ps");
        cmd.args(["-p", &pid.to_string(), "-o", "pid="]);
        match run_with_timeout(cmd, PS_TIMEOUT, "ps -p").await {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::debug!(pid, error = %e, "liveness probe failed, assuming alive");
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "ps_tests.rs"]
mod tests;
