// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `av daemon` - Daemon management commands

use std::process::Command;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::{timeout_exit, ClientError, DaemonClient};
use crate::daemon_process::{
    find_avd_binary, process_exists, read_daemon_pid, terminate_daemon, wait_for_exit,
};
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (background unless --foreground)
    Start {
        /// Run in foreground (useful for debugging)
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

pub async fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start { foreground } => start(foreground).await,
        DaemonCommand::Stop => stop(format).await,
        DaemonCommand::Status => status(format).await,
    }
}

async fn start(foreground: bool) -> Result<()> {
    if foreground {
        let status = Command::new(find_avd_binary()).status()?;
        if !status.success() {
            return Err(anyhow!("Daemon exited with status: {}", status));
        }
        return Ok(());
    }

    if let Ok(client) = DaemonClient::connect() {
        if client.ping().await.is_ok() {
            println!("Daemon already running");
            return Ok(());
        }
    }

    DaemonClient::connect_or_start()?;
    println!("Daemon started");
    Ok(())
}

async fn stop(format: OutputFormat) -> Result<()> {
    let stopped = stop_daemon().await?;
    match format {
        OutputFormat::Text if stopped => println!("Daemon stopped"),
        OutputFormat::Text => println!("Daemon not running"),
        OutputFormat::Json => print_json(&serde_json::json!({ "stopped": stopped }))?,
    }
    Ok(())
}

/// Ask the daemon to shut down and wait for the process to go away.
///
/// Returns false when no daemon was running.
async fn stop_daemon() -> Result<bool> {
    let pid = read_daemon_pid()?;
    let client = match DaemonClient::connect() {
        Ok(client) => client,
        Err(ClientError::DaemonNotRunning) => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = client.shutdown().await {
        // Socket left behind by a daemon that is already gone
        if !pid.is_some_and(process_exists) {
            return Ok(false);
        }
        if let Some(pid) = pid {
            terminate_daemon(pid);
        }
        eprintln!("warn: shutdown request failed ({}), sent SIGTERM", e);
    }

    if let Some(pid) = pid {
        if !wait_for_exit(pid, timeout_exit()).await {
            return Err(anyhow!("daemon (pid {}) did not exit", pid));
        }
    }
    Ok(true)
}

async fn status(format: OutputFormat) -> Result<()> {
    let report = match DaemonClient::connect() {
        Ok(client) => match client.hello().await {
            Ok(version) => Some((version, client.list_agents().await?.len())),
            Err(ClientError::Io(ref e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
                ) =>
            {
                None
            }
            Err(e) => return Err(e.into()),
        },
        Err(ClientError::DaemonNotRunning) => None,
        Err(e) => return Err(e.into()),
    };
    let pid = read_daemon_pid().ok().flatten();

    match (format, report) {
        (OutputFormat::Text, Some((version, agents))) => {
            println!("{}", format_status(&version, pid, agents));
        }
        (OutputFormat::Text, None) => println!("Daemon not running"),
        (OutputFormat::Json, Some((version, agents))) => print_json(&serde_json::json!({
            "status": "running",
            "version": version,
            "pid": pid,
            "agents": agents,
        }))?,
        (OutputFormat::Json, None) => print_json(&serde_json::json!({ "status": "not_running" }))?,
    }
    Ok(())
}

fn format_status(version: &str, pid: Option<u32>, agents: usize) -> String {
    let pid = pid.map(|p| format!(", pid {}", p)).unwrap_or_default();
    format!("avd {} running{}, {} agent(s)", version, pid, agents)
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
