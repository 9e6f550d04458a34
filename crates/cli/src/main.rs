// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! av - Agent Viewer CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod daemon_process;
mod env;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{agent, daemon};

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "av",
    version,
    about = "Agent Viewer - run and watch coding agents in tmux sessions"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List agents and their current state
    List,
    /// Start an agent in a new tmux session
    Spawn {
        /// Project directory the agent works in
        project_path: String,
        /// Initial prompt
        prompt: String,
    },
    /// Send a message or a key to an agent (respawns completed agents)
    Send {
        /// Agent session name
        name: String,
        /// Message to type into the session
        message: Option<String>,
        /// Named key to press instead of a message
        #[arg(long, value_parser = ["Up", "Down", "Enter", "Escape"])]
        key: Option<String>,
    },
    /// Kill an agent's session and mark it completed
    Kill {
        /// Agent session name
        name: String,
    },
    /// Remove completed agents from the registry
    Cleanup {
        /// Agent session name
        #[arg(conflicts_with = "completed")]
        name: Option<String>,
        /// Remove every completed agent
        #[arg(long)]
        completed: bool,
    },
    /// Kill every idle agent and remove it from the registry
    KillIdle,
    /// Show an agent's recent pane output
    Peek {
        /// Agent session name
        name: String,
        /// Keep terminal escape sequences
        #[arg(long)]
        raw: bool,
    },
    /// List recently used project directories
    Projects,
    /// Stream the agent list as the daemon polls (Ctrl+C to exit)
    Watch,
    /// Send a test notification through the configured channels
    NotifyTest,
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

pub(crate) fn cli_command() -> clap::Command {
    Cli::command().styles(color::styles())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// When the top-level message already contains every source message (common
/// with `#[error("... {0}")]` + `#[from]`), the chain is skipped.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let matches = cli_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let format = cli.output;

    let Some(command) = cli.command else {
        cli_command().print_help()?;
        println!();
        return Ok(());
    };

    // Daemon management connects on its own terms
    if let Commands::Daemon(args) = command {
        return daemon::daemon(args, format).await;
    }

    // Discovery lives in the daemon, so every agent command starts it on demand
    let client = DaemonClient::for_action()?;

    match command {
        Commands::List => agent::list(&client, format).await?,
        Commands::Spawn {
            project_path,
            prompt,
        } => agent::spawn(&client, &project_path, &prompt, format).await?,
        Commands::Send { name, message, key } => {
            agent::send(&client, &name, message.as_deref(), key.as_deref(), format).await?
        }
        Commands::Kill { name } => agent::kill(&client, &name, format).await?,
        Commands::Cleanup { name, completed } => {
            agent::cleanup(&client, name.as_deref(), completed, format).await?
        }
        Commands::KillIdle => agent::kill_idle(&client, format).await?,
        Commands::Peek { name, raw } => agent::peek(&client, &name, raw, format).await?,
        Commands::Projects => agent::projects(&client, format).await?,
        Commands::Watch => agent::watch(&client, format).await?,
        Commands::NotifyTest => agent::notify_test(&client, format).await?,
        Commands::Daemon(args) => daemon::daemon(args, format).await?,
    }

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
