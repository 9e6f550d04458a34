// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent commands: list, spawn, send, kill, cleanup, peek, watch.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use av_core::AgentState;
use av_daemon::AgentSummary;

use crate::client::{DaemonClient, Delivery};
use crate::output::{format_age, now_ms, print_json, write_peek_frame, OutputFormat};
use crate::table::{Column, Table};

/// ANSI sequence: move cursor to top-left without clearing scrollback.
const CURSOR_HOME: &str = "\x1B[H";

/// ANSI sequence: clear from cursor position to end of screen.
const CLEAR_TO_END: &str = "\x1B[J";

const PROMPT_COLUMN_WIDTH: usize = 48;

pub async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let agents = client.list_agents().await?;
    match format {
        OutputFormat::Text => print!("{}", format_agents(&agents, now_ms(), false)),
        OutputFormat::Json => print_json(&agents)?,
    }
    Ok(())
}

pub async fn spawn(
    client: &DaemonClient,
    project_path: &str,
    prompt: &str,
    format: OutputFormat,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let project_path = absolute_project_path(project_path, &cwd);
    let name = client.spawn(&project_path, prompt).await?;
    match format {
        OutputFormat::Text => println!("Spawned {}", name),
        OutputFormat::Json => print_json(&serde_json::json!({ "name": name }))?,
    }
    Ok(())
}

pub async fn send(
    client: &DaemonClient,
    name: &str,
    message: Option<&str>,
    key: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if message.is_none() && key.is_none() {
        bail!("nothing to send: pass a message or --key");
    }
    let delivery = client.send_input(name, message, key).await?;
    match format {
        OutputFormat::Text => match delivery {
            Delivery::Sent => println!("Sent to {}", name),
            Delivery::Respawned => println!("{} had completed; respawned with the message", name),
        },
        OutputFormat::Json => {
            let outcome = match delivery {
                Delivery::Sent => "sent",
                Delivery::Respawned => "respawned",
            };
            print_json(&serde_json::json!({ "name": name, "outcome": outcome }))?
        }
    }
    Ok(())
}

pub async fn kill(client: &DaemonClient, name: &str, format: OutputFormat) -> Result<()> {
    client.kill(name).await?;
    match format {
        OutputFormat::Text => println!("Killed {}", name),
        OutputFormat::Json => print_json(&serde_json::json!({ "name": name }))?,
    }
    Ok(())
}

pub async fn cleanup(
    client: &DaemonClient,
    name: Option<&str>,
    completed: bool,
    format: OutputFormat,
) -> Result<()> {
    let count = match (name, completed) {
        (Some(name), false) => client.cleanup(name).await?,
        (None, true) => client.cleanup_completed().await?,
        _ => bail!("specify an agent name or --completed"),
    };
    print_count(count, "record(s) removed", format)
}

pub async fn kill_idle(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let count = client.kill_idle().await?;
    print_count(count, "idle agent(s) killed", format)
}

pub async fn peek(
    client: &DaemonClient,
    name: &str,
    raw: bool,
    format: OutputFormat,
) -> Result<()> {
    let pane = client.output(name).await?;
    match format {
        OutputFormat::Text => {
            let body = if raw { &pane.raw } else { &pane.output };
            write_peek_frame(&mut std::io::stdout(), name, body)?;
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "name": name,
            "output": pane.output,
            "raw": pane.raw,
        }))?,
    }
    Ok(())
}

pub async fn projects(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let paths = client.recent_projects().await?;
    match format {
        OutputFormat::Text => {
            if paths.is_empty() {
                println!("No projects yet");
            }
            for path in &paths {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => print_json(&paths)?,
    }
    Ok(())
}

pub async fn notify_test(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    client.notify_test().await?;
    match format {
        OutputFormat::Text => println!("Test notification sent"),
        OutputFormat::Json => print_json(&serde_json::json!({ "sent": true }))?,
    }
    Ok(())
}

/// Redraw the agent list after every daemon poll until interrupted.
pub async fn watch(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let mut stream = client.subscribe().await?;
    let is_tty = std::io::stdout().is_terminal();
    let mut stdout = std::io::stdout();

    while let Some(agents) = stream.next().await? {
        let frame = match format {
            OutputFormat::Text => render_frame(&format_agents(&agents, now_ms(), true), is_tty),
            // One JSON document per line so the stream can be piped
            OutputFormat::Json => format!("{}\n", serde_json::to_string(&agents)?),
        };
        write!(stdout, "{}", frame)?;
        stdout.flush()?;
    }

    eprintln!("daemon closed the stream");
    Ok(())
}

fn print_count(count: usize, what: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{} {}", count, what),
        OutputFormat::Json => print_json(&serde_json::json!({ "count": count }))?,
    }
    Ok(())
}

/// Build one watch-mode frame.
///
/// On a terminal the frame redraws in place; piped output gets the content
/// as-is.
fn render_frame(content: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{CURSOR_HOME}{content}{CLEAR_TO_END}")
    } else {
        content.to_string()
    }
}

/// Render the agent table, or a placeholder when there are none.
///
/// With `activity` set, each non-completed agent is followed by its last
/// meaningful pane lines.
pub(crate) fn format_agents(agents: &[AgentSummary], now: u64, activity: bool) -> String {
    if agents.is_empty() {
        return "No agents\n".to_string();
    }

    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::state("STATE"),
        Column::right("FOR"),
        Column::muted("PROJECT"),
        Column::left("PROMPT").with_max(PROMPT_COLUMN_WIDTH),
    ]);
    for agent in agents {
        table.row(agent_row(agent, now));
    }

    let mut buf = Vec::new();
    table.render(&mut buf);
    let mut out = String::from_utf8_lossy(&buf).into_owned();

    if activity {
        let colorize = crate::color::should_colorize();
        for agent in agents.iter().filter(|a| !a.last_activity.is_empty()) {
            out.push('\n');
            out.push_str(&activity_block(agent, colorize));
        }
    }
    out
}

/// Label heading plus indented recent pane lines.
///
/// Pane colors pass through on a color terminal and are stripped otherwise.
fn activity_block(agent: &AgentSummary, colorize: bool) -> String {
    let mut out = String::new();
    if colorize {
        out.push_str(&crate::color::apply_header(&agent.label));
    } else {
        out.push_str(&agent.label);
    }
    out.push('\n');
    for line in agent.last_activity.lines() {
        out.push_str("  ");
        if colorize {
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(&av_core::normalize(line));
        }
        out.push('\n');
    }
    out
}

fn agent_row(agent: &AgentSummary, now: u64) -> Vec<String> {
    let state = if agent.discovered {
        format!("{} (discovered)", agent.state)
    } else {
        agent.state.to_string()
    };
    vec![
        agent.name.clone(),
        state,
        format_age(state_since(agent), now),
        agent.project_path.display().to_string(),
        first_line(&agent.prompt).to_string(),
    ]
}

/// When the agent entered its current state
fn state_since(agent: &AgentSummary) -> u64 {
    match agent.state {
        AgentState::Idle => agent.idle_since.unwrap_or(agent.created_at),
        AgentState::Completed => agent.completed_at.unwrap_or(agent.created_at),
        AgentState::Running | AgentState::Unknown => agent.created_at,
    }
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

/// The daemon resolves paths against its own working directory, so relative
/// paths are anchored here. `~` is left for the daemon to expand.
pub(crate) fn absolute_project_path(raw: &str, cwd: &Path) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('~') || Path::new(trimmed).is_absolute() {
        return trimmed.to_string();
    }
    let joined: PathBuf = cwd.join(trimmed);
    joined.display().to_string()
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
