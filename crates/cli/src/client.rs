// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::daemon_process::{
    cleanup_stale_socket, daemon_dir, daemon_socket, probe_socket, read_startup_error,
    start_daemon_background, wrap_with_startup_error,
};

use av_daemon::protocol::{self, ProtocolError};
use av_daemon::{AgentSummary, Request, Response};
use thiserror::Error;
use tokio::net::unix::OwnedReadHalf;
use tokio::net::UnixStream;

/// Timeout for IPC requests
pub fn timeout_ipc() -> Duration {
    crate::env::timeout_ipc_ms().unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    crate::env::timeout_connect_ms().unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    crate::env::timeout_exit_ms().unwrap_or(Duration::from_secs(2))
}

/// Polling interval for connection retries
pub fn poll_interval() -> Duration {
    crate::env::connect_poll_ms().unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// How a `send` was carried out by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Respawned,
}

/// Captured pane output for `peek`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneOutput {
    pub output: String,
    pub raw: String,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// For action commands: start the daemon when it is not running.
    pub fn for_action() -> Result<Self, ClientError> {
        Self::connect_or_start()
    }

    /// Connect to daemon, auto-starting if not running
    pub fn connect_or_start() -> Result<Self, ClientError> {
        match Self::connect() {
            Ok(client) => {
                // A crashed daemon leaves its socket file behind
                if probe_socket(&client.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket()?;
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(timeout_connect(), child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    /// Connect to existing daemon (no auto-start)
    pub fn connect() -> Result<Self, ClientError> {
        let socket_path = daemon_socket()?;

        if !socket_path.exists() {
            let err = ClientError::DaemonNotRunning;
            log_connection_error(&err);
            return Err(err);
        }

        Ok(Self { socket_path })
    }

    #[cfg(test)]
    pub(crate) fn at(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    fn connect_with_retry(
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Ok(Some(status)) = child.try_wait() {
                // Exited early: the log may lag the exit slightly
                let poll_start = Instant::now();
                while poll_start.elapsed() < timeout_exit() {
                    if let Some(err) = read_startup_error() {
                        return Err(ClientError::DaemonStartFailed(err));
                    }
                    std::thread::sleep(poll_interval());
                }
                return Err(ClientError::DaemonStartFailed(format!(
                    "exited with {}",
                    status
                )));
            }

            match Self::connect() {
                Ok(client) if probe_socket(&client.socket_path) => return Ok(client),
                Ok(_) | Err(ClientError::DaemonNotRunning) => {
                    std::thread::sleep(poll_interval());
                }
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }

        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: &Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_request(&mut writer, request, write_timeout).await?;
        Ok(protocol::read_response(&mut reader, read_timeout).await?)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        match self
            .send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                log_connection_error(&e);
                Err(e)
            }
        }
    }

    /// Health check
    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Get daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello {
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Run a discovery pass and return the aggregated agent list
    pub async fn list_agents(&self) -> Result<Vec<AgentSummary>, ClientError> {
        match self.send(&Request::ListAgents).await? {
            Response::Agents { agents } => Ok(agents),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Start a new agent session, returning its name
    pub async fn spawn(&self, project_path: &str, prompt: &str) -> Result<String, ClientError> {
        let request = Request::Spawn {
            project_path: project_path.to_string(),
            prompt: prompt.to_string(),
        };
        // Spawning waits on the agent's startup screen
        let read_timeout = timeout_ipc().max(Duration::from_secs(10));
        match self
            .send_with_timeout(&request, read_timeout, timeout_ipc())
            .await?
        {
            Response::Spawned { name } => Ok(name),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Deliver a message or a named key to an agent
    pub async fn send_input(
        &self,
        name: &str,
        message: Option<&str>,
        key: Option<&str>,
    ) -> Result<Delivery, ClientError> {
        let request = Request::Send {
            name: name.to_string(),
            message: message.map(String::from),
            key: key.map(String::from),
        };
        match self.send(&request).await? {
            Response::Sent => Ok(Delivery::Sent),
            Response::Respawned => Ok(Delivery::Respawned),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    pub async fn kill(&self, name: &str) -> Result<(), ClientError> {
        let request = Request::Kill {
            name: name.to_string(),
        };
        match self.send(&request).await? {
            Response::Killed => Ok(()),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Delete one completed record
    pub async fn cleanup(&self, name: &str) -> Result<usize, ClientError> {
        let request = Request::Cleanup {
            name: name.to_string(),
        };
        self.send_counted(&request).await
    }

    /// Delete every completed record
    pub async fn cleanup_completed(&self) -> Result<usize, ClientError> {
        self.send_counted(&Request::CleanupCompleted).await
    }

    /// Kill every idle agent and delete its record
    pub async fn kill_idle(&self) -> Result<usize, ClientError> {
        self.send_counted(&Request::KillIdle).await
    }

    pub async fn output(&self, name: &str) -> Result<PaneOutput, ClientError> {
        let request = Request::Output {
            name: name.to_string(),
        };
        match self.send(&request).await? {
            Response::Output { output, raw } => Ok(PaneOutput { output, raw }),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    pub async fn recent_projects(&self) -> Result<Vec<PathBuf>, ClientError> {
        match self.send(&Request::RecentProjects).await? {
            Response::Projects { paths } => Ok(paths),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Send a test notification through the configured channels
    pub async fn notify_test(&self) -> Result<(), ClientError> {
        match self.send(&Request::NotifyTest).await? {
            Response::Ok => Ok(()),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Err(rejected_or_unexpected(other)),
        }
    }

    /// Open a push subscription; every poll pass arrives as one frame.
    pub async fn subscribe(&self) -> Result<AgentStream, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (reader, mut writer) = stream.into_split();
        protocol::write_request(&mut writer, &Request::Subscribe, timeout_ipc()).await?;
        Ok(AgentStream { reader })
    }

    async fn send_counted(&self, request: &Request) -> Result<usize, ClientError> {
        match self.send(request).await? {
            Response::Cleaned { count } => Ok(count),
            other => Err(rejected_or_unexpected(other)),
        }
    }
}

/// Receiving half of a `Subscribe` connection
pub struct AgentStream {
    reader: OwnedReadHalf,
}

impl AgentStream {
    /// Wait for the next published agent list.
    ///
    /// Returns `Ok(None)` once the daemon closes the stream.
    pub async fn next(&mut self) -> Result<Option<Vec<AgentSummary>>, ClientError> {
        let bytes = match protocol::read_message(&mut self.reader).await {
            Ok(bytes) => bytes,
            Err(ProtocolError::ConnectionClosed) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match protocol::decode(&bytes)? {
            Response::Agents { agents } => Ok(Some(agents)),
            other => Err(rejected_or_unexpected(other)),
        }
    }
}

fn rejected_or_unexpected(response: Response) -> ClientError {
    match response {
        Response::Error { message } => ClientError::Rejected(message),
        _ => ClientError::UnexpectedResponse,
    }
}

/// Append a connection failure to `<state_dir>/cli.log` for later diagnosis.
pub fn log_connection_error(error: &ClientError) {
    let socket_path = daemon_socket()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    write_cli_log(format!("socket={} error={}", socket_path, error));
}

fn write_cli_log(message: String) {
    use std::io::Write;
    use std::time::SystemTime;

    let Ok(dir) = daemon_dir() else {
        return;
    };
    let log_path = dir.join("cli.log");

    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let pid = std::process::id();
        let _ = writeln!(file, "{} pid={} {}", timestamp, pid, message);
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
