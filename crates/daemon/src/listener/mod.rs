// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and handling
//! each in its own task. A `Subscribe` request keeps its connection open
//! and receives every published agent list until the client goes away.

mod requests;

use std::sync::Arc;

use av_adapters::{LabelAdapter, NotifyAdapter, ProcessAdapter, SessionAdapter};
use av_core::Clock;
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{watch, Notify};
use tracing::{debug, error, info, warn};

use crate::poll::{AgentList, Poller};
use crate::protocol::{self, ProtocolError, Request, Response, DEFAULT_TIMEOUT};

pub(crate) use requests::handle_request;

/// Listener task for accepting socket connections.
pub struct Listener<S, P, N, L, C: Clock> {
    socket: UnixListener,
    poller: Arc<Poller<S, P, N, L, C>>,
    shutdown: Arc<Notify>,
}

impl<S, P, N, L, C> Listener<S, P, N, L, C>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    pub fn new(
        socket: UnixListener,
        poller: Arc<Poller<S, P, N, L, C>>,
        shutdown: Arc<Notify>,
    ) -> Self {
        Self {
            socket,
            poller,
            shutdown,
        }
    }

    /// Run the listener loop, spawning tasks for each connection.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let poller = Arc::clone(&self.poller);
                    let shutdown = Arc::clone(&self.shutdown);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, poller, shutdown).await {
                            match e {
                                ProtocolError::ConnectionClosed => debug!("Client disconnected"),
                                ProtocolError::Timeout => warn!("Connection timeout"),
                                _ => error!("Connection error: {}", e),
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection<S, P, N, L, C>(
    stream: UnixStream,
    poller: Arc<Poller<S, P, N, L, C>>,
    shutdown: Arc<Notify>,
) -> Result<(), ProtocolError>
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;

    // Polling requests are frequent; keep them out of the info log
    if matches!(
        request,
        Request::Ping | Request::ListAgents | Request::Output { .. }
    ) {
        debug!(request = ?request, "received request");
    } else {
        info!(request = ?request, "received request");
    }

    if request == Request::Subscribe {
        return stream_agents(poller.subscribe(), &mut writer).await;
    }

    let response = handle_request(request, &poller, &shutdown).await;
    debug!("Sending response: {:?}", response);
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await
}

/// Push the current agent list, then every newly published one.
///
/// Ends quietly when the client disconnects or the poller goes away.
pub(crate) async fn stream_agents<W: AsyncWriteExt + Unpin>(
    mut updates: watch::Receiver<AgentList>,
    writer: &mut W,
) -> Result<(), ProtocolError> {
    loop {
        let agents = updates.borrow_and_update().as_ref().clone();
        let frame = Response::Agents { agents };
        match protocol::write_response(writer, &frame, DEFAULT_TIMEOUT).await {
            Ok(()) => {}
            Err(ProtocolError::Io(e)) => {
                debug!(error = %e, "subscriber disconnected");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        if updates.changed().await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
