// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatch onto the runtime

use av_adapters::{LabelAdapter, NotifyAdapter, ProcessAdapter, SessionAdapter};
use av_core::Clock;
use av_engine::{RuntimeError, SendOutcome, SendPayload};
use tokio::sync::Notify;

use crate::poll::Poller;
use crate::protocol::{Request, Response, PROTOCOL_VERSION};

/// Handle a single request and return a response.
///
/// Failures become `Response::Error`; nothing here closes the connection.
pub(crate) async fn handle_request<S, P, N, L, C>(
    request: Request,
    poller: &Poller<S, P, N, L, C>,
    shutdown: &Notify,
) -> Response
where
    S: SessionAdapter,
    P: ProcessAdapter,
    N: NotifyAdapter,
    L: LabelAdapter,
    C: Clock,
{
    let runtime = poller.runtime();
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::ListAgents => Response::Agents {
            agents: poller.pass().await.as_ref().clone(),
        },

        Request::Spawn {
            project_path,
            prompt,
        } => match runtime.spawn(&project_path, &prompt).await {
            Ok(name) => Response::Spawned { name },
            Err(e) => Response::error(e),
        },

        Request::Send { name, message, key } => {
            let payload = match SendPayload::from_parts(message.as_deref(), key.as_deref()) {
                Ok(payload) => payload,
                Err(e) => return Response::error(e),
            };
            match runtime.send(&name, payload).await {
                Ok(SendOutcome::Sent) => Response::Sent,
                Ok(SendOutcome::Respawned) => Response::Respawned,
                Err(e) => Response::error(e),
            }
        }

        Request::Kill { name } => {
            if !runtime.kill(&name).await {
                tracing::debug!(session = %name, "kill of unregistered session");
            }
            Response::Killed
        }

        Request::Cleanup { name } => match runtime.cleanup(&name) {
            Ok(()) => Response::Cleaned { count: 1 },
            Err(e) => Response::error(e),
        },

        Request::CleanupCompleted => Response::Cleaned {
            count: runtime.cleanup_completed(),
        },

        Request::KillIdle => Response::Cleaned {
            count: runtime.kill_idle().await,
        },

        Request::Output { name } => {
            if runtime.get_record(&name).is_none() {
                return Response::error(RuntimeError::AgentNotFound(name));
            }
            let output = runtime.output(&name).await;
            Response::Output {
                output: output.output,
                raw: output.raw,
            }
        }

        Request::RecentProjects => Response::Projects {
            paths: runtime.recent_projects(),
        },

        Request::NotifyTest => match runtime.notify_test().await {
            Ok(()) => Response::Ok,
            Err(e) => Response::error(format!("notification failed: {}", e)),
        },

        Request::Subscribe => Response::error("subscribe must open its own connection"),

        Request::Shutdown => {
            shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
