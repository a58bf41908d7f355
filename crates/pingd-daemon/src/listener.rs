// SPDX-License-Identifier: MIT

//! Control Listener: accepts controller connections on the local socket and
//! turns LF-terminated command lines into Registry mutations.
//!
//! A shared context is handed by `Arc` to every spawned per-connection task;
//! malformed input and registry-level rejections are two distinct response
//! paths (see [`dispatch`]).

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pingd_core::{AddOutcome, MarkDefunctOutcome, RemoveOutcome};
use pingd_wire::{Command, Response};
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::framing::{Line, LineReader};
use crate::notifier::Notifier;
use crate::state::SharedState;

/// Context shared by every connection task and the accept loop.
pub struct ListenCtx {
    pub state: Arc<Mutex<SharedState>>,
    pub notifier: Arc<Notifier>,
    /// Notified once, when a controller sends `!SHUTDOWN!`.
    pub shutdown: Arc<Notify>,
    /// Set before `shutdown` is notified, so the accept loop (which sees
    /// the notification asynchronously) can tell a requested shutdown apart
    /// from an aborted task.
    pub shutting_down: Arc<AtomicBool>,
}

/// Accept connections until the task is aborted (on daemon shutdown).
pub async fn run(listener: UnixListener, ctx: Arc<ListenCtx>) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                info!("new controller connection");
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, &ctx).await {
                        debug!(error = %e, "controller connection ended with an I/O error");
                    }
                });
            }
            Err(e) => warn!(error = %e, "accept failed"),
        }
    }
}

/// Drive one controller connection: read commands, write responses, and
/// forward any NOPING broadcasts concurrently until the connection closes.
pub(crate) async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> io::Result<()> {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = LineReader::new(reader);
    let subscription = ctx.notifier.subscribe();
    let mut notifications = subscription.receiver;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line {
                    Line::Ok(text) => {
                        let response = dispatch(&text, ctx).await;
                        let should_disconnect = matches!(response, Response::Disconnecting);
                        let should_shutdown = matches!(response, Response::ShuttingDown);
                        write_response(&mut writer, &response).await?;

                        if should_shutdown {
                            ctx.shutting_down.store(true, Ordering::SeqCst);
                            ctx.shutdown.notify_one();
                            break;
                        }
                        if should_disconnect {
                            break;
                        }
                    }
                    Line::Overlong(text) => {
                        write_response(&mut writer, &Response::Error(text)).await?;
                    }
                }
            }
            message = notifications.recv() => {
                match message {
                    Some(message) => {
                        writer.write_all(message.as_bytes()).await?;
                        writer.flush().await?;
                    }
                    None => break,
                }
            }
        }
    }

    ctx.notifier.unsubscribe(subscription.id);
    Ok(())
}

async fn write_response<W: tokio::io::AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
) -> io::Result<()> {
    writer.write_all(response.to_line().as_bytes()).await?;
    writer.flush().await
}

async fn dispatch(line: &str, ctx: &ListenCtx) -> Response {
    match Command::parse(line) {
        Ok(Command::Add { id, name }) => {
            let mut state = ctx.state.lock().await;
            let SharedState { registry, buckets } = &mut *state;
            match registry.add(id, name.clone(), buckets) {
                AddOutcome::Ok => {
                    info!(host_id = id.get(), %name, "added host");
                    Response::Ok
                }
                AddOutcome::DuplicateId => Response::ErrorDuplicateId,
                AddOutcome::DuplicateRequest => Response::ErrorDuplicateRequest,
                AddOutcome::ProbeAddFailure => {
                    warn!(host_id = id.get(), %name, "probe library refused to add host");
                    Response::Failed
                }
            }
        }
        Ok(Command::Remove { id }) => {
            let mut state = ctx.state.lock().await;
            let SharedState { registry, buckets } = &mut *state;
            match registry.remove(id, buckets) {
                RemoveOutcome::Ok => {
                    info!(host_id = id.get(), "removed host");
                    Response::Ok
                }
                RemoveOutcome::NoSuchServer => Response::ErrorNoServer,
            }
        }
        Ok(Command::MarkDefunct { id }) => {
            let mut state = ctx.state.lock().await;
            let SharedState { registry, buckets } = &mut *state;
            match registry.mark_defunct(id, buckets) {
                MarkDefunctOutcome::Ok => {
                    info!(host_id = id.get(), "marked defunct by controller request");
                    Response::Ok
                }
                MarkDefunctOutcome::NoSuchServer => Response::ErrorNoServer,
                MarkDefunctOutcome::AlreadyDefunct => Response::ErrorAlreadyDefunct,
                MarkDefunctOutcome::ProbeAddFailure => {
                    warn!(host_id = id.get(), "probe library refused to adopt defunct host");
                    Response::Failed
                }
            }
        }
        Ok(Command::Disconnect) => Response::Disconnecting,
        Ok(Command::Shutdown) => Response::ShuttingDown,
        Err(_) => Response::Error(line.to_string()),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
