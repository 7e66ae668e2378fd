// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling control socket I/O.
//!
//! Each connection carries one request and one response. A `Restart`
//! request is answered first and only then signals the daemon to shut down
//! for re-exec, so the client always sees `Restarting`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use keel_core::{commit, Layout, BUILD_HASH, VERSION};
use keel_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

/// Shared daemon context for all request handlers.
pub(crate) struct ListenCtx {
    pub layout: Layout,
    pub start_time: Instant,
    pub ipc_timeout: Duration,
    pub shutdown: Arc<Notify>,
    restart_requested: AtomicBool,
}

impl ListenCtx {
    pub fn new(layout: Layout, start_time: Instant, ipc_timeout: Duration) -> Self {
        Self {
            layout,
            start_time,
            ipc_timeout,
            shutdown: Arc::new(Notify::new()),
            restart_requested: AtomicBool::new(false),
        }
    }

    pub fn restart_requested(&self) -> bool {
        self.restart_requested.load(Ordering::SeqCst)
    }
}

/// Listener task for accepting socket connections.
pub(crate) struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the listener loop, spawning a task for each connection.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("Unix accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// Generic over reader/writer types so tests can drive it over in-memory pipes.
pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let request = wire::read_request(&mut reader, ctx.ipc_timeout).await?;

    // Status is polled by the watcher; keep it out of the info log
    if matches!(request, Request::Status) {
        debug!(request = ?request, "received request");
    } else {
        info!(request = ?request, "received request");
    }

    let is_restart = matches!(request, Request::Restart);
    let response = handle_request(request, ctx);
    debug!("Sending response: {:?}", response);
    let written = wire::write_response(&mut writer, &response, ctx.ipc_timeout).await;

    // Restart even if the client went away before reading the answer
    if is_restart && matches!(response, Response::Restarting) {
        ctx.shutdown.notify_one();
    }
    written?;
    Ok(())
}

/// Handle a single request and return a response.
fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Status => {
            let active_commit = match commit::read(&ctx.layout) {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(error = %e, "could not read active commit");
                    None
                }
            };
            Response::Status {
                uptime_secs: ctx.start_time.elapsed().as_secs(),
                version: VERSION.to_string(),
                commit: BUILD_HASH.to_string(),
                active_commit,
            }
        }

        Request::Restart => {
            if ctx.restart_requested.swap(true, Ordering::SeqCst) {
                return Response::Error { message: "restart already in progress".to_string() };
            }
            info!("restart requested");
            Response::Restarting
        }
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
