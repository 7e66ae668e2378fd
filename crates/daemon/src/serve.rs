// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon main loop: serve the control socket until stopped or restarted.

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::lifecycle::{startup, Config, LifecycleError, StartupResult};
use crate::listener::{ListenCtx, Listener};

/// Why the daemon stopped serving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Signal or shutdown; the process should exit
    Stopped,
    /// A client asked for a restart; the caller should re-exec
    Restart,
}

/// Start the daemon and serve until a signal or a restart request.
///
/// Daemon files are removed and the lock released before this returns.
pub async fn serve(config: &Config) -> Result<Exit, LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let StartupResult { mut daemon, listener } = startup(config).await?;

    let ctx = Arc::new(ListenCtx::new(
        config.layout.clone(),
        daemon.start_time,
        config.ipc_timeout,
    ));
    let shutdown = Arc::clone(&ctx.shutdown);
    let listener_task = tokio::spawn(Listener::new(listener, Arc::clone(&ctx)).run());

    tokio::select! {
        _ = shutdown.notified() => {}
        _ = tokio::signal::ctrl_c() => info!("received interrupt"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }

    listener_task.abort();
    daemon.shutdown()?;
    drop(daemon);

    Ok(if ctx.restart_requested() { Exit::Restart } else { Exit::Stopped })
}

#[cfg(test)]
#[path = "serve_tests.rs"]
mod tests;
