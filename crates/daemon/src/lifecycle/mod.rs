// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, re-exec.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use keel_core::{Layout, StoreError, UpgradeConfig};
use keel_upgrade::VersionState;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Version store the daemon runs out of
    pub layout: Layout,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Directory for the daemon log file
    pub log_dir: PathBuf,
    /// Per-connection read/write timeout
    pub ipc_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment (`KEEL_HOME`, `KEEL_SOCKET`).
    pub fn load() -> Result<Self, LifecycleError> {
        let layout = Layout::from_env()?;
        let mut config = Self::for_layout(layout);
        if let Some(socket) = keel_core::env::socket_path() {
            config.socket_path = socket;
        }
        config.ipc_timeout = keel_core::env::ipc_timeout();
        Ok(config)
    }

    /// Fixed paths under the layout's top directory.
    pub fn for_layout(layout: Layout) -> Self {
        Self {
            socket_path: layout.socket_path(),
            lock_path: layout.lock_path(),
            version_path: layout.version_path(),
            log_dir: layout.log_dir(),
            ipc_timeout: UpgradeConfig::default().ipc_timeout,
            layout,
        }
    }
}

/// Daemon state during operation.
///
/// The listener is returned separately from startup to be spawned as a task.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// When daemon started
    pub start_time: Instant,
    /// Version records as found at startup
    pub versions: Option<VersionState>,
}

/// Result of daemon startup - the daemon state and the bound listener.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
}

impl DaemonState {
    /// Remove the socket, PID and version files.
    ///
    /// The lock itself is released when the state is dropped.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        for path in [&self.config.socket_path, &self.config.lock_path, &self.config.version_path] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove daemon file");
                }
            }
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Replace this process with `{top}/{agent} run`.
///
/// Goes through the current-version symlink, so a restart after a switch
/// comes up on the newly active version. Only returns on failure.
pub fn reexec(layout: &Layout) -> LifecycleError {
    let link = layout.symlink_path();
    info!(path = %link.display(), "re-executing daemon");
    let source = std::process::Command::new(&link)
        .arg("run")
        .env("KEEL_HOME", layout.top())
        .exec();
    LifecycleError::Exec { path: link, source }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Failed to re-execute {}: {source}", path.display())]
    Exec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
