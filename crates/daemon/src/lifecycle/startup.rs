// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::time::Instant;

use fs2::FileExt;
use keel_core::{Layout, VERSION};
use keel_upgrade::{inspect, Consistency, VersionState};
use tokio::net::UnixListener;
use tracing::{info, warn};

use super::{Config, DaemonState, LifecycleError, StartupResult};

/// Start the daemon
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock;
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create top directory (needed for socket, lock, etc.)
    std::fs::create_dir_all(config.layout.top())?;
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Create directories and write version file
    std::fs::create_dir_all(config.layout.data_dir())?;
    std::fs::write(&config.version_path, VERSION)?;

    // 4. Report what an interrupted switch or rollback left behind
    let versions = match inspect(&config.layout) {
        Ok(state) => {
            log_version_state(&config.layout, &state);
            Some(state)
        }
        Err(e) => {
            warn!(error = %e, "could not inspect version records");
            None
        }
    };

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!(version = VERSION, socket = %config.socket_path.display(), "Daemon started");

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            start_time: Instant::now(),
            versions,
        },
        listener,
    })
}

fn log_version_state(layout: &Layout, state: &VersionState) {
    match state.consistency() {
        Consistency::Uninitialised => info!("no version installed yet"),
        Consistency::Consistent { hash } => info!(hash = %hash, "active version"),
        Consistency::Mismatch { symlink, commit } => warn!(
            symlink = %symlink,
            commit = %commit,
            "symlink and active commit disagree, a switch or rollback was interrupted"
        ),
        Consistency::MissingSymlink { commit } => {
            warn!(commit = %commit, link = %layout.symlink_path().display(), "current-version symlink is missing")
        }
        Consistency::MissingCommit { symlink } => {
            warn!(symlink = %symlink, "active commit record is missing")
        }
    }

    if let Some(marker) = &state.marker {
        warn!(
            hash = %marker.hash,
            prev_hash = %marker.prev_hash,
            updated_on = %marker.updated_on,
            "upgrade marker present, an upgrade or rollback has not been cleaned up"
        );
    }
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove socket if we created it
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    // Remove version file
    if config.version_path.exists() {
        let _ = std::fs::remove_file(&config.version_path);
    }

    // Remove PID/lock file
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
