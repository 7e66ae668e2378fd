// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watcher invocation: start the active version's watcher and walk away.
//!
//! The watcher runs detached in its own process group so it outlives the
//! daemon restart it is watching. Its exit status is never collected.

use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use keel_core::Layout;
use tracing::{debug, info};

use crate::UpgradeError;

/// Subcommand the agent binary runs as the watcher
pub const WATCH_SUBCOMMAND: &str = "watch";

/// Decides whether a watcher should be started at all.
pub trait Watchability {
    fn is_watchable(&self) -> bool;
}

impl<F> Watchability for F
where
    F: Fn() -> bool,
{
    fn is_watchable(&self) -> bool {
        self()
    }
}

/// Watchable when the current symlink resolves into an installed version.
#[derive(Debug, Clone)]
pub struct InstalledCheck {
    layout: Layout,
}

impl InstalledCheck {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl Watchability for InstalledCheck {
    fn is_watchable(&self) -> bool {
        match self.layout.symlink_target_hash() {
            Ok(Some(hash)) => self.layout.is_installed(&hash),
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "could not read current-version symlink");
                false
            }
        }
    }
}

/// Command line for the active version's watcher, without spawning it.
pub fn watcher_command(layout: &Layout) -> Result<(PathBuf, Command), UpgradeError> {
    let home = layout.active_home()?;
    let binary = home.join(layout.agent_name());

    let mut cmd = Command::new(&binary);
    cmd.arg(WATCH_SUBCOMMAND)
        .env("KEEL_HOME", layout.top())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0);
    Ok((binary, cmd))
}

/// Start the watcher for the active version if `check` allows it.
///
/// Returns once the process is spawned. Not being watchable is not an error.
pub fn invoke_watcher(layout: &Layout, check: &dyn Watchability) -> Result<(), UpgradeError> {
    if !check.is_watchable() {
        debug!("agent is not watchable, not starting watcher");
        return Ok(());
    }

    let (binary, mut cmd) = watcher_command(layout)?;
    let child = cmd.spawn().map_err(|source| UpgradeError::Spawn { path: binary.clone(), source })?;
    info!(pid = child.id(), binary = %binary.display(), "started watcher");

    // Detached: the handle is dropped without waiting
    drop(child);
    Ok(())
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
