// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rollback orchestrator: switch back, restart, clean up.
//!
//! Steps run strictly in order and the first failure is returned as is.
//! Completed steps are not undone, so a failed rollback can leave the symlink
//! switched with the daemon still running the bad version. `inspect` reports
//! such states at the next daemon start.

use async_trait::async_trait;
use keel_core::{Layout, UpgradeConfig, VersionHash};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cleanup::CleanupSweep;
use crate::client::DaemonClient;
use crate::restart::RestartCoordinator;
use crate::{switch, UpgradeError};

/// Repoints the active version.
pub trait Switcher: Send + Sync {
    fn switch(&self, hash: &VersionHash) -> Result<(), UpgradeError>;
}

/// Gets the daemon to restart into the active version.
#[async_trait]
pub trait Restarter: Send + Sync {
    async fn restart(&self, cancel: &CancellationToken) -> Result<(), UpgradeError>;
}

/// Removes install directories other than `current`.
#[async_trait]
pub trait Sweeper: Send + Sync {
    async fn sweep(&self, current: &VersionHash, remove_marker: bool) -> Result<(), UpgradeError>;
}

/// [`Switcher`] over the symlink and commit record of a layout.
#[derive(Debug, Clone)]
pub struct LayoutSwitch(pub Layout);

impl Switcher for LayoutSwitch {
    fn switch(&self, hash: &VersionHash) -> Result<(), UpgradeError> {
        switch::switch_version(&self.0, hash)
    }
}

pub struct Rollback<S, R, C> {
    switcher: S,
    restarter: R,
    sweeper: C,
}

impl Rollback<LayoutSwitch, RestartCoordinator<DaemonClient>, CleanupSweep> {
    /// Production wiring: real filesystem and the daemon's control socket.
    pub fn for_layout(layout: &Layout, config: &UpgradeConfig) -> Self {
        let client = DaemonClient::for_layout(layout, config.ipc_timeout);
        Self::new(
            LayoutSwitch(layout.clone()),
            RestartCoordinator::new(client, config.restart),
            CleanupSweep::new(layout.clone(), config.cleanup_delay),
        )
    }
}

impl<S, R, C> Rollback<S, R, C>
where
    S: Switcher,
    R: Restarter,
    C: Sweeper,
{
    pub fn new(switcher: S, restarter: R, sweeper: C) -> Self {
        Self { switcher, restarter, sweeper }
    }

    /// Revert from `current` to `prev`.
    pub async fn run(
        &self,
        prev: &VersionHash,
        current: &VersionHash,
        cancel: &CancellationToken,
    ) -> Result<(), UpgradeError> {
        info!(prev = %prev, current = %current, "rolling back");

        if let Err(e) = self.switcher.switch(prev) {
            error!(prev = %prev, error = %e, "rollback failed switching version");
            return Err(e);
        }
        if let Err(e) = self.restarter.restart(cancel).await {
            error!(prev = %prev, error = %e, "rollback failed restarting daemon");
            return Err(e);
        }
        let result = self.sweeper.sweep(prev, true).await;

        match &result {
            Ok(()) => info!(prev = %prev, "rollback complete"),
            Err(e) => error!(prev = %prev, error = %e, "rollback cleanup failed"),
        }
        result
    }
}


#[cfg(test)]
pub use fake::{FailAt, FakeRollbackSteps, RollbackCall};

#[cfg(test)]
#[path = "rollback_tests.rs"]
mod tests;
