// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel watch` - the watcher started after an upgrade
//!
//! Polls the daemon for the grace window recorded in the configuration. A
//! daemon that stays unreachable for several polls in a row means the new
//! version is bad and triggers a rollback to the marker's previous hash.
//! Surviving the window means the upgrade stuck, and the old install
//! directories are swept.

use anyhow::Result;
use async_trait::async_trait;
use keel_core::{marker, UpgradeConfig, WatchPolicy};
use keel_upgrade::{CleanupSweep, DaemonClient, Rollback};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::exit_error::{ExitError, EXIT_UPGRADE_FAILED};

/// Outcome of watching a freshly switched version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    Failed,
}

/// Liveness check against the running daemon.
#[async_trait]
pub trait Probe: Send {
    async fn alive(&mut self) -> bool;
}

#[async_trait]
impl Probe for DaemonClient {
    async fn alive(&mut self) -> bool {
        match self.status().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "daemon status failed");
                false
            }
        }
    }
}

/// Poll `probe` every `policy.interval` until `policy.grace` has passed.
pub async fn observe<P: Probe + ?Sized>(probe: &mut P, policy: &WatchPolicy) -> Verdict {
    let deadline = Instant::now() + policy.grace;
    let max_failures = policy.max_failures.max(1);
    let mut failures = 0;

    while Instant::now() < deadline {
        tokio::time::sleep(policy.interval).await;
        if probe.alive().await {
            failures = 0;
            continue;
        }
        failures += 1;
        warn!(failures, max_failures, "daemon unreachable");
        if failures >= max_failures {
            return Verdict::Failed;
        }
    }
    Verdict::Healthy
}

pub async fn watch() -> Result<()> {
    let layout = super::layout()?;
    let Some(upgrade) = marker::load(&layout)? else {
        info!("no upgrade in progress, nothing to watch");
        return Ok(());
    };
    let config = UpgradeConfig::from_env();
    info!(hash = %upgrade.hash, prev_hash = %upgrade.prev_hash, "watching upgrade");

    let mut client = DaemonClient::for_layout(&layout, config.ipc_timeout);
    let result = match observe(&mut client, &config.watch).await {
        Verdict::Healthy => {
            info!(hash = %upgrade.hash, "upgrade healthy, cleaning up");
            CleanupSweep::new(layout.clone(), config.cleanup_delay).run(&upgrade.hash, true).await
        }
        Verdict::Failed => {
            warn!(hash = %upgrade.hash, prev_hash = %upgrade.prev_hash, "upgrade failed, rolling back");
            let cancel = super::cancel_on_interrupt();
            Rollback::for_layout(&layout, &config)
                .run(&upgrade.prev_hash, &upgrade.hash, &cancel)
                .await
        }
    };
    result.map_err(|e| ExitError::new(EXIT_UPGRADE_FAILED, format!("watch failed: {e}")).into())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
