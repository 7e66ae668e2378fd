// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel rollback`, `keel cleanup`, `keel invoke-watcher`

use std::time::Duration;

use anyhow::Result;
use keel_core::{UpgradeConfig, VersionHash};
use keel_upgrade::{CleanupSweep, InstalledCheck, Rollback};

use crate::exit_error::{ExitError, EXIT_UPGRADE_FAILED};
use crate::output::{format_or_json, OutputFormat};

pub async fn rollback(prev: VersionHash, current: VersionHash, format: OutputFormat) -> Result<()> {
    let layout = super::layout()?;
    let config = UpgradeConfig::from_env();
    let cancel = super::cancel_on_interrupt();

    Rollback::for_layout(&layout, &config)
        .run(&prev, &current, &cancel)
        .await
        .map_err(|e| ExitError::new(EXIT_UPGRADE_FAILED, format!("rollback failed: {e}")))?;

    let obj = serde_json::json!({ "rolled_back_to": prev, "from": current });
    format_or_json(format, &obj, || println!("Rolled back from {} to {}", current, prev))
}

pub async fn cleanup(
    current: Option<VersionHash>,
    remove_marker: bool,
    now: bool,
    format: OutputFormat,
) -> Result<()> {
    let layout = super::layout()?;
    let current = match current {
        Some(hash) => hash,
        None => super::require_active_version(&layout)?,
    };
    let delay = if now { Duration::ZERO } else { UpgradeConfig::from_env().cleanup_delay };
    let before = layout.installed_versions()?;

    let result = CleanupSweep::new(layout.clone(), delay).run(&current, remove_marker).await;

    let after = layout.installed_versions()?;
    let removed: Vec<_> = before.into_iter().filter(|h| !after.contains(h)).collect();
    if let Err(e) = result {
        return Err(ExitError::new(EXIT_UPGRADE_FAILED, format!("cleanup failed: {e}")).into());
    }

    let obj = serde_json::json!({ "current": current, "removed": removed });
    format_or_json(format, &obj, || {
        if removed.is_empty() {
            println!("Nothing to clean up");
        }
        for hash in &removed {
            println!("Removed {}", hash);
        }
    })
}

pub fn invoke_watcher() -> Result<()> {
    let layout = super::layout()?;
    let check = InstalledCheck::new(layout.clone());
    keel_upgrade::invoke_watcher(&layout, &check)?;
    Ok(())
}
