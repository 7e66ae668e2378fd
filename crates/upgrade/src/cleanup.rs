// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleanup sweep: removes install directories other than the current one.
//!
//! Best effort: a failed removal is recorded and the sweep moves on. Only
//! failures before the walk starts (marker removal, listing the data root)
//! abort it.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use keel_core::{marker, Layout, VersionHash};
use tracing::{debug, info, warn};

use crate::error::ErrorList;
use crate::rollback::Sweeper;
use crate::UpgradeError;

/// Removes one install directory.
pub trait PathRemover: Send + Sync {
    fn remove_dir(&self, path: &Path) -> std::io::Result<()>;
}

/// Recursive removal on the real filesystem. Already-gone is success.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl PathRemover for FsRemover {
    fn remove_dir(&self, path: &Path) -> std::io::Result<()> {
        match std::fs::remove_dir_all(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanupSweep<R = FsRemover> {
    layout: Layout,
    delay: Duration,
    remover: R,
}

impl CleanupSweep<FsRemover> {
    pub fn new(layout: Layout, delay: Duration) -> Self {
        Self::with_remover(layout, delay, FsRemover)
    }
}

impl<R: PathRemover> CleanupSweep<R> {
    pub fn with_remover(layout: Layout, delay: Duration, remover: R) -> Self {
        Self { layout, delay, remover }
    }

    /// Wait out the post-restart delay, then sweep.
    pub async fn run(&self, current: &VersionHash, remove_marker: bool) -> Result<(), UpgradeError> {
        if !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "waiting before cleanup");
            tokio::time::sleep(self.delay).await;
        }
        self.sweep_now(current, remove_marker)
    }

    /// Sweep immediately, keeping `current` and anything not named with the
    /// install prefix.
    pub fn sweep_now(&self, current: &VersionHash, remove_marker: bool) -> Result<(), UpgradeError> {
        if remove_marker {
            marker::clean(&self.layout)?;
            debug!("removed upgrade marker");
        }

        let data_dir = self.layout.data_dir();
        let entries = std::fs::read_dir(&data_dir)
            .map_err(|e| UpgradeError::fs("read data directory", &data_dir, e))?;

        // Leftover staging link from an interrupted switch
        let _ = std::fs::remove_file(self.layout.prev_symlink_path());

        let keep = self.layout.install_dir_name(current);
        let prefix = self.layout.dir_prefix();
        let mut errors = ErrorList::new();
        let mut removed = 0usize;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(UpgradeError::fs("read data directory", &data_dir, e));
                    continue;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name == keep || !name.starts_with(&prefix) {
                continue;
            }
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            match self.remover.remove_dir(&path) {
                Ok(()) => {
                    removed += 1;
                    debug!(path = %path.display(), "removed install directory");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove install directory");
                    errors.push(UpgradeError::fs("remove install directory", path, e));
                }
            }
        }

        info!(current = %current, removed, failed = errors.len(), "cleanup finished");
        errors.into_result()
    }
}

#[async_trait]
impl<R: PathRemover> Sweeper for CleanupSweep<R> {
    async fn sweep(&self, current: &VersionHash, remove_marker: bool) -> Result<(), UpgradeError> {
        self.run(current, remove_marker).await
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
