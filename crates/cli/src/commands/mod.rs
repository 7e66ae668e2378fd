// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod daemon;
pub mod upgrade;
pub mod versions;
pub mod watch;

use anyhow::{anyhow, Result};
use keel_core::{commit, Layout, VersionHash};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Layout from `KEEL_HOME` (or the platform data directory).
pub(crate) fn layout() -> Result<Layout> {
    Ok(Layout::from_env()?)
}

/// Version the next start would run: the symlink target, else the commit record.
pub(crate) fn active_version(layout: &Layout) -> Result<Option<VersionHash>> {
    match layout.symlink_target_hash()? {
        Some(hash) => Ok(Some(hash)),
        None => Ok(commit::read(layout)?),
    }
}

pub(crate) fn require_active_version(layout: &Layout) -> Result<VersionHash> {
    active_version(layout)?.ok_or_else(|| anyhow!("no active version; pass --current <hash>"))
}

/// Token cancelled on ctrl-c, so a long backoff can be interrupted.
pub(crate) fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, cancelling");
            token.cancel();
        }
    });
    cancel
}
