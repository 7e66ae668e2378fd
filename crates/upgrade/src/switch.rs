// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Symlink/commit switch.
//!
//! The symlink is repointed before the commit record is written. The two
//! steps are not transactional: if the commit write fails the symlink stays
//! switched, and callers must treat the switch as possibly half-applied.

use keel_core::{commit, Layout, VersionHash};
use tracing::info;

use crate::UpgradeError;

/// Repoint the current-version symlink at `hash`'s binary.
///
/// A new link is created under the staging name (`{agent}.prev`) and renamed
/// over the current one, so the current link is never absent.
pub fn change_symlink(layout: &Layout, hash: &VersionHash) -> Result<(), UpgradeError> {
    if !layout.is_installed(hash) {
        return Err(UpgradeError::NotInstalled(hash.clone()));
    }

    let target = layout.link_target(hash);
    let staging = layout.prev_symlink_path();
    let link = layout.symlink_path();

    match std::fs::remove_file(&staging) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(UpgradeError::fs("remove stale symlink", staging, e)),
    }
    std::os::unix::fs::symlink(&target, &staging)
        .map_err(|e| UpgradeError::fs("create symlink", &staging, e))?;
    std::fs::rename(&staging, &link).map_err(|e| UpgradeError::fs("replace symlink", &link, e))?;

    info!(
        hash = %hash,
        binary = %layout.binary_path(hash).display(),
        "repointed current-version symlink"
    );
    Ok(())
}

/// Persist `hash` as the active commit.
pub fn update_active_commit(layout: &Layout, hash: &VersionHash) -> Result<(), UpgradeError> {
    commit::write(layout, hash)?;
    info!(hash = %hash, "updated active commit");
    Ok(())
}

/// Switch to `hash`: symlink first, then the commit record.
pub fn switch_version(layout: &Layout, hash: &VersionHash) -> Result<(), UpgradeError> {
    change_symlink(layout, hash)?;
    update_active_commit(layout, hash)
}

#[cfg(test)]
#[path = "switch_tests.rs"]
mod tests;
