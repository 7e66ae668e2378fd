// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only view of the version records, used at daemon startup to report
//! whether a switch or rollback was interrupted.

use keel_core::{commit, marker, Layout, UpgradeMarker, VersionHash};
use serde::Serialize;

use crate::UpgradeError;

/// Snapshot of the symlink, commit record and marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionState {
    /// Version the current symlink resolves to
    pub symlink: Option<VersionHash>,
    pub commit: Option<VersionHash>,
    pub marker: Option<UpgradeMarker>,
}

/// How the symlink and commit record relate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Consistency {
    /// Nothing has been installed yet
    Uninitialised,
    Consistent { hash: VersionHash },
    /// Symlink and commit record name different versions, e.g. a switch that
    /// repointed the symlink but never wrote the commit record
    Mismatch { symlink: VersionHash, commit: VersionHash },
    MissingSymlink { commit: VersionHash },
    MissingCommit { symlink: VersionHash },
}

impl Consistency {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Consistency::Uninitialised | Consistency::Consistent { .. })
    }
}

impl VersionState {
    pub fn consistency(&self) -> Consistency {
        match (&self.symlink, &self.commit) {
            (None, None) => Consistency::Uninitialised,
            (Some(s), Some(c)) if s == c => Consistency::Consistent { hash: s.clone() },
            (Some(s), Some(c)) => Consistency::Mismatch { symlink: s.clone(), commit: c.clone() },
            (None, Some(c)) => Consistency::MissingSymlink { commit: c.clone() },
            (Some(s), None) => Consistency::MissingCommit { symlink: s.clone() },
        }
    }

    /// An upgrade or rollback started and never cleaned up its marker.
    pub fn interrupted(&self) -> bool {
        self.marker.is_some()
    }
}

pub fn inspect(layout: &Layout) -> Result<VersionState, UpgradeError> {
    Ok(VersionState {
        symlink: layout.symlink_target_hash()?,
        commit: commit::read(layout)?,
        marker: marker::load(layout)?,
    })
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
