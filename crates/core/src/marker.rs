// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upgrade marker: durable record that an upgrade or rollback is in flight.
//!
//! Created when an upgrade begins and removed only on explicit request
//! (the cleanup sweep with `remove_marker`). Its presence at startup means
//! an operation was interrupted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{fs_util, Layout, StoreError, VersionHash};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeMarker {
    /// Version being upgraded to
    pub hash: VersionHash,
    /// Version that was running before the upgrade (the rollback target)
    pub prev_hash: VersionHash,
    pub updated_on: DateTime<Utc>,
    /// Free-form description of the operation that wrote the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl UpgradeMarker {
    pub fn new(prev_hash: VersionHash, hash: VersionHash) -> Self {
        Self { hash, prev_hash, updated_on: Utc::now(), action: None }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Load the marker, `None` if no operation is in flight.
pub fn load(layout: &Layout) -> Result<Option<UpgradeMarker>, StoreError> {
    let path = layout.marker_path();
    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&content).map(Some).map_err(|source| StoreError::Json { path, source })
}

pub fn save(layout: &Layout, marker: &UpgradeMarker) -> Result<(), StoreError> {
    let path = layout.marker_path();
    let json = serde_json::to_vec_pretty(marker)
        .map_err(|source| StoreError::Json { path: path.clone(), source })?;
    fs_util::write_atomic(&path, &json)
}

/// Remove the marker. Removing a marker that does not exist succeeds.
pub fn clean(layout: &Layout) -> Result<(), StoreError> {
    fs_util::remove_if_exists(&layout.marker_path())
}

#[cfg(test)]
#[path = "marker_tests.rs"]
mod tests;
