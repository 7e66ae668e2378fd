// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Active-commit record: the durably recorded "official" current version.
//!
//! Tracked separately from the symlink so a mismatch between the two can be
//! detected after a crash.

use crate::{fs_util, Layout, StoreError, VersionHash};

/// Read the active commit, `None` if it has never been written.
pub fn read(layout: &Layout) -> Result<Option<VersionHash>, StoreError> {
    let path = layout.commit_path();
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    VersionHash::parse(trimmed).map(Some)
}

/// Overwrite the active commit.
pub fn write(layout: &Layout, hash: &VersionHash) -> Result<(), StoreError> {
    fs_util::write_atomic(&layout.commit_path(), format!("{hash}\n").as_bytes())
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;
