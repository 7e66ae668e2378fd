// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout of an installation.
//!
//! ```text
//! {top}/
//!   keel                  -> data/keel-{hash}/keel   (current-version symlink)
//!   keel.prev             staging name for the symlink swap
//!   keel.sock             daemon control socket
//!   keel.pid              daemon lock file
//!   keel.version          version of the running daemon
//!   logs/
//!   data/
//!     .keel-commit        active-commit record
//!     .update-marker      upgrade marker
//!     keel-{hash}/        one install directory per version
//! ```

use std::path::{Component, Path, PathBuf};

use crate::{commit, StoreError, VersionHash};

/// Default agent name, used for directory prefixes and the binary name.
pub const AGENT_NAME: &str = "keel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    top: PathBuf,
    agent_name: String,
}

impl Layout {
    pub fn new(top: impl Into<PathBuf>) -> Self {
        Self::with_agent_name(top, AGENT_NAME)
    }

    pub fn with_agent_name(top: impl Into<PathBuf>, agent_name: impl Into<String>) -> Self {
        Self { top: top.into(), agent_name: agent_name.into() }
    }

    /// Resolve the layout from the environment (`KEEL_HOME`, XDG, home dir).
    pub fn from_env() -> Result<Self, StoreError> {
        Ok(Self::new(crate::env::top_dir()?))
    }

    pub fn top(&self) -> &Path {
        &self.top
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn data_dir(&self) -> PathBuf {
        self.top.join("data")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.top.join("logs")
    }

    /// Prefix every install directory name carries, e.g. `keel-`.
    pub fn dir_prefix(&self) -> String {
        format!("{}-", self.agent_name)
    }

    pub fn install_dir_name(&self, hash: &VersionHash) -> String {
        format!("{}-{}", self.agent_name, hash)
    }

    pub fn install_dir(&self, hash: &VersionHash) -> PathBuf {
        self.data_dir().join(self.install_dir_name(hash))
    }

    /// Agent binary inside the install directory of `hash`.
    pub fn binary_path(&self, hash: &VersionHash) -> PathBuf {
        self.install_dir(hash).join(&self.agent_name)
    }

    /// Target written into the current-version symlink.
    ///
    /// Relative to the symlink's own directory (`{top}`), so the link resolves
    /// whether `{top}` was given as an absolute or a relative path.
    pub fn link_target(&self, hash: &VersionHash) -> PathBuf {
        Path::new("data").join(self.install_dir_name(hash)).join(&self.agent_name)
    }

    pub fn symlink_path(&self) -> PathBuf {
        self.top.join(&self.agent_name)
    }

    pub fn prev_symlink_path(&self) -> PathBuf {
        self.top.join(format!("{}.prev", self.agent_name))
    }

    pub fn commit_path(&self) -> PathBuf {
        self.data_dir().join(format!(".{}-commit", self.agent_name))
    }

    pub fn marker_path(&self) -> PathBuf {
        self.data_dir().join(".update-marker")
    }

    pub fn socket_path(&self) -> PathBuf {
        self.top.join(format!("{}.sock", self.agent_name))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.top.join(format!("{}.pid", self.agent_name))
    }

    pub fn version_path(&self) -> PathBuf {
        self.top.join(format!("{}.version", self.agent_name))
    }

    /// Map an install directory name (`keel-{hash}`) back to its hash.
    pub fn hash_of_dir_name(&self, name: &str) -> Option<VersionHash> {
        let hash = name.strip_prefix(&self.dir_prefix())?;
        VersionHash::parse(hash).ok()
    }

    /// Map a path inside the data root (install dir or anything below it)
    /// to the hash of the install directory that contains it.
    pub fn hash_of_path(&self, path: &Path) -> Option<VersionHash> {
        let path = if path.is_relative() { self.top.join(path) } else { path.to_path_buf() };
        let rest = path.strip_prefix(self.data_dir()).ok()?;
        match rest.components().next()? {
            Component::Normal(name) => self.hash_of_dir_name(name.to_str()?),
            _ => None,
        }
    }

    /// Hashes of every install directory under the data root, sorted.
    ///
    /// A missing data root means nothing is installed.
    pub fn installed_versions(&self) -> Result<Vec<VersionHash>, StoreError> {
        let data_dir = self.data_dir();
        let entries = match std::fs::read_dir(&data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(data_dir, e)),
        };

        let mut hashes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&data_dir, e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(hash) = self.hash_of_dir_name(&name) {
                hashes.push(hash);
            }
        }
        hashes.sort();
        Ok(hashes)
    }

    pub fn is_installed(&self, hash: &VersionHash) -> bool {
        self.install_dir(hash).is_dir()
    }

    /// Hash the current-version symlink points at.
    ///
    /// `None` when the symlink is absent or points outside the data root.
    pub fn symlink_target_hash(&self) -> Result<Option<VersionHash>, StoreError> {
        let link = self.symlink_path();
        match std::fs::read_link(&link) {
            Ok(target) => Ok(self.hash_of_path(&target)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(link, e)),
        }
    }

    /// Install directory of the active version.
    ///
    /// Resolved through the symlink first, since that is what the next start
    /// executes; falls back to the active-commit record.
    pub fn active_home(&self) -> Result<PathBuf, StoreError> {
        if let Some(hash) = self.symlink_target_hash()? {
            return Ok(self.install_dir(&hash));
        }
        match commit::read(self)? {
            Some(hash) => Ok(self.install_dir(&hash)),
            None => Err(StoreError::NoActiveVersion),
        }
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
