// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use keel_core::{StoreError, VersionHash};
use thiserror::Error;

use crate::client::ClientError;

/// Errors from the upgrade and rollback control path
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// Symlink or directory operation failed
    #[error("failed to {op} {}: {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("version {0} is not installed")]
    NotInstalled(VersionHash),

    /// Commit or marker record could not be read or written
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// Control endpoint unreachable
    #[error("failed communicating to running daemon at {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: ClientError,
    },

    /// Daemon rejected or failed the restart request
    #[error("failed to trigger restart of daemon: {0}")]
    Rpc(#[source] ClientError),

    /// One or more directory removals failed during cleanup
    #[error("{0}")]
    Cleanup(ErrorList),

    #[error("failed to start watcher {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cancelled")]
    Cancelled,
}

impl UpgradeError {
    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem { op, path: path.into(), source }
    }
}

/// Accumulates independent failures so a best-effort pass can keep going.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<UpgradeError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: UpgradeError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpgradeError> {
        self.errors.iter()
    }

    /// `Ok` when nothing was collected.
    pub fn into_result(self) -> Result<(), UpgradeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(UpgradeError::Cleanup(self))
        }
    }
}

impl std::fmt::Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.as_slice() {
            [] => f.write_str("no errors"),
            [only] => write!(f, "1 error occurred:\n\t* {only}"),
            errors => {
                write!(f, "{} errors occurred:", errors.len())?;
                for error in errors {
                    write!(f, "\n\t* {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ErrorList {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
