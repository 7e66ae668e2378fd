// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing the on-disk version records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid version hash: {0:?}")]
    InvalidHash(String),

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("no active version: symlink and commit record are both missing")]
    NoActiveVersion,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
