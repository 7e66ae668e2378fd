// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use keel_core::VersionHash;
use serde::{Deserialize, Serialize};

/// Response from the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Daemon status
    Status {
        uptime_secs: u64,
        version: String,
        /// Hash of the running build
        commit: String,
        /// Active-commit record at the time of the query
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active_commit: Option<VersionHash>,
    },

    /// Restart accepted; the daemon is about to go away
    Restarting,

    /// The daemon could not or would not handle the request
    Error { message: String },
}
