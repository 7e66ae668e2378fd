// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Request from a client to the daemon's control socket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Get daemon status
    Status,

    /// Ask the daemon to restart itself through the current-version symlink.
    /// Carries no payload.
    Restart,
}
