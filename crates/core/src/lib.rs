// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! keel-core: version store, on-disk records and configuration for the keel agent

pub mod commit;
pub mod config;
pub mod env;
mod error;
mod fs_util;
mod hash;
mod layout;
pub mod marker;

pub use config::{RestartPolicy, UpgradeConfig, WatchPolicy};
pub use error::StoreError;
pub use hash::VersionHash;
pub use layout::{Layout, AGENT_NAME};
pub use marker::UpgradeMarker;

/// Protocol/build version of this binary
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Short git hash of this build; names the build's install directory
pub const BUILD_HASH: &str = env!("BUILD_GIT_HASH");
