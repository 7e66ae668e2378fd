// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! keel-upgrade: switching, restarting and rolling back agent versions

mod backoff;
pub mod cleanup;
pub mod client;
mod error;
pub mod inspect;
pub mod restart;
pub mod rollback;
pub mod switch;
pub mod watcher;

pub use backoff::Backoff;
pub use cleanup::{CleanupSweep, FsRemover, PathRemover};
pub use client::{ClientError, ControlClient, DaemonClient, DaemonStatus};
pub use error::{ErrorList, UpgradeError};
pub use inspect::{inspect, Consistency, VersionState};
pub use restart::{restart_daemon, RestartCoordinator};
pub use rollback::{LayoutSwitch, Restarter, Rollback, Sweeper, Switcher};
#[cfg(test)]
pub use rollback::{FailAt, FakeRollbackSteps, RollbackCall};
pub use switch::switch_version;
pub use watcher::{invoke_watcher, InstalledCheck, Watchability, WATCH_SUBCOMMAND};
