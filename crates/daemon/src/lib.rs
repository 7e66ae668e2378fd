// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! keel daemon library
//!
//! Lifecycle and control-socket listener of the long-running agent process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod lifecycle;
mod listener;
mod serve;

pub use lifecycle::{reexec, startup, Config, DaemonState, LifecycleError, StartupResult};
pub use serve::{serve, Exit};
