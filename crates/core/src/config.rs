// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tunable upgrade policy.
//!
//! Values are passed into each component's constructor rather than read from
//! globals, so tests can run with near-zero delays and small budgets.

use std::time::Duration;

use crate::env;

pub const DEFAULT_RESTART_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RESTART_BACKOFF_INIT: Duration = Duration::from_secs(5);
pub const DEFAULT_RESTART_BACKOFF_MAX: Duration = Duration::from_secs(90);
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_WATCH_GRACE: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_WATCH_FAILURES: u32 = 3;

/// Retry budget and backoff bounds for restarting the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESTART_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_RESTART_BACKOFF_INIT,
            max_backoff: DEFAULT_RESTART_BACKOFF_MAX,
        }
    }
}

impl RestartPolicy {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_attempts: env::restart_max_attempts().unwrap_or(default.max_attempts),
            initial_backoff: env::restart_backoff_init().unwrap_or(default.initial_backoff),
            max_backoff: env::restart_backoff_max().unwrap_or(default.max_backoff),
        }
    }
}

/// Grace window the watcher observes a freshly switched version for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchPolicy {
    pub grace: Duration,
    pub interval: Duration,
    /// Consecutive unreachable polls that count as a failed upgrade
    pub max_failures: u32,
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self {
            grace: DEFAULT_WATCH_GRACE,
            interval: DEFAULT_WATCH_INTERVAL,
            max_failures: DEFAULT_WATCH_FAILURES,
        }
    }
}

impl WatchPolicy {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            grace: env::watch_grace().unwrap_or(default.grace),
            interval: env::watch_interval().unwrap_or(default.interval),
            max_failures: env::watch_failures().unwrap_or(default.max_failures),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeConfig {
    pub restart: RestartPolicy,
    /// Delay before the cleanup sweep touches the filesystem, so recently
    /// restarted processes can release file handles
    pub cleanup_delay: Duration,
    pub ipc_timeout: Duration,
    pub watch: WatchPolicy,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            restart: RestartPolicy::default(),
            cleanup_delay: DEFAULT_CLEANUP_DELAY,
            ipc_timeout: Duration::from_secs(5),
            watch: WatchPolicy::default(),
        }
    }
}

impl UpgradeConfig {
    pub fn from_env() -> Self {
        Self {
            restart: RestartPolicy::from_env(),
            cleanup_delay: env::cleanup_delay().unwrap_or(DEFAULT_CLEANUP_DELAY),
            ipc_timeout: env::ipc_timeout(),
            watch: WatchPolicy::from_env(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
