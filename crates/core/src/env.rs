// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;
use std::time::Duration;

use crate::StoreError;

/// Resolve the top directory: KEEL_HOME > XDG_DATA_HOME/keel > platform data dir/keel
pub fn top_dir() -> Result<PathBuf, StoreError> {
    if let Ok(dir) = std::env::var("KEEL_HOME") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join("keel"));
    }
    let data = dirs::data_local_dir().ok_or(StoreError::NoHomeDir)?;
    Ok(data.join("keel"))
}

/// Control socket override (defaults to `{top}/keel.sock`)
pub fn socket_path() -> Option<PathBuf> {
    std::env::var("KEEL_SOCKET").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Per-call control socket timeout
pub fn ipc_timeout() -> Duration {
    duration_ms("KEEL_IPC_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

pub fn restart_max_attempts() -> Option<u32> {
    std::env::var("KEEL_RESTART_MAX_ATTEMPTS").ok().and_then(|s| s.parse::<u32>().ok())
}

pub fn restart_backoff_init() -> Option<Duration> {
    duration_ms("KEEL_RESTART_BACKOFF_INIT_MS")
}

pub fn restart_backoff_max() -> Option<Duration> {
    duration_ms("KEEL_RESTART_BACKOFF_MAX_MS")
}

/// Grace delay between a restart and the cleanup sweep
pub fn cleanup_delay() -> Option<Duration> {
    duration_ms("KEEL_CLEANUP_DELAY_MS")
}

pub fn watch_grace() -> Option<Duration> {
    duration_ms("KEEL_WATCH_GRACE_MS")
}

pub fn watch_interval() -> Option<Duration> {
    duration_ms("KEEL_WATCH_INTERVAL_MS")
}

pub fn watch_failures() -> Option<u32> {
    std::env::var("KEEL_WATCH_FAILURES").ok().and_then(|s| s.parse::<u32>().ok())
}

fn duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}
