// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup. `RUST_LOG` overrides the default filter.

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Daemon log file name inside the log directory
pub const LOG_FILE: &str = "keel.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, for one-shot commands.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Log to `{log_dir}/keel.log` through a background writer, for the daemon.
///
/// A startup marker line is appended first so successive daemon runs
/// (including re-execs after a restart) can be told apart in one file.
/// Keep the guard alive until exit; dropping it flushes pending lines.
pub fn init_file(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let mut file =
        std::fs::OpenOptions::new().create(true).append(true).open(log_dir.join(LOG_FILE))?;
    writeln!(file, "--- keel: starting (pid: {}) ---\n", std::process::id())?;
    drop(file);

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init();
    Ok(guard)
}
