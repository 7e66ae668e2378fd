// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel run` and `keel status` - the daemon and its control socket

use anyhow::{anyhow, Result};
use keel_daemon::{Config, Exit};
use keel_upgrade::DaemonClient;
use tracing::{error, info};

use crate::logging;
use crate::output::{format_or_json, format_uptime, OutputFormat};

/// Run the daemon in the foreground until stopped.
///
/// On a restart request the process re-executes itself through the
/// current-version symlink, so it never returns in that case unless the
/// exec fails.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let guard = logging::init_file(&config.log_dir)?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(keel_daemon::serve(&config));
    drop(runtime);

    match result {
        Ok(Exit::Stopped) => {
            info!("daemon stopped");
            Ok(())
        }
        Ok(Exit::Restart) => {
            info!("restarting daemon");
            // Flush the log before the process image is replaced
            drop(guard);
            Err(keel_daemon::reexec(&config.layout).into())
        }
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            Err(e.into())
        }
    }
}

pub async fn status(format: OutputFormat) -> Result<()> {
    let layout = super::layout()?;
    let mut client = DaemonClient::for_layout(&layout, keel_core::env::ipc_timeout());

    let status = match client.status().await {
        Ok(status) => status,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(anyhow!("{}", e)),
    };

    let obj = serde_json::json!({
        "status": "running",
        "version": status.version,
        "commit": status.commit,
        "active_commit": status.active_commit,
        "uptime_secs": status.uptime_secs,
        "uptime": format_uptime(status.uptime_secs),
    });
    format_or_json(format, &obj, || {
        println!("Status: running");
        println!("Version: {}", status.version);
        println!("Uptime: {}", format_uptime(status.uptime_secs));
        match &status.active_commit {
            Some(active) if active.as_str() != status.commit => {
                println!("Active commit: {} (daemon built from {})", active, status.commit);
                println!("  Restart the daemon to pick up the active version");
            }
            Some(active) => println!("Active commit: {}", active),
            None => println!("Active commit: none"),
        }
    })
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    let obj = serde_json::json!({ "status": "not_running" });
    format_or_json(format, &obj, || println!("Daemon not running"))
}
