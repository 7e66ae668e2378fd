// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! keel - self-upgrading host agent

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use keel_core::VersionHash;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "keel", version = keel_core::VERSION, styles = color::styles())]
#[command(about = "Host agent that upgrades, restarts and rolls itself back")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon in the foreground
    Run,
    /// Watch a freshly upgraded version, rolling back if the daemon stays down
    Watch,
    /// Switch back to a previous version, restart the daemon and clean up
    Rollback {
        /// Version to return to
        #[arg(long)]
        prev: VersionHash,
        /// Version being abandoned
        #[arg(long)]
        current: VersionHash,
    },
    /// Remove install directories other than the current one
    Cleanup {
        /// Version to keep (default: the active version)
        #[arg(long)]
        current: Option<VersionHash>,
        /// Also remove the upgrade marker
        #[arg(long)]
        remove_marker: bool,
        /// Skip the post-restart delay
        #[arg(long)]
        now: bool,
    },
    /// Start the watcher for the active version
    InvokeWatcher,
    /// Show daemon status
    Status,
    /// List installed versions
    Versions,
    /// Check that the symlink, commit record and marker agree
    Inspect,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            eprintln!("Error: {}", exit.message);
            std::process::exit(exit.code);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let format = cli.output;

    // The daemon sets up its own file logging and runtime so it can re-exec
    if let Commands::Run = cli.command {
        return commands::daemon::run();
    }

    logging::init_stderr();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Run => Ok(()),
            Commands::Watch => commands::watch::watch().await,
            Commands::Rollback { prev, current } => {
                commands::upgrade::rollback(prev, current, format).await
            }
            Commands::Cleanup { current, remove_marker, now } => {
                commands::upgrade::cleanup(current, remove_marker, now, format).await
            }
            Commands::InvokeWatcher => commands::upgrade::invoke_watcher(),
            Commands::Status => commands::daemon::status(format).await,
            Commands::Versions => commands::versions::versions(format),
            Commands::Inspect => commands::versions::inspect(format),
        }
    })
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
