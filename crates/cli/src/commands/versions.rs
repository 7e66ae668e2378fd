// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `keel versions` and `keel inspect` - read-only views of the version store

use anyhow::Result;
use keel_core::{Layout, VersionHash};
use keel_upgrade::{Consistency, VersionState};
use serde::Serialize;

use crate::color;
use crate::exit_error::{ExitError, EXIT_INCONSISTENT};
use crate::output::{format_or_json, OutputFormat};

/// One installed version as listed by `keel versions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    pub hash: VersionHash,
    pub active: bool,
    pub path: String,
}

pub fn version_entries(layout: &Layout, active: Option<&VersionHash>) -> Result<Vec<VersionEntry>> {
    Ok(layout
        .installed_versions()?
        .into_iter()
        .map(|hash| VersionEntry {
            active: active == Some(&hash),
            path: layout.install_dir(&hash).display().to_string(),
            hash,
        })
        .collect())
}

pub fn versions(format: OutputFormat) -> Result<()> {
    let layout = super::layout()?;
    let active = super::active_version(&layout)?;
    let entries = version_entries(&layout, active.as_ref())?;

    format_or_json(format, &entries, || {
        if entries.is_empty() {
            println!("No versions installed under {}", layout.data_dir().display());
            return;
        }
        for entry in &entries {
            if entry.active {
                println!("* {}  {}", color::header(entry.hash.as_str()), entry.path);
            } else {
                println!("  {}  {}", color::muted(entry.hash.as_str()), entry.path);
            }
        }
    })
}

/// Human-readable summary of a consistency state
pub fn describe(consistency: &Consistency) -> String {
    match consistency {
        Consistency::Uninitialised => "no version installed".to_string(),
        Consistency::Consistent { hash } => format!("consistent: {} is active", hash),
        Consistency::Mismatch { symlink, commit } => format!(
            "inconsistent: symlink points at {} but the active commit is {}",
            symlink, commit
        ),
        Consistency::MissingSymlink { commit } => {
            format!("inconsistent: active commit is {} but the symlink is missing", commit)
        }
        Consistency::MissingCommit { symlink } => {
            format!("inconsistent: symlink points at {} but there is no commit record", symlink)
        }
    }
}

#[derive(Serialize)]
struct InspectReport<'a> {
    #[serde(flatten)]
    state: &'a VersionState,
    consistency: Consistency,
    interrupted: bool,
}

/// Print the consistency report; exits non-zero when the records disagree.
pub fn inspect(format: OutputFormat) -> Result<()> {
    let layout = super::layout()?;
    let state = keel_upgrade::inspect(&layout)?;
    let consistency = state.consistency();
    let report =
        InspectReport { state: &state, consistency: consistency.clone(), interrupted: state.interrupted() };

    format_or_json(format, &report, || {
        println!("{}", describe(&consistency));
        if let Some(marker) = &state.marker {
            println!(
                "upgrade marker: {} -> {} since {}",
                marker.prev_hash,
                marker.hash,
                marker.updated_on.to_rfc3339()
            );
        }
    })?;

    if !consistency.is_consistent() {
        return Err(ExitError::new(EXIT_INCONSISTENT, describe(&consistency)).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "versions_tests.rs"]
mod tests;
