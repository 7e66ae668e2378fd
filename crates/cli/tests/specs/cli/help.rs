// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("rollback")
        .stdout_has("cleanup")
        .stdout_has("invoke-watcher")
        .stdout_has("inspect");
}

#[test]
fn version_flag_prints_build() {
    cli().args(&["--version"]).passes().stdout_has("keel ");
}

#[test]
fn rollback_requires_both_hashes() {
    cli().args(&["rollback", "--prev", "aaa"]).fails().stderr_has("--current");
}

#[test]
fn malformed_hash_is_rejected() {
    cli().args(&["rollback", "--prev", "../etc", "--current", "bbb"]).fails();
}

#[test]
fn unknown_output_format_is_rejected() {
    cli().args(&["-o", "yaml", "versions"]).fails().stderr_has("yaml");
}
