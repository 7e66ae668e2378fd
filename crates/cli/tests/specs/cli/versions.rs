// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn empty_store_lists_nothing() {
    let home = Home::empty();

    home.keel().args(&["versions"]).passes().stdout_has("No versions installed");
}

#[test]
fn active_version_is_starred() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("bbb");

    let run = home.keel().args(&["versions"]).passes();

    let stdout = run.stdout();
    assert!(stdout.lines().any(|l| l.starts_with("* bbb")), "{stdout}");
    assert!(stdout.lines().any(|l| l.starts_with("  aaa")), "{stdout}");
}

#[test]
fn versions_as_json() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("aaa");

    let run = home.keel().args(&["-o", "json", "versions"]).passes();

    let entries: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["hash"], "aaa");
    assert_eq!(entries[0]["active"], true);
    assert_eq!(entries[1]["hash"], "bbb");
    assert_eq!(entries[1]["active"], false);
}

#[test]
fn inspect_consistent_store() {
    let home = Home::empty();
    home.install("aaa").activate("aaa");

    home.keel().args(&["inspect"]).passes().stdout_has("consistent: aaa is active");
}

#[test]
fn inspect_uninitialised_store() {
    let home = Home::empty();

    home.keel().args(&["inspect"]).passes().stdout_has("no version installed");
}

#[test]
fn inspect_reports_interrupted_switch() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("aaa");
    // Symlink moved ahead, commit record left behind
    let link = home.layout().symlink_path();
    std::fs::remove_file(&link).unwrap();
    std::os::unix::fs::symlink(home.layout().binary_path(&hash("bbb")), &link).unwrap();

    home.keel()
        .args(&["inspect"])
        .exits(3)
        .stdout_has("symlink points at bbb but the active commit is aaa");
}

#[test]
fn inspect_json_includes_marker() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("bbb").mark_upgrade("aaa", "bbb");

    let run = home.keel().args(&["-o", "json", "inspect"]).passes();

    let report: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(report["consistency"]["state"], "consistent");
    assert_eq!(report["marker"]["prev_hash"], "aaa");
    assert_eq!(report["marker"]["hash"], "bbb");
    assert_eq!(report["interrupted"], true);
}
