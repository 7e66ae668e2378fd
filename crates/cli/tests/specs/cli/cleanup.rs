// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn cleanup_keeps_only_current() {
    let home = Home::empty();
    home.install("aaa").install("bbb").install("ccc").activate("bbb");

    home.keel()
        .args(&["cleanup", "--now"])
        .passes()
        .stdout_has("Removed aaa")
        .stdout_has("Removed ccc");

    assert_eq!(home.installed(), vec!["bbb"]);
}

#[test]
fn explicit_current_overrides_active() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("bbb");

    home.keel().args(&["cleanup", "--now", "--current", "aaa"]).passes();

    assert_eq!(home.installed(), vec!["aaa"]);
}

#[test]
fn marker_removed_only_on_request() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("bbb").mark_upgrade("aaa", "bbb");

    home.keel().args(&["cleanup", "--now"]).passes();
    assert!(home.layout().marker_path().exists());

    home.keel().args(&["cleanup", "--now", "--remove-marker"]).passes().stdout_has("Nothing to clean up");
    assert!(!home.layout().marker_path().exists());
}

#[test]
fn cleanup_without_active_version_needs_current() {
    let home = Home::empty();
    home.install("aaa");

    home.keel().args(&["cleanup", "--now"]).fails().stderr_has("--current");
    assert_eq!(home.installed(), vec!["aaa"]);
}

#[test]
fn cleanup_json_lists_removed() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("aaa");

    let run = home.keel().args(&["-o", "json", "cleanup", "--now"]).passes();

    let report: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(report["current"], "aaa");
    assert_eq!(report["removed"], serde_json::json!(["bbb"]));
}
