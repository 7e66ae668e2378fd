// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn rollback_to_missing_version_fails() {
    let home = Home::empty();
    home.install("bbb").activate("bbb");

    home.keel()
        .args(&["rollback", "--prev", "aaa", "--current", "bbb"])
        .exits(2)
        .stderr_has("rollback failed");

    // Nothing was switched
    assert_eq!(home.layout().symlink_target_hash().unwrap(), Some(hash("bbb")));
    assert_eq!(home.installed(), vec!["bbb"]);
}

#[test]
fn rollback_without_daemon_keeps_switch() {
    let home = Home::empty();
    home.install("aaa").install("bbb").activate("bbb").mark_upgrade("aaa", "bbb");

    home.keel()
        .args(&["rollback", "--prev", "aaa", "--current", "bbb"])
        .env("KEEL_RESTART_MAX_ATTEMPTS", "2")
        .exits(2)
        .stderr_has("rollback failed");

    assert_eq!(home.layout().symlink_target_hash().unwrap(), Some(hash("aaa")));
    assert_eq!(home.installed(), vec!["aaa", "bbb"]);
    assert!(home.layout().marker_path().exists());
}

#[test]
fn watch_without_marker_is_a_no_op() {
    let home = Home::empty();
    home.install("aaa").activate("aaa");

    home.keel().args(&["watch"]).passes();
    assert_eq!(home.installed(), vec!["aaa"]);
}

#[test]
fn invoke_watcher_without_active_version_does_nothing() {
    let home = Home::empty();

    home.keel().args(&["invoke-watcher"]).passes();
}
