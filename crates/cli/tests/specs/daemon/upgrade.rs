// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

fn restarts_in_log(home: &Home) -> usize {
    home.daemon_log().matches("--- keel: starting").count()
}

#[test]
fn rollback_restarts_daemon_on_previous_version() {
    let mut home = Home::empty();
    home.install_keel("aaa").install_keel("bbb").activate("bbb").mark_upgrade("aaa", "bbb");
    home.daemon_start();

    home.keel()
        .args(&["rollback", "--prev", "aaa", "--current", "bbb"])
        .passes()
        .stdout_has("Rolled back from bbb to aaa");

    assert_eq!(home.layout().symlink_target_hash().unwrap(), Some(hash("aaa")));
    assert_eq!(home.installed(), vec!["aaa"]);
    assert!(!home.layout().marker_path().exists());

    // The daemon re-executed through the symlink and is serving again
    assert!(wait_for(SPEC_WAIT_MAX_MS, || restarts_in_log(&home) >= 2));
    assert!(wait_for(SPEC_WAIT_MAX_MS, || {
        home.keel().args(&["status"]).passes().stdout().contains("Active commit: aaa")
    }));
}

#[test]
fn healthy_watch_sweeps_previous_version() {
    let mut home = Home::empty();
    home.install_keel("aaa").install_keel("bbb").activate("bbb").mark_upgrade("aaa", "bbb");
    home.daemon_start();

    home.keel()
        .args(&["watch"])
        .env("KEEL_WATCH_GRACE_MS", "300")
        .env("KEEL_WATCH_INTERVAL_MS", "50")
        .passes();

    assert_eq!(home.installed(), vec!["bbb"]);
    assert!(!home.layout().marker_path().exists());
    assert_eq!(home.layout().symlink_target_hash().unwrap(), Some(hash("bbb")));
}

#[test]
fn watch_rolls_back_when_daemon_is_down() {
    let home = Home::empty();
    home.install_keel("aaa").install_keel("bbb").activate("bbb").mark_upgrade("aaa", "bbb");

    // No daemon: the watch fails over to rollback, whose restart also fails
    home.keel()
        .args(&["watch"])
        .env("KEEL_WATCH_GRACE_MS", "5000")
        .env("KEEL_WATCH_INTERVAL_MS", "20")
        .env("KEEL_WATCH_FAILURES", "2")
        .env("KEEL_RESTART_MAX_ATTEMPTS", "1")
        .exits(2)
        .stderr_has("watch failed");

    assert_eq!(home.layout().symlink_target_hash().unwrap(), Some(hash("aaa")));
    assert!(home.layout().marker_path().exists());
}
