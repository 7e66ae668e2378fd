// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

fn running_home() -> Home {
    let mut home = Home::empty();
    home.install_keel("aaa").activate("aaa");
    home.daemon_start();
    home
}

#[test]
fn status_reports_running_daemon() {
    let home = running_home();

    let run = home.keel().args(&["-o", "json", "status"]).passes();

    let status: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(status["status"], "running");
    assert_eq!(status["active_commit"], "aaa");
}

#[test]
fn startup_writes_pid_version_and_log() {
    let home = running_home();
    let layout = home.layout();

    let pid = std::fs::read_to_string(layout.lock_path()).unwrap();
    assert!(pid.trim().parse::<u32>().is_ok(), "pid file: {pid:?}");
    assert!(layout.version_path().exists());
    assert!(wait_for(SPEC_WAIT_MAX_MS, || home.daemon_log().contains("--- keel: starting")));
}

#[test]
fn second_daemon_refuses_to_start() {
    let home = running_home();

    home.keel().args(&["run"]).fails().stderr_has("daemon already running");

    // The running daemon keeps its socket
    assert!(home.layout().socket_path().exists());
    home.keel().args(&["status"]).passes().stdout_has("Status: running");
}
