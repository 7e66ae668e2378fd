// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn status_without_daemon() {
    let home = Home::empty();

    home.keel().args(&["status"]).passes().stdout_has("Daemon not running");
}

#[test]
fn status_without_daemon_as_json() {
    let home = Home::empty();

    let run = home.keel().args(&["-o", "json", "status"]).passes();

    let status: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(status["status"], "not_running");
}
