// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end rollback against a real layout and a stand-in daemon socket.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;

use keel_core::{commit, marker, Layout, RestartPolicy, UpgradeConfig, UpgradeMarker, VersionHash};
use keel_upgrade::{Rollback, UpgradeError};
use keel_wire::{self as wire, Request, Response};
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;

fn hash(s: &str) -> VersionHash {
    VersionHash::parse(s).unwrap()
}

fn fast_config() -> UpgradeConfig {
    UpgradeConfig {
        restart: RestartPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        },
        cleanup_delay: Duration::ZERO,
        ipc_timeout: Duration::from_secs(2),
        ..UpgradeConfig::default()
    }
}

/// Layout with `good` and `bad` installed, `bad` active and a marker recording the upgrade.
fn upgraded_layout(top: &std::path::Path) -> Layout {
    let layout = Layout::new(top);
    for h in ["good", "bad"] {
        let dir = layout.install_dir(&hash(h));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(layout.binary_path(&hash(h)), "bin").unwrap();
    }
    keel_upgrade::switch_version(&layout, &hash("bad")).unwrap();
    marker::save(&layout, &UpgradeMarker::new(hash("good"), hash("bad"))).unwrap();
    layout
}

#[tokio::test]
async fn rollback_switches_restarts_and_cleans_up() {
    let temp = tempfile::tempdir().unwrap();
    let layout = upgraded_layout(temp.path());
    let listener = UnixListener::bind(layout.socket_path()).unwrap();
    let daemon = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = wire::read_request(&mut stream, Duration::from_secs(2)).await.unwrap();
        wire::write_response(&mut stream, &Response::Restarting, Duration::from_secs(2))
            .await
            .unwrap();
        request
    });

    Rollback::for_layout(&layout, &fast_config())
        .run(&hash("good"), &hash("bad"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(daemon.await.unwrap(), Request::Restart);
    assert_eq!(layout.symlink_target_hash().unwrap(), Some(hash("good")));
    assert_eq!(commit::read(&layout).unwrap(), Some(hash("good")));
    assert_eq!(layout.installed_versions().unwrap(), vec![hash("good")]);
    assert!(marker::load(&layout).unwrap().is_none());
}

#[tokio::test]
async fn unreachable_daemon_fails_after_switch() {
    let temp = tempfile::tempdir().unwrap();
    let layout = upgraded_layout(temp.path());

    let err = Rollback::for_layout(&layout, &fast_config())
        .run(&hash("good"), &hash("bad"), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        UpgradeError::Network { source, .. } => assert!(source.is_not_running()),
        other => panic!("expected network error, got {other:?}"),
    }
    // Not compensated: the switch stays, nothing was swept, the marker remains
    assert_eq!(layout.symlink_target_hash().unwrap(), Some(hash("good")));
    assert_eq!(layout.installed_versions().unwrap(), vec![hash("bad"), hash("good")]);
    assert!(marker::load(&layout).unwrap().is_some());
}
