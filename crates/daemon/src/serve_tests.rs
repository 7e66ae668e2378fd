// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use keel_core::Layout;
use keel_upgrade::{ControlClient, DaemonClient};
use tempfile::tempdir;

use super::*;

async fn wait_for_socket(config: &Config) {
    for _ in 0..200 {
        if config.socket_path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("daemon never bound {}", config.socket_path.display());
}

#[tokio::test]
async fn restart_request_ends_serve_with_restart() {
    let temp = tempdir().unwrap();
    let config = Config::for_layout(Layout::new(temp.path()));
    let daemon = tokio::spawn({
        let config = config.clone();
        async move { serve(&config).await }
    });
    wait_for_socket(&config).await;

    let mut client = DaemonClient::new(&config.socket_path, Duration::from_secs(2));
    client.status().await.unwrap();
    client.connect().await.unwrap();
    client.restart().await.unwrap();
    client.disconnect().await;

    let exit = tokio::time::timeout(Duration::from_secs(5), daemon).await.unwrap().unwrap();
    assert_eq!(exit.unwrap(), Exit::Restart);
    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
    assert!(!config.version_path.exists());
}
