// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a throwaway `KEEL_HOME` and a fluent wrapper around the binary.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};

use keel_core::{commit, marker, Layout, UpgradeMarker, VersionHash};
use tempfile::TempDir;

/// Upper bound for polling in specs
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

pub fn hash(s: &str) -> VersionHash {
    VersionHash::parse(s).unwrap()
}

/// `keel` with an isolated environment and no `KEEL_HOME`
pub fn cli() -> CliBuilder {
    let mut cmd = assert_cmd::Command::cargo_bin("keel").unwrap();
    cmd.env_remove("KEEL_HOME").env_remove("KEEL_SOCKET").env("NO_COLOR", "1");
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> RunAssert {
        RunAssert(self.cmd.assert().failure())
    }

    pub fn exits(mut self, code: i32) -> RunAssert {
        RunAssert(self.cmd.assert().code(code))
    }
}

pub struct RunAssert(assert_cmd::assert::Assert);

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}

/// Temporary agent home with helpers to populate the version store.
pub struct Home {
    dir: TempDir,
    daemon: Option<Child>,
}

impl Home {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap(), daemon: None }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.path())
    }

    /// `keel` pointed at this home with fast retry and cleanup timings
    pub fn keel(&self) -> CliBuilder {
        cli()
            .env("KEEL_HOME", self.path())
            .env("KEEL_RESTART_BACKOFF_INIT_MS", "50")
            .env("KEEL_RESTART_BACKOFF_MAX_MS", "200")
            .env("KEEL_CLEANUP_DELAY_MS", "0")
    }

    /// Install `h` with a placeholder binary.
    pub fn install(&self, h: &str) -> &Self {
        let layout = self.layout();
        std::fs::create_dir_all(layout.install_dir(&hash(h))).unwrap();
        std::fs::write(layout.binary_path(&hash(h)), "#!/bin/sh\nexit 0\n").unwrap();
        self
    }

    /// Install `h` with a copy of the real `keel` binary.
    pub fn install_keel(&self, h: &str) -> &Self {
        let layout = self.layout();
        let binary = layout.binary_path(&hash(h));
        std::fs::create_dir_all(layout.install_dir(&hash(h))).unwrap();
        std::fs::copy(keel_binary(), &binary).unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        self
    }

    /// Point the symlink and commit record at `h`.
    pub fn activate(&self, h: &str) -> &Self {
        let layout = self.layout();
        let link = layout.symlink_path();
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(layout.link_target(&hash(h)), &link).unwrap();
        commit::write(&layout, &hash(h)).unwrap();
        self
    }

    pub fn mark_upgrade(&self, prev: &str, h: &str) -> &Self {
        marker::save(&self.layout(), &UpgradeMarker::new(hash(prev), hash(h))).unwrap();
        self
    }

    pub fn installed(&self) -> Vec<String> {
        self.layout().installed_versions().unwrap().iter().map(|h| h.to_string()).collect()
    }

    /// Start `keel run` through the current-version symlink.
    pub fn daemon_start(&mut self) {
        let child = std::process::Command::new(self.layout().symlink_path())
            .arg("run")
            .env_remove("KEEL_SOCKET")
            .env("KEEL_HOME", self.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        self.daemon = Some(child);
        let socket = self.layout().socket_path();
        assert!(wait_for(SPEC_WAIT_MAX_MS, || socket.exists()), "daemon never bound its socket");
    }

    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.layout().log_dir().join("keel.log")).unwrap_or_default()
    }
}

impl Drop for Home {
    fn drop(&mut self) {
        if let Some(mut child) = self.daemon.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

pub fn keel_binary() -> PathBuf {
    assert_cmd::cargo::cargo_bin("keel")
}

/// Poll `check` every 20ms until it holds or `max_ms` passes.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    check()
}
