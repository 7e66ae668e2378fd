// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client side of the daemon control socket.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use keel_core::{Layout, VersionHash};
use keel_wire::{self as wire, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;

/// Errors from talking to the daemon
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    NotRunning,

    #[error("not connected")]
    NotConnected,

    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon rejected request: {0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::NotRunning)
    }
}

/// Connection to the daemon's control endpoint.
///
/// One connection per restart attempt: `connect`, `restart`, `disconnect`.
/// `disconnect` must be safe to call when not connected.
#[async_trait]
pub trait ControlClient: Send {
    /// Human-readable endpoint address, used in error messages
    fn endpoint(&self) -> String;

    async fn connect(&mut self) -> Result<(), ClientError>;

    /// Ask the daemon to restart itself
    async fn restart(&mut self) -> Result<(), ClientError>;

    async fn disconnect(&mut self);
}

/// Status reported by a running daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub version: String,
    pub commit: String,
    pub active_commit: Option<VersionHash>,
}

/// Unix-socket client for the local daemon.
#[derive(Debug)]
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
    stream: Option<UnixStream>,
}

impl Clone for DaemonClient {
    /// Clones the address only; the clone starts disconnected.
    fn clone(&self) -> Self {
        Self { socket_path: self.socket_path.clone(), timeout: self.timeout, stream: None }
    }
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { socket_path: socket_path.into(), timeout, stream: None }
    }

    /// Client for the layout's socket, honouring `KEEL_SOCKET`.
    pub fn for_layout(layout: &Layout, timeout: Duration) -> Self {
        let socket = keel_core::env::socket_path().unwrap_or_else(|| layout.socket_path());
        Self::new(socket, timeout)
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one request on the open connection and read its response.
    pub async fn send(&mut self, request: &Request) -> Result<Response, ClientError> {
        let stream = self.stream.as_mut().ok_or(ClientError::NotConnected)?;
        wire::write_request(stream, request, self.timeout).await?;
        let response = wire::read_response(stream, self.timeout).await?;
        Ok(response)
    }

    /// Connect, send a single request, disconnect.
    pub async fn request(&mut self, request: &Request) -> Result<Response, ClientError> {
        self.connect_stream().await?;
        let result = self.send(request).await;
        self.close().await;
        result
    }

    pub async fn status(&mut self) -> Result<DaemonStatus, ClientError> {
        match self.request(&Request::Status).await? {
            Response::Status { uptime_secs, version, commit, active_commit } => {
                Ok(DaemonStatus { uptime_secs, version, commit, active_commit })
            }
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(unexpected(other)),
        }
    }

    async fn connect_stream(&mut self) -> Result<(), ClientError> {
        let connect = UnixStream::connect(&self.socket_path);
        let stream = match tokio::time::timeout(self.timeout, connect).await {
            Err(_) => return Err(ProtocolError::Timeout.into()),
            Ok(Err(e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::ConnectionRefused
                ) =>
            {
                return Err(ClientError::NotRunning)
            }
            Ok(Err(e)) => return Err(ProtocolError::Io(e).into()),
            Ok(Ok(stream)) => stream,
        };
        self.stream = Some(stream);
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }
}

#[async_trait]
impl ControlClient for DaemonClient {
    fn endpoint(&self) -> String {
        self.socket_path.display().to_string()
    }

    async fn connect(&mut self) -> Result<(), ClientError> {
        self.close().await;
        self.connect_stream().await
    }

    async fn restart(&mut self) -> Result<(), ClientError> {
        match self.send(&Request::Restart).await? {
            Response::Restarting => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(unexpected(other)),
        }
    }

    async fn disconnect(&mut self) {
        self.close().await;
    }
}

fn unexpected(response: Response) -> ClientError {
    ClientError::UnexpectedResponse(format!("{response:?}"))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
