// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart coordinator: asks the running daemon to restart itself.
//!
//! The control endpoint may be briefly unavailable (for example while a
//! previous restart is still in progress), so requests are retried with
//! exponential backoff. The backoff wait also runs before the first attempt:
//! the daemon gets a grace period to finish its own restart bookkeeping
//! before anything is sent.

use async_trait::async_trait;
use keel_core::RestartPolicy;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::client::ControlClient;
use crate::rollback::Restarter;
use crate::UpgradeError;

/// Restart the daemon behind `client`, retrying per `policy`.
///
/// Returns on the first attempt that fully succeeds. When the attempt budget
/// runs out, the last attempt's error is returned; earlier failures are only
/// logged. `cancel` interrupts both the backoff wait and an in-flight attempt.
pub async fn restart_daemon<C>(
    client: &mut C,
    policy: &RestartPolicy,
    cancel: &CancellationToken,
) -> Result<(), UpgradeError>
where
    C: ControlClient + ?Sized,
{
    // Released on every exit path, including early returns
    let retry_token = cancel.child_token();
    let _release = retry_token.clone().drop_guard();

    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = Backoff::new(policy.initial_backoff, policy.max_backoff);

    let mut attempt = 0;
    loop {
        attempt += 1;
        if !backoff.wait(&retry_token).await {
            info!(attempt, "daemon restart cancelled during backoff");
            return Err(UpgradeError::Cancelled);
        }

        debug!(attempt, endpoint = %client.endpoint(), "requesting daemon restart");
        let result = tokio::select! {
            biased;
            _ = retry_token.cancelled() => Err(UpgradeError::Cancelled),
            result = request_restart(client) => result,
        };
        client.disconnect().await;

        match result {
            Ok(()) => {
                info!(attempt, "daemon accepted restart");
                return Ok(());
            }
            Err(UpgradeError::Cancelled) => {
                info!(attempt, "daemon restart cancelled mid-attempt");
                return Err(UpgradeError::Cancelled);
            }
            Err(e) if attempt >= max_attempts => {
                warn!(attempt, error = %e, "daemon restart failed, giving up");
                return Err(e);
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "daemon restart attempt failed, retrying");
            }
        }
    }
}

/// One attempt: connect, then ask for the restart.
async fn request_restart<C>(client: &mut C) -> Result<(), UpgradeError>
where
    C: ControlClient + ?Sized,
{
    client
        .connect()
        .await
        .map_err(|source| UpgradeError::Network { endpoint: client.endpoint(), source })?;
    client.restart().await.map_err(UpgradeError::Rpc)
}

/// [`Restarter`] that restarts through a fresh clone of `client` per call.
#[derive(Debug, Clone)]
pub struct RestartCoordinator<C> {
    client: C,
    policy: RestartPolicy,
}

impl<C> RestartCoordinator<C>
where
    C: ControlClient + Clone + Sync,
{
    pub fn new(client: C, policy: RestartPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RestartPolicy {
        &self.policy
    }
}

#[async_trait]
impl<C> Restarter for RestartCoordinator<C>
where
    C: ControlClient + Clone + Sync,
{
    async fn restart(&self, cancel: &CancellationToken) -> Result<(), UpgradeError> {
        let mut client = self.client.clone();
        restart_daemon(&mut client, &self.policy, cancel).await
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
