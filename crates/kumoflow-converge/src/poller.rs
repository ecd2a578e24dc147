//! Status polling loop
//!
//! One primitive drives every wait in the workspace: fetch the status of a
//! remote resource at a bounded rate until it converges. A status inside
//! the target set terminates the wait successfully; a status outside both
//! the pending and target sets terminates it immediately as a failure —
//! continuing to poll a status outside the expected transition graph would
//! be unsound.

use crate::error::{ConvergeError, Result};
use crate::timing::WaitTiming;
use kumoflow_cloud::{CloudError, CloudPlatform};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Pending and target status sets for one convergence wait.
#[derive(Debug, Clone)]
pub struct StatusExpectation {
    /// Statuses meaning "operation still in progress".
    pending: Vec<String>,

    /// Statuses meaning "operation completed successfully".
    target: Vec<String>,

    /// Synthetic status substituted when a fetch reports `NotFound`.
    ///
    /// A fully deleted resource stops existing and its status can no longer
    /// be read, so deletion waits remap the structured `NotFound` signal to
    /// a terminal status instead of failing. Without a remap, `NotFound` is
    /// a transport error like any other.
    missing_as: Option<String>,
}

impl StatusExpectation {
    pub fn new<P, T>(pending: P, target: T) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            pending: pending.into_iter().map(Into::into).collect(),
            target: target.into_iter().map(Into::into).collect(),
            missing_as: None,
        }
    }

    /// Remap a `NotFound` fetch result to the given terminal status.
    pub fn missing_as(mut self, status: impl Into<String>) -> Self {
        self.missing_as = Some(status.into());
        self
    }

    pub fn is_target(&self, status: &str) -> bool {
        self.target.iter().any(|s| s == status)
    }

    pub fn is_pending(&self, status: &str) -> bool {
        self.pending.iter().any(|s| s == status)
    }

    /// Label for logs and timeout errors, e.g. "READY".
    pub fn target_label(&self) -> String {
        self.target.join("/")
    }
}

/// Terminal result of a polling run. No other outcome is valid.
#[derive(Debug)]
pub enum PollOutcome {
    /// The status entered the target set.
    Reached(String),
    /// The status left the pending set without entering the target set.
    LeftPending(String),
    /// The deadline elapsed, or the wait was cancelled.
    TimedOut,
    /// A fetch failed with something other than a remapped `NotFound`.
    TransportError(CloudError),
}

/// Poll `resource_id` until its status converges per `expect`.
///
/// Sleeps `timing.initial_delay` before the first fetch, then fetches at
/// intervals that back off from `timing.min_interval` but never fall below
/// it. Cancelling `cancel` (or dropping the returned future) stops polling;
/// a cancelled wait reports [`PollOutcome::TimedOut`], never success.
pub async fn wait_for_status(
    platform: &dyn CloudPlatform,
    resource_id: &str,
    expect: &StatusExpectation,
    timing: &WaitTiming,
    cancel: &CancellationToken,
) -> PollOutcome {
    let deadline = Instant::now() + timing.timeout;

    tracing::debug!(
        "waiting for {} to reach {} (pending: {})",
        resource_id,
        expect.target_label(),
        expect.pending.join("/"),
    );

    if !pause(timing.initial_delay, deadline, cancel).await {
        return PollOutcome::TimedOut;
    }

    let mut attempt = 0;
    loop {
        let status = match platform.fetch_status(resource_id).await {
            Ok(snapshot) => snapshot.status,
            Err(CloudError::NotFound(_)) if expect.missing_as.is_some() => {
                // The resource disappeared, which is exactly what a
                // deletion wait is looking for.
                expect.missing_as.clone().unwrap_or_default()
            }
            Err(err) => return PollOutcome::TransportError(err),
        };

        if expect.is_target(&status) {
            tracing::debug!("{} reached {}", resource_id, status);
            return PollOutcome::Reached(status);
        }
        if !expect.is_pending(&status) {
            tracing::warn!(
                "{} left its pending set with unexpected status {}",
                resource_id,
                status
            );
            return PollOutcome::LeftPending(status);
        }

        if !pause(timing.interval_for_attempt(attempt), deadline, cancel).await {
            tracing::warn!(
                "timed out waiting for {} to reach {}",
                resource_id,
                expect.target_label()
            );
            return PollOutcome::TimedOut;
        }
        attempt += 1;
    }
}

/// [`wait_for_status`] with the outcome mapped into a `Result`.
///
/// `Reached` becomes the reached status; every other outcome becomes the
/// corresponding [`ConvergeError`] carrying the resource identifier.
pub async fn converge(
    platform: &dyn CloudPlatform,
    resource_id: &str,
    expect: &StatusExpectation,
    timing: &WaitTiming,
    cancel: &CancellationToken,
) -> Result<String> {
    match wait_for_status(platform, resource_id, expect, timing, cancel).await {
        PollOutcome::Reached(status) => Ok(status),
        PollOutcome::LeftPending(status) => Err(ConvergeError::UnexpectedStatus {
            resource_id: resource_id.to_string(),
            status,
        }),
        PollOutcome::TimedOut => Err(ConvergeError::Timeout {
            resource_id: resource_id.to_string(),
            target: expect.target_label(),
            waited: timing.timeout,
        }),
        PollOutcome::TransportError(err) => Err(err.into()),
    }
}

/// Wait until `resource_id` becomes reachable at all.
///
/// Remote systems frequently acknowledge a creation before the new resource
/// is readable by identifier. Here `NotFound` means "not yet": keep
/// polling. Any other fetch error is terminal, and readiness is not
/// checked — that is a separate, longer wait.
pub async fn wait_for_existence(
    platform: &dyn CloudPlatform,
    resource_id: &str,
    timing: &WaitTiming,
    cancel: &CancellationToken,
) -> Result<()> {
    let deadline = Instant::now() + timing.timeout;
    let timeout = || ConvergeError::Timeout {
        resource_id: resource_id.to_string(),
        target: "available".to_string(),
        waited: timing.timeout,
    };

    tracing::debug!("waiting for {} to become available", resource_id);

    if !pause(timing.initial_delay, deadline, cancel).await {
        return Err(timeout());
    }

    let mut attempt = 0;
    loop {
        match platform.fetch_status(resource_id).await {
            Ok(_) => {
                tracing::debug!("{} is available", resource_id);
                return Ok(());
            }
            Err(CloudError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        if !pause(timing.interval_for_attempt(attempt), deadline, cancel).await {
            return Err(timeout());
        }
        attempt += 1;
    }
}

/// Sleep for `duration`, bounded by `deadline` and `cancel`.
///
/// Returns false when the deadline or a cancellation cut the wait short.
async fn pause(
    duration: std::time::Duration,
    deadline: Instant,
    cancel: &CancellationToken,
) -> bool {
    let wake = Instant::now() + duration;
    tokio::select! {
        _ = tokio::time::sleep_until(wake.min(deadline)) => Instant::now() < deadline,
        _ = cancel.cancelled() => false,
    }
}
