//! Cluster lifecycle controller
//!
//! Drives create, update and delete end to end for one cluster at a time.
//! The controller keeps no state beyond its platform handle: every decision
//! is made against a freshly fetched snapshot, so interrupted runs can
//! simply be retried.

use std::sync::Arc;
use std::time::Duration;

use kumoflow_cloud::{CloudPlatform, MutationKind, ResourceSnapshot};
use kumoflow_converge::{StatusExpectation, WaitTiming, converge, wait_for_existence};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::model::{ClusterSpec, ObservedCluster, status};
use crate::sequencer::MutationSequencer;

/// How long a freshly created cluster may take to become readable by
/// identifier. Much shorter than readiness, which is a separate wait.
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(2 * 60);

/// Wait windows used by the controller.
#[derive(Debug, Clone)]
pub struct ClusterTimings {
    /// Wait for a created cluster to become reachable at all.
    pub availability: WaitTiming,

    /// Waits for READY and DELETED convergence, shared with the sequencer's
    /// stabilization waits.
    pub convergence: WaitTiming,
}

impl Default for ClusterTimings {
    fn default() -> Self {
        Self {
            availability: WaitTiming::default().with_timeout(AVAILABILITY_TIMEOUT),
            convergence: WaitTiming::default(),
        }
    }
}

/// Lifecycle controller for managed Kubernetes clusters.
pub struct ClusterController {
    platform: Arc<dyn CloudPlatform>,
    timings: ClusterTimings,
    cancel: CancellationToken,
}

impl ClusterController {
    pub fn new(platform: Arc<dyn CloudPlatform>) -> Self {
        Self {
            platform,
            timings: ClusterTimings::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the wait windows.
    pub fn with_timings(mut self, timings: ClusterTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Tie every wait to an external cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Create a cluster and wait until it is READY.
    ///
    /// The identifier is assigned by the platform. A failed wait is fatal
    /// for the call, but the remote cluster may still exist; cleaning it up
    /// is the caller's bookkeeping.
    pub async fn create(&self, spec: &ClusterSpec) -> Result<ResourceSnapshot> {
        tracing::info!(
            "creating cluster in {} via {}",
            spec.region,
            self.platform.name()
        );
        let payload = serde_json::to_value(spec)?;
        let ack = self
            .platform
            .submit_mutation(MutationKind::Create, "", payload)
            .await?;
        let cluster_id = ack.resource_id;

        // The platform often acks creation before the new cluster is
        // readable by its identifier.
        wait_for_existence(
            self.platform.as_ref(),
            &cluster_id,
            &self.timings.availability,
            &self.cancel,
        )
        .await?;

        converge(
            self.platform.as_ref(),
            &cluster_id,
            &install_expectation(),
            &self.timings.convergence,
            &self.cancel,
        )
        .await?;
        tracing::info!("cluster {} is {}", cluster_id, status::READY);

        Ok(self.platform.fetch_full_state(&cluster_id).await?)
    }

    /// Fetch and decode the current state of a cluster.
    pub async fn observe(&self, cluster_id: &str) -> Result<ObservedCluster> {
        let snapshot = self.platform.fetch_full_state(cluster_id).await?;
        Ok(ObservedCluster::from_snapshot(&snapshot)?)
    }

    /// Reconcile a cluster towards `desired` and return the post-update
    /// snapshot.
    pub async fn update(&self, cluster_id: &str, desired: &ClusterSpec) -> Result<ResourceSnapshot> {
        let observed = self.observe(cluster_id).await?;
        let plan = MutationSequencer::plan(desired, &observed)?;
        self.sequencer().apply(cluster_id, &plan).await?;
        Ok(self.platform.fetch_full_state(cluster_id).await?)
    }

    /// Delete a cluster and wait for it to disappear.
    ///
    /// Deleting an already-absent cluster succeeds: the desired end state
    /// (absence) holds either way.
    pub async fn delete(&self, cluster_id: &str) -> Result<()> {
        tracing::info!("deleting cluster {}", cluster_id);
        match self
            .platform
            .submit_mutation(MutationKind::Delete, cluster_id, serde_json::Value::Null)
            .await
        {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                tracing::debug!("cluster {} is already absent", cluster_id);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        converge(
            self.platform.as_ref(),
            cluster_id,
            &delete_expectation(),
            &self.timings.convergence,
            &self.cancel,
        )
        .await?;
        tracing::info!("cluster {} is {}", cluster_id, status::DELETED);
        Ok(())
    }

    fn sequencer(&self) -> MutationSequencer {
        MutationSequencer::new(self.platform.clone())
            .with_timing(self.timings.convergence.clone())
            .with_cancellation(self.cancel.clone())
    }
}

fn install_expectation() -> StatusExpectation {
    StatusExpectation::new([status::INSTALLING], [status::READY])
}

/// A fully deleted cluster stops answering status reads, so `NotFound`
/// counts as DELETED here.
fn delete_expectation() -> StatusExpectation {
    StatusExpectation::new([status::DELETING], [status::DELETED]).missing_as(status::DELETED)
}
