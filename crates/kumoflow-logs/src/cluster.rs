//! Logging cluster adoption lifecycle
//!
//! Mutations against a logging cluster are acknowledged with a remote
//! operation; the change is live only once that operation's own status
//! reaches SUCCESS. The operation is just another fetchable resource, so
//! the shared convergence loop polls it like anything else.

use std::sync::Arc;
use std::time::Duration;

use kumoflow_cloud::{CloudPlatform, MutationKind};
use kumoflow_converge::{StatusExpectation, WaitTiming, converge};
use tokio_util::sync::CancellationToken;

use crate::error::{LogsError, Result};
use crate::model::{AccessPolicy, ObservedLogsCluster, operation_status};

/// Operations routinely take minutes and occasionally much longer, so the
/// default window is far wider than for other resource families.
fn operation_timing() -> WaitTiming {
    WaitTiming::default()
        .with_timeout(Duration::from_secs(60 * 60))
        .with_initial_delay(Duration::from_secs(10))
}

/// Handle returned by adoption, carrying what release needs to restore.
#[derive(Debug, Clone)]
pub struct AdoptedCluster {
    /// Remote cluster identifier.
    pub id: String,

    /// Access policy as it was before adoption.
    pub initial: AccessPolicy,
}

/// Manages the network access policy of a pre-provisioned logging cluster.
pub struct LogsClusterManager {
    platform: Arc<dyn CloudPlatform>,
    timing: WaitTiming,
    cancel: CancellationToken,
}

impl LogsClusterManager {
    pub fn new(platform: Arc<dyn CloudPlatform>) -> Self {
        Self {
            platform,
            timing: operation_timing(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the operation wait window.
    pub fn with_timing(mut self, timing: WaitTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Tie the operation waits to an external cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Take over management of the cluster: snapshot the current access
    /// policy so release can restore it, then apply the desired one.
    pub async fn adopt(&self, cluster_id: &str, desired: &AccessPolicy) -> Result<AdoptedCluster> {
        let observed = self.observe(cluster_id).await?;
        tracing::info!("adopting logs cluster {}", cluster_id);
        self.apply_policy(cluster_id, desired).await?;
        Ok(AdoptedCluster {
            id: cluster_id.to_string(),
            initial: observed.access,
        })
    }

    /// Fetch and decode the current state of the cluster.
    pub async fn observe(&self, cluster_id: &str) -> Result<ObservedLogsCluster> {
        let snapshot = self.platform.fetch_full_state(cluster_id).await?;
        Ok(ObservedLogsCluster::from_snapshot(&snapshot)?)
    }

    /// Replace the access policy and return the post-update state.
    pub async fn update(
        &self,
        cluster_id: &str,
        policy: &AccessPolicy,
    ) -> Result<ObservedLogsCluster> {
        self.apply_policy(cluster_id, policy).await?;
        self.observe(cluster_id).await
    }

    /// Stop managing the cluster: restore the adoption-time access policy.
    /// The cluster itself belongs to the account and is never destroyed.
    pub async fn release(&self, adopted: &AdoptedCluster) -> Result<()> {
        tracing::info!(
            "releasing logs cluster {}, restoring its initial access policy",
            adopted.id
        );
        self.apply_policy(&adopted.id, &adopted.initial).await
    }

    async fn apply_policy(&self, cluster_id: &str, policy: &AccessPolicy) -> Result<()> {
        let payload = serde_json::to_value(policy)?;
        let ack = self
            .platform
            .submit_mutation(MutationKind::AccessPolicy, cluster_id, payload)
            .await?;
        let operation_id = ack.operation_id.ok_or_else(|| LogsError::MissingOperation {
            cluster_id: cluster_id.to_string(),
        })?;

        tracing::debug!(
            "waiting for operation {} on logs cluster {}",
            operation_id,
            cluster_id
        );
        let expect = StatusExpectation::new(
            [operation_status::PENDING, operation_status::RUNNING],
            [operation_status::SUCCESS],
        );
        converge(
            self.platform.as_ref(),
            &operation_id,
            &expect,
            &self.timing,
            &self.cancel,
        )
        .await?;
        Ok(())
    }
}
