//! Mutation sequencing
//!
//! One update against a cluster is an ordered list of conditional steps:
//! customization, version upgrade, update policy, rename, private network.
//! Each step is issued only when its field differs from the observed state,
//! and steps that trigger re-provisioning are followed by a stabilization
//! wait before the next one is submitted. The platform serializes
//! overlapping re-provisioning unpredictably, so steps against one cluster
//! are strictly sequential.
//!
//! A failure at step k leaves steps before it applied and the rest never
//! issued. There is no rollback: every step's precondition is "field
//! differs from observed", so re-running the sequencer re-issues only the
//! steps still needed.

use std::sync::Arc;

use kumoflow_cloud::{CloudPlatform, MutationKind};
use kumoflow_converge::{StatusExpectation, WaitTiming, converge};
use tokio_util::sync::CancellationToken;

use crate::error::{KubeError, Result};
use crate::model::{ClusterSpec, Customization, ObservedCluster, status};
use crate::policy;

/// Strategy submitted with every version change. The policy check
/// guarantees the desired version is exactly the next minor, so the
/// platform-side strategy is always this one.
const UPGRADE_STRATEGY: &str = "NEXT_MINOR";

/// One conditional step of an update.
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// Which field changes.
    pub kind: MutationKind,

    /// Observed value, `None` when the platform reports none.
    pub previous: Option<serde_json::Value>,

    /// Desired value.
    pub desired: serde_json::Value,

    /// Wait interposed after submission, for steps that re-provision the
    /// control plane.
    pub stabilization: Option<StatusExpectation>,
}

impl PendingMutation {
    /// Request body submitted to the platform for this step.
    pub fn payload(&self) -> serde_json::Value {
        match self.kind {
            MutationKind::VersionUpgrade => serde_json::json!({ "strategy": UPGRADE_STRATEGY }),
            MutationKind::UpdatePolicy => serde_json::json!({ "updatePolicy": self.desired }),
            MutationKind::Rename => serde_json::json!({ "name": self.desired }),
            _ => self.desired.clone(),
        }
    }
}

/// Ordered steps for one update.
#[derive(Debug, Clone, Default)]
pub struct MutationPlan {
    pub mutations: Vec<PendingMutation>,
}

impl MutationPlan {
    /// True when the cluster already matches the desired state.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingMutation> {
        self.mutations.iter()
    }

    /// Step kinds in execution order, for logs.
    pub fn kinds(&self) -> Vec<MutationKind> {
        self.mutations.iter().map(|m| m.kind).collect()
    }
}

/// Plans and applies the steps of one update against one cluster.
pub struct MutationSequencer {
    platform: Arc<dyn CloudPlatform>,
    timing: WaitTiming,
    cancel: CancellationToken,
}

impl MutationSequencer {
    pub fn new(platform: Arc<dyn CloudPlatform>) -> Self {
        Self {
            platform,
            timing: WaitTiming::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the stabilization wait window.
    pub fn with_timing(mut self, timing: WaitTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Tie the sequencer's waits to an external cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Diff desired against observed state into an ordered step list.
    ///
    /// Unmanaged (`None`) fields are never compared. Planning is pure:
    /// nothing is submitted and no version rule is checked here.
    pub fn plan(desired: &ClusterSpec, observed: &ObservedCluster) -> Result<MutationPlan> {
        let mut mutations = Vec::new();

        if let Some(customization) = &desired.customization {
            if customization_differs(customization, observed.customization.as_ref()) {
                mutations.push(PendingMutation {
                    kind: MutationKind::Customization,
                    previous: observed
                        .customization
                        .as_ref()
                        .map(serde_json::to_value)
                        .transpose()?,
                    desired: serde_json::to_value(customization)?,
                    stabilization: Some(reconfigure_stabilization()),
                });
            }
        }

        if let Some(version) = &desired.version {
            if *version != observed.version {
                mutations.push(PendingMutation {
                    kind: MutationKind::VersionUpgrade,
                    previous: Some(serde_json::Value::String(observed.version.clone())),
                    desired: serde_json::Value::String(version.clone()),
                    stabilization: Some(upgrade_stabilization()),
                });
            }
        }

        if let Some(update_policy) = &desired.update_policy {
            if observed.update_policy.as_ref() != Some(update_policy) {
                mutations.push(PendingMutation {
                    kind: MutationKind::UpdatePolicy,
                    previous: observed.update_policy.clone().map(serde_json::Value::String),
                    desired: serde_json::Value::String(update_policy.clone()),
                    stabilization: None,
                });
            }
        }

        if let Some(name) = &desired.name {
            if *name != observed.name {
                mutations.push(PendingMutation {
                    kind: MutationKind::Rename,
                    previous: Some(serde_json::Value::String(observed.name.clone())),
                    desired: serde_json::Value::String(name.clone()),
                    stabilization: None,
                });
            }
        }

        if let Some(configuration) = &desired.private_network_configuration {
            if observed.private_network_configuration.as_ref() != Some(configuration) {
                mutations.push(PendingMutation {
                    kind: MutationKind::PrivateNetwork,
                    previous: observed
                        .private_network_configuration
                        .as_ref()
                        .map(serde_json::to_value)
                        .transpose()?,
                    desired: serde_json::to_value(configuration)?,
                    stabilization: Some(reconfigure_stabilization()),
                });
            }
        }

        Ok(MutationPlan { mutations })
    }

    /// Apply the plan in order, short-circuiting on the first failure.
    pub async fn apply(&self, cluster_id: &str, plan: &MutationPlan) -> Result<()> {
        if plan.is_empty() {
            tracing::debug!("cluster {} already matches the desired state", cluster_id);
            return Ok(());
        }

        let kinds: Vec<String> = plan.kinds().iter().map(ToString::to_string).collect();
        tracing::info!(
            "applying {} step(s) to cluster {}: {}",
            plan.len(),
            cluster_id,
            kinds.join(", ")
        );

        for mutation in plan.iter() {
            self.apply_step(cluster_id, mutation).await?;
        }
        Ok(())
    }

    async fn apply_step(&self, cluster_id: &str, mutation: &PendingMutation) -> Result<()> {
        // Version rules are enforced before touching the network, so a
        // rejected transition costs nothing remotely.
        if mutation.kind == MutationKind::VersionUpgrade {
            let from = mutation
                .previous
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let to = mutation.desired.as_str().unwrap_or_default();
            let transition = policy::validate_transition(from, to)?;
            tracing::debug!("cluster {} version transition {}", cluster_id, transition);
        }

        tracing::info!("submitting {} for cluster {}", mutation.kind, cluster_id);
        self.platform
            .submit_mutation(mutation.kind, cluster_id, mutation.payload())
            .await
            .map_err(|err| KubeError::step(mutation.kind, cluster_id, err.into()))?;

        if let Some(expect) = &mutation.stabilization {
            let reached = converge(
                self.platform.as_ref(),
                cluster_id,
                expect,
                &self.timing,
                &self.cancel,
            )
            .await
            .map_err(|err| KubeError::step(mutation.kind, cluster_id, err))?;
            tracing::debug!(
                "cluster {} stabilized at {} after {}",
                cluster_id,
                reached,
                mutation.kind
            );
        }
        Ok(())
    }
}

/// Compare only the sub-blocks the desired customization manages, so an
/// unmanaged sub-block present remotely never re-triggers the step.
fn customization_differs(desired: &Customization, observed: Option<&Customization>) -> bool {
    let api_server_differs = desired
        .api_server
        .as_ref()
        .is_some_and(|want| observed.and_then(|c| c.api_server.as_ref()) != Some(want));
    let kube_proxy_differs = desired
        .kube_proxy
        .as_ref()
        .is_some_and(|want| observed.and_then(|c| c.kube_proxy.as_ref()) != Some(want));
    api_server_differs || kube_proxy_differs
}

/// Customization and network changes redeploy or reset the control plane.
fn reconfigure_stabilization() -> StatusExpectation {
    StatusExpectation::new([status::REDEPLOYING, status::RESETTING], [status::READY])
}

/// Version upgrades additionally pass through UPDATING.
fn upgrade_stabilization() -> StatusExpectation {
    StatusExpectation::new(
        [status::UPDATING, status::REDEPLOYING, status::RESETTING],
        [status::READY],
    )
}
