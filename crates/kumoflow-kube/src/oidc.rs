//! OpenID Connect integration
//!
//! The OIDC integration is a sub-resource of a cluster, and every mutation
//! to it redeploys the control plane. Each call therefore submits, then
//! waits out the same redeploy stabilization as a customization change.

use std::sync::Arc;

use kumoflow_cloud::{CloudPlatform, MutationKind};
use kumoflow_converge::{StatusExpectation, WaitTiming, converge};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{KubeError, Result};
use crate::model::status;

/// OpenID Connect parameters of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcConfig {
    /// OAuth2 client identifier the API server accepts tokens for.
    pub client_id: String,

    /// Issuer URL the API server validates tokens against.
    pub issuer_url: String,
}

impl OidcConfig {
    pub fn new(client_id: impl Into<String>, issuer_url: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            issuer_url: issuer_url.into(),
        }
    }
}

/// Manages the OIDC integration of one cluster.
pub struct OidcIntegration {
    platform: Arc<dyn CloudPlatform>,
    timing: WaitTiming,
    cancel: CancellationToken,
}

impl OidcIntegration {
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

    /// Tie the stabilization waits to an external cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Configure OIDC on a cluster that has none yet.
    pub async fn configure(&self, cluster_id: &str, config: &OidcConfig) -> Result<()> {
        self.submit_and_stabilize(
            MutationKind::OidcConfigure,
            cluster_id,
            serde_json::to_value(config)?,
        )
        .await
    }

    /// Replace the OIDC parameters.
    pub async fn update(&self, cluster_id: &str, config: &OidcConfig) -> Result<()> {
        self.submit_and_stabilize(
            MutationKind::OidcUpdate,
            cluster_id,
            serde_json::to_value(config)?,
        )
        .await
    }

    /// Remove the OIDC integration.
    pub async fn remove(&self, cluster_id: &str) -> Result<()> {
        self.submit_and_stabilize(MutationKind::OidcRemove, cluster_id, serde_json::Value::Null)
            .await
    }

    async fn submit_and_stabilize(
        &self,
        kind: MutationKind,
        cluster_id: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        tracing::info!("submitting {} for cluster {}", kind, cluster_id);
        self.platform
            .submit_mutation(kind, cluster_id, payload)
            .await
            .map_err(|err| KubeError::step(kind, cluster_id, err.into()))?;

        let expect = StatusExpectation::new([status::REDEPLOYING], [status::READY]);
        converge(
            self.platform.as_ref(),
            cluster_id,
            &expect,
            &self.timing,
            &self.cancel,
        )
        .await
        .map_err(|err| KubeError::step(kind, cluster_id, err))?;

        tracing::debug!("cluster {} is {} after {}", cluster_id, status::READY, kind);
        Ok(())
    }
}
