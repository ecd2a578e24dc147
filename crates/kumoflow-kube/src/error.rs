//! Kubernetes lifecycle error types

use kumoflow_cloud::{CloudError, MutationKind};
use kumoflow_converge::ConvergeError;
use thiserror::Error;

use crate::policy::PolicyError;

/// Errors raised while driving a cluster towards its desired state.
#[derive(Error, Debug)]
pub enum KubeError {
    /// The requested version transition is rejected locally; nothing was
    /// submitted to the platform.
    #[error("Upgrade policy violation: {0}")]
    Policy(#[from] PolicyError),

    /// A sequenced step was submitted but failed to settle. Earlier steps
    /// stay applied; later ones were never issued.
    #[error("Step {step} failed for cluster {cluster_id}: {source}")]
    Step {
        step: MutationKind,
        cluster_id: String,
        #[source]
        source: ConvergeError,
    },

    /// Convergence failure outside a sequenced step (create / delete waits).
    #[error("Convergence failed: {0}")]
    Converge(#[from] ConvergeError),

    /// Platform call failure.
    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),

    /// Observed state did not decode into the typed model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KubeError {
    /// Wrap a convergence failure with the step and cluster it belongs to.
    pub fn step(step: MutationKind, cluster_id: impl Into<String>, source: ConvergeError) -> Self {
        KubeError::Step {
            step,
            cluster_id: cluster_id.into(),
            source,
        }
    }
}

/// Result type for cluster lifecycle operations
pub type Result<T> = std::result::Result<T, KubeError>;
