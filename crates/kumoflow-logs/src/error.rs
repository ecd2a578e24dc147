//! Logging cluster error types

use kumoflow_cloud::CloudError;
use kumoflow_converge::ConvergeError;
use thiserror::Error;

/// Errors raised while managing a logging cluster.
#[derive(Error, Debug)]
pub enum LogsError {
    /// The platform acknowledged a mutation without the operation
    /// identifier its progress is tracked by.
    #[error("Platform returned no operation id for the mutation on logs cluster {cluster_id}")]
    MissingOperation { cluster_id: String },

    /// The tracking operation failed to reach SUCCESS.
    #[error("Convergence failed: {0}")]
    Converge(#[from] ConvergeError),

    /// Platform call failure.
    #[error("Cloud error: {0}")]
    Cloud(#[from] CloudError),

    /// Observed state did not decode into the typed model.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for logging cluster operations
pub type Result<T> = std::result::Result<T, LogsError>;
