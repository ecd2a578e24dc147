//! Cloud platform error types

use thiserror::Error;

/// Errors surfaced by a [`CloudPlatform`](crate::CloudPlatform) implementation.
///
/// `NotFound` is structurally distinguishable from every other failure:
/// the convergence layer remaps it during deletion waits and existence
/// waits, and must never confuse it with a transient transport fault.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid mutation payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether this error is the structured "resource does not exist" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
