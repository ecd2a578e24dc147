//! Convergence error types

use kumoflow_cloud::CloudError;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a convergence wait.
///
/// A timed-out wait is surfaced with the resource and target so the caller
/// can decide whether to retry the whole operation later; the core performs
/// no outer retry of its own.
#[derive(Error, Debug)]
pub enum ConvergeError {
    #[error("Timeout after {waited:?} waiting for {resource_id} to reach {target}")]
    Timeout {
        resource_id: String,
        target: String,
        waited: Duration,
    },

    #[error("Resource {resource_id} entered unexpected status {status}")]
    UnexpectedStatus { resource_id: String, status: String },

    #[error("Transport error: {0}")]
    Transport(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, ConvergeError>;
