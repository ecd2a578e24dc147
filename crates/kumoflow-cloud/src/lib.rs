//! KumoFlow Cloud Platform Abstraction
//!
//! This crate provides the platform abstraction for KumoFlow, enabling
//! lifecycle management of remote, asynchronously-provisioned cloud
//! resources. Mutations are acknowledged synchronously but executed in the
//! background by the remote control plane; progress is observable only
//! through a polled status field.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐  ┌───────────────────────┐
//! │     kumoflow-kube     │  │     kumoflow-logs     │
//! │  (managed Kubernetes) │  │   (logging cluster)   │
//! └───────────┬───────────┘  └───────────┬───────────┘
//!             │                          │
//! ┌───────────▼──────────────────────────▼───────────┐
//! │                kumoflow-converge                  │
//! │        bounded status polling / convergence       │
//! └───────────────────────┬───────────────────────────┘
//!                         │
//! ┌───────────────────────▼───────────────────────────┐
//! │                 kumoflow-cloud                     │
//! │  trait CloudPlatform { submit / status / state }   │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! Transport concerns (HTTP signing, per-request retries, wire formats)
//! belong to the `CloudPlatform` implementation, not to this workspace.

pub mod error;
pub mod mutation;
pub mod platform;
pub mod snapshot;

// Re-exports
pub use error::{CloudError, Result};
pub use mutation::{MutationKind, OperationRef};
pub use platform::CloudPlatform;
pub use snapshot::{ResourceSnapshot, StatusSnapshot};
