//! Logging cluster adoption and access policy management for KumoFlow
//!
//! A logging cluster is provisioned with the account, not by us, so its
//! lifecycle is adoption-based instead of create/destroy.
//!
//! # Features
//!
//! - Adopt: snapshot the access policy as it was, then apply the desired one
//! - Update: replace the network access policy (per-flow CIDR allowlists)
//! - Release: restore the adoption-time policy; the cluster itself is
//!   never destroyed
//!
//! Mutations on this resource family are tracked by first-class remote
//! operations: the acknowledgment carries an operation identifier whose own
//! status is polled to SUCCESS before the call returns. Operations routinely
//! take minutes, so the default wait window is an hour.
//!
//! # Example
//!
//! ```ignore
//! use kumoflow_logs::{AccessPolicy, LogsClusterManager};
//!
//! let manager = LogsClusterManager::new(platform);
//!
//! let policy = AccessPolicy {
//!     query_allowed_networks: vec!["10.0.0.0/16".to_string()],
//!     ..Default::default()
//! };
//! let adopted = manager.adopt("ldp-42", &policy).await?;
//!
//! // Hand the cluster back exactly as we found it.
//! manager.release(&adopted).await?;
//! ```

pub mod cluster;
pub mod error;
pub mod model;

pub use cluster::{AdoptedCluster, LogsClusterManager};
pub use error::{LogsError, Result};
pub use model::{AccessPolicy, ObservedLogsCluster};
