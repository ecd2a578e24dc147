//! Mutation kinds and operation references

use serde::{Deserialize, Serialize};

/// Kind of mutation submitted against a remote resource.
///
/// Each kind maps to one remote endpoint owned by the platform
/// implementation; the core only cares about ordering and about which
/// kinds trigger re-provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Create a new resource (the returned [`OperationRef`] carries the
    /// identifier the remote system assigned).
    Create,
    /// Replace the customization block (admission plugins, kube-proxy tuning).
    Customization,
    /// Trigger a control-plane version upgrade.
    VersionUpgrade,
    /// Change the update policy (metadata only, no re-provisioning).
    UpdatePolicy,
    /// Change the display name (metadata only, no re-provisioning).
    Rename,
    /// Replace the private-network configuration.
    PrivateNetwork,
    /// Configure the OpenID Connect integration.
    OidcConfigure,
    /// Update the OpenID Connect integration.
    OidcUpdate,
    /// Remove the OpenID Connect integration.
    OidcRemove,
    /// Replace the network access policy of a logging cluster.
    AccessPolicy,
    /// Delete the resource.
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Create => write!(f, "create"),
            MutationKind::Customization => write!(f, "customization"),
            MutationKind::VersionUpgrade => write!(f, "version_upgrade"),
            MutationKind::UpdatePolicy => write!(f, "update_policy"),
            MutationKind::Rename => write!(f, "rename"),
            MutationKind::PrivateNetwork => write!(f, "private_network"),
            MutationKind::OidcConfigure => write!(f, "oidc_configure"),
            MutationKind::OidcUpdate => write!(f, "oidc_update"),
            MutationKind::OidcRemove => write!(f, "oidc_remove"),
            MutationKind::AccessPolicy => write!(f, "access_policy"),
            MutationKind::Delete => write!(f, "delete"),
        }
    }
}

/// Acknowledgment returned by a submitted mutation.
///
/// Some resource families track mutations implicitly: progress is read off
/// the resource status itself and `operation_id` is `None`. Others return a
/// first-class operation whose own status must be polled to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRef {
    /// The resource the mutation targets. For `Create`, the identifier the
    /// remote system assigned to the new resource.
    pub resource_id: String,

    /// Remote operation identifier, when the platform tracks mutations as
    /// first-class operations.
    pub operation_id: Option<String>,
}

impl OperationRef {
    /// Acknowledgment for a mutation tracked through the resource status.
    pub fn resource(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            operation_id: None,
        }
    }

    /// Acknowledgment for a mutation tracked by a remote operation.
    pub fn operation(resource_id: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            operation_id: Some(operation_id.into()),
        }
    }
}
