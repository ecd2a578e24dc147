//! Cloud platform trait definition

use crate::error::Result;
use crate::mutation::{MutationKind, OperationRef};
use crate::snapshot::{ResourceSnapshot, StatusSnapshot};
use async_trait::async_trait;

/// Cloud platform abstraction trait
///
/// Implemented by the transport collaborator that owns HTTP signing, wire
/// formats and per-request retries. The convergence core consumes it as
/// `Arc<dyn CloudPlatform>` and holds no other handle to the remote system.
#[async_trait]
pub trait CloudPlatform: Send + Sync {
    /// Returns the platform name (e.g., "ovh-cloud")
    fn name(&self) -> &str;

    /// Submit a mutation against a resource.
    ///
    /// The call returns once the remote system has acknowledged the request;
    /// the mutation itself completes in the background. For
    /// [`MutationKind::Create`], `resource_id` is empty (the platform handle
    /// carries its project scope) and the returned [`OperationRef`] holds
    /// the identifier assigned to the new resource.
    ///
    /// Idempotent from the core's perspective: the core never retries an
    /// ambiguous failure on its own.
    async fn submit_mutation(
        &self,
        kind: MutationKind,
        resource_id: &str,
        payload: serde_json::Value,
    ) -> Result<OperationRef>;

    /// Fetch the current status of a resource.
    ///
    /// Must report a fully deleted resource as
    /// [`CloudError::NotFound`](crate::CloudError::NotFound) rather than as
    /// a generic API failure; the convergence layer relies on the
    /// distinction.
    async fn fetch_status(&self, resource_id: &str) -> Result<StatusSnapshot>;

    /// Fetch the full state of a resource.
    async fn fetch_full_state(&self, resource_id: &str) -> Result<ResourceSnapshot>;
}
