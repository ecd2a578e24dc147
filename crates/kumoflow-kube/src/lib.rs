//! Managed Kubernetes cluster lifecycle for KumoFlow
//!
//! This crate drives a managed Kubernetes cluster towards its desired
//! state. The platform provisions asynchronously — mutations are
//! acknowledged immediately and take effect minutes later — so every
//! operation here submits, then polls the cluster status until it settles.
//!
//! # Features
//!
//! - Cluster lifecycle: create (wait until READY), update, delete
//!   (wait until gone)
//! - Ordered update sequencing with stabilization waits between
//!   re-provisioning steps
//! - Local version upgrade policy: only the next minor within the
//!   supported major, never a downgrade
//! - OpenID Connect integration management
//!
//! # Example
//!
//! ```ignore
//! use kumoflow_kube::{ClusterController, ClusterSpec};
//!
//! let controller = ClusterController::new(platform);
//!
//! let spec = ClusterSpec::new("GRA7")
//!     .with_name("production")
//!     .with_version("1.26");
//!
//! let cluster = controller.create(&spec).await?;
//! println!("cluster {} is {}", cluster.id, cluster.status);
//!
//! // Later: rename and upgrade in one reconciliation pass.
//! let desired = ClusterSpec::new("GRA7")
//!     .with_name("production-eu")
//!     .with_version("1.27");
//! controller.update(&cluster.id, &desired).await?;
//! ```

pub mod controller;
pub mod error;
pub mod model;
pub mod oidc;
pub mod policy;
pub mod sequencer;

pub use controller::{ClusterController, ClusterTimings};
pub use error::{KubeError, Result};
pub use model::{
    AdmissionPlugins, ApiServerCustomization, ClusterSpec, Customization, IptablesTuning,
    IpvsTuning, KubeProxyCustomization, ObservedCluster, PrivateNetworkConfiguration,
};
pub use oidc::{OidcConfig, OidcIntegration};
pub use policy::{
    ClusterVersion, PolicyError, SUPPORTED_MAJOR, VersionTransition, validate_transition,
};
pub use sequencer::{MutationPlan, MutationSequencer, PendingMutation};
