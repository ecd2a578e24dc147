//! Managed Kubernetes cluster model
//!
//! Typed desired and observed state for a cluster. Every mutable field of
//! [`ClusterSpec`] is an `Option`: `None` means the field is unmanaged and
//! stays exactly as the platform provisioned it.

use kumoflow_cloud::ResourceSnapshot;
use serde::{Deserialize, Serialize};

/// Status vocabulary the platform reports for a cluster.
pub mod status {
    pub const INSTALLING: &str = "INSTALLING";
    pub const READY: &str = "READY";
    pub const UPDATING: &str = "UPDATING";
    pub const REDEPLOYING: &str = "REDEPLOYING";
    pub const RESETTING: &str = "RESETTING";
    pub const DELETING: &str = "DELETING";
    pub const DELETED: &str = "DELETED";
}

/// Desired state of a managed Kubernetes cluster.
///
/// Serializes to the platform's wire shape, so it doubles as the creation
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Deployment region, immutable after creation.
    pub region: String,

    /// Control plane version, e.g. "1.26". The platform picks its default
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Private network to attach the nodes to, immutable after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_network_id: Option<String>,

    /// kube-proxy mode, "iptables" or "ipvs", immutable after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kube_proxy_mode: Option<String>,

    /// Control plane customization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,

    /// ALWAYS_UPDATE, MINIMAL_DOWNTIME or NEVER_UPDATE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<String>,

    /// Egress routing through the attached private network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_network_configuration: Option<PrivateNetworkConfiguration>,
}

impl ClusterSpec {
    /// Create a spec for the given region, everything else unmanaged.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_update_policy(mut self, update_policy: impl Into<String>) -> Self {
        self.update_policy = Some(update_policy.into());
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    pub fn with_private_network(mut self, configuration: PrivateNetworkConfiguration) -> Self {
        self.private_network_configuration = Some(configuration);
        self
    }
}

/// Control plane customization blocks.
///
/// A `None` sub-block is unmanaged: only the blocks that are set get
/// compared and submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server: Option<ApiServerCustomization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_proxy: Option<KubeProxyCustomization>,
}

/// API server customization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiServerCustomization {
    #[serde(default)]
    pub admission_plugins: AdmissionPlugins,
}

/// Admission plugins toggled on the API server, by name
/// (e.g. "NodeRestriction", "AlwaysPullImages").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionPlugins {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// kube-proxy runtime tuning. Durations are ISO 8601 strings, e.g. "PT30S".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeProxyCustomization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iptables: Option<IptablesTuning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipvs: Option<IpvsTuning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IptablesTuning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sync_period: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpvsTuning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sync_period: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_period: Option<String>,

    /// IPVS scheduler, e.g. "rr".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_fin_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_timeout: Option<String>,
}

/// Egress routing configuration for a cluster attached to a private network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateNetworkConfiguration {
    /// All egress traffic is routed towards this IP of the private network;
    /// empty string disables the gateway.
    pub default_vrack_gateway: String,

    /// Route through the nodes' private interface instead of the public one.
    pub private_network_routing_as_default: bool,
}

/// Last observed state of a cluster, decoded from a full-state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedCluster {
    /// Identifier assigned by the platform.
    #[serde(skip)]
    pub id: String,

    /// Status at fetch time.
    #[serde(skip)]
    pub status: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub update_policy: Option<String>,

    #[serde(default)]
    pub customization: Option<Customization>,

    #[serde(default)]
    pub private_network_id: Option<String>,

    #[serde(default)]
    pub private_network_configuration: Option<PrivateNetworkConfiguration>,

    /// Whether the whole cluster runs the latest patches.
    #[serde(default)]
    pub is_up_to_date: bool,

    /// Whether the control plane alone runs the latest patches.
    #[serde(default)]
    pub control_plane_is_up_to_date: bool,

    /// Versions the platform currently offers as upgrade targets.
    #[serde(default)]
    pub next_upgrade_versions: Vec<String>,

    /// Management URL of the node pools.
    #[serde(default)]
    pub nodes_url: Option<String>,

    /// API server endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

impl ObservedCluster {
    /// Decode the typed cluster state out of a full-state snapshot.
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Result<Self, serde_json::Error> {
        let attributes = serde_json::to_value(&snapshot.attributes)?;
        let mut observed: ObservedCluster = serde_json::from_value(attributes)?;
        observed.id = snapshot.id.clone();
        observed.status = snapshot.status.clone();
        Ok(observed)
    }
}
