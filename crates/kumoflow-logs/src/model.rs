//! Logging cluster model

use kumoflow_cloud::ResourceSnapshot;
use serde::{Deserialize, Serialize};

/// Status vocabulary of a remote operation tracking a mutation.
pub mod operation_status {
    pub const PENDING: &str = "PENDING";
    pub const RUNNING: &str = "RUNNING";
    pub const SUCCESS: &str = "SUCCESS";
}

/// Network access policy of a logging cluster: which CIDR blocks may reach
/// each flow type. Empty lists mean unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    /// Allowed networks for the ARCHIVE flow type.
    #[serde(default)]
    pub archive_allowed_networks: Vec<String>,

    /// Allowed networks for the DIRECT_INPUT flow type.
    #[serde(default)]
    pub direct_input_allowed_networks: Vec<String>,

    /// Allowed networks for the QUERY flow type.
    #[serde(default)]
    pub query_allowed_networks: Vec<String>,
}

/// Last observed state of a logging cluster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedLogsCluster {
    /// Identifier assigned by the platform.
    #[serde(skip)]
    pub id: String,

    /// Cluster type, e.g. "PRO" or "DEDICATED".
    #[serde(default)]
    pub cluster_type: String,

    /// Ingestion hostname.
    #[serde(default)]
    pub hostname: String,

    /// Whether content generated by the account lands here by default.
    #[serde(default)]
    pub is_default: bool,

    /// Whether advanced operations are allowed on this cluster.
    #[serde(default)]
    pub is_unlocked: bool,

    /// Data center localization, e.g. "gra".
    #[serde(default)]
    pub region: String,

    /// Current network access policy.
    #[serde(flatten)]
    pub access: AccessPolicy,
}

impl ObservedLogsCluster {
    /// Decode the typed cluster state out of a full-state snapshot.
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Result<Self, serde_json::Error> {
        let attributes = serde_json::to_value(&snapshot.attributes)?;
        let mut observed: ObservedLogsCluster = serde_json::from_value(attributes)?;
        observed.id = snapshot.id.clone();
        Ok(observed)
    }
}
