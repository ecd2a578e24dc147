//! Resource snapshots
//!
//! Snapshots are immutable observations of a remote resource. The core
//! never mutates a cached copy in place; every poll fetches a fresh one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time status observation of a remote resource.
///
/// Produced by [`CloudPlatform::fetch_status`](crate::CloudPlatform::fetch_status),
/// consumed once by the polling loop, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Status reported by the remote control plane. The vocabulary is
    /// open-ended; resource crates define the values they understand.
    pub status: String,

    /// Raw attributes reported alongside the status.
    pub attributes: HashMap<String, serde_json::Value>,
}

impl StatusSnapshot {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Full state of a remote resource at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Opaque identifier assigned by the remote system on creation,
    /// immutable for the life of the resource.
    pub id: String,

    /// Status reported by the remote control plane.
    pub status: String,

    /// Resource attributes (name, version, configuration blocks, ...).
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the remote system created the resource.
    pub created_at: DateTime<Utc>,
}

impl ResourceSnapshot {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            attributes: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
