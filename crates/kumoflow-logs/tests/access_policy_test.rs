mod common;

use std::sync::Arc;

use common::{OperationPlatform, quick_timing};
use kumoflow_cloud::{MutationKind, ResourceSnapshot};
use kumoflow_converge::ConvergeError;
use kumoflow_logs::{AccessPolicy, AdoptedCluster, LogsClusterManager, LogsError};
use serde_json::json;

fn manager(platform: &Arc<OperationPlatform>) -> LogsClusterManager {
    LogsClusterManager::new(platform.clone()).with_timing(quick_timing())
}

fn remote_cluster() -> ResourceSnapshot {
    ResourceSnapshot::new("ldp-42", "READY")
        .with_attribute("clusterType", json!("PRO"))
        .with_attribute("hostname", json!("gra123.logs.example.net"))
        .with_attribute("region", json!("gra"))
        .with_attribute("queryAllowedNetworks", json!(["192.0.2.0/24"]))
}

fn restricted_policy() -> AccessPolicy {
    AccessPolicy {
        archive_allowed_networks: Vec::new(),
        direct_input_allowed_networks: Vec::new(),
        query_allowed_networks: vec!["10.0.0.0/16".to_string()],
    }
}

#[tokio::test]
async fn test_adopt_snapshots_initial_policy() {
    let platform = Arc::new(OperationPlatform::new());
    platform.set_full_state(remote_cluster());
    platform.push_status("SUCCESS");

    let adopted = manager(&platform)
        .adopt("ldp-42", &restricted_policy())
        .await
        .unwrap();

    // The handle remembers the pre-adoption policy, not the desired one.
    assert_eq!(adopted.id, "ldp-42");
    assert_eq!(
        adopted.initial.query_allowed_networks,
        vec!["192.0.2.0/24"]
    );
    assert!(adopted.initial.archive_allowed_networks.is_empty());

    let submits = platform.submits();
    assert_eq!(submits[0].0, MutationKind::AccessPolicy);
    assert_eq!(submits[0].2["queryAllowedNetworks"], json!(["10.0.0.0/16"]));
}

#[tokio::test]
async fn test_update_polls_operation_to_success() {
    let platform = Arc::new(OperationPlatform::new());
    platform.set_full_state(remote_cluster());
    platform.push_status("PENDING");
    platform.push_status("RUNNING");
    platform.push_status("SUCCESS");

    manager(&platform)
        .update("ldp-42", &restricted_policy())
        .await
        .unwrap();

    // The poll targets the operation, never the cluster itself.
    assert_eq!(
        platform.events(),
        vec![
            "submit access_policy ldp-42",
            "fetch op-1 PENDING",
            "fetch op-1 RUNNING",
            "fetch op-1 SUCCESS",
            "fetch_full_state ldp-42",
        ]
    );
}

#[tokio::test]
async fn test_release_restores_initial_policy() {
    let platform = Arc::new(OperationPlatform::new());
    platform.push_status("SUCCESS");

    let adopted = AdoptedCluster {
        id: "ldp-42".to_string(),
        initial: AccessPolicy {
            archive_allowed_networks: vec!["198.51.100.0/24".to_string()],
            direct_input_allowed_networks: Vec::new(),
            query_allowed_networks: vec!["192.0.2.0/24".to_string()],
        },
    };
    manager(&platform).release(&adopted).await.unwrap();

    let submits = platform.submits();
    assert_eq!(submits.len(), 1);
    assert_eq!(
        submits[0].2,
        json!({
            "archiveAllowedNetworks": ["198.51.100.0/24"],
            "directInputAllowedNetworks": [],
            "queryAllowedNetworks": ["192.0.2.0/24"],
        })
    );
}

#[tokio::test]
async fn test_missing_operation_id_is_an_error() {
    let platform = Arc::new(OperationPlatform::new());
    platform.set_full_state(remote_cluster());
    platform.drop_operation_id();

    let err = manager(&platform)
        .update("ldp-42", &restricted_policy())
        .await
        .unwrap_err();

    match err {
        LogsError::MissingOperation { cluster_id } => assert_eq!(cluster_id, "ldp-42"),
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing was polled.
    assert_eq!(platform.events(), vec!["submit access_policy ldp-42"]);
}

#[tokio::test]
async fn test_stuck_operation_times_out() {
    let platform = Arc::new(OperationPlatform::new());
    platform.set_full_state(remote_cluster());
    platform.repeat_status("PENDING");

    let err = manager(&platform)
        .update("ldp-42", &restricted_policy())
        .await
        .unwrap_err();

    match err {
        LogsError::Converge(ConvergeError::Timeout { resource_id, target, .. }) => {
            assert_eq!(resource_id, "op-1");
            assert_eq!(target, "SUCCESS");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_operation_surfaces_its_status() {
    let platform = Arc::new(OperationPlatform::new());
    platform.set_full_state(remote_cluster());
    platform.push_status("FAILURE");

    let err = manager(&platform)
        .update("ldp-42", &restricted_policy())
        .await
        .unwrap_err();

    match err {
        LogsError::Converge(ConvergeError::UnexpectedStatus { resource_id, status }) => {
            assert_eq!(resource_id, "op-1");
            assert_eq!(status, "FAILURE");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
