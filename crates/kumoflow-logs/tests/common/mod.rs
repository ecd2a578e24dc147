use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kumoflow_cloud::{
    CloudError, CloudPlatform, MutationKind, OperationRef, ResourceSnapshot, StatusSnapshot,
};
use kumoflow_converge::WaitTiming;

/// Platform fake for a resource family whose mutations are acknowledged
/// with a first-class operation. Status fetches are recorded together with
/// the identifier they target, so tests can assert the operation (not the
/// cluster) is what gets polled.
pub struct OperationPlatform {
    /// Call trace, e.g. "submit access_policy ldp-42", "fetch op-1 PENDING".
    events: Mutex<Vec<String>>,
    /// Scripted `fetch_status` results, consumed front to back.
    statuses: Mutex<VecDeque<StatusSnapshot>>,
    /// Returned once the script is exhausted.
    fallback_status: Mutex<Option<StatusSnapshot>>,
    submits: Mutex<Vec<(MutationKind, String, serde_json::Value)>>,
    full_state: Mutex<Option<ResourceSnapshot>>,
    /// Operation id attached to the next acks; `None` acks without one.
    operation_id: Mutex<Option<String>>,
}

impl OperationPlatform {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: Mutex::new(None),
            submits: Mutex::new(Vec::new()),
            full_state: Mutex::new(None),
            operation_id: Mutex::new(Some("op-1".to_string())),
        }
    }

    pub fn push_status(&self, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(StatusSnapshot::new(status));
    }

    /// Answer every fetch past the end of the script with this status.
    #[allow(dead_code)]
    pub fn repeat_status(&self, status: &str) {
        *self.fallback_status.lock().unwrap() = Some(StatusSnapshot::new(status));
    }

    pub fn set_full_state(&self, snapshot: ResourceSnapshot) {
        *self.full_state.lock().unwrap() = Some(snapshot);
    }

    /// Make the next acknowledgments carry no operation id.
    #[allow(dead_code)]
    pub fn drop_operation_id(&self) {
        *self.operation_id.lock().unwrap() = None;
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn submits(&self) -> Vec<(MutationKind, String, serde_json::Value)> {
        self.submits.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudPlatform for OperationPlatform {
    fn name(&self) -> &str {
        "operation"
    }

    async fn submit_mutation(
        &self,
        kind: MutationKind,
        resource_id: &str,
        payload: serde_json::Value,
    ) -> Result<OperationRef, CloudError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("submit {kind} {resource_id}"));
        self.submits
            .lock()
            .unwrap()
            .push((kind, resource_id.to_string(), payload));

        match self.operation_id.lock().unwrap().clone() {
            Some(operation_id) => Ok(OperationRef::operation(resource_id, operation_id)),
            None => Ok(OperationRef::resource(resource_id)),
        }
    }

    async fn fetch_status(&self, resource_id: &str) -> Result<StatusSnapshot, CloudError> {
        let next = self.statuses.lock().unwrap().pop_front();
        let snapshot = match next {
            Some(snapshot) => snapshot,
            None => match self.fallback_status.lock().unwrap().clone() {
                Some(snapshot) => snapshot,
                None => panic!("status script exhausted"),
            },
        };
        self.events
            .lock()
            .unwrap()
            .push(format!("fetch {} {}", resource_id, snapshot.status));
        Ok(snapshot)
    }

    async fn fetch_full_state(&self, resource_id: &str) -> Result<ResourceSnapshot, CloudError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("fetch_full_state {resource_id}"));
        match self.full_state.lock().unwrap().clone() {
            Some(snapshot) => Ok(snapshot),
            None => Err(CloudError::NotFound(resource_id.to_string())),
        }
    }
}

/// Millisecond-scale wait windows so suites stay fast.
pub fn quick_timing() -> WaitTiming {
    WaitTiming {
        timeout: Duration::from_millis(250),
        initial_delay: Duration::ZERO,
        min_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(2),
        multiplier: 1.0,
    }
}
