use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kumoflow_cloud::{
    CloudError, CloudPlatform, MutationKind, OperationRef, ResourceSnapshot, StatusSnapshot,
};
use kumoflow_converge::WaitTiming;
use kumoflow_kube::ClusterTimings;

/// Platform fake that replays a scripted status sequence and records every
/// call in chronological order, so tests can assert on exact interleaving
/// of submits and fetches.
pub struct RecordingPlatform {
    /// Call trace, e.g. "submit customization", "fetch READY".
    events: Mutex<Vec<String>>,
    /// Scripted `fetch_status` results, consumed front to back.
    statuses: Mutex<VecDeque<Result<StatusSnapshot, CloudError>>>,
    /// Returned once the script is exhausted.
    fallback_status: Mutex<Option<StatusSnapshot>>,
    /// Successfully acknowledged mutations.
    submits: Mutex<Vec<(MutationKind, String, serde_json::Value)>>,
    full_state: Mutex<Option<ResourceSnapshot>>,
    submit_error: Mutex<Option<CloudError>>,
    created_id: String,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: Mutex::new(None),
            submits: Mutex::new(Vec::new()),
            full_state: Mutex::new(None),
            submit_error: Mutex::new(None),
            created_id: "kube-123".to_string(),
        }
    }

    pub fn push_status(&self, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Ok(StatusSnapshot::new(status)));
    }

    #[allow(dead_code)]
    pub fn push_not_found(&self) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Err(CloudError::NotFound(self.created_id.clone())));
    }

    /// Answer every fetch past the end of the script with this status.
    #[allow(dead_code)]
    pub fn repeat_status(&self, status: &str) {
        *self.fallback_status.lock().unwrap() = Some(StatusSnapshot::new(status));
    }

    #[allow(dead_code)]
    pub fn set_full_state(&self, snapshot: ResourceSnapshot) {
        *self.full_state.lock().unwrap() = Some(snapshot);
    }

    /// Fail the next `submit_mutation` call with this error.
    #[allow(dead_code)]
    pub fn fail_next_submit(&self, error: CloudError) {
        *self.submit_error.lock().unwrap() = Some(error);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn submits(&self) -> Vec<(MutationKind, String, serde_json::Value)> {
        self.submits.lock().unwrap().clone()
    }

    pub fn submitted_kinds(&self) -> Vec<MutationKind> {
        self.submits().iter().map(|(kind, _, _)| *kind).collect()
    }
}

#[async_trait]
impl CloudPlatform for RecordingPlatform {
    fn name(&self) -> &str {
        "recording"
    }

    async fn submit_mutation(
        &self,
        kind: MutationKind,
        resource_id: &str,
        payload: serde_json::Value,
    ) -> Result<OperationRef, CloudError> {
        self.events.lock().unwrap().push(format!("submit {kind}"));
        if let Some(err) = self.submit_error.lock().unwrap().take() {
            return Err(err);
        }
        self.submits
            .lock()
            .unwrap()
            .push((kind, resource_id.to_string(), payload));

        let id = if kind == MutationKind::Create {
            self.created_id.clone()
        } else {
            resource_id.to_string()
        };
        Ok(OperationRef::resource(id))
    }

    async fn fetch_status(&self, _resource_id: &str) -> Result<StatusSnapshot, CloudError> {
        let next = self.statuses.lock().unwrap().pop_front();
        let result = match next {
            Some(result) => result,
            None => match self.fallback_status.lock().unwrap().clone() {
                Some(snapshot) => Ok(snapshot),
                None => panic!("status script exhausted"),
            },
        };

        let label = match &result {
            Ok(snapshot) => format!("fetch {}", snapshot.status),
            Err(CloudError::NotFound(_)) => "fetch not-found".to_string(),
            Err(_) => "fetch error".to_string(),
        };
        self.events.lock().unwrap().push(label);
        result
    }

    async fn fetch_full_state(&self, resource_id: &str) -> Result<ResourceSnapshot, CloudError> {
        self.events
            .lock()
            .unwrap()
            .push("fetch_full_state".to_string());
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

#[allow(dead_code)]
pub fn quick_timings() -> ClusterTimings {
    ClusterTimings {
        availability: quick_timing(),
        convergence: quick_timing(),
    }
}
