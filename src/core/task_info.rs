//! The scheduler's view of a single pod.

use crate::core::{Resource, TaskStatus};
use crate::model::{Pod, PodPhase, KUBE_GROUP_NAME_ANNOTATION_KEY};

/// A pod reduced to what placement decisions need.
///
/// Cloning is deep: the backing pod and both request vectors are copied, so a
/// node ledger can hold a snapshot that later status changes do not touch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInfo {
    /// Pod uid.
    pub uid: String,
    /// `<namespace>/<pod group>`, or empty when the pod is not in a gang.
    pub job: String,
    /// Pod name.
    pub name: String,
    /// Pod namespace.
    pub namespace: String,
    /// Sum of the regular containers' requests.
    pub resource_requests: Resource,
    /// What the pod needs at its peak, init containers included.
    pub init_resource_requests: Resource,
    /// Node the task is placed on; empty while unplaced.
    pub node_name: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Scheduling priority.
    pub priority: i32,
    /// Whether the task's volumes are bound.
    pub volume_ready: bool,
    /// The pod this task was derived from.
    pub pod: Pod,
}

impl TaskInfo {
    /// Derive a task from a pod.
    #[must_use]
    pub fn new(pod: Pod) -> Self {
        let resource_requests = pod_resource_without_init_containers(&pod);
        let init_resource_requests = pod_resource_request(&pod);

        Self {
            uid: pod.metadata.uid.clone(),
            job: job_id(&pod),
            name: pod.metadata.name.clone(),
            namespace: pod.metadata.namespace.clone(),
            resource_requests,
            init_resource_requests,
            node_name: pod.spec.node_name.clone(),
            status: task_status(&pod),
            priority: 1,
            volume_ready: false,
            pod,
        }
    }

    /// `namespace/name` of the backing pod.
    #[must_use]
    pub fn pod_key(&self) -> String {
        self.pod.key()
    }
}

/// Job id of a pod: `<namespace>/<group>` from the group-name annotation, or
/// an empty string when either part is missing.
#[must_use]
pub fn job_id(pod: &Pod) -> String {
    let Some(group) = pod.metadata.annotations.get(KUBE_GROUP_NAME_ANNOTATION_KEY) else {
        return String::new();
    };

    if pod.metadata.namespace.is_empty() || group.is_empty() {
        return String::new();
    }
    format!("{}/{group}", pod.metadata.namespace)
}

/// Status of a pod as the scheduler tracks it.
///
/// A pending or running pod that is being deleted is `Releasing`; a pending pod
/// that already has a node is `Bound`.
#[must_use]
pub fn task_status(pod: &Pod) -> TaskStatus {
    let Some(phase) = pod.status.as_ref().and_then(|status| status.phase) else {
        return TaskStatus::Unknown;
    };

    match phase {
        PodPhase::Running | PodPhase::Pending if pod.metadata.is_deleting() => TaskStatus::Releasing,
        PodPhase::Running => TaskStatus::Running,
        PodPhase::Pending if pod.spec.node_name.is_empty() => TaskStatus::Pending,
        PodPhase::Pending => TaskStatus::Bound,
        PodPhase::Succeeded => TaskStatus::Succeeded,
        PodPhase::Failed => TaskStatus::Failed,
        PodPhase::Unknown => TaskStatus::Unknown,
    }
}

/// Sum of the requests of the pod's regular containers.
#[must_use]
pub fn pod_resource_without_init_containers(pod: &Pod) -> Resource {
    pod.spec.containers.iter().fold(Resource::new(), |total, container| {
        let request = Resource::from_resource_list(&container.resources.requests);
        total.checked_add(&request).unwrap_or_else(|| {
            tracing::warn!(
                "pod <{}>: skipping requests of container {} that overflow the total",
                pod.key(),
                container.name
            );
            total
        })
    })
}

/// Peak request of the pod: the regular containers' sum raised, per
/// dimension, to whatever any single init container asks for.
#[must_use]
pub fn pod_resource_request(pod: &Pod) -> Resource {
    let mut result = pod_resource_without_init_containers(pod);
    for container in &pod.spec.init_containers {
        result.set_max_resource(&Resource::from_resource_list(&container.resources.requests));
    }
    result
}
