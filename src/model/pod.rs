//! Pod records: the unit of work a task is derived from.

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ResourceList};

/// A pod snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pod {
    /// Identity.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: PodSpec,
    /// Observed state; absent until the cluster reports it.
    pub status: Option<PodStatus>,
}

impl Pod {
    /// `namespace/name`, the key nodes index their tasks by.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }
}

/// Desired state of a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodSpec {
    /// Node the pod is bound to; empty while unscheduled.
    pub node_name: String,
    /// Containers that run for the pod's lifetime.
    pub containers: Vec<Container>,
    /// Containers that run to completion, one at a time, before `containers`.
    pub init_containers: Vec<Container>,
    /// Priority class requested for the pod.
    pub priority_class_name: String,
}

/// A container and the resources it asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    /// Container name.
    pub name: String,
    /// Resource requests and limits.
    pub resources: ResourceRequirements,
}

impl Container {
    /// A container requesting the given resources.
    pub fn with_requests<I, K, V>(name: impl Into<String>, requests: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            resources: ResourceRequirements {
                requests: requests.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
                limits: ResourceList::new(),
            },
        }
    }
}

/// Requests and limits of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRequirements {
    /// Guaranteed amounts, used for placement.
    pub requests: ResourceList,
    /// Upper bounds, enforced at runtime.
    pub limits: ResourceList,
}

/// Observed state of a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodStatus {
    /// Lifecycle phase; absent when the cluster has not reported one.
    pub phase: Option<PodPhase>,
}

impl PodStatus {
    /// A status in the given phase.
    #[must_use]
    pub const fn with_phase(phase: PodPhase) -> Self {
        Self { phase: Some(phase) }
    }
}

/// Lifecycle phase of a pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodPhase {
    /// Accepted but not all containers are running.
    Pending,
    /// Bound to a node with at least one container running.
    Running,
    /// All containers terminated successfully.
    Succeeded,
    /// All containers terminated and at least one failed.
    Failed,
    /// State could not be obtained, or a phase this crate does not know.
    #[serde(other)]
    Unknown,
}
