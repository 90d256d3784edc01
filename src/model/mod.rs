//! Typed snapshot records of the cluster objects the scheduler consumes.
//!
//! Field names follow the cluster API's camelCase JSON, so records can be
//! deserialized straight from API payloads with `serde_json`.

use std::collections::BTreeMap;

pub mod meta;
pub mod node;
pub mod pod;
pub mod pod_group;
pub mod quota;

pub use meta::ObjectMeta;
pub use node::{ConditionStatus, Node, NodeCondition, NodeSpec, NodeStatus, Taint};
pub use pod::{Container, Pod, PodPhase, PodSpec, PodStatus, ResourceRequirements};
pub use pod_group::{PodGroup, PodGroupPhase, PodGroupSpec, PodGroupStatus};
pub use quota::{ResourceQuota, ResourceQuotaSpec};

/// Resource name to quantity string, e.g. `{"cpu": "500m"}`.
pub type ResourceList = BTreeMap<String, String>;

/// Pod annotation naming the pod group a pod belongs to.
pub const KUBE_GROUP_NAME_ANNOTATION_KEY: &str = "scheduling.k8s.io/group-name";
/// Pod group annotation carried by volcano-managed pods.
pub const VOLCANO_GROUP_NAME_ANNOTATION_KEY: &str = "scheduling.volcano.sh/group-name";
/// Annotation naming the queue a pod or pod group is charged to.
pub const QUEUE_NAME_ANNOTATION_KEY: &str = "scheduling.volcano.sh/queue-name";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_from_api_json() {
        let pod: Pod = serde_json::from_str(
            r#"{
                "metadata": {
                    "name": "p1",
                    "namespace": "c1",
                    "uid": "u-1",
                    "annotations": {"scheduling.k8s.io/group-name": "pg1"},
                    "creationTimestamp": "2020-01-01T00:00:00Z"
                },
                "spec": {
                    "nodeName": "n1",
                    "containers": [{"name": "main", "resources": {"requests": {"cpu": "1", "memory": "1Gi"}}}]
                },
                "status": {"phase": "Running"}
            }"#,
        )
        .unwrap();

        assert_eq!(pod.key(), "c1/p1");
        assert_eq!(pod.spec.node_name, "n1");
        assert_eq!(pod.spec.containers[0].resources.requests["cpu"], "1");
        assert!(pod.spec.init_containers.is_empty());
        assert_eq!(pod.status, Some(PodStatus::with_phase(PodPhase::Running)));
        assert_eq!(pod.metadata.annotations[KUBE_GROUP_NAME_ANNOTATION_KEY], "pg1");
        assert!(!pod.metadata.is_deleting());
    }

    #[test]
    fn test_unrecognized_pod_phase_is_unknown() {
        let pod: Pod = serde_json::from_str(
            r#"{"metadata": {"name": "p1", "namespace": "c1"}, "status": {"phase": "Evicted"}}"#,
        )
        .unwrap();
        assert_eq!(pod.status, Some(PodStatus::with_phase(PodPhase::Unknown)));
        assert_eq!(crate::core::task_info::task_status(&pod), crate::core::TaskStatus::Unknown);
    }

    #[test]
    fn test_node_ready_condition() {
        let mut node: Node = serde_json::from_str(
            r#"{
                "metadata": {"name": "n1"},
                "status": {
                    "allocatable": {"cpu": "8", "pods": "110"},
                    "conditions": [{"type": "Ready", "status": "False"}]
                }
            }"#,
        )
        .unwrap();
        assert!(!node.is_ready_condition_true());

        node.status.conditions = vec![NodeCondition::ready(ConditionStatus::True)];
        assert!(node.is_ready_condition_true());

        node.status.conditions.clear();
        assert!(node.is_ready_condition_true());
    }

    #[test]
    fn test_pod_group_without_spec() {
        let pg: PodGroup = serde_json::from_str(r#"{"metadata": {"name": "pg1", "namespace": "c1"}}"#).unwrap();
        assert!(pg.spec.is_none());
        assert!(pg.status.phase.is_none());
    }
}
