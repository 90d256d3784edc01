//! Tests for builder modules

use gang_scheduler_core::builders::build_snapshot;
use gang_scheduler_core::config::SnapshotConfig;
use gang_scheduler_core::core::{Quantity, TaskStatus};
use gang_scheduler_core::model::{Pod, PodGroup};

const POD_GROUP: &str = r#"{
    "metadata": {"name": "train", "namespace": "ml", "creationTimestamp": "2024-03-01T12:00:00Z"},
    "spec": {"minMember": 2, "queue": "gpu"}
}"#;

const NODE: &str = r#"{
    "metadata": {"name": "gpu-1"},
    "status": {
        "allocatable": {"cpu": "16", "memory": "64Gi", "nvidia.com/gpu": "4", "pods": "110"},
        "capacity": {"cpu": "16", "memory": "64Gi", "nvidia.com/gpu": "4", "pods": "110"},
        "conditions": [{"type": "Ready", "status": "True"}]
    }
}"#;

fn worker(name: &str, node: &str, phase: &str) -> Pod {
    serde_json::from_str(&format!(
        r#"{{
            "metadata": {{
                "name": "{name}",
                "namespace": "ml",
                "uid": "uid-{name}",
                "annotations": {{"scheduling.k8s.io/group-name": "train"}}
            }},
            "spec": {{
                "nodeName": "{node}",
                "containers": [{{"name": "main", "resources": {{"requests": {{"cpu": "4", "memory": "16Gi", "nvidia.com/gpu": "2"}}}}}}]
            }},
            "status": {{"phase": "{phase}"}}
        }}"#
    ))
    .unwrap()
}

#[test]
fn test_build_snapshot_from_api_json() {
    let pod_group: PodGroup = serde_json::from_str(POD_GROUP).unwrap();
    let node = serde_json::from_str(NODE).unwrap();
    let pods = [worker("w0", "gpu-1", "Running"), worker("w1", "", "Pending")];

    let snapshot = build_snapshot(&SnapshotConfig::default(), &[node], &[pod_group], &pods, &[]).unwrap();

    let job = &snapshot.jobs["ml/train"];
    assert_eq!(job.queue, "gpu");
    assert_eq!(job.min_available, 2);
    assert!(job.create_timestamp.is_some());
    assert_eq!(job.tasks_with_status(TaskStatus::Running).count(), 1);
    assert_eq!(job.tasks_with_status(TaskStatus::Pending).count(), 1);
    assert!(!job.ready());
    assert_eq!(
        job.fit_error().to_string(),
        "pod group is not ready, Pending 1, Running 1, minAvailable 2"
    );

    let node = &snapshot.nodes["gpu-1"];
    assert!(node.ready());
    assert_eq!(node.allocatable().max_task_num, Some(110));
    assert_eq!(node.idle().get("nvidia.com/gpu").unwrap(), Quantity::from(2000_i64));
}

#[test]
fn test_snapshot_ids_are_unique() {
    let cfg = SnapshotConfig::default();
    let a = build_snapshot(&cfg, &[], &[], &[], &[]).unwrap();
    let b = build_snapshot(&cfg, &[], &[], &[], &[]).unwrap();
    assert_ne!(a.id, b.id);
}
