//! Assemble a scheduling snapshot from cluster records.
//!
//! The snapshot owns independent [`NodeInfo`] and [`JobInfo`] values, so a
//! scheduling cycle can mutate it freely without touching the records it was
//! built from.

use std::collections::HashMap;

use uuid::Uuid;

use crate::config::SnapshotConfig;
use crate::core::{JobInfo, NamespaceCollection, NamespaceInfo, NodeInfo, SchedulerError, TaskInfo, TaskStatus};
use crate::model::{Node, Pod, PodGroup, ResourceQuota};

/// Point-in-time view of the cluster for one scheduling cycle.
#[derive(Debug, Clone)]
pub struct ClusterSnapshot {
    /// Identifies the snapshot in logs.
    pub id: Uuid,
    /// Jobs keyed by `<namespace>/<pod group>`.
    pub jobs: HashMap<String, JobInfo>,
    /// Nodes keyed by name.
    pub nodes: HashMap<String, NodeInfo>,
    /// Effective namespace weights keyed by namespace.
    pub namespaces: HashMap<String, NamespaceInfo>,
}

/// Build a snapshot.
///
/// Nodes become ledgers (not-ready ones are dropped when the configuration
/// says so), pod groups become jobs, and every pod becomes a task placed on
/// its node and added to its job. Finished pods are not charged to nodes.
/// Pods outside any gang are left out. Every namespace with a job gets a
/// weight, the default one when it has no weighted quota.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidConfig`] when `cfg` does not validate.
pub fn build_snapshot(
    cfg: &SnapshotConfig,
    nodes: &[Node],
    pod_groups: &[PodGroup],
    pods: &[Pod],
    quotas: &[ResourceQuota],
) -> Result<ClusterSnapshot, SchedulerError> {
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    let mut snapshot = ClusterSnapshot {
        id: Uuid::new_v4(),
        jobs: HashMap::new(),
        nodes: HashMap::new(),
        namespaces: HashMap::new(),
    };

    for node in nodes {
        let info = NodeInfo::new(Some(node.clone()));
        if cfg.skip_not_ready_nodes && !info.ready() {
            tracing::debug!(
                "skipping node {}: {}",
                node.metadata.name,
                info.state().reason
            );
            continue;
        }
        snapshot.nodes.insert(node.metadata.name.clone(), info);
    }

    for pod_group in pod_groups {
        let uid = format!("{}/{}", pod_group.metadata.namespace, pod_group.metadata.name);
        let mut job = JobInfo::new(uid.clone(), []);
        job.set_pod_group(pod_group.clone());
        snapshot.jobs.insert(uid, job);
    }

    for pod in pods {
        add_pod(&mut snapshot, pod);
    }

    let mut collections: HashMap<String, NamespaceCollection> = HashMap::new();
    for quota in quotas {
        let namespace = &quota.metadata.namespace;
        collections
            .entry(namespace.clone())
            .or_insert_with(|| NamespaceCollection::with_config(namespace.clone(), cfg))
            .update(quota)?;
    }

    snapshot.namespaces = collections
        .iter()
        .map(|(namespace, collection)| (namespace.clone(), collection.snapshot()))
        .collect();
    for job in snapshot.jobs.values() {
        snapshot
            .namespaces
            .entry(job.namespace.clone())
            .or_insert_with(|| NamespaceInfo {
                name: job.namespace.clone(),
                weight: cfg.default_namespace_weight,
            });
    }

    tracing::info!(
        "built snapshot {}: {} jobs, {} nodes, {} namespaces",
        snapshot.id,
        snapshot.jobs.len(),
        snapshot.nodes.len(),
        snapshot.namespaces.len()
    );
    Ok(snapshot)
}

fn add_pod(snapshot: &mut ClusterSnapshot, pod: &Pod) {
    let mut task = TaskInfo::new(pod.clone());

    let terminated = matches!(task.status, TaskStatus::Succeeded | TaskStatus::Failed);
    if !task.node_name.is_empty() && !terminated {
        match snapshot.nodes.get_mut(&task.node_name) {
            Some(node) => {
                if let Err(err) = node.add_task(&mut task) {
                    tracing::warn!("snapshot {}: cannot place task {}: {err}", snapshot.id, task.pod_key());
                }
            }
            None => tracing::debug!(
                "snapshot {}: node {} of task {} is not in the snapshot",
                snapshot.id,
                task.node_name,
                task.pod_key()
            ),
        }
    }

    if task.job.is_empty() {
        tracing::debug!("snapshot {}: task {} belongs to no job", snapshot.id, task.pod_key());
        return;
    }

    snapshot
        .jobs
        .entry(task.job.clone())
        .or_insert_with(|| {
            let mut job = JobInfo::new(task.job.clone(), []);
            job.namespace.clone_from(&task.namespace);
            job
        })
        .add_task_info(task);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConditionStatus, Container, NodeCondition, NodeStatus, ObjectMeta, PodGroupSpec, PodPhase, PodSpec, PodStatus,
        ResourceQuotaSpec, KUBE_GROUP_NAME_ANNOTATION_KEY,
    };

    fn node(name: &str, cpu: &str, ready: bool) -> Node {
        let alloc: crate::model::ResourceList = [("cpu".to_string(), cpu.to_string())].into();
        let status = if ready { ConditionStatus::True } else { ConditionStatus::False };
        Node {
            metadata: ObjectMeta::named("", name),
            status: NodeStatus {
                allocatable: alloc.clone(),
                capacity: alloc,
                conditions: vec![NodeCondition::ready(status)],
            },
            ..Node::default()
        }
    }

    fn pod(name: &str, group: Option<&str>, node: &str, phase: PodPhase) -> Pod {
        let mut metadata = ObjectMeta {
            uid: format!("c1/{name}"),
            ..ObjectMeta::named("c1", name)
        };
        if let Some(group) = group {
            metadata
                .annotations
                .insert(KUBE_GROUP_NAME_ANNOTATION_KEY.into(), group.into());
        }
        Pod {
            metadata,
            spec: PodSpec {
                node_name: node.into(),
                containers: vec![Container::with_requests("main", [("cpu", "1")])],
                ..PodSpec::default()
            },
            status: Some(PodStatus::with_phase(phase)),
        }
    }

    fn pod_group(name: &str, min_member: u32) -> PodGroup {
        PodGroup {
            metadata: ObjectMeta::named("c1", name),
            spec: Some(PodGroupSpec {
                min_member,
                ..PodGroupSpec::default()
            }),
            ..PodGroup::default()
        }
    }

    #[test]
    fn test_build_snapshot() {
        let snapshot = build_snapshot(
            &SnapshotConfig::default(),
            &[node("n1", "4", true), node("n2", "4", false)],
            &[pod_group("pg1", 2)],
            &[
                pod("p1", Some("pg1"), "n1", PodPhase::Running),
                pod("p2", Some("pg1"), "", PodPhase::Pending),
                pod("p3", None, "n1", PodPhase::Running),
                pod("p4", Some("pg2"), "n1", PodPhase::Succeeded),
            ],
            &[],
        )
        .unwrap();

        assert_eq!(snapshot.nodes.len(), 2);
        let n1 = &snapshot.nodes["n1"];
        assert_eq!(n1.tasks().len(), 2);
        assert_eq!(n1.used(), &crate::core::Resource::from_resource_list([("cpu", "2")]));

        let pg1 = &snapshot.jobs["c1/pg1"];
        assert_eq!(pg1.tasks().len(), 2);
        assert_eq!(pg1.min_available, 2);
        assert_eq!(pg1.ready_task_num(), 1);

        let pg2 = &snapshot.jobs["c1/pg2"];
        assert!(pg2.pod_group.is_none());
        assert_eq!(pg2.tasks_with_status(TaskStatus::Succeeded).count(), 1);

        assert_eq!(snapshot.namespaces["c1"].weight, 1);
    }

    #[test]
    fn test_skip_not_ready_nodes() {
        let cfg = SnapshotConfig {
            skip_not_ready_nodes: true,
            ..SnapshotConfig::default()
        };
        let snapshot = build_snapshot(
            &cfg,
            &[node("n1", "4", true), node("n2", "4", false)],
            &[],
            &[pod("p1", Some("pg1"), "n2", PodPhase::Running)],
            &[],
        )
        .unwrap();

        assert!(snapshot.nodes.contains_key("n1"));
        assert!(!snapshot.nodes.contains_key("n2"));
        assert_eq!(snapshot.jobs["c1/pg1"].tasks().len(), 1);
    }

    #[test]
    fn test_namespace_weights_from_quotas() {
        let quota = ResourceQuota {
            metadata: ObjectMeta::named("c1", "weighted"),
            spec: ResourceQuotaSpec {
                hard: [("volcano.sh/namespace.weight".to_string(), "7".to_string())].into(),
            },
        };
        let snapshot = build_snapshot(&SnapshotConfig::default(), &[], &[], &[], &[quota]).unwrap();
        assert_eq!(snapshot.namespaces["c1"].weight, 7);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = SnapshotConfig {
            default_namespace_weight: 0,
            ..SnapshotConfig::default()
        };
        let err = build_snapshot(&cfg, &[], &[], &[], &[]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfig(_)));
    }
}
