//! Pod group records: the gang a set of pods is scheduled as.

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ResourceList};

/// A pod group snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodGroup {
    /// Identity.
    pub metadata: ObjectMeta,
    /// Gang requirements.
    pub spec: Option<PodGroupSpec>,
    /// Observed progress.
    pub status: PodGroupStatus,
}

/// Gang requirements of a pod group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodGroupSpec {
    /// Members that must be placeable together before any is started.
    pub min_member: u32,
    /// Queue the group is charged to.
    pub queue: String,
    /// Priority class of the group.
    pub priority_class_name: String,
    /// Resources the gang needs at minimum.
    pub min_resources: ResourceList,
}

/// Observed progress of a pod group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PodGroupStatus {
    /// Phase; absent until the controller reports one.
    pub phase: Option<PodGroupPhase>,
    /// Members running.
    pub running: u32,
    /// Members finished successfully.
    pub succeeded: u32,
    /// Members failed.
    pub failed: u32,
}

/// Phase of a pod group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodGroupPhase {
    /// Not enough members placed yet.
    Pending,
    /// At least `min_member` members running.
    Running,
    /// State could not be derived.
    Unknown,
    /// Admitted by its queue, waiting for placement.
    Inqueue,
}
