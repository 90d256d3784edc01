//! Node records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ResourceList};

/// A node snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Node {
    /// Identity.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: NodeSpec,
    /// Observed capacity and conditions.
    pub status: NodeStatus,
}

impl Node {
    /// True unless the node reports a `Ready` condition that is not `True`.
    #[must_use]
    pub fn is_ready_condition_true(&self) -> bool {
        !self
            .status
            .conditions
            .iter()
            .any(|cond| cond.condition_type == NodeCondition::READY && cond.status != ConditionStatus::True)
    }
}

/// Desired state of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSpec {
    /// Cordoned nodes accept no new pods.
    pub unschedulable: bool,
    /// Taints repelling pods without a matching toleration.
    pub taints: Vec<Taint>,
}

/// A node taint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Taint {
    /// Taint key.
    pub key: String,
    /// Taint value.
    pub value: String,
    /// `NoSchedule`, `PreferNoSchedule` or `NoExecute`.
    pub effect: String,
}

impl fmt::Display for Taint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}:{}", self.key, self.value, self.effect)
    }
}

/// Observed state of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStatus {
    /// Resources available to pods.
    pub allocatable: ResourceList,
    /// Total resources of the node.
    pub capacity: ResourceList,
    /// Health conditions.
    pub conditions: Vec<NodeCondition>,
}

/// One health condition of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCondition {
    /// Condition kind, e.g. `Ready`.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Whether the condition holds.
    pub status: ConditionStatus,
}

impl NodeCondition {
    /// The readiness condition kind.
    pub const READY: &'static str = "Ready";

    /// A `Ready` condition with the given status.
    #[must_use]
    pub fn ready(status: ConditionStatus) -> Self {
        Self {
            condition_type: Self::READY.to_string(),
            status,
        }
    }
}

/// Tri-state value of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The cluster cannot tell.
    Unknown,
}
