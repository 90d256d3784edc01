//! Task and node lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task as seen by the scheduler.
///
/// Variants are ordered by lifecycle position, which is the order status
/// indexes iterate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting for a placement decision.
    Pending,
    /// Resources reserved on a node by the scheduler.
    Allocated,
    /// Placed on a node whose resources are still being released.
    Pipelined,
    /// Binding to a node is in flight.
    Binding,
    /// Bound to a node but not yet running.
    Bound,
    /// Running on its node.
    Running,
    /// Being deleted; its resources will return to the node.
    Releasing,
    /// Finished successfully.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// State could not be derived.
    Unknown,
}

impl TaskStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::Pending,
        Self::Allocated,
        Self::Pipelined,
        Self::Binding,
        Self::Bound,
        Self::Running,
        Self::Releasing,
        Self::Succeeded,
        Self::Failed,
        Self::Unknown,
    ];

    /// True for statuses that hold resources on a node.
    #[must_use]
    pub const fn is_allocated(self) -> bool {
        matches!(self, Self::Bound | Self::Binding | Self::Running | Self::Allocated)
    }

    /// Name of the status as it appears in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Allocated => "Allocated",
            Self::Pipelined => "Pipelined",
            Self::Binding => "Binding",
            Self::Bound => "Bound",
            Self::Running => "Running",
            Self::Releasing => "Releasing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse readiness of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodePhase {
    /// Accepts new tasks.
    Ready,
    /// Refuses new tasks; see [`NodeState::reason`].
    NotReady,
}

impl fmt::Display for NodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::NotReady => f.write_str("NotReady"),
        }
    }
}

/// Phase of a node plus the reason it is not ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    /// Current phase.
    pub phase: NodePhase,
    /// Empty when ready; otherwise one of the `REASON_*` constants.
    pub reason: String,
}

impl NodeState {
    /// No node record has been attached yet.
    pub const REASON_UNINITIALIZED: &'static str = "UnInitialized";
    /// The ledger uses more than the node reports as allocatable.
    pub const REASON_OUT_OF_SYNC: &'static str = "OutOfSync";
    /// The node's Ready condition is not true.
    pub const REASON_NOT_READY: &'static str = "NotReady";

    /// A ready state.
    #[must_use]
    pub const fn ready() -> Self {
        Self {
            phase: NodePhase::Ready,
            reason: String::new(),
        }
    }

    /// A not-ready state with the given reason.
    #[must_use]
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            phase: NodePhase::NotReady,
            reason: reason.into(),
        }
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::not_ready("")
    }
}
