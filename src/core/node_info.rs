//! Per-node resource ledger.
//!
//! A [`NodeInfo`] charges each task it hosts against the node's idle resource
//! according to the task's status:
//!
//! | status      | idle | used | releasing | pipelined |
//! |-------------|------|------|-----------|-----------|
//! | `Releasing` | `-`  | `+`  | `+`       |           |
//! | `Pipelined` |      |      |           | `+`       |
//! | otherwise   | `-`  | `+`  |           |           |
//!
//! so that `idle + used == allocatable` holds on a ready node. The node keeps
//! its own copy of every task; later status changes on the caller's copy do
//! not move resources until the task is explicitly updated.

use std::collections::HashMap;
use std::fmt;

use crate::core::{NodeError, NodePhase, NodeState, Resource, TaskInfo, TaskStatus};
use crate::model::{Node, Pod};

/// Idle/used/releasing/pipelined counters of a node.
#[derive(Debug, Clone, Default, PartialEq)]
struct Ledger {
    idle: Resource,
    used: Resource,
    releasing: Resource,
    pipelined: Resource,
}

impl Ledger {
    fn with_idle(idle: Resource) -> Self {
        Self {
            idle,
            ..Self::default()
        }
    }

    fn take_idle(&mut self, node_name: &str, request: &Resource) -> Result<(), NodeError> {
        if !request.less_equal(&self.idle) {
            return Err(NodeError::NodeNotReady(node_name.to_string()));
        }
        self.idle -= request;
        Ok(())
    }

    fn charge(&mut self, node_name: &str, status: TaskStatus, request: &Resource) -> Result<(), NodeError> {
        match status {
            TaskStatus::Pipelined => self.pipelined += request,
            TaskStatus::Releasing => {
                self.take_idle(node_name, request)?;
                self.releasing += request;
                self.used += request;
            }
            _ => {
                self.take_idle(node_name, request)?;
                self.used += request;
            }
        }
        Ok(())
    }

    fn refund(&mut self, status: TaskStatus, request: &Resource) {
        match status {
            TaskStatus::Pipelined => self.pipelined -= request,
            TaskStatus::Releasing => {
                self.releasing -= request;
                self.idle += request;
                self.used -= request;
            }
            _ => {
                self.idle += request;
                self.used -= request;
            }
        }
    }
}

/// Resource ledger and task set of one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfo {
    name: String,
    node: Option<Node>,
    state: NodeState,
    ledger: Ledger,
    allocatable: Resource,
    capability: Resource,
    tasks: HashMap<String, TaskInfo>,
}

impl NodeInfo {
    /// Ledger for `node`, or an uninitialized one when `node` is `None`.
    #[must_use]
    pub fn new(node: Option<Node>) -> Self {
        let mut info = node.map_or_else(Self::default, |node| {
            let allocatable = Resource::from_resource_list(&node.status.allocatable);
            Self {
                name: node.metadata.name.clone(),
                ledger: Ledger::with_idle(allocatable.clone()),
                allocatable,
                capability: Resource::from_resource_list(&node.status.capacity),
                node: Some(node),
                ..Self::default()
            }
        });

        let node = info.node.take();
        info.set_node_state(node.as_ref());
        info.node = node;
        info
    }

    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing node record, if any.
    #[must_use]
    pub const fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Readiness state.
    #[must_use]
    pub const fn state(&self) -> &NodeState {
        &self.state
    }

    /// Resources not charged to any task.
    #[must_use]
    pub const fn idle(&self) -> &Resource {
        &self.ledger.idle
    }

    /// Resources charged to hosted tasks, releasing ones included.
    #[must_use]
    pub const fn used(&self) -> &Resource {
        &self.ledger.used
    }

    /// Resources held by tasks that are being deleted.
    #[must_use]
    pub const fn releasing(&self) -> &Resource {
        &self.ledger.releasing
    }

    /// Resources promised to tasks waiting on releasing ones.
    #[must_use]
    pub const fn pipelined(&self) -> &Resource {
        &self.ledger.pipelined
    }

    /// Resources the node offers to tasks.
    #[must_use]
    pub const fn allocatable(&self) -> &Resource {
        &self.allocatable
    }

    /// Total resources of the node.
    #[must_use]
    pub const fn capability(&self) -> &Resource {
        &self.capability
    }

    /// Hosted tasks keyed by `namespace/name`.
    #[must_use]
    pub const fn tasks(&self) -> &HashMap<String, TaskInfo> {
        &self.tasks
    }

    /// Pods of the hosted tasks.
    pub fn pods(&self) -> impl Iterator<Item = &Pod> + '_ {
        self.tasks.values().map(|task| &task.pod)
    }

    /// True when the node accepts tasks.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.state.phase == NodePhase::Ready
    }

    /// Derive readiness from a node record.
    ///
    /// Not ready when there is no record (`UnInitialized`), when the ledger
    /// uses more than the record allows (`OutOfSync`), or when the record's
    /// `Ready` condition is not true (`NotReady`).
    pub fn set_node_state(&mut self, node: Option<&Node>) {
        let Some(node) = node else {
            self.state = NodeState::not_ready(NodeState::REASON_UNINITIALIZED);
            return;
        };

        if !self
            .ledger
            .used
            .less_equal(&Resource::from_resource_list(&node.status.allocatable))
        {
            self.state = NodeState::not_ready(NodeState::REASON_OUT_OF_SYNC);
            return;
        }

        if !node.is_ready_condition_true() {
            self.state = NodeState::not_ready(NodeState::REASON_NOT_READY);
            return;
        }

        self.state = NodeState::ready();
    }

    /// Attach a new node record and rebuild the ledger from the hosted tasks.
    ///
    /// A record that leaves the node not ready, or that cannot hold the hosted
    /// tasks, is refused: the state records why and every other field keeps
    /// its previous value.
    pub fn set_node(&mut self, node: Option<Node>) {
        self.set_node_state(node.as_ref());

        let Some(node) = node.filter(|_| self.ready()) else {
            tracing::warn!(
                "failed to set node info, phase: {}, reason: {}",
                self.state.phase,
                self.state.reason
            );
            return;
        };

        let allocatable = Resource::from_resource_list(&node.status.allocatable);
        let mut ledger = Ledger::with_idle(allocatable.clone());
        for task in self.tasks.values() {
            if let Err(err) = ledger.charge(&node.metadata.name, task.status, &task.resource_requests) {
                self.state = NodeState::not_ready(NodeState::REASON_OUT_OF_SYNC);
                tracing::warn!(
                    "failed to set node info for <{}>: task <{}/{}> does not fit: {err}",
                    node.metadata.name,
                    task.namespace,
                    task.name
                );
                return;
            }
        }

        self.name.clone_from(&node.metadata.name);
        self.capability = Resource::from_resource_list(&node.status.capacity);
        self.allocatable = allocatable;
        self.ledger = ledger;
        self.node = Some(node);
    }

    /// Take the task's request out of the idle resource.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NodeNotReady`] when the request does not fit.
    pub fn allocate_idle_resource(&mut self, task: &TaskInfo) -> Result<(), NodeError> {
        self.ledger.take_idle(&self.name, &task.resource_requests)
    }

    /// Host a task, charging it according to its status.
    ///
    /// On success both `task` and the node's copy carry this node's name.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::AddTaskFailed`] if the task belongs to another node
    /// or is already hosted, and [`NodeError::NodeNotReady`] if it does not
    /// fit. The node is unchanged on error.
    pub fn add_task(&mut self, task: &mut TaskInfo) -> Result<(), NodeError> {
        if !task.node_name.is_empty() && !self.name.is_empty() && self.name != task.node_name {
            return Err(NodeError::AddTaskFailed(format!(
                "task <{}/{}> already on different node <{}>",
                task.namespace, task.name, task.node_name
            )));
        }

        let key = task.pod_key();
        if self.tasks.contains_key(&key) {
            return Err(NodeError::AddTaskFailed(format!(
                "task <{}/{}> already on node <{}>",
                task.namespace, task.name, self.name
            )));
        }

        if self.node.is_some() {
            self.ledger.charge(&self.name, task.status, &task.resource_requests)?;
        }

        task.node_name.clone_from(&self.name);
        self.tasks.insert(key, task.clone());
        Ok(())
    }

    /// Stop hosting a task, refunding what its stored copy was charged.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::RemoveTaskFailed`] if the task is not hosted here.
    pub fn remove_task(&mut self, task: &TaskInfo) -> Result<TaskInfo, NodeError> {
        let Some(stored) = self.tasks.remove(&task.pod_key()) else {
            return Err(NodeError::RemoveTaskFailed(format!(
                "failed to find task <{}/{}> on host <{}>",
                task.namespace, task.name, self.name
            )));
        };

        if self.node.is_some() {
            self.ledger.refund(stored.status, &stored.resource_requests);
        }
        Ok(stored)
    }

    /// Replace the stored copy of `task` with its current state.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::RemoveTaskFailed`] if the task is not hosted here.
    /// If the new state does not fit, the task stays removed and the add error
    /// is returned.
    pub fn update_task(&mut self, task: &mut TaskInfo) -> Result<(), NodeError> {
        self.remove_task(task)?;

        if let Err(err) = self.add_task(task) {
            tracing::error!(
                "failed to add task <{}/{}> to node <{}> during task update: {err}",
                task.namespace,
                task.name,
                self.name
            );
            return Err(err);
        }
        Ok(())
    }
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = &self.node else {
            return f.write_str("EmptyNode");
        };

        let taints: Vec<String> = node.spec.taints.iter().map(ToString::to_string).collect();
        write!(
            f,
            "Node ({}): idle <{}>, used <{}>, releasing <{}>, state <phase {}, reason '{}'>, taints <{}>",
            self.name,
            self.ledger.idle,
            self.ledger.used,
            self.ledger.releasing,
            self.state.phase,
            self.state.reason,
            taints.join(", ")
        )
    }
}
