//! Gang-scheduled jobs: a pod group plus the tasks that belong to it.
//!
//! [`JobInfo`] keeps three views of its tasks in lockstep: the task map, the
//! per-status index, and the aggregate `allocated`/`total_request` counters.
//! Every mutation goes through [`JobInfo::add_task_info`] and
//! [`JobInfo::delete_task_info`] so the views cannot drift apart.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::core::{FitError, JobError, Resource, TaskInfo, TaskStatus};
use crate::model::PodGroup;

/// Aggregate of the tasks of one gang-scheduled job.
#[derive(Debug, Clone, Default)]
pub struct JobInfo {
    /// Job id, `<namespace>/<pod group>`.
    pub uid: String,
    /// Pod group name.
    pub name: String,
    /// Pod group namespace.
    pub namespace: String,
    /// Queue the job is charged to.
    pub queue: String,
    /// Scheduling priority.
    pub priority: i32,
    /// Tasks that must be placeable together.
    pub min_available: u32,
    /// Per-node shortfall observed during the last placement attempt.
    pub nodes_fit_delta: HashMap<String, Resource>,
    /// Job-level reason the last placement attempt failed.
    pub job_fit_errors: String,
    /// Per-node reason the last placement attempt failed.
    pub nodes_fit_errors: BTreeMap<String, String>,
    /// Creation time of the pod group.
    pub create_timestamp: Option<DateTime<Utc>>,
    /// The pod group this job was built from.
    pub pod_group: Option<PodGroup>,
    tasks: HashMap<String, TaskInfo>,
    task_status_index: BTreeMap<TaskStatus, BTreeSet<String>>,
    allocated: Resource,
    total_request: Resource,
}

impl JobInfo {
    /// A job with the given id holding `tasks`.
    pub fn new(uid: impl Into<String>, tasks: impl IntoIterator<Item = TaskInfo>) -> Self {
        let mut job = Self {
            uid: uid.into(),
            ..Self::default()
        };
        for task in tasks {
            job.add_task_info(task);
        }
        job
    }

    /// Tasks keyed by uid.
    #[must_use]
    pub const fn tasks(&self) -> &HashMap<String, TaskInfo> {
        &self.tasks
    }

    /// Task uids grouped by status. Buckets are never empty.
    #[must_use]
    pub const fn task_status_index(&self) -> &BTreeMap<TaskStatus, BTreeSet<String>> {
        &self.task_status_index
    }

    /// Sum of the requests of tasks whose status is allocated.
    #[must_use]
    pub const fn allocated(&self) -> &Resource {
        &self.allocated
    }

    /// Sum of the requests of every task.
    #[must_use]
    pub const fn total_request(&self) -> &Resource {
        &self.total_request
    }

    /// Tasks currently in `status`.
    pub fn tasks_with_status(&self, status: TaskStatus) -> impl Iterator<Item = &TaskInfo> + '_ {
        self.task_status_index
            .get(&status)
            .into_iter()
            .flatten()
            .filter_map(|uid| self.tasks.get(uid))
    }

    /// Add a task, replacing any task with the same uid.
    pub fn add_task_info(&mut self, task: TaskInfo) {
        if self.tasks.contains_key(&task.uid) {
            self.remove_task(&task.uid);
        }

        self.total_request += &task.resource_requests;
        if task.status.is_allocated() {
            self.allocated += &task.resource_requests;
        }

        self.task_status_index
            .entry(task.status)
            .or_default()
            .insert(task.uid.clone());
        self.tasks.insert(task.uid.clone(), task);
    }

    /// Remove the job's copy of `task`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::FailedToFindTask`] if no task with that uid belongs
    /// to the job.
    pub fn delete_task_info(&mut self, task: &TaskInfo) -> Result<TaskInfo, JobError> {
        self.remove_task(&task.uid).ok_or_else(|| JobError::FailedToFindTask {
            task_namespace: task.namespace.clone(),
            task_name: task.name.clone(),
            job_namespace: self.namespace.clone(),
            job_name: self.name.clone(),
        })
    }

    fn remove_task(&mut self, uid: &str) -> Option<TaskInfo> {
        let job_task = self.tasks.remove(uid)?;

        self.total_request -= &job_task.resource_requests;
        if job_task.status.is_allocated() {
            self.allocated -= &job_task.resource_requests;
        }

        if let Some(bucket) = self.task_status_index.get_mut(&job_task.status) {
            bucket.remove(uid);
            if bucket.is_empty() {
                self.task_status_index.remove(&job_task.status);
            }
        }

        Some(job_task)
    }

    /// Move `task` to `status`, updating the caller's copy and the job's.
    pub fn update_task_status(&mut self, task: &mut TaskInfo, status: TaskStatus) {
        self.remove_task(&task.uid);
        task.status = status;
        self.add_task_info(task.clone());
    }

    /// Take name, namespace, gang size, queue and creation time from a pod group.
    pub fn set_pod_group(&mut self, pod_group: PodGroup) {
        self.name.clone_from(&pod_group.metadata.name);
        self.namespace.clone_from(&pod_group.metadata.namespace);
        if let Some(spec) = &pod_group.spec {
            self.min_available = spec.min_member;
            self.queue.clone_from(&spec.queue);
        }
        self.create_timestamp = pod_group.metadata.creation_timestamp;
        self.pod_group = Some(pod_group);
    }

    /// Forget the pod group; the other fields keep their values.
    pub fn unset_pod_group(&mut self) {
        self.pod_group = None;
    }

    /// Record why `node_name` could not host a task of this job.
    pub fn record_node_fit_error(&mut self, node_name: impl Into<String>, reason: impl fmt::Display) {
        self.nodes_fit_errors.insert(node_name.into(), reason.to_string());
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.task_status_index.get(&status).map_or(0, BTreeSet::len)
    }

    /// Tasks that hold or need no resources: allocated, succeeded, or pending
    /// with an empty peak request.
    #[must_use]
    pub fn ready_task_num(&self) -> usize {
        self.task_status_index
            .iter()
            .map(|(status, uids)| match status {
                s if s.is_allocated() || *s == TaskStatus::Succeeded => uids.len(),
                TaskStatus::Pending => self
                    .tasks_with_status(TaskStatus::Pending)
                    .filter(|task| task.init_resource_requests.is_empty())
                    .count(),
                _ => 0,
            })
            .sum()
    }

    /// Tasks waiting on resources that are being released.
    #[must_use]
    pub fn waiting_task_num(&self) -> usize {
        self.count(TaskStatus::Pipelined)
    }

    /// Tasks that count toward the gang: allocated, succeeded, pipelined or pending.
    #[must_use]
    pub fn valid_task_num(&self) -> usize {
        self.task_status_index
            .iter()
            .filter(|(status, _)| {
                status.is_allocated()
                    || matches!(
                        status,
                        TaskStatus::Succeeded | TaskStatus::Pipelined | TaskStatus::Pending
                    )
            })
            .map(|(_, uids)| uids.len())
            .sum()
    }

    /// True once at least `min_available` tasks are ready.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready_task_num() >= self.min_available as usize
    }

    /// True once ready and pipelined tasks together reach `min_available`.
    #[must_use]
    pub fn pipelined(&self) -> bool {
        self.waiting_task_num() + self.ready_task_num() >= self.min_available as usize
    }

    /// Explain why the gang is not ready: task counts per status plus the
    /// gang size, sorted.
    #[must_use]
    pub fn fit_error(&self) -> FitError {
        let mut reasons: Vec<String> = self
            .task_status_index
            .iter()
            .map(|(status, uids)| format!("{status} {}", uids.len()))
            .collect();
        reasons.push(format!("minAvailable {}", self.min_available));
        reasons.sort();

        FitError {
            message: format!("pod group is not ready, {}", reasons.join(", ")),
        }
    }
}
