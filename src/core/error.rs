//! Error types for scheduler bookkeeping operations.

use thiserror::Error;

/// Errors produced by the resource algebra.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The named dimension is neither cpu, memory nor a tracked scalar resource.
    #[error("unknown resource {0}")]
    UnknownResource(String),
    /// A subtraction would take more than is available.
    #[error("resource is not sufficient to do operation: <{available}> sub <{requested}>")]
    InsufficientResource {
        /// Left-hand side of the subtraction.
        available: String,
        /// Right-hand side of the subtraction.
        requested: String,
    },
    /// A quantity string does not follow the quantity grammar.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Errors produced by the thread-safe heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The heap was closed; no more work is accepted.
    #[error("heap is closed")]
    Closed,
    /// No object with the requested key is stored in the heap.
    #[error("object not found")]
    ObjectNotFound,
    /// Heap bookkeeping lost track of an object it was about to return.
    #[error("object was removed from heap data")]
    ObjectAlreadyRemoved,
    /// A bounded wait elapsed before an object became available.
    #[error("timed out waiting for an object")]
    Timeout,
}

/// Errors produced while maintaining a job's task set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// The task is not part of the job.
    #[error("failed to find task <{task_namespace}/{task_name}> in job <{job_namespace}/{job_name}>")]
    FailedToFindTask {
        /// Namespace of the missing task.
        task_namespace: String,
        /// Name of the missing task.
        task_name: String,
        /// Namespace of the job.
        job_namespace: String,
        /// Name of the job.
        job_name: String,
    },
}

/// Errors produced by the per-node ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The node cannot host the task with its idle resource.
    #[error("selected node <{0}> NotReady")]
    NodeNotReady(String),
    /// The task could not be placed on the node.
    #[error("add task failed: {0}")]
    AddTaskFailed(String),
    /// The task is not tracked by the node.
    #[error("remove task failed: {0}")]
    RemoveTaskFailed(String),
}

/// Diagnostic explaining why a gang could not be admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FitError {
    /// Human-readable reason, stable across runs.
    pub message: String,
}

/// Umbrella error for callers that drive several components at once.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Resource algebra failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// Heap failure.
    #[error(transparent)]
    Heap(#[from] HeapError),
    /// Job bookkeeping failure.
    #[error(transparent)]
    Job(#[from] JobError),
    /// Node ledger failure.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
