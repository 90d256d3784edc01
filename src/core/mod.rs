//! Scheduling state: resources, tasks, jobs, nodes and namespace weights.

pub mod error;
pub mod job_info;
pub mod namespace_info;
pub mod node_info;
pub mod quantity;
pub mod resource;
pub mod resource_names;
pub mod status;
pub mod task_info;

pub use error::{AppResult, FitError, HeapError, JobError, NodeError, ResourceError, SchedulerError};
pub use job_info::JobInfo;
pub use namespace_info::{NamespaceCollection, NamespaceInfo, QuotaItem};
pub use node_info::NodeInfo;
pub use quantity::Quantity;
pub use resource::Resource;
pub use status::{NodePhase, NodeState, TaskStatus};
pub use task_info::TaskInfo;
