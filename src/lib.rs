//! # Gang Scheduler Core
//!
//! The in-memory core of a batch scheduler that places containerized work in
//! gangs: a job's tasks are admitted together or not at all.
//!
//! The crate tracks cluster capacity, the tasks of every job, and per-node
//! resource ledgers, and provides the arithmetic an outer scheduling loop
//! needs to decide admission and placement.
//!
//! ## Key Pieces
//!
//! - **Resource algebra** ([`core::Resource`], [`core::Quantity`]): exact
//!   decimal quantities for cpu, memory and extended resources, compared with
//!   per-dimension tolerance thresholds
//! - **Jobs and tasks** ([`core::JobInfo`], [`core::TaskInfo`]): task status
//!   derived from pods, per-status indexes and gang readiness
//! - **Node ledgers** ([`core::NodeInfo`]): idle/used/releasing/pipelined
//!   accounting with transactional task placement
//! - **Thread-safe heap** ([`infra::Heap`]): keyed priority heap with blocking
//!   pop and close, backing namespace weight tracking
//! - **Snapshots** ([`builders::build_snapshot`]): one call from cluster
//!   records to the state a scheduling cycle works on
//!
//! ## Example
//!
//! ```
//! use gang_scheduler_core::core::{JobInfo, NodeInfo, TaskInfo, TaskStatus};
//! use gang_scheduler_core::model::{Container, Node, NodeStatus, ObjectMeta, Pod, PodSpec};
//!
//! let alloc: gang_scheduler_core::model::ResourceList =
//!     [("cpu".to_string(), "4".to_string()), ("memory".to_string(), "8Gi".to_string())].into();
//! let mut node = NodeInfo::new(Some(Node {
//!     metadata: ObjectMeta::named("", "n1"),
//!     status: NodeStatus { allocatable: alloc.clone(), capacity: alloc, conditions: vec![] },
//!     ..Node::default()
//! }));
//!
//! let mut task = TaskInfo::new(Pod {
//!     metadata: ObjectMeta::named("team-a", "worker-0"),
//!     spec: PodSpec {
//!         containers: vec![Container::with_requests("main", [("cpu", "1"), ("memory", "1Gi")])],
//!         ..PodSpec::default()
//!     },
//!     status: None,
//! });
//! task.status = TaskStatus::Allocated;
//!
//! node.add_task(&mut task)?;
//! let mut job = JobInfo::new("team-a/training", [task]);
//! job.min_available = 1;
//! assert!(job.ready());
//! assert_eq!(node.idle().to_string(), "cpu 3000.000, memory 7516192768");
//! # Ok::<(), gang_scheduler_core::core::NodeError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Resources, tasks, jobs, nodes and their error types.
pub mod core;
/// Configuration for snapshot building.
pub mod config;
/// Builders that assemble scheduler state from cluster records.
pub mod builders;
/// Infrastructure building blocks such as the thread-safe heap.
pub mod infra;
/// Typed snapshot records of cluster objects.
pub mod model;
/// Shared utilities.
pub mod util;
