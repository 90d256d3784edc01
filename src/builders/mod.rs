//! Builders that turn cluster records into scheduler state.

pub mod snapshot_builder;

pub use snapshot_builder::{build_snapshot, ClusterSnapshot};
