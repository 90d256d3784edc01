//! Configuration for snapshot building.

pub mod snapshot;

pub use snapshot::SnapshotConfig;
