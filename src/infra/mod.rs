//! Infrastructure building blocks shared by the scheduler core.

pub mod heap;

pub use heap::{Heap, HeapData, HeapItem};
