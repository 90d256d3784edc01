//! Unit tests for individual components

mod error_test;
mod config_test;
mod util_test;
mod builders_test;
mod resource_test;
mod heap_test;
mod namespace_test;
