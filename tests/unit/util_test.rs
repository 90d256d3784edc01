//! Tests for utility functions

use gang_scheduler_core::util::{init_tracing, init_tracing_with_filter};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    init_tracing_with_filter("gang_scheduler_core=debug");
    tracing::info!("tracing initialized");
}
