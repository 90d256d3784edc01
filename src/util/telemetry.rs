//! Telemetry helpers for structured logging and tracing.
//!
//! The library only emits `tracing` events; these helpers are for binaries and
//! tests that want a subscriber without wiring one up themselves.

use tracing_subscriber::EnvFilter;

/// Install a default subscriber filtered by `RUST_LOG`, unless one is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Install a default subscriber with explicit filter directives, unless one
/// is set. Unparseable directives fall back to `RUST_LOG`.
pub fn init_tracing_with_filter(directives: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?}: {err}");
        EnvFilter::from_default_env()
    });
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
