//! Shared test support
//!
//! Builds handles over the in-memory transport so every scenario runs
//! hermetically, and wires the tracing subscriber once per process.

use std::sync::Arc;

use remora::{MemTransport, StoreHandle};

/// Install the test subscriber (idempotent)
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a handle over a fresh in-memory store
pub fn mem_handle() -> Arc<StoreHandle> {
    init_logging();
    StoreHandle::with_transport(Box::new(MemTransport::new()))
}
