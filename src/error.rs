//! Error types for remora
//!
//! Provides a unified error type for all operations, plus a dedicated
//! taxonomy for connection establishment failures.

use thiserror::Error;

/// Result type alias using RemoraError
pub type Result<T> = std::result::Result<T, RemoraError>;

/// Unified error type for remora operations
#[derive(Debug, Error)]
pub enum RemoraError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(String),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection failed: {0}")]
    Connect(#[from] ConnectError),

    #[error("Not connected to the store")]
    Disconnected,

    /// A reply was awaited before the flush that would resolve it.
    #[error("Reply not yet resolved; flush the handle first")]
    PendingFlush,
}

/// Connection establishment failures
///
/// Every failure raised while building and connecting a handle is captured
/// into one of these variants rather than propagated as a panic.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The TCP connection could not be established or configured.
    #[error("Network failure: {0}")]
    Network(#[source] std::io::Error),

    /// The endpoint accepted the connection but did not speak the
    /// expected protocol.
    #[error("Protocol failure: {0}")]
    Protocol(String),

    /// Anything that fits neither of the above.
    #[error("Unknown failure: {0}")]
    Unknown(String),
}
