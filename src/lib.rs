//! # remora
//!
//! Typed hash and set collections whose storage lives entirely in a
//! remote key-value server, with:
//! - A symmetric binary codec for arbitrary application key/value types
//! - A shared, reference-counted connection handle with explicit flush
//! - Server-side set algebra across containers on one handle
//! - Graceful degradation on foreign data (decode failures read as absence)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │   RemoteHash<K, V>   │   │     RemoteSet<T>     │
//! │  (typed operations)  │   │  (typed operations)  │
//! └──────────┬───────────┘   └───────────┬──────────┘
//!            │        codec (encode/decode)
//!            └────────────┬──────────────┘
//!                         ▼
//!               ┌──────────────────┐
//!               │   StoreHandle    │
//!               │  (issue + flush) │
//!               └────────┬─────────┘
//!                        │
//!           ┌────────────┴────────────┐
//!           ▼                         ▼
//!    ┌─────────────┐          ┌──────────────┐
//!    │ TcpTransport│          │ MemTransport │
//!    │ (framed TCP)│          │ (in-process) │
//!    └─────────────┘          └──────────────┘
//! ```
//!
//! Every typed operation encodes its inputs, issues one command against
//! the handle, forces a synchronous flush, and decodes the reply into a
//! fully-typed result.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod protocol;
pub mod client;
pub mod collections;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConnectError, RemoraError, Result};
pub use config::Config;
pub use client::{make_and_connect, MemTransport, PendingReply, StoreHandle, TcpTransport, Transport};
pub use collections::{RemoteHash, RemoteSet};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of remora
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
