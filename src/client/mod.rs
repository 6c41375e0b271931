//! Client Module
//!
//! The connection side of the crate: the transport contract, its TCP and
//! in-memory implementations, and the shared store handle.

mod transport;
mod mem;
mod handle;

pub use transport::{Transport, TcpTransport};
pub use mem::MemTransport;
pub use handle::{make_and_connect, PendingReply, StoreHandle};
