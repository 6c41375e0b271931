//! Store Handle
//!
//! Owns the shared connection to the store and exposes the narrow
//! command-issuance + explicit-flush contract the typed containers build
//! on.
//!
//! ## Pipeline discipline
//!
//! `issue` buffers a command and hands back a [`PendingReply`] slot;
//! `flush` pushes every buffered command to the store and resolves the
//! outstanding slots in issuance order. A slot is only readable after the
//! flush that resolved it, which converts the reply-driven transport into
//! synchronous request/response semantics.
//!
//! ## Sharing
//!
//! The handle is reference-counted so any number of containers can bind
//! to one store session. The internal mutex keeps `issue`/`flush` free of
//! data races, but interleaved pipelines from multiple threads can still
//! mix; treat the handle as single-writer unless whole operations are
//! serialized externally.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{ConnectError, RemoraError, Result};
use crate::protocol::{Command, Reply};

use super::{TcpTransport, Transport};

/// Shared handle to an established store session
pub struct StoreHandle {
    /// The only shared mutable state: the transport and its FIFO of
    /// unresolved reply slots
    inner: Mutex<HandleInner>,
}

struct HandleInner {
    transport: Box<dyn Transport>,
    pending: VecDeque<Sender<Reply>>,
}

/// A reply slot registered by `issue`, resolved by the next `flush`
pub struct PendingReply {
    receiver: Receiver<Reply>,
}

impl PendingReply {
    /// Take the reply resolved by a completed flush
    ///
    /// Waiting before the handle has been flushed (or after a flush that
    /// failed partway) is a misuse of the pipeline discipline and yields
    /// [`RemoraError::PendingFlush`].
    pub fn wait(self) -> Result<Reply> {
        self.receiver
            .try_recv()
            .map_err(|_| RemoraError::PendingFlush)
    }
}

impl StoreHandle {
    /// Connect to the store described by `config`
    pub fn connect(config: &Config) -> std::result::Result<Arc<Self>, ConnectError> {
        let transport = TcpTransport::connect(config)?;
        Ok(Self::with_transport(Box::new(transport)))
    }

    /// Build a handle over an already-established transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(HandleInner {
                transport,
                pending: VecDeque::new(),
            }),
        })
    }

    /// Enqueue a command and register its reply slot
    pub fn issue(&self, command: Command) -> Result<PendingReply> {
        let mut inner = self.inner.lock();

        tracing::trace!(command = command.name(), "issuing command");
        inner.transport.send(&command)?;

        let (sender, receiver) = bounded(1);
        inner.pending.push_back(sender);

        Ok(PendingReply { receiver })
    }

    /// Block until every command issued since the previous flush has
    /// received and processed its reply
    pub fn flush(&self) -> Result<()> {
        let mut inner = self.inner.lock();

        if inner.pending.is_empty() {
            return Ok(());
        }

        tracing::debug!(outstanding = inner.pending.len(), "flushing pipeline");
        if let Err(e) = inner.transport.flush() {
            inner.pending.clear();
            return Err(e);
        }

        while let Some(sender) = inner.pending.pop_front() {
            match inner.transport.recv() {
                // A send error means the caller dropped its slot; the
                // reply is simply discarded.
                Ok(reply) => {
                    let _ = sender.send(reply);
                }
                Err(e) => {
                    // Unresolved slots can never be fulfilled once the
                    // reply stream is broken.
                    inner.pending.clear();
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Whether the underlying session is still usable
    pub fn is_connected(&self) -> bool {
        self.inner.lock().transport.is_connected()
    }
}

/// Create and immediately connect a handle to the store
///
/// Every failure during construction is captured and returned as a
/// [`ConnectError`] rather than propagated as a panic.
pub fn make_and_connect(
    host: &str,
    port: u16,
) -> std::result::Result<Arc<StoreHandle>, ConnectError> {
    let config = Config::builder().host(host).port(port).build();
    StoreHandle::connect(&config)
}
