//! Transport contract and TCP implementation
//!
//! The typed layer consumes the store through this narrow contract:
//! buffer a command, flush the pipeline, read the next reply. Everything
//! about the wire lives behind it.

use std::io::{BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ConnectError, RemoraError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply};

/// Command-and-reply contract consumed from the store
///
/// Implementations deliver replies in FIFO order relative to the commands
/// sent on the same transport. No cross-transport ordering is promised.
pub trait Transport: Send {
    /// Enqueue one command on the transport's send path
    fn send(&mut self, command: &Command) -> Result<()>;

    /// Push every buffered command to the store
    fn flush(&mut self) -> Result<()>;

    /// Read the next reply, blocking until it arrives
    fn recv(&mut self) -> Result<Reply>;

    /// Whether the transport still has a usable session
    fn is_connected(&self) -> bool;
}

/// TCP transport speaking the framed binary protocol
pub struct TcpTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Cleared on the first transport-level failure
    connected: bool,
}

impl TcpTransport {
    /// Connect to the store described by `config`
    ///
    /// Establishes the TCP session, applies socket options, and performs
    /// a ping handshake so a connected-but-foreign endpoint is caught
    /// here rather than on the first real command. Every failure is
    /// captured as a [`ConnectError`].
    pub fn connect(config: &Config) -> std::result::Result<Self, ConnectError> {
        let stream = TcpStream::connect((config.host.as_str(), config.port))
            .map_err(ConnectError::Network)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        if config.nodelay {
            // Disable Nagle's algorithm for low latency
            stream.set_nodelay(true).map_err(ConnectError::Network)?;
        }
        if config.read_timeout_ms > 0 {
            stream
                .set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))
                .map_err(ConnectError::Network)?;
        }
        if config.write_timeout_ms > 0 {
            stream
                .set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))
                .map_err(ConnectError::Network)?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone().map_err(ConnectError::Network)?;

        let mut transport = Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
            connected: true,
        };

        transport.handshake()?;
        tracing::debug!("Connected to store at {}", transport.peer_addr);

        Ok(transport)
    }

    /// Ping the endpoint and require the expected answer
    fn handshake(&mut self) -> std::result::Result<(), ConnectError> {
        write_command(&mut self.writer, &Command::Ping).map_err(to_connect_error)?;
        self.writer.flush().map_err(ConnectError::Network)?;

        match read_reply(&mut self.reader).map_err(to_connect_error)? {
            Reply::Bulk(ref answer) if answer == b"PONG" => Ok(()),
            other => Err(ConnectError::Protocol(format!(
                "Unexpected handshake reply: {:?}",
                other
            ))),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn fail<T>(&mut self, error: RemoraError) -> Result<T> {
        // The stream position is undefined after any failure, so the
        // session cannot be reused.
        self.connected = false;
        tracing::warn!("Transport failure on {}: {}", self.peer_addr, error);
        Err(error)
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, command: &Command) -> Result<()> {
        if !self.connected {
            return Err(RemoraError::Disconnected);
        }
        match write_command(&mut self.writer, command) {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if !self.connected {
            return Err(RemoraError::Disconnected);
        }
        match self.writer.flush() {
            Ok(()) => Ok(()),
            Err(e) => self.fail(e.into()),
        }
    }

    fn recv(&mut self) -> Result<Reply> {
        if !self.connected {
            return Err(RemoraError::Disconnected);
        }
        match read_reply(&mut self.reader) {
            Ok(reply) => Ok(reply),
            Err(e) => self.fail(e),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Map operation-level failures raised during connection establishment
/// into the connect taxonomy
fn to_connect_error(error: RemoraError) -> ConnectError {
    match error {
        RemoraError::Io(e) => ConnectError::Network(e),
        RemoraError::Protocol(message) => ConnectError::Protocol(message),
        other => ConnectError::Unknown(other.to_string()),
    }
}
