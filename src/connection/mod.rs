//! Connection Module
//!
//! The façade never opens or pools connections itself. It is handed
//! something implementing [`Connection`]: "send one command, get one raw
//! reply". Anything that can do that is a valid transport.
//!
//! ```text
//! ┌───────────────┐   Command    ┌──────────────────────────────┐
//! │   KvFacade    │─────────────>│  impl Connection             │
//! │  (decode)     │<─────────────│  TcpConnection / Scripted /  │
//! └───────────────┘   RespValue  │  your own fake               │
//!                                └──────────────────────────────┘
//! ```
//!
//! ## Transports
//!
//! - [`TcpConnection`]: RESP over TCP with connect and response timeouts
//! - [`StreamConnection`]: the same framing over any tokio byte stream
//! - [`ScriptedConnection`]: replays canned replies, for tests

pub mod scripted;
pub mod stream;

pub use scripted::ScriptedConnection;
pub use stream::{StreamConnection, TcpConnection};

use crate::facade::Command;
use crate::protocol::{ParseError, RespValue};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// The capability the façade needs from its environment.
///
/// Implementations perform exactly one request/reply exchange per call and
/// must not retry.
pub trait Connection {
    fn send(
        &mut self,
        command: &Command,
    ) -> impl Future<Output = Result<RespValue, TransportError>> + Send;
}

impl<C: Connection> Connection for &mut C {
    fn send(
        &mut self,
        command: &Command,
    ) -> impl Future<Output = Result<RespValue, TransportError>> + Send {
        (**self).send(command)
    }
}

/// Failures that happen before a reply is obtained.
///
/// These are kept apart from store-reported errors because a caller may
/// reasonably retry them on a fresh connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// The peer closed the stream.
    #[error("connection closed by peer")]
    Closed,

    #[error("protocol error: {0}")]
    Protocol(#[from] ParseError),

    /// A single reply outgrew [`stream::MAX_BUFFER_SIZE`]. The cap covers the
    /// whole reply, not each bulk string in it.
    #[error("reply exceeds the {} byte buffer limit", stream::MAX_BUFFER_SIZE)]
    BufferFull,

    /// An earlier failure left the stream mid-reply; the connection must be replaced.
    #[error("connection is broken by an earlier failure")]
    Broken,

    #[error("handshake rejected: {0}")]
    Handshake(String),

    /// A scripted transport ran out of replies.
    #[error("no scripted reply left")]
    Exhausted,
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            return TransportError::Closed;
        }
        TransportError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Counters for one or more connections.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    pub commands_sent: AtomicU64,
    pub replies_received: AtomicU64,
    pub transport_failures: AtomicU64,
    pub bytes_read: AtomicU64,
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_sent(&self, bytes: usize) {
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn reply_received(&self) {
        self.replies_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }
}
