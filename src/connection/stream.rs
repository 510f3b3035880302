//! Stream Transport
//!
//! Speaks RESP over any tokio byte stream. One call to
//! [`Connection::send`] is one exchange:
//!
//! ```text
//! 1. Serialize command as a RESP array of bulk strings
//!        │
//!        ▼
//! 2. Write + flush
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Parse reply from buffer     │◄──┐
//!    │  complete? ── yes ──> return │   │
//!    │      │ no                    │   │
//!    │      ▼                       │   │
//!    │  Read more bytes from socket │───┘
//!    └──────────────────────────────┘
//! ```
//!
//! The whole exchange runs under the response timeout. Any failure leaves
//! the stream at an unknown position inside a reply, so the connection marks
//! itself broken and refuses further commands.

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionStats, TransportError};
use crate::facade::Command;
use crate::protocol::{RespParser, RespValue};
use bytes::BytesMut;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

/// Maximum size of one buffered reply, framing included.
///
/// The parser separately caps each bulk string at `MAX_BULK_SIZE`; this bounds
/// the reply as a whole, so an aggregate larger than one maximal bulk string
/// fails with [`TransportError::BufferFull`].
pub const MAX_BUFFER_SIZE: usize = 512 * 1024 * 1024 + 64 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// A RESP connection over TCP.
pub type TcpConnection = StreamConnection<TcpStream>;

/// A RESP connection over an arbitrary async byte stream.
pub struct StreamConnection<S> {
    stream: BufWriter<S>,

    /// Peer description, for logging
    peer: String,

    buffer: BytesMut,
    parser: RespParser,
    response_timeout: Duration,
    stats: Arc<ConnectionStats>,
    broken: bool,
}

impl<S> StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps an already-established stream.
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: BufWriter::new(stream),
            peer: peer.into(),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            parser: RespParser::new(),
            response_timeout: crate::config::DEFAULT_RESPONSE_TIMEOUT,
            stats: Arc::new(ConnectionStats::new()),
            broken: false,
        }
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Shares a stats block with other connections.
    pub fn with_stats(mut self, stats: Arc<ConnectionStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<ConnectionStats> {
        &self.stats
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// True once a failure has left the stream unusable.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    async fn exchange(&mut self, command: &Command) -> Result<RespValue, TransportError> {
        let bytes = command.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.command_sent(bytes.len());
        trace!(peer = %self.peer, command = command.name(), bytes = bytes.len(), "Sent command");

        loop {
            if let Some(reply) = self.try_parse_reply()? {
                self.stats.reply_received();
                return Ok(reply);
            }
            self.read_more_data().await?;
        }
    }

    fn try_parse_reply(&mut self) -> Result<Option<RespValue>, TransportError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer)? {
            Some((value, consumed)) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    peer = %self.peer,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed reply"
                );
                Ok(Some(value))
            }
            None => {
                trace!(peer = %self.peer, buffered = self.buffer.len(), "Incomplete reply");
                Ok(None)
            }
        }
    }

    async fn read_more_data(&mut self) -> Result<(), TransportError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            return Err(TransportError::BufferFull);
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;
        if n == 0 {
            return Err(TransportError::Closed);
        }

        self.stats.bytes_read(n);
        trace!(peer = %self.peer, bytes = n, "Read data");
        Ok(())
    }

    fn mark_broken(&mut self, error: &TransportError) {
        self.broken = true;
        self.stats.transport_failure();
        warn!(peer = %self.peer, error = %error, "Transport failure, connection marked broken");
    }

    /// Sends a handshake command and requires a `+OK` reply.
    async fn handshake(&mut self, command: Command) -> Result<(), TransportError> {
        match self.send(&command).await? {
            RespValue::SimpleString(s) if s == "OK" => Ok(()),
            RespValue::Error(message) => Err(TransportError::Handshake(message)),
            other => Err(TransportError::Handshake(format!(
                "unexpected {} reply to {}",
                other.kind(),
                command.name()
            ))),
        }
    }
}

impl StreamConnection<TcpStream> {
    /// Connects, then authenticates and selects the database when configured.
    pub async fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        let addr = config.bind_address();
        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::Timeout(config.connect_timeout))??;
        stream.set_nodelay(true)?;
        debug!(peer = %addr, "Connected");

        let mut conn = Self::new(stream, addr).with_response_timeout(config.response_timeout);

        if let Some(password) = &config.password {
            conn.handshake(Command::new("AUTH").arg(password)).await?;
            debug!(peer = %conn.peer, "Authenticated");
        }
        if config.database != 0 {
            conn.handshake(Command::new("SELECT").arg_int(i64::from(config.database)))
                .await?;
            debug!(peer = %conn.peer, database = config.database, "Selected database");
        }

        Ok(conn)
    }
}

impl<S> Connection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, command: &Command) -> Result<RespValue, TransportError> {
        if self.broken {
            return Err(TransportError::Broken);
        }

        // Blocking commands may legitimately hold the reply for their whole window.
        let limit = self
            .response_timeout
            .saturating_add(command.block_for().unwrap_or_default());

        let result = match tokio::time::timeout(limit, self.exchange(command)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(limit)),
        };

        if let Err(e) = &result {
            self.mark_broken(e);
        }
        result
    }
}
