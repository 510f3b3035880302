//! A fake transport that replays canned replies.
//!
//! Lets the façade be exercised without a running store: queue the raw
//! replies the store would send, run façade methods, then inspect the exact
//! commands that were issued.

use crate::connection::{Connection, TransportError};
use crate::facade::Command;
use crate::protocol::RespValue;
use std::collections::VecDeque;
use tracing::trace;

/// # Example
///
/// ```
/// use kvfacade::{CommandOutcome, KvFacade, RespValue, ScriptedConnection};
///
/// # tokio_test::block_on(async {
/// let conn = ScriptedConnection::new().reply(RespValue::integer(1));
/// let mut kv = KvFacade::new(conn);
/// assert_eq!(kv.expire("session", 60).await, CommandOutcome::Success(true));
/// assert_eq!(kv.connection().sent()[0].name(), "EXPIRE");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    replies: VecDeque<Result<RespValue, TransportError>>,
    sent: Vec<Command>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next command.
    pub fn reply(mut self, reply: RespValue) -> Self {
        self.replies.push_back(Ok(reply));
        self
    }

    /// Queues a transport failure for the next command.
    pub fn fail(mut self, error: TransportError) -> Self {
        self.replies.push_back(Err(error));
        self
    }

    pub fn push_reply(&mut self, reply: RespValue) {
        self.replies.push_back(Ok(reply));
    }

    /// Every command sent so far, in order.
    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    pub fn last_sent(&self) -> Option<&Command> {
        self.sent.last()
    }

    /// Replies queued but not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl Connection for ScriptedConnection {
    async fn send(&mut self, command: &Command) -> Result<RespValue, TransportError> {
        trace!(command = command.name(), "Scripted send");
        self.sent.push(command.clone());
        self.replies.pop_front().unwrap_or(Err(TransportError::Exhausted))
    }
}
