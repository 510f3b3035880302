//! Key-Value Command Façade
//!
//! [`KvFacade`] exposes one async method per store command. Each method
//! builds a [`Command`], performs exactly one round trip on the connection it
//! holds, and decodes the reply with the command's [`ReplyPolicy`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        KvFacade<C>                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐  │
//! │  │  Command    │───>│ C::send     │───>│ P::decode       │  │
//! │  │  (encode)   │    │ (1 trip)    │    │ (+ classifier)  │  │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘  │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      CommandOutcome<T>      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The façade keeps no state between calls. It does not retry, cache, or
//! batch separate calls; variadic arguments within one call travel as one
//! wire command.
//!
//! ## Command families
//!
//! - `keys`: expiry, renaming, type inspection, deletion, sorting
//! - `strings`: GET/SET family, counters, bit operations
//! - `hashes`, `lists`, `sets`, `sorted_sets`

pub mod classify;
pub mod command;
pub mod decode;
pub mod outcome;
pub mod types;

mod hashes;
mod keys;
mod lists;
mod sets;
mod sorted_sets;
mod strings;

pub use classify::{classify_error, ErrorClass, WRONG_TYPE_MARKER};
pub use command::Command;
pub use decode::ReplyPolicy;
pub use outcome::{CommandError, CommandOutcome};
pub use types::{InsertPosition, KeyType, Limit, ScoreBound, ScoredMember, SortOrder, Ttl};

use crate::connection::Connection;
use crate::protocol::RespValue;
use tracing::{trace, warn};

/// Typed command façade over a borrowed or owned connection.
///
/// # Example
///
/// ```no_run
/// use kvfacade::{ClientConfig, CommandOutcome, KvFacade, TcpConnection};
///
/// # async fn demo() -> anyhow::Result<()> {
/// let conn = TcpConnection::connect(&ClientConfig::default()).await?;
/// let mut kv = KvFacade::new(conn);
///
/// kv.set("user:101", "Ariz").await;
/// match kv.hget("user:101", "name").await {
///     CommandOutcome::WrongType => println!("user:101 is not a hash"),
///     other => println!("{:?}", other),
/// }
/// # Ok(())
/// # }
/// ```
pub struct KvFacade<C> {
    conn: C,
}

impl<C: Connection> KvFacade<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Sends an arbitrary command and returns its reply undecoded.
    ///
    /// Error replies are still classified.
    pub async fn command(&mut self, command: Command) -> CommandOutcome<RespValue> {
        self.run::<decode::Raw>(command).await
    }

    /// Sends `command` once and decodes the reply with policy `P`.
    pub async fn run<P: ReplyPolicy>(&mut self, command: Command) -> CommandOutcome<P::Output> {
        trace!(command = command.name(), args = command.arguments().len(), "Dispatch");
        match self.conn.send(&command).await {
            Ok(reply) => P::decode(reply),
            Err(e) => {
                warn!(command = command.name(), error = %e, "Command failed in transport");
                CommandOutcome::TransportFailure(e)
            }
        }
    }

    /// Like [`run`](Self::run) for variadic commands the store rejects when
    /// given no elements. Nothing is sent for an empty list.
    async fn run_variadic<P: ReplyPolicy>(
        &mut self,
        command: Command,
        supplied: usize,
    ) -> CommandOutcome<P::Output> {
        if supplied == 0 {
            return arity_error(command.name());
        }
        self.run::<P>(command).await
    }
}

/// The store's own wording for a bad argument count.
fn arity_error<T>(name: &str) -> CommandOutcome<T> {
    CommandOutcome::StoreError(format!(
        "ERR wrong number of arguments for '{}' command",
        name.to_ascii_lowercase()
    ))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::connection::{ScriptedConnection, TransportError};

    #[tokio::test]
    async fn test_raw_command() {
        let mut kv = facade(vec![RespValue::simple_string("PONG")]);
        let outcome = kv.command(Command::new("PING")).await;
        assert_eq!(outcome, CommandOutcome::Success(RespValue::simple_string("PONG")));
        assert_eq!(last_words(&kv), vec!["PING"]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_distinct() {
        let conn = ScriptedConnection::new().fail(TransportError::Timeout(
            std::time::Duration::from_secs(1),
        ));
        let mut kv = KvFacade::new(conn);
        let outcome = kv.get("k").await;
        assert_eq!(
            outcome,
            CommandOutcome::TransportFailure(TransportError::Timeout(
                std::time::Duration::from_secs(1)
            ))
        );
        // Not retried.
        assert_eq!(kv.connection().sent().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_variadic_sends_nothing() {
        let mut kv = facade(vec![]);
        let keys: [&str; 0] = [];
        assert_eq!(
            kv.mget(&keys).await,
            CommandOutcome::StoreError("ERR wrong number of arguments for 'mget' command".into())
        );
        assert!(kv.connection().sent().is_empty());
    }

    #[tokio::test]
    async fn test_borrowed_connection_per_call() {
        let mut conn = ScriptedConnection::new().reply(RespValue::integer(1));
        {
            let mut kv = KvFacade::new(&mut conn);
            assert_eq!(kv.exists("k").await, CommandOutcome::Success(true));
        }
        assert_eq!(conn.sent().len(), 1);
    }
}
