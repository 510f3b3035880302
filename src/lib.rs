//! # kvfacade - A Typed Command Façade for RESP Key-Value Stores
//!
//! kvfacade puts one strongly typed async method in front of each command of
//! a Redis-compatible store. Every call makes exactly one round trip and
//! returns a [`CommandOutcome`] that tells apart the result shapes callers
//! care about: a value, an absent key, a key of the wrong type, a store
//! error, or a transport failure.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              kvfacade                                   │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────────────────┐  │
//! │  │  KvFacade   │───>│  Command    │───>│  Connection (trait)         │  │
//! │  │  methods    │    │  (RESP out) │    │  ┌───────────────────────┐  │  │
//! │  └──────▲──────┘    └─────────────┘    │  │ StreamConnection<S>   │  │  │
//! │         │                              │  │  (TcpConnection)      │  │  │
//! │         │                              │  ├───────────────────────┤  │  │
//! │         │                              │  │ ScriptedConnection    │  │  │
//! │         │                              │  └───────────────────────┘  │  │
//! │         │                              └──────────────┬──────────────┘  │
//! │         │                                             │                 │
//! │  ┌──────┴──────┐    ┌─────────────┐    ┌──────────────▼──────────────┐  │
//! │  │CommandOutcome│<──│ ReplyPolicy │<───│  RespParser (RESP in)       │  │
//! │  │             │    │ + classifier│    │                             │  │
//! │  └─────────────┘    └─────────────┘    └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use kvfacade::{ClientConfig, CommandOutcome, KvFacade, TcpConnection};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let conn = TcpConnection::connect(&ClientConfig::default()).await?;
//!     let mut kv = KvFacade::new(conn);
//!
//!     kv.sadd("online", &["ariz", "ming"]).await.into_result()?;
//!     match kv.get("greeting").await {
//!         CommandOutcome::Success(value) => println!("{:?}", value),
//!         CommandOutcome::KeyMissing => println!("(nil)"),
//!         other => println!("{:?}", other),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP reply parser and value types
//! - [`connection`]: The `Connection` seam, the stream transport and a scripted fake
//! - [`facade`]: Typed command methods, reply policies and outcomes
//! - [`config`]: Connection settings
//!
//! ## Design Highlights
//!
//! ### One Call, One Round Trip
//!
//! Variadic inputs (`mget`, `sadd`, `del`, ...) travel as a single wire
//! command. The façade never retries, caches, or batches across calls.
//!
//! ### Absence Is Not an Error
//!
//! A missing key is `KeyMissing`, a `WRONGTYPE` reply is `WrongType`, and
//! an empty range is `Success` of an empty collection. Only genuine store
//! refusals and broken transports are failures.

pub mod config;
pub mod connection;
pub mod facade;
pub mod protocol;

// Re-export commonly used types for convenience
pub use config::ClientConfig;
pub use connection::{
    Connection, ConnectionStats, ScriptedConnection, StreamConnection, TcpConnection,
    TransportError,
};
pub use facade::{
    Command, CommandError, CommandOutcome, InsertPosition, KeyType, KvFacade, Limit, ReplyPolicy,
    ScoreBound, ScoredMember, SortOrder, Ttl,
};
pub use protocol::{ParseError, RespParser, RespValue};

/// The default port of a Redis-compatible store
pub const DEFAULT_PORT: u16 = 6379;

/// The default host to connect to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of kvfacade
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
