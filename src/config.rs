//! Client configuration.

use crate::{DEFAULT_HOST, DEFAULT_PORT};
use std::time::Duration;

/// Default bound on establishing a TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on a single request/reply exchange.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for [`TcpConnection::connect`](crate::TcpConnection::connect).
///
/// # Example
///
/// ```
/// use kvfacade::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_port(6380)
///     .with_database(2)
///     .with_response_timeout(Duration::from_millis(250));
/// assert_eq!(config.bind_address(), "127.0.0.1:6380");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Logical database chosen with `SELECT` after connecting; 0 skips the command.
    pub database: u32,
    /// Sent with `AUTH` after connecting when set.
    pub password: Option<String>,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: 0,
            password: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Returns the `host:port` address to connect to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
