//! Typed command results.

use crate::connection::TransportError;

/// The result of one façade call.
///
/// Each non-success path is its own variant, so "absent", "wrong type",
/// "the store said no" and "never got a reply" can always be told apart.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome<T> {
    Success(T),

    /// The key (or hash field, or sorted-set member) does not exist.
    KeyMissing,

    /// The key holds a value of a type the command cannot operate on.
    WrongType,

    /// Any other error reply, with the store's message verbatim.
    StoreError(String),

    /// No reply was obtained. Never retried by the façade.
    TransportFailure(TransportError),
}

impl<T> CommandOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CommandOutcome::KeyMissing)
    }

    pub fn is_wrong_type(&self) -> bool {
        matches!(self, CommandOutcome::WrongType)
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, CommandOutcome::TransportFailure(_))
    }

    /// Returns the success value, discarding every other outcome.
    pub fn success(self) -> Option<T> {
        match self {
            CommandOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> CommandOutcome<&T> {
        match self {
            CommandOutcome::Success(value) => CommandOutcome::Success(value),
            CommandOutcome::KeyMissing => CommandOutcome::KeyMissing,
            CommandOutcome::WrongType => CommandOutcome::WrongType,
            CommandOutcome::StoreError(message) => CommandOutcome::StoreError(message.clone()),
            CommandOutcome::TransportFailure(e) => CommandOutcome::TransportFailure(e.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CommandOutcome<U> {
        self.and_then(|value| CommandOutcome::Success(f(value)))
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> CommandOutcome<U>) -> CommandOutcome<U> {
        match self {
            CommandOutcome::Success(value) => f(value),
            CommandOutcome::KeyMissing => CommandOutcome::KeyMissing,
            CommandOutcome::WrongType => CommandOutcome::WrongType,
            CommandOutcome::StoreError(message) => CommandOutcome::StoreError(message),
            CommandOutcome::TransportFailure(e) => CommandOutcome::TransportFailure(e),
        }
    }

    /// Converts to a `Result` for `?`-style callers. Absence becomes `Ok(None)`.
    ///
    /// # Example
    ///
    /// ```
    /// use kvfacade::{CommandError, CommandOutcome};
    ///
    /// let missing: CommandOutcome<i64> = CommandOutcome::KeyMissing;
    /// assert_eq!(missing.into_result(), Ok(None));
    ///
    /// let wrong: CommandOutcome<i64> = CommandOutcome::WrongType;
    /// assert_eq!(wrong.into_result(), Err(CommandError::WrongType));
    /// ```
    pub fn into_result(self) -> Result<Option<T>, CommandError> {
        match self {
            CommandOutcome::Success(value) => Ok(Some(value)),
            CommandOutcome::KeyMissing => Ok(None),
            CommandOutcome::WrongType => Err(CommandError::WrongType),
            CommandOutcome::StoreError(message) => Err(CommandError::Store(message)),
            CommandOutcome::TransportFailure(e) => Err(CommandError::Transport(e)),
        }
    }
}

impl<T> From<TransportError> for CommandOutcome<T> {
    fn from(err: TransportError) -> Self {
        CommandOutcome::TransportFailure(err)
    }
}

/// The failing half of [`CommandOutcome::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("WRONGTYPE operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("store error: {0}")]
    Store(String),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl CommandError {
    /// Transport failures may be retried on a new connection; store errors may not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommandError::Transport(_))
    }
}
