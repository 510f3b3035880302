//! Error Classifier
//!
//! Sorts an error reply into "wrong type" or "everything else" by its
//! leading error code only. The prose after the code is free to change
//! between store versions; the code is not.

use crate::facade::CommandOutcome;

/// Error code a store uses for type mismatches.
pub const WRONG_TYPE_MARKER: &str = "WRONGTYPE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    WrongType,
    Store,
}

/// Classifies an error reply by its first whitespace-delimited word.
pub fn classify_error(message: &str) -> ErrorClass {
    match message.split_ascii_whitespace().next() {
        Some(WRONG_TYPE_MARKER) => ErrorClass::WrongType,
        _ => ErrorClass::Store,
    }
}

/// Builds the outcome for an error reply, preserving the message for store errors.
pub fn error_outcome<T>(message: String) -> CommandOutcome<T> {
    match classify_error(&message) {
        ErrorClass::WrongType => CommandOutcome::WrongType,
        ErrorClass::Store => CommandOutcome::StoreError(message),
    }
}
