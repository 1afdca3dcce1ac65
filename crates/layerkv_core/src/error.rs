//! Error types for layerkv core.

use crate::instruction::Command;
use thiserror::Error;

/// Result type for store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for dispatching instructions.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised by [`crate::Store`] operations.
///
/// Every failure leaves the store exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The key is not visible at the current transaction level.
    #[error("key not found: {key}")]
    NoSuchKey {
        /// The key that was looked up.
        key: String,
    },

    /// Commit or abort was requested with no transaction open.
    #[error("no active transaction")]
    NoActiveTransaction,
}

impl CoreError {
    /// Creates a no such key error.
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::NoSuchKey { key: key.into() }
    }
}

/// Errors raised while turning an [`crate::Instruction`] into a store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The command was given the wrong number of arguments.
    #[error("{command} expects {expected} argument(s) but received {actual}")]
    ArgumentCountMismatch {
        /// The command that was invoked.
        command: Command,
        /// Number of arguments the command takes.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// The command name is not recognised.
    #[error("command '{command}' not found")]
    UnknownCommand {
        /// The command name as given.
        command: String,
    },

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] CoreError),
}

impl DispatchError {
    /// Creates an argument count mismatch error for `command`.
    pub fn argument_count(command: Command, actual: usize) -> Self {
        Self::ArgumentCountMismatch {
            command,
            expected: command.arity(),
            actual,
        }
    }

    /// Creates an unknown command error.
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_key_message_names_key() {
        let err = CoreError::no_such_key("fruit");
        assert_eq!(err.to_string(), "key not found: fruit");
    }

    #[test]
    fn argument_count_uses_command_arity() {
        let err = DispatchError::argument_count(Command::Write, 1);
        assert_eq!(
            err,
            DispatchError::ArgumentCountMismatch {
                command: Command::Write,
                expected: 2,
                actual: 1,
            }
        );
        assert_eq!(
            err.to_string(),
            "WRITE expects 2 argument(s) but received 1"
        );
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let err = DispatchError::from(CoreError::NoActiveTransaction);
        assert_eq!(err.to_string(), "no active transaction");
    }

    #[test]
    fn unknown_command_quotes_name() {
        let err = DispatchError::unknown_command("FROB");
        assert_eq!(err.to_string(), "command 'FROB' not found");
    }
}
