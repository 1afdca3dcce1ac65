//! Structured instructions and their results.

use crate::error::DispatchError;
use std::fmt;
use std::str::FromStr;

/// A command understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Read one key.
    Read,
    /// Write a key and a value.
    Write,
    /// Delete one key.
    Delete,
    /// Open a nested transaction.
    Start,
    /// Commit the innermost transaction.
    Commit,
    /// Abort the innermost transaction.
    Abort,
    /// Leave the session; not a store operation.
    Quit,
}

impl Command {
    /// All commands, in documentation order.
    pub const ALL: [Command; 7] = [
        Self::Read,
        Self::Write,
        Self::Delete,
        Self::Start,
        Self::Commit,
        Self::Abort,
        Self::Quit,
    ];

    /// Returns the number of arguments the command takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Write => 2,
            Self::Read | Self::Delete => 1,
            Self::Start | Self::Commit | Self::Abort | Self::Quit => 0,
        }
    }

    /// Returns the upper-case command name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Delete => "DELETE",
            Self::Start => "START",
            Self::Commit => "COMMIT",
            Self::Abort => "ABORT",
            Self::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DispatchError::unknown_command(s))
    }
}

/// A command name plus its ordered arguments.
///
/// The name is kept as text so that an unrecognised command can still be
/// reported back to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The command name.
    pub command: String,
    /// The arguments, in order.
    pub args: Vec<String>,
}

impl Instruction {
    /// Creates a new instruction.
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves the command name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] if the name is not a command.
    pub fn resolve(&self) -> Result<Command, DispatchError> {
        self.command.parse()
    }
}

/// The successful outcome of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The operation took effect and has nothing to return.
    Ok,
    /// The value that was read.
    Value(String),
    /// The session should end; `abandoned` transactions are left open.
    Quit {
        /// Number of transactions that were still open.
        abandoned: usize,
    },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Value(value) => write!(f, "'{value}'"),
            Self::Quit { abandoned } => write!(f, "{abandoned} active transactions aborted"),
        }
    }
}
