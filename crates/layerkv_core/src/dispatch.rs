//! Executes structured instructions against a store.

use crate::error::{DispatchError, DispatchResult};
use crate::instruction::{Command, Instruction, Response};
use crate::store::Store;

/// Executes one instruction against `store`.
///
/// The command name is resolved and its arity checked before the store is
/// touched, so a malformed instruction never has a partial effect. `QUIT`
/// does not change the store; it only reports how many transactions are
/// still open.
///
/// # Errors
///
/// - [`DispatchError::UnknownCommand`] for an unrecognised name
/// - [`DispatchError::ArgumentCountMismatch`] for the wrong number of arguments
/// - [`DispatchError::Store`] when the store rejects the operation
///
/// # Example
///
/// ```rust
/// use layerkv_core::{execute, Instruction, Response, Store};
///
/// let store = Store::new();
/// execute(&store, &Instruction::new("WRITE", ["k", "v"])).unwrap();
///
/// let response = execute(&store, &Instruction::new("read", ["k"])).unwrap();
/// assert_eq!(response, Response::Value("v".into()));
/// ```
pub fn execute(store: &Store, instruction: &Instruction) -> DispatchResult<Response> {
    let command = instruction.resolve()?;

    let response = match (command, instruction.args.as_slice()) {
        (Command::Read, [key]) => Response::Value(store.read(key)?),
        (Command::Write, [key, value]) => {
            store.write(key.as_str(), value.as_str());
            Response::Ok
        }
        (Command::Delete, [key]) => {
            store.delete(key)?;
            Response::Ok
        }
        (Command::Start, []) => {
            store.start_transaction();
            Response::Ok
        }
        (Command::Commit, []) => {
            store.commit_transaction()?;
            Response::Ok
        }
        (Command::Abort, []) => {
            store.abort_transaction()?;
            Response::Ok
        }
        (Command::Quit, []) => Response::Quit {
            abandoned: store.active_transactions(),
        },
        (command, args) => return Err(DispatchError::argument_count(command, args.len())),
    };

    Ok(response)
}
