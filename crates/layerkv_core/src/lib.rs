//! # layerkv Core
//!
//! In-memory key-value store with nested transactions.
//!
//! This crate provides:
//! - [`Store`], which routes reads, writes and deletes to the innermost open
//!   transaction or to the committed base map
//! - Nested transactions that merge exactly one level down on commit and
//!   vanish without a trace on abort
//! - A structured [`Instruction`] model and [`execute`], the dispatcher that
//!   enforces command arity before calling the store
//! - Operation statistics
//!
//! ## Example
//!
//! ```rust
//! use layerkv_core::Store;
//!
//! let store = Store::new();
//! store.write("a", "1");
//!
//! store.start_transaction();
//! store.write("a", "2");
//! store.start_transaction();
//! assert_eq!(store.read("a").unwrap(), "2");
//! store.commit_transaction().unwrap();
//! store.commit_transaction().unwrap();
//!
//! assert_eq!(store.read("a").unwrap(), "2");
//! assert_eq!(store.active_transactions(), 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dispatch;
mod error;
mod instruction;
mod stats;
mod store;
pub mod transaction;

pub use config::Config;
pub use dispatch::execute;
pub use error::{CoreError, CoreResult, DispatchError, DispatchResult};
pub use instruction::{Command, Instruction, Response};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::Store;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
