//! Nested transaction frames.
//!
//! layerkv provides nested transactions with:
//! - **Isolation**: each frame works on its own copy of the keyspace as it
//!   stood when the frame was opened
//! - **One-level commit**: committing a frame merges it into the frame
//!   directly beneath it, or into the base map for the outermost frame
//! - **Discarding abort**: aborting a frame drops its working set untouched
//!
//! Frames live on a [`TransactionStack`]; the "parent" of a frame is simply
//! the element below it.

mod frame;
mod stack;

pub use frame::TransactionFrame;
pub use stack::TransactionStack;
