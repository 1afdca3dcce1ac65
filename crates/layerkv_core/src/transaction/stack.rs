//! Transaction stack.

use crate::transaction::frame::TransactionFrame;
use layerkv_storage::WorkingSet;

/// LIFO collection of open transaction frames.
///
/// The most recently opened frame is last. Its depth always equals the
/// number of frames, so `depth() == 0` means every operation goes straight
/// to the base map.
///
/// The stack holds no lock of its own and contains no merge logic: the
/// [`crate::Store`] guards it with a single stack-wide lock, and decides
/// where a popped frame's working set goes.
#[derive(Debug, Default)]
pub struct TransactionStack {
    frames: Vec<TransactionFrame>,
}

impl TransactionStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame over `working_set` and returns the new depth.
    pub fn push(&mut self, working_set: WorkingSet) -> usize {
        let depth = self.frames.len() + 1;
        self.frames.push(TransactionFrame::new(depth, working_set));
        depth
    }

    /// Removes and returns the top frame, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<TransactionFrame> {
        self.frames.pop()
    }

    /// Returns the current top frame.
    #[must_use]
    pub fn top(&self) -> Option<&TransactionFrame> {
        self.frames.last()
    }

    /// Returns the number of open frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns whether no frame is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
