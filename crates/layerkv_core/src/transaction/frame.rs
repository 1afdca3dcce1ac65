//! Transaction frame.

use layerkv_storage::WorkingSet;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One level of nested transaction.
///
/// A frame owns an isolated working set that was seeded from everything
/// visible one level down at the moment the frame was opened. Readers at
/// this level share the frame's lock; a write or delete holds it
/// exclusively for the duration of that single operation.
#[derive(Debug)]
pub struct TransactionFrame {
    /// Nesting depth of this frame, starting at 1 for the outermost frame.
    depth: usize,
    /// The frame's own key-to-slot mapping.
    working_set: RwLock<WorkingSet>,
}

impl TransactionFrame {
    /// Creates a new frame at `depth` over a seeded working set.
    pub(crate) fn new(depth: usize, working_set: WorkingSet) -> Self {
        Self {
            depth,
            working_set: RwLock::new(working_set),
        }
    }

    /// Returns the nesting depth of this frame.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Locks the working set for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, WorkingSet> {
        self.working_set.read()
    }

    /// Locks the working set for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, WorkingSet> {
        self.working_set.write()
    }

    /// Releases the frame, handing back its working set for merging.
    #[must_use]
    pub fn into_working_set(self) -> WorkingSet {
        self.working_set.into_inner()
    }
}
