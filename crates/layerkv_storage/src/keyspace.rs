//! Key space trait definition.

use crate::working_set::{Slot, WorkingSet};

/// A level of the layerkv keyspace.
///
/// A key space is either the committed base map or the working set of one
/// open transaction. The store always addresses exactly one key space at a
/// time (the current target) and merges one into another on commit.
///
/// # Invariants
///
/// - `read` only ever returns values that are visible at this level
/// - `delete` returns `false` and leaves the level untouched when the key
///   is not visible
/// - `snapshot` returns a fully resolved view: it never contains tombstones
/// - Key spaces must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::KeyValueMap`] - The committed base map
/// - [`super::WorkingSet`] - A transaction frame's overlay
pub trait KeySpace: Send + Sync {
    /// Returns the value visible for `key`, if any.
    fn read(&self, key: &str) -> Option<&str>;

    /// Inserts or replaces the value for `key`.
    fn write(&mut self, key: String, value: String);

    /// Removes `key` from the visible view.
    ///
    /// Returns `false` if the key was not visible, in which case nothing
    /// changes.
    fn delete(&mut self, key: &str) -> bool;

    /// Copies everything visible at this level into a fresh working set.
    ///
    /// The copy is independent: later writes to `self` are not reflected
    /// in it, and vice versa.
    fn snapshot(&self) -> WorkingSet;

    /// Applies one merged slot from a committed child level.
    ///
    /// A [`Slot::Present`] upserts the value. A [`Slot::Tombstone`] removes
    /// the key, or records the tombstone if this level must keep passing the
    /// deletion down on its own commit.
    fn apply(&mut self, key: String, slot: Slot);

    /// Returns the number of keys visible at this level.
    fn visible_len(&self) -> usize;
}
