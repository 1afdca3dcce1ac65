//! Tagged working sets for transaction levels.

use crate::keyspace::KeySpace;
use std::collections::hash_map;
use std::collections::HashMap;

/// The state of one key inside a working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The key holds this value at this level.
    Present(String),
    /// The key was deleted at this level.
    Tombstone,
}

impl Slot {
    /// Returns the value if the slot is present.
    #[must_use]
    pub fn as_present(&self) -> Option<&str> {
        match self {
            Self::Present(value) => Some(value),
            Self::Tombstone => None,
        }
    }

    /// Returns whether the slot records a deletion.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone)
    }
}

/// The key-to-slot mapping owned by a single transaction frame.
///
/// A working set is seeded with a resolved copy of everything visible one
/// level down, so it is the complete view at its level: a key that is absent
/// or tombstoned here is absent, with no fallthrough to the parent.
///
/// Deletions are kept as [`Slot::Tombstone`] so that a commit can tell
/// "never touched" apart from "explicitly deleted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    slots: HashMap<String, Slot>,
}

impl WorkingSet {
    /// Creates an empty working set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a working set holding the given resolved pairs as present slots.
    pub fn seeded<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            slots: entries
                .into_iter()
                .map(|(key, value)| (key, Slot::Present(value)))
                .collect(),
        }
    }

    /// Returns the visible value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).and_then(Slot::as_present)
    }

    /// Returns the raw slot for `key`, tombstones included.
    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    /// Sets `key` to a present value.
    pub fn insert(&mut self, key: String, value: String) {
        self.slots.insert(key, Slot::Present(value));
    }

    /// Replaces a present value with a tombstone.
    ///
    /// Returns `false` if the key is absent or already tombstoned.
    pub fn tombstone(&mut self, key: &str) -> bool {
        match self.slots.get_mut(key) {
            Some(slot @ Slot::Present(_)) => {
                *slot = Slot::Tombstone;
                true
            }
            _ => false,
        }
    }

    /// Iterates over every slot, tombstones included.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Consumes the set, yielding every slot.
    pub fn into_slots(self) -> hash_map::IntoIter<String, Slot> {
        self.slots.into_iter()
    }

    /// Returns the total number of slots, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the set holds no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of tombstoned keys.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.slots.values().filter(|s| s.is_tombstone()).count()
    }
}

impl KeySpace for WorkingSet {
    fn read(&self, key: &str) -> Option<&str> {
        self.get(key)
    }

    fn write(&mut self, key: String, value: String) {
        self.insert(key, value);
    }

    fn delete(&mut self, key: &str) -> bool {
        self.tombstone(key)
    }

    fn snapshot(&self) -> WorkingSet {
        Self::seeded(
            self.slots
                .iter()
                .filter_map(|(k, s)| s.as_present().map(|v| (k.clone(), v.to_string()))),
        )
    }

    fn apply(&mut self, key: String, slot: Slot) {
        // Tombstones are kept so the deletion reaches the next level down.
        self.slots.insert(key, slot);
    }

    fn visible_len(&self) -> usize {
        self.slots.len() - self.tombstone_count()
    }
}
