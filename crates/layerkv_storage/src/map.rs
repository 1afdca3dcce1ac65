//! The committed base key-value map.

use crate::keyspace::KeySpace;
use crate::working_set::{Slot, WorkingSet};
use std::collections::hash_map;
use std::collections::HashMap;

/// A plain mapping from string key to string value.
///
/// This is the representation of the committed base keyspace. It has no
/// notion of deletion markers: a deleted key is simply absent.
///
/// # Thread Safety
///
/// The map itself is not synchronised. Callers that share it across
/// threads wrap it in a lock.
///
/// # Example
///
/// ```rust
/// use layerkv_storage::KeyValueMap;
///
/// let mut map = KeyValueMap::new();
/// map.insert("fruit".into(), "apple".into());
/// assert_eq!(map.get("fruit"), Some("apple"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueMap {
    entries: HashMap<String, String>,
}

impl KeyValueMap {
    /// Creates a new empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for at least `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all key-value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for KeyValueMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for KeyValueMap {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl KeySpace for KeyValueMap {
    fn read(&self, key: &str) -> Option<&str> {
        self.get(key)
    }

    fn write(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn snapshot(&self) -> WorkingSet {
        WorkingSet::seeded(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    fn apply(&mut self, key: String, slot: Slot) {
        match slot {
            Slot::Present(value) => {
                self.entries.insert(key, value);
            }
            Slot::Tombstone => {
                self.entries.remove(&key);
            }
        }
    }

    fn visible_len(&self) -> usize {
        self.entries.len()
    }
}
