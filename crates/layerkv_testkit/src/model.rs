//! Reference model for differential testing.
//!
//! [`ModelStore`] implements nested transactions in the most direct way
//! possible: a stack of cloned maps, where commit replaces the level below
//! with the popped copy. It shares no code with the real store, so it can
//! be used as an oracle.

use crate::generators::{Operation, Outcome};
use layerkv_core::{CoreError, CoreResult, Store};
use std::collections::HashMap;

/// A deliberately naive nested-transaction store.
#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    base: HashMap<String, String>,
    frames: Vec<HashMap<String, String>>,
}

impl ModelStore {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    fn top(&self) -> &HashMap<String, String> {
        self.frames.last().unwrap_or(&self.base)
    }

    fn top_mut(&mut self) -> &mut HashMap<String, String> {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.base,
        }
    }

    /// Reads a key at the current level.
    pub fn read(&self, key: &str) -> CoreResult<String> {
        self.top()
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::no_such_key(key))
    }

    /// Writes a key at the current level.
    pub fn write(&mut self, key: &str, value: &str) {
        self.top_mut().insert(key.to_string(), value.to_string());
    }

    /// Deletes a key at the current level.
    pub fn delete(&mut self, key: &str) -> CoreResult<()> {
        self.top_mut()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| CoreError::no_such_key(key))
    }

    /// Opens a transaction over a copy of the current level.
    pub fn start(&mut self) {
        let copy = self.top().clone();
        self.frames.push(copy);
    }

    /// Replaces the level below with the innermost transaction.
    pub fn commit(&mut self) -> CoreResult<()> {
        let frame = self.frames.pop().ok_or(CoreError::NoActiveTransaction)?;
        *self.top_mut() = frame;
        Ok(())
    }

    /// Drops the innermost transaction.
    pub fn abort(&mut self) -> CoreResult<()> {
        self.frames
            .pop()
            .map(|_| ())
            .ok_or(CoreError::NoActiveTransaction)
    }

    /// Returns the number of open transactions.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns every pair visible at the current level, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .top()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Runs an operation against the model.
    pub fn apply(&mut self, op: &Operation) -> Outcome {
        match op {
            Operation::Read { key } => self.read(key).map(Some),
            Operation::Write { key, value } => {
                self.write(key, value);
                Ok(None)
            }
            Operation::Delete { key } => self.delete(key).map(|()| None),
            Operation::Start => {
                self.start();
                Ok(None)
            }
            Operation::Commit => self.commit().map(|()| None),
            Operation::Abort => self.abort().map(|()| None),
        }
    }
}

/// Runs the same operations against a store and a fresh model.
///
/// Panics at the first step where the outcome, the visible entries or the
/// depth differ.
pub fn assert_matches_model(store: &Store, ops: &[Operation]) {
    let mut model = ModelStore::new();
    for (step, op) in ops.iter().enumerate() {
        let expected = model.apply(op);
        let actual = op.apply(store);

        assert_eq!(actual, expected, "outcome mismatch at step {step}: {op:?}");
        assert_eq!(
            store.entries(),
            model.entries(),
            "visible state mismatch after step {step}: {op:?}"
        );
        assert_eq!(
            store.active_transactions(),
            model.depth(),
            "depth mismatch after step {step}: {op:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_commit_replaces_level_below() {
        let mut model = ModelStore::new();
        model.write("a", "1");
        model.start();
        model.delete("a").unwrap();
        model.write("b", "2");
        model.commit().unwrap();

        assert_eq!(model.entries(), vec![("b".to_string(), "2".to_string())]);
    }

    #[test]
    fn model_abort_restores_level_below() {
        let mut model = ModelStore::new();
        model.write("a", "1");
        model.start();
        model.write("a", "2");
        model.abort().unwrap();

        assert_eq!(model.read("a").unwrap(), "1");
        assert_eq!(model.abort(), Err(CoreError::NoActiveTransaction));
    }

    #[test]
    fn store_matches_model_on_nested_scenario() {
        let ops = vec![
            Operation::Write { key: "a".into(), value: "hello".into() },
            Operation::Start,
            Operation::Write { key: "a".into(), value: "hello-again".into() },
            Operation::Start,
            Operation::Delete { key: "a".into() },
            Operation::Commit,
            Operation::Read { key: "a".into() },
            Operation::Write { key: "a".into(), value: "once-more".into() },
            Operation::Abort,
            Operation::Read { key: "a".into() },
        ];
        assert_matches_model(&Store::new(), &ops);
    }
}
