//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and the canonical nested-transaction scenario.

use crate::generators::{Operation, Outcome};
use layerkv_core::{CoreError, Store};

/// Creates a store whose base map holds `pairs`.
pub fn seeded_store(pairs: &[(&str, &str)]) -> Store {
    let store = Store::new();
    for (key, value) in pairs {
        store.write(*key, *value);
    }
    store
}

/// One step of a scripted scenario: an operation and what it must produce.
#[derive(Debug, Clone)]
pub struct Step {
    /// The operation to run.
    pub op: Operation,
    /// The expected outcome.
    pub expect: Outcome,
}

impl Step {
    fn ok(op: Operation) -> Self {
        Self { op, expect: Ok(None) }
    }

    fn reads(key: &str, value: &str) -> Self {
        Self {
            op: Operation::Read { key: key.into() },
            expect: Ok(Some(value.into())),
        }
    }

    fn misses(key: &str) -> Self {
        Self {
            op: Operation::Read { key: key.into() },
            expect: Err(CoreError::no_such_key(key)),
        }
    }
}

fn write(key: &str, value: &str) -> Operation {
    Operation::Write {
        key: key.into(),
        value: value.into(),
    }
}

/// The canonical scenario: a delete in an inner transaction is committed
/// into the outer one, which is then aborted.
pub fn nested_scenario() -> Vec<Step> {
    vec![
        Step::ok(write("a", "hello")),
        Step::reads("a", "hello"),
        Step::ok(Operation::Start),
        Step::ok(write("a", "hello-again")),
        Step::reads("a", "hello-again"),
        Step::ok(Operation::Start),
        Step::ok(Operation::Delete { key: "a".into() }),
        Step::misses("a"),
        Step::ok(Operation::Commit),
        Step::misses("a"),
        Step::ok(write("a", "once-more")),
        Step::reads("a", "once-more"),
        Step::ok(Operation::Abort),
        Step::reads("a", "hello"),
    ]
}

/// Commit-propagation scenario: a delete travels down one level per commit.
pub fn commit_propagation_scenario() -> Vec<Step> {
    vec![
        Step::ok(write("a", "hello")),
        Step::ok(Operation::Start),
        Step::ok(write("a", "hello-again")),
        Step::ok(Operation::Start),
        Step::ok(Operation::Delete { key: "a".into() }),
        Step::ok(Operation::Commit),
        Step::misses("a"),
        Step::ok(Operation::Commit),
        Step::misses("a"),
    ]
}

/// Runs each step against `store`, panicking on the first mismatch.
pub fn run_steps(store: &Store, steps: &[Step]) {
    for (index, step) in steps.iter().enumerate() {
        let actual = step.op.apply(store);
        assert_eq!(
            actual, step.expect,
            "step {index} ({:?}) produced an unexpected outcome",
            step.op
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_holds_pairs() {
        let store = seeded_store(&[("a", "1"), ("b", "")]);
        assert_eq!(store.read("a").unwrap(), "1");
        assert_eq!(store.read("b").unwrap(), "");
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn nested_scenario_passes() {
        let store = Store::new();
        run_steps(&store, &nested_scenario());
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn commit_propagation_scenario_passes() {
        let store = Store::new();
        run_steps(&store, &commit_propagation_scenario());
        assert!(store.is_empty());
    }
}
