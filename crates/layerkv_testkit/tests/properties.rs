//! Property tests for nested transaction semantics.

use layerkv_core::{CoreError, Store};
use layerkv_testkit::prelude::*;
use proptest::prelude::*;

/// Opens `depth` transactions on a fresh store.
fn store_at_depth(depth: usize) -> Store {
    let store = Store::new();
    for _ in 0..depth {
        store.start_transaction();
    }
    store
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn write_then_read_round_trips(
        depth in 0usize..5,
        key in key_strategy(),
        value in value_strategy(),
    ) {
        let store = store_at_depth(depth);
        store.write(key.as_str(), value.as_str());
        prop_assert_eq!(store.read(&key), Ok(value));
    }

    #[test]
    fn delete_removes_at_any_depth(
        depth in 0usize..5,
        key in key_strategy(),
        value in value_strategy(),
    ) {
        let store = store_at_depth(depth);
        store.write(key.as_str(), value);
        prop_assert_eq!(store.delete(&key), Ok(()));
        prop_assert_eq!(store.read(&key), Err(CoreError::no_such_key(&key)));
    }

    #[test]
    fn start_then_abort_leaves_outer_state_intact(
        before in operation_sequence_strategy(0, 30),
        inside in operation_sequence_strategy(0, 30),
    ) {
        let store = Store::new();
        for op in &before {
            let _ = op.apply(&store);
        }
        let entries = store.entries();
        let depth = store.active_transactions();

        store.start_transaction();
        let mut opened = 1usize;
        for op in &inside {
            // Stay inside the frame opened above.
            if matches!(op, Operation::Commit | Operation::Abort) && opened == 1 {
                continue;
            }
            if op.apply(&store).is_ok() {
                match op {
                    Operation::Start => opened += 1,
                    Operation::Commit | Operation::Abort => opened -= 1,
                    _ => {}
                }
            }
        }
        for _ in 1..opened {
            store.commit_transaction().unwrap();
        }
        store.abort_transaction().unwrap();

        prop_assert_eq!(store.entries(), entries);
        prop_assert_eq!(store.active_transactions(), depth);
    }

    #[test]
    fn depth_counts_unmatched_starts(ops in operation_sequence_strategy(0, 60)) {
        let store = Store::new();
        let mut expected = 0usize;
        prop_assert_eq!(store.active_transactions(), 0);

        for op in ops.iter().filter(|op| op.is_transactional()) {
            let outcome = op.apply(&store);
            match op {
                Operation::Start => expected += 1,
                _ if expected == 0 => {
                    prop_assert_eq!(outcome, Err(CoreError::NoActiveTransaction));
                }
                _ => expected -= 1,
            }
            prop_assert_eq!(store.active_transactions(), expected);
        }
    }

    #[test]
    fn store_agrees_with_model(ops in operation_sequence_strategy(1, 80)) {
        assert_matches_model(&Store::new(), &ops);
    }

    #[test]
    fn data_operations_agree_with_model_inside_transaction(
        ops in data_sequence_strategy(1, 60),
    ) {
        let mut all = vec![Operation::Start];
        all.extend(ops);
        all.push(Operation::Commit);
        assert_matches_model(&Store::new(), &all);
    }
}

#[test]
fn commit_merges_exactly_one_level() {
    let store = seeded_store(&[("a", "hello")]);
    store.start_transaction();
    store.write("a", "hello-again");
    store.start_transaction();
    store.delete("a").unwrap();

    store.commit_transaction().unwrap();
    assert_eq!(store.active_transactions(), 1);
    assert_eq!(store.read("a"), Err(CoreError::no_such_key("a")));

    store.commit_transaction().unwrap();
    assert_eq!(store.active_transactions(), 0);
    assert!(store.entries().is_empty());
}

#[test]
fn inner_frame_sees_outer_writes() {
    let store = seeded_store(&[("a", "1")]);
    store.start_transaction();
    store.write("a", "2");
    store.start_transaction();
    assert_eq!(store.read("a").unwrap(), "2");
}

#[test]
fn empty_stack_errors() {
    let store = Store::new();
    assert_eq!(store.commit_transaction(), Err(CoreError::NoActiveTransaction));
    assert_eq!(store.abort_transaction(), Err(CoreError::NoActiveTransaction));
    assert_eq!(store.active_transactions(), 0);
}

#[test]
fn scripted_scenarios() {
    run_steps(&Store::new(), &nested_scenario());
    run_steps(&Store::new(), &commit_propagation_scenario());
}
