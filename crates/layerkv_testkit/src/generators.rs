//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random keys, values and
//! operation sequences against a store.

use layerkv_core::{CoreResult, Instruction, Store};
use proptest::prelude::*;

/// Strategy for generating keys.
///
/// Keys come from a small alphabet so that operations collide often.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]").expect("Invalid regex")
}

/// Strategy for generating values, including empty and whitespace values.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,12}").expect("Invalid regex")
}

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read a key
    Read {
        /// Key
        key: String,
    },
    /// Write a key
    Write {
        /// Key
        key: String,
        /// Value
        value: String,
    },
    /// Delete a key
    Delete {
        /// Key
        key: String,
    },
    /// Open a transaction
    Start,
    /// Commit the innermost transaction
    Commit,
    /// Abort the innermost transaction
    Abort,
}

/// What an operation produced: the value for a read, `None` otherwise.
pub type Outcome = CoreResult<Option<String>>;

impl Operation {
    /// Runs the operation against a store.
    pub fn apply(&self, store: &Store) -> Outcome {
        match self {
            Self::Read { key } => store.read(key).map(Some),
            Self::Write { key, value } => {
                store.write(key.as_str(), value.as_str());
                Ok(None)
            }
            Self::Delete { key } => store.delete(key).map(|()| None),
            Self::Start => {
                store.start_transaction();
                Ok(None)
            }
            Self::Commit => store.commit_transaction().map(|()| None),
            Self::Abort => store.abort_transaction().map(|()| None),
        }
    }

    /// Converts the operation into a dispatcher instruction.
    pub fn to_instruction(&self) -> Instruction {
        match self {
            Self::Read { key } => Instruction::new("READ", [key.as_str()]),
            Self::Write { key, value } => Instruction::new("WRITE", [key.as_str(), value.as_str()]),
            Self::Delete { key } => Instruction::new("DELETE", [key.as_str()]),
            Self::Start => Instruction::new("START", Vec::<String>::new()),
            Self::Commit => Instruction::new("COMMIT", Vec::<String>::new()),
            Self::Abort => Instruction::new("ABORT", Vec::<String>::new()),
        }
    }

    /// Returns whether the operation changes the transaction depth.
    pub fn is_transactional(&self) -> bool {
        matches!(self, Self::Start | Self::Commit | Self::Abort)
    }
}

/// Strategy for generating data operations only (no transaction control).
pub fn data_operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Operation::Write { key, value }),
        3 => key_strategy().prop_map(|key| Operation::Read { key }),
        2 => key_strategy().prop_map(|key| Operation::Delete { key }),
    ]
}

/// Strategy for generating any operation.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        9 => data_operation_strategy(),
        2 => Just(Operation::Start),
        1 => Just(Operation::Commit),
        1 => Just(Operation::Abort),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Strategy for generating a sequence of data operations.
pub fn data_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(data_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
