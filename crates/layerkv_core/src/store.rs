//! The nested-transaction key-value store.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::stats::StoreStats;
use crate::transaction::TransactionStack;
use layerkv_storage::{KeySpace, KeyValueMap, Slot, WorkingSet};
use parking_lot::RwLock;
use tracing::{debug, trace};

/// An in-memory key-value store with nested transactions.
///
/// Every read, write and delete resolves against the current target: the
/// working set of the innermost open transaction, or the base map when no
/// transaction is open. Reads never fall through to an outer level, because
/// each frame was fully seeded from its parent when it was opened.
///
/// ## Locking
///
/// - The stack is guarded by one stack-wide lock. Data operations hold it
///   shared; `start_transaction`, `commit_transaction` and
///   `abort_transaction` hold it exclusively, including the snapshot copy
///   and the merge.
/// - The base map and every frame carry their own reader/writer lock,
///   held only for the duration of a single operation.
/// - Locks are always taken stack first, then at most one level.
///
/// The store is `Send + Sync` and is meant to be shared by reference or
/// through an `Arc`.
///
/// # Example
///
/// ```rust
/// use layerkv_core::{CoreError, Store};
///
/// let store = Store::new();
/// store.write("a", "hello");
///
/// store.start_transaction();
/// store.delete("a").unwrap();
/// assert_eq!(store.read("a"), Err(CoreError::no_such_key("a")));
///
/// store.abort_transaction().unwrap();
/// assert_eq!(store.read("a").unwrap(), "hello");
/// ```
pub struct Store {
    /// Committed keyspace.
    base: RwLock<KeyValueMap>,
    /// Open transaction frames, innermost last.
    stack: RwLock<TransactionStack>,
    config: Config,
    stats: StoreStats,
}

impl Store {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            base: RwLock::new(KeyValueMap::with_capacity(config.initial_capacity)),
            stack: RwLock::new(TransactionStack::new()),
            config,
            stats: StoreStats::new(),
        }
    }

    /// Inserts or replaces `key` in the current target.
    pub fn write(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.trace_operation("write", &key);
        self.with_target_mut(|target| target.write(key, value.into()));
        self.stats.record_write();
    }

    /// Returns the value of `key` in the current target.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoSuchKey`] if the key is not visible at the
    /// current level.
    pub fn read(&self, key: &str) -> CoreResult<String> {
        self.trace_operation("read", key);
        self.stats.record_read();
        self.with_target(|target| target.read(key).map(str::to_string))
            .ok_or_else(|| self.miss(key))
    }

    /// Removes `key` from the current target.
    ///
    /// Inside a transaction the key is tombstoned, so the deletion reaches
    /// the next level down when the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoSuchKey`] if the key is not visible at the
    /// current level.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        self.trace_operation("delete", key);
        self.stats.record_delete();
        if self.with_target_mut(|target| target.delete(key)) {
            Ok(())
        } else {
            Err(self.miss(key))
        }
    }

    /// Opens a new transaction on top of the current target.
    ///
    /// The new frame starts from an independent copy of everything visible
    /// right now. Later writes below it are never seen through it.
    ///
    /// The copy is taken under the exclusive stack lock, so Start costs
    /// O(visible keys) and blocks every other operation meanwhile; in
    /// exchange no write can land between the copy and the push.
    pub fn start_transaction(&self) {
        let mut stack = self.stack.write();
        let working_set = match stack.top() {
            Some(frame) => frame.read().snapshot(),
            None => self.base.read().snapshot(),
        };
        let seeded = working_set.len();
        let depth = stack.push(working_set);
        drop(stack);

        self.stats.record_transaction_start();
        debug!(depth, seeded, "transaction started");
    }

    /// Commits the innermost transaction into the level beneath it.
    ///
    /// Every slot of the committed frame is applied to the new target:
    /// present values are upserted and tombstones remove the key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] if no transaction is open.
    pub fn commit_transaction(&self) -> CoreResult<()> {
        // The new top must not accept writes before the merge lands on it,
        // so the whole merge runs under the exclusive stack lock.
        let mut stack = self.stack.write();
        let frame = stack.pop().ok_or(CoreError::NoActiveTransaction)?;
        let depth = frame.depth();

        let working_set = frame.into_working_set();
        let slots = working_set.len();
        let tombstones = working_set.tombstone_count();

        match stack.top() {
            Some(parent) => merge(&mut *parent.write(), working_set),
            None => merge(&mut *self.base.write(), working_set),
        }
        let into_base = stack.is_empty();
        drop(stack);

        self.stats.record_transaction_commit();
        debug!(depth, slots, tombstones, into_base, "transaction committed");
        Ok(())
    }

    /// Discards the innermost transaction without merging it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] if no transaction is open.
    pub fn abort_transaction(&self) -> CoreResult<()> {
        let frame = self
            .stack
            .write()
            .pop()
            .ok_or(CoreError::NoActiveTransaction)?;
        let depth = frame.depth();
        let discarded = frame.into_working_set().len();

        self.stats.record_transaction_abort();
        debug!(depth, discarded, "transaction aborted");
        Ok(())
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn active_transactions(&self) -> usize {
        self.stack.read().depth()
    }

    /// Runs `f` inside a new transaction.
    ///
    /// If `f` returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the transaction is aborted and the error returned.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or the commit error if the frame
    /// was closed by someone else in the meantime.
    pub fn transaction<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Store) -> CoreResult<T>,
    {
        self.start_transaction();
        match f(self) {
            Ok(result) => {
                self.commit_transaction()?;
                Ok(result)
            }
            Err(e) => {
                // Don't mask the original error
                let _ = self.abort_transaction();
                Err(e)
            }
        }
    }

    /// Returns the number of keys visible at the current level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_target(|target| target.visible_len())
    }

    /// Returns whether no key is visible at the current level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every pair visible at the current level, sorted by key.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .with_target(|target| target.snapshot())
            .into_slots()
            .filter_map(|(key, slot)| match slot {
                Slot::Present(value) => Some((key, value)),
                Slot::Tombstone => None,
            })
            .collect();
        entries.sort();
        entries
    }

    /// Returns the store's operation counters.
    #[must_use]
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    /// Returns the configuration the store was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn with_target<T>(&self, f: impl FnOnce(&dyn KeySpace) -> T) -> T {
        let stack = self.stack.read();
        match stack.top() {
            Some(frame) => f(&*frame.read()),
            None => f(&*self.base.read()),
        }
    }

    fn with_target_mut<T>(&self, f: impl FnOnce(&mut dyn KeySpace) -> T) -> T {
        let stack = self.stack.read();
        match stack.top() {
            Some(frame) => f(&mut *frame.write()),
            None => f(&mut *self.base.write()),
        }
    }

    fn miss(&self, key: &str) -> CoreError {
        self.stats.record_miss();
        CoreError::no_such_key(key)
    }

    fn trace_operation(&self, operation: &'static str, key: &str) {
        if self.config.trace_operations {
            trace!(operation, key, "data operation");
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("active_transactions", &self.active_transactions())
            .field("visible_keys", &self.len())
            .finish_non_exhaustive()
    }
}

/// Applies every slot of a committed working set onto `target`.
fn merge(target: &mut dyn KeySpace, working_set: WorkingSet) {
    for (key, slot) in working_set.into_slots() {
        target.apply(key, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "fruit";
    const VALUE: &str = "apple";

    #[test]
    fn read_missing_key_fails() {
        let store = Store::new();
        assert_eq!(store.read("null"), Err(CoreError::no_such_key("null")));
    }

    #[test]
    fn write_then_read() {
        let store = Store::new();
        store.write(KEY, VALUE);
        assert_eq!(store.read(KEY).unwrap(), VALUE);
    }

    #[test]
    fn write_overwrites() {
        let store = Store::new();
        store.write(KEY, VALUE);
        store.write(KEY, "pear");
        assert_eq!(store.read(KEY).unwrap(), "pear");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_missing_key_fails() {
        let store = Store::new();
        assert_eq!(store.delete("null"), Err(CoreError::no_such_key("null")));
    }

    #[test]
    fn delete_removes_key() {
        let store = Store::new();
        store.write(KEY, VALUE);
        store.delete(KEY).unwrap();
        assert!(store.read(KEY).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn commit_and_abort_without_transaction_fail() {
        let store = Store::new();
        assert_eq!(store.commit_transaction(), Err(CoreError::NoActiveTransaction));
        assert_eq!(store.abort_transaction(), Err(CoreError::NoActiveTransaction));
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn depth_tracks_start_commit_abort() {
        let store = Store::new();
        store.start_transaction();
        store.start_transaction();
        store.start_transaction();
        assert_eq!(store.active_transactions(), 3);

        store.commit_transaction().unwrap();
        assert_eq!(store.active_transactions(), 2);

        store.abort_transaction().unwrap();
        assert_eq!(store.active_transactions(), 1);

        store.commit_transaction().unwrap();
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn nested_transaction_scenario() {
        let store = Store::new();

        store.write("a", "hello");
        assert_eq!(store.read("a").unwrap(), "hello");

        // Parent transaction
        store.start_transaction();
        store.write("a", "hello-again");
        assert_eq!(store.read("a").unwrap(), "hello-again");

        // Child transaction
        store.start_transaction();
        store.delete("a").unwrap();
        assert!(store.read("a").is_err());

        // Commit child into parent
        store.commit_transaction().unwrap();
        assert!(store.read("a").is_err());

        store.write("a", "once-more");
        assert_eq!(store.read("a").unwrap(), "once-more");

        // Abort parent
        store.abort_transaction().unwrap();
        assert_eq!(store.read("a").unwrap(), "hello");
    }

    #[test]
    fn delete_propagates_through_two_commits() {
        let store = Store::new();
        store.write("a", "hello");

        store.start_transaction();
        store.write("a", "hello-again");
        store.start_transaction();
        store.delete("a").unwrap();

        store.commit_transaction().unwrap();
        assert!(store.read("a").is_err());

        store.commit_transaction().unwrap();
        assert!(store.read("a").is_err());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn inner_frame_starts_from_outer_frame() {
        let store = Store::new();
        store.write("a", "1");
        store.start_transaction();
        store.write("a", "2");
        store.start_transaction();
        assert_eq!(store.read("a").unwrap(), "2");
    }

    #[test]
    fn untouched_base_keys_survive_commit() {
        let store = Store::new();
        store.write("keep", "1");
        store.write("change", "1");

        store.start_transaction();
        store.write("change", "2");
        store.write("new", "3");
        store.commit_transaction().unwrap();

        assert_eq!(
            store.entries(),
            vec![
                ("change".to_string(), "2".to_string()),
                ("keep".to_string(), "1".to_string()),
                ("new".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn write_then_delete_inside_transaction_leaves_base_clean() {
        let store = Store::new();
        store.start_transaction();
        store.write("temp", "x");
        store.delete("temp").unwrap();
        store.commit_transaction().unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn failed_operations_leave_state_unchanged() {
        let store = Store::new();
        store.write("a", "1");
        store.start_transaction();

        let before = store.entries();
        assert!(store.delete("missing").is_err());
        assert!(store.read("missing").is_err());
        assert_eq!(store.entries(), before);
        assert_eq!(store.active_transactions(), 1);
    }

    #[test]
    fn transaction_helper_commits_on_ok() {
        let store = Store::new();
        store
            .transaction(|txn| {
                txn.write(KEY, VALUE);
                Ok(())
            })
            .unwrap();

        assert_eq!(store.read(KEY).unwrap(), VALUE);
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn transaction_helper_aborts_on_error() {
        let store = Store::new();
        let result: CoreResult<()> = store.transaction(|txn| {
            txn.write(KEY, VALUE);
            txn.delete("missing")
        });

        assert_eq!(result, Err(CoreError::no_such_key("missing")));
        assert!(store.read(KEY).is_err());
        assert_eq!(store.active_transactions(), 0);
    }

    #[test]
    fn stats_count_operations() {
        let store = Store::new();
        store.write("a", "1");
        let _ = store.read("a");
        let _ = store.read("b");
        store.start_transaction();
        store.abort_transaction().unwrap();

        let stats = store.stats().snapshot();
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.transactions_started, 1);
        assert_eq!(stats.transactions_aborted, 1);
    }

    #[test]
    fn with_config_keeps_config() {
        let store = Store::with_config(Config::new().initial_capacity(64));
        assert_eq!(store.config().initial_capacity, 64);
        assert!(store.is_empty());
    }

    #[test]
    fn commit_never_reverts_acknowledged_writes() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let store = Store::new();
        let done = AtomicBool::new(false);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    store.start_transaction();
                    store.commit_transaction().unwrap();
                }
            });

            for i in 0..20_000 {
                let value = format!("c{i}");
                store.write(KEY, value.as_str());
                assert_eq!(store.read(KEY).unwrap(), value, "write {i} was lost");
            }
            done.store(true, Ordering::Relaxed);
        });

        assert_eq!(store.active_transactions(), 0);
        assert_eq!(store.read(KEY).unwrap(), "c19999");
    }
}

