//! Benchmark utilities.

use layerkv_core::Store;

/// Create a store whose base map holds `count` keys named `key-0..`.
pub fn populated_store(count: usize) -> Store {
    let store = Store::new();
    for i in 0..count {
        store.write(format!("key-{i}"), format!("value-{i}"));
    }
    store
}

/// Open `depth` transactions on `store`.
pub fn nest(store: &Store, depth: usize) {
    for _ in 0..depth {
        store.start_transaction();
    }
}
