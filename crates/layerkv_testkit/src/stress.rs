//! Stress tests for layerkv.
//!
//! These drivers hammer one shared store from several threads and report
//! how many operations went through.

use layerkv_core::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Number of distinct keys.
    pub key_count: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 1_000,
            threads: 4,
            key_count: 64,
        }
    }
}

fn key(index: usize, config: &StressConfig) -> String {
    format!("key-{}", index % config.key_count.max(1))
}

fn run_threads<F>(config: &StressConfig, work: F) -> StressTestResult
where
    F: Fn(usize, usize) -> bool + Sync,
{
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let start = Instant::now();

    thread::scope(|scope| {
        for t in 0..config.threads {
            let (work, successful, failed) = (&work, &successful, &failed);
            scope.spawn(move || {
                for i in 0..config.operations {
                    if work(t, i) {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Concurrent writers and readers on the base map.
///
/// Every thread writes a key and immediately reads it back; with no
/// transaction open the read can only fail if another thread deleted it,
/// which this driver never does.
pub fn stress_concurrent_writes(store: &Store, config: &StressConfig) -> StressTestResult {
    run_threads(config, |t, i| {
        let key = key(t * config.operations + i, config);
        store.write(key.as_str(), format!("{t}:{i}"));
        store.read(&key).is_ok()
    })
}

/// Concurrent balanced Start/Commit and Start/Abort pairs.
///
/// Each iteration opens one transaction and closes one. A close only fails
/// if another thread already closed the frame this thread opened, which
/// still leaves the stack consistent.
pub fn stress_transaction_churn(store: &Store, config: &StressConfig) -> StressTestResult {
    run_threads(config, |t, i| {
        store.start_transaction();
        store.write(key(i, config), format!("{t}:{i}"));
        if (t + i) % 2 == 0 {
            store.commit_transaction().is_ok()
        } else {
            store.abort_transaction().is_ok()
        }
    })
}

/// Concurrent readers while one thread keeps nesting and unwinding.
///
/// Readers only touch keys seeded before the run and never deleted, so
/// every read must succeed no matter which level is on top.
pub fn stress_readers_during_nesting(store: &Store, config: &StressConfig) -> StressTestResult {
    for i in 0..config.key_count {
        store.write(key(i, config), "seed");
    }

    run_threads(config, |t, i| {
        if t == 0 {
            store.start_transaction();
            store.write(key(i, config), format!("nested:{i}"));
            if i % 3 == 0 {
                store.abort_transaction().is_ok()
            } else {
                store.commit_transaction().is_ok()
            }
        } else {
            store.read(&key(i, config)).is_ok()
        }
    })
}

/// Writers read back their own key while thread 0 churns Start/Commit.
///
/// Thread 0 never aborts, so every acknowledged write stays visible: a
/// read-back that differs from the value just written is a lost update and
/// counts as a failure.
pub fn stress_writes_during_commit_churn(store: &Store, config: &StressConfig) -> StressTestResult {
    run_threads(config, |t, i| {
        if t == 0 {
            store.start_transaction();
            store.commit_transaction().is_ok()
        } else {
            let key = format!("writer-{t}");
            let value = i.to_string();
            store.write(key.as_str(), value.as_str());
            store.read(&key).is_ok_and(|read| read == value)
        }
    })
}
