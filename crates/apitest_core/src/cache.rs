//! Thread-partitioned variable cache.
//!
//! The cache is the channel through which one test's output becomes a
//! later test's input: a capture wrapper writes the key/value pairs of a
//! test's returned object, and an inject wrapper reads them back as
//! missing arguments. Entries are scoped to the thread that wrote them,
//! so a timed-out worker that keeps running in the background can never
//! race the orchestrating thread on the same keys.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// Per-thread key/value store for variable propagation between tests.
///
/// One `VarCache` instance belongs to one [`RunContext`](crate::RunContext);
/// it is not a process-wide singleton. Isolation between threads comes
/// from partitioning by [`ThreadId`], not from locking discipline: the
/// mutex only guards the partition map itself.
///
/// Entries have no expiry and no versioning. Last write wins.
#[derive(Debug, Default)]
pub struct VarCache {
    partitions: Mutex<HashMap<ThreadId, HashMap<String, Value>>>,
}

impl VarCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` in the calling thread's partition,
    /// overwriting any prior value for that key.
    pub fn set(&self, key: &str, value: Value) {
        let mut partitions = self.partitions.lock().expect("cache mutex poisoned");
        partitions
            .entry(thread::current().id())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Returns the value stored under `key` by the calling thread, if any.
    ///
    /// Values written by other threads are never visible.
    pub fn get(&self, key: &str) -> Option<Value> {
        let partitions = self.partitions.lock().expect("cache mutex poisoned");
        partitions
            .get(&thread::current().id())
            .and_then(|p| p.get(key).cloned())
    }

    /// Returns the value under `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Removes every entry in the calling thread's partition.
    ///
    /// Idempotent: clearing an already-empty partition is a no-op.
    pub fn clear(&self) {
        let mut partitions = self.partitions.lock().expect("cache mutex poisoned");
        if let Some(partition) = partitions.get_mut(&thread::current().id()) {
            partition.clear();
        }
    }

    /// Number of entries visible to the calling thread.
    pub fn len(&self) -> usize {
        let partitions = self.partitions.lock().expect("cache mutex poisoned");
        partitions
            .get(&thread::current().id())
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// True when the calling thread's partition holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
