//! Lock-guarded table for direct concurrent mutation
//!
//! Every producer increments the same table. The lock is held across the
//! whole lookup-or-insert-then-increment sequence, never partially, so no
//! update can be lost between the check and the write.
//!
//! Reads are only meaningful once every writer has finished; call
//! [`SharedTable::into_inner`] to end the shared phase.

use super::{FrequencyTable, StoreKind, WordCount};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct SharedTable {
    table: Mutex<Box<dyn FrequencyTable>>,
    increments: AtomicU64,
}

impl SharedTable {
    /// Wrap an exclusively owned table for shared mutation
    pub fn new(table: Box<dyn FrequencyTable>) -> Self {
        Self {
            table: Mutex::new(table),
            increments: AtomicU64::new(0),
        }
    }

    /// Create an empty shared table with the given backing store
    pub fn with_store(kind: StoreKind) -> Self {
        Self::new(kind.build())
    }

    /// Count one occurrence of `word` under the table lock
    pub fn increment(&self, word: &str) {
        self.table.lock().increment(word);
        self.increments.fetch_add(1, Ordering::Relaxed);
    }

    /// Add `count` occurrences of `word` under the table lock
    pub fn add(&self, word: &str, count: u64) {
        self.table.lock().add(word, count);
        self.increments.fetch_add(count, Ordering::Relaxed);
    }

    /// Current count for `word`
    ///
    /// Only consistent once no producer is incrementing.
    pub fn find(&self, word: &str) -> Option<u64> {
        self.table.lock().find(word)
    }

    /// Snapshot of the table; only consistent once writers are done
    pub fn snapshot(&self, sorted: bool) -> Vec<WordCount> {
        self.table.lock().enumerate(sorted)
    }

    /// Number of increments applied so far
    pub fn increments(&self) -> u64 {
        self.increments.load(Ordering::Relaxed)
    }

    /// End the shared phase and take the table back
    pub fn into_inner(self) -> Box<dyn FrequencyTable> {
        self.table.into_inner()
    }
}
