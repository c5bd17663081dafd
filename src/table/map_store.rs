//! Hash-map-backed frequency table

use super::{sort_by_word, FrequencyTable, StoreKind, WordCount};
use std::collections::HashMap;

/// Initial capacity, enough for a short document without rehashing
const INITIAL_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
pub struct MapTable {
    counts: HashMap<String, u64>,
}

impl MapTable {
    pub fn new() -> Self {
        Self {
            counts: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }
}

impl Default for MapTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable for MapTable {
    fn add(&mut self, word: &str, count: u64) {
        // Avoid allocating a key for words already present
        if let Some(existing) = self.counts.get_mut(word) {
            *existing += count;
        } else {
            self.counts.insert(word.to_string(), count);
        }
    }

    fn find(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    fn enumerate(&self, sorted: bool) -> Vec<WordCount> {
        let mut entries: Vec<WordCount> = self
            .counts
            .iter()
            .map(|(word, &count)| WordCount::new(word.as_str(), count))
            .collect();
        if sorted {
            sort_by_word(&mut entries);
        }
        entries
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Map
    }
}
