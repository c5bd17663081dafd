//! Vector-backed frequency table
//!
//! Entries are kept in insertion order and found by linear scan. Fine for
//! small vocabularies; use the map store for anything large.

use super::{sort_by_word, FrequencyTable, StoreKind, WordCount};

#[derive(Debug, Default, Clone)]
pub struct VecTable {
    entries: Vec<WordCount>,
}

impl VecTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, word: &str) -> Option<usize> {
        self.entries.iter().position(|wc| wc.word == word)
    }
}

impl FrequencyTable for VecTable {
    fn add(&mut self, word: &str, count: u64) {
        match self.position(word) {
            Some(idx) => self.entries[idx].count += count,
            None => self.entries.push(WordCount::new(word, count)),
        }
    }

    fn find(&self, word: &str) -> Option<u64> {
        self.position(word).map(|idx| self.entries[idx].count)
    }

    fn enumerate(&self, sorted: bool) -> Vec<WordCount> {
        let mut entries = self.entries.clone();
        if sorted {
            sort_by_word(&mut entries);
        }
        entries
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn total(&self) -> u64 {
        self.entries.iter().map(|wc| wc.count).sum()
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Vec
    }
}
