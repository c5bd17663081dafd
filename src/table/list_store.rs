//! Linked-list-backed frequency table
//!
//! New words are pushed to the front, so unsorted enumeration lists the most
//! recently inserted word first.

use super::{sort_by_word, FrequencyTable, StoreKind, WordCount};
use std::collections::LinkedList;

#[derive(Debug, Default, Clone)]
pub struct ListTable {
    entries: LinkedList<WordCount>,
}

impl ListTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrequencyTable for ListTable {
    fn add(&mut self, word: &str, count: u64) {
        match self.entries.iter_mut().find(|wc| wc.word == word) {
            Some(existing) => existing.count += count,
            None => self.entries.push_front(WordCount::new(word, count)),
        }
    }

    fn find(&self, word: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|wc| wc.word == word)
            .map(|wc| wc.count)
    }

    fn enumerate(&self, sorted: bool) -> Vec<WordCount> {
        let mut entries: Vec<WordCount> = self.entries.iter().cloned().collect();
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
        StoreKind::List
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsorted_is_newest_first() {
        let mut table = ListTable::new();
        for word in ["hello", "world", "hello", "good"] {
            table.increment(word);
        }

        let words: Vec<String> = table.enumerate(false).into_iter().map(|wc| wc.word).collect();
        assert_eq!(words, vec!["good", "world", "hello"]);
    }
}
