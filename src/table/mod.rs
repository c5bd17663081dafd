//! Word frequency tables
//!
//! One contract, [`FrequencyTable`], with interchangeable backing stores
//! chosen at construction time through [`StoreKind`]:
//!
//! - [`VecTable`]: vector of counts, linear lookup
//! - [`ListTable`]: linked list of counts, linear lookup, newest first
//! - [`MapTable`]: hash map (default)
//!
//! Tables are plain single-writer data structures. Concurrent mutation goes
//! through [`SharedTable`], which holds one lock across each whole
//! lookup-or-insert-then-increment sequence.

pub mod list_store;
pub mod map_store;
pub mod shared;
pub mod vec_store;

pub use list_store::ListTable;
pub use map_store::MapTable;
pub use shared::SharedTable;
pub use vec_store::VecTable;

use clap::ValueEnum;
use std::fmt;

/// A word and the number of times it was counted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

impl fmt::Display for WordCount {
    /// Output line format: count right-justified in 8 columns, then the word
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}: {}", self.count, self.word)
    }
}

/// Mapping from word to occurrence count
///
/// For every word, `find` returns the total of all increments submitted for
/// it, independent of submission order.
pub trait FrequencyTable: Send {
    /// Add `count` occurrences of `word`, inserting it if absent
    fn add(&mut self, word: &str, count: u64);

    /// Count one occurrence of `word`
    fn increment(&mut self, word: &str) {
        self.add(word, 1);
    }

    /// Current count for `word`
    fn find(&self, word: &str) -> Option<u64>;

    /// Snapshot of every entry, lexicographically by word when `sorted`
    fn enumerate(&self, sorted: bool) -> Vec<WordCount>;

    /// Number of distinct words
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all counts
    fn total(&self) -> u64;

    /// Backing store kind
    fn kind(&self) -> StoreKind;
}

/// Backing store for a frequency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// Vector of counts
    Vec,
    /// Linked list of counts
    List,
    /// Hash map
    #[default]
    Map,
}

impl StoreKind {
    pub const ALL: [StoreKind; 3] = [StoreKind::Vec, StoreKind::List, StoreKind::Map];

    /// Create an empty table with this backing store
    pub fn build(self) -> Box<dyn FrequencyTable> {
        match self {
            StoreKind::Vec => Box::new(VecTable::new()),
            StoreKind::List => Box::new(ListTable::new()),
            StoreKind::Map => Box::new(MapTable::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Vec => "vec",
            StoreKind::List => "list",
            StoreKind::Map => "map",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort entries lexicographically by word
pub(crate) fn sort_by_word(entries: &mut [WordCount]) {
    entries.sort_unstable_by(|a, b| a.word.cmp(&b.word));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(table: &mut dyn FrequencyTable) {
        for word in ["hello", "world", "hello", "good"] {
            table.increment(word);
        }
    }

    #[test]
    fn test_word_count_display() {
        assert_eq!(WordCount::new("hello", 2).to_string(), "       2: hello");
        assert_eq!(
            WordCount::new("big", 123_456_789).to_string(),
            "123456789: big"
        );
    }

    #[test]
    fn test_new_table_is_empty() {
        for kind in StoreKind::ALL {
            let table = kind.build();
            assert!(table.is_empty(), "{kind} not empty");
            assert_eq!(table.len(), 0);
            assert_eq!(table.total(), 0);
            assert!(table.enumerate(true).is_empty());
            assert_eq!(table.kind(), kind);
        }
    }

    #[test]
    fn test_contract_all_stores() {
        for kind in StoreKind::ALL {
            let mut table = kind.build();
            fill(table.as_mut());

            assert_eq!(table.len(), 3, "{kind}");
            assert_eq!(table.total(), 4, "{kind}");
            assert_eq!(table.find("hello"), Some(2), "{kind}");
            assert_eq!(table.find("world"), Some(1), "{kind}");
            assert_eq!(table.find("absent"), None, "{kind}");

            let sorted = table.enumerate(true);
            assert_eq!(
                sorted,
                vec![
                    WordCount::new("good", 1),
                    WordCount::new("hello", 2),
                    WordCount::new("world", 1),
                ],
                "{kind}"
            );
        }
    }

    #[test]
    fn test_add_bulk() {
        for kind in StoreKind::ALL {
            let mut table = kind.build();
            table.add("word", 5);
            table.add("word", 3);
            table.increment("word");
            assert_eq!(table.find("word"), Some(9), "{kind}");
            assert_eq!(table.len(), 1, "{kind}");
        }
    }

    #[test]
    fn test_reenumeration_is_idempotent() {
        for kind in StoreKind::ALL {
            let mut table = kind.build();
            fill(table.as_mut());
            assert_eq!(table.enumerate(true), table.enumerate(true), "{kind}");
            assert_eq!(table.enumerate(false), table.enumerate(false), "{kind}");
        }
    }

    #[test]
    fn test_unsorted_holds_same_entries() {
        for kind in StoreKind::ALL {
            let mut table = kind.build();
            fill(table.as_mut());
            let mut unsorted = table.enumerate(false);
            sort_by_word(&mut unsorted);
            assert_eq!(unsorted, table.enumerate(true), "{kind}");
        }
    }

    #[test]
    fn test_stores_agree_across_permutations() {
        let words = ["delta", "alpha", "charlie", "alpha", "bravo", "delta", "alpha"];
        let mut reversed = words;
        reversed.reverse();
        let mut rotated = words;
        rotated.rotate_left(3);

        let mut expected: Option<Vec<WordCount>> = None;
        for kind in StoreKind::ALL {
            for order in [&words, &reversed, &rotated] {
                let mut table = kind.build();
                for word in order.iter() {
                    table.increment(word);
                }
                let counts = table.enumerate(true);
                match &expected {
                    Some(expected) => assert_eq!(&counts, expected, "{kind}"),
                    None => expected = Some(counts),
                }
            }
        }
    }
}
