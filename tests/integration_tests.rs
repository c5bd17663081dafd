//! Integration tests for wordct
//!
//! These tests run the full coordinator over real files in a temporary
//! directory, plus in-memory sources for the standard-input cases.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use wordct::config::{CountConfig, Mode};
use wordct::engine::CountCoordinator;
use wordct::progress::write_counts;
use wordct::source::MemoryProvider;
use wordct::table::{SharedTable, StoreKind, WordCount};
use tempfile::{tempdir, TempDir};

const MODES: [Mode; 3] = [Mode::FanIn, Mode::Shared, Mode::Sequential];

fn write_files(dir: &TempDir, files: &[(&str, &str)]) -> Vec<String> {
    files
        .iter()
        .map(|(name, contents)| {
            let path: PathBuf = dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path.to_string_lossy().into_owned()
        })
        .collect()
}

fn count_files(paths: &[String], mode: Mode, store: StoreKind) -> Vec<WordCount> {
    let config = CountConfig::default()
        .with_sources(paths.iter().cloned())
        .with_mode(mode)
        .with_store(store);
    CountCoordinator::new(config).run().unwrap().counts()
}

#[test]
fn test_two_files_fold_case() {
    let dir = tempdir().unwrap();
    let paths = write_files(&dir, &[("a.txt", "Hello world"), ("b.txt", "world WORLD hello")]);

    for mode in MODES {
        for store in StoreKind::ALL {
            let counts = count_files(&paths, mode, store);
            assert_eq!(
                counts,
                vec![WordCount::new("hello", 2), WordCount::new("world", 3)],
                "{mode}/{store}"
            );
        }
    }
}

#[test]
fn test_stdin_drops_single_letters() {
    for mode in MODES {
        let provider = Arc::new(MemoryProvider::new().with_stdin("a b ab ab"));
        let config = CountConfig::default().with_mode(mode);
        let result = CountCoordinator::with_provider(config, provider)
            .run()
            .unwrap();

        assert_eq!(result.counts(), vec![WordCount::new("ab", 2)], "{mode}");
        assert!(result.completion_order.is_empty());
    }
}

#[test]
fn test_unreadable_files_are_skipped() {
    let dir = tempdir().unwrap();
    let mut paths = write_files(&dir, &[("ok1.txt", "alpha beta"), ("ok2.txt", "beta gamma")]);
    paths.insert(1, dir.path().join("missing1.txt").to_string_lossy().into_owned());
    paths.push(dir.path().join("missing2.txt").to_string_lossy().into_owned());

    for mode in MODES {
        let config = CountConfig::default()
            .with_sources(paths.iter().cloned())
            .with_mode(mode);
        let result = CountCoordinator::new(config).run().unwrap();

        // N = 4 requested, K = 2 missing: exactly N - K completions
        assert_eq!(result.sources_requested, 4, "{mode}");
        assert_eq!(result.sources_opened, 2, "{mode}");
        assert_eq!(result.completion_order.len(), 2, "{mode}");
        assert_eq!(result.failed_sources().len(), 2, "{mode}");
        assert_eq!(
            result.counts(),
            vec![
                WordCount::new("alpha", 1),
                WordCount::new("beta", 2),
                WordCount::new("gamma", 1),
            ],
            "{mode}"
        );
    }
}

#[test]
fn test_length_filter_and_punctuation() {
    let dir = tempdir().unwrap();
    let paths = write_files(
        &dir,
        &[("punct.txt", "I a x--it's, don't! 3rd e-mail I'm ok?\n\tOK")],
    );

    for mode in MODES {
        let counts = count_files(&paths, mode, StoreKind::Map);
        assert!(counts.iter().all(|wc| wc.word.len() > 1), "{mode}");
        assert_eq!(
            counts,
            vec![
                WordCount::new("don", 1),
                WordCount::new("it", 1),
                WordCount::new("mail", 1),
                WordCount::new("ok", 2),
                WordCount::new("rd", 1),
            ],
            "{mode}"
        );
    }
}

#[test]
fn test_many_producers_agree_across_modes() {
    let dir = tempdir().unwrap();
    let contents: Vec<(String, String)> = (0..20)
        .map(|i| {
            let text = format!(
                "common Words{} shared SHARED w{} tail {}",
                i % 3,
                i % 5,
                "rep ".repeat(i + 1)
            );
            (format!("f{i}.txt"), text)
        })
        .collect();
    let files: Vec<(&str, &str)> = contents
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let paths = write_files(&dir, &files);

    let reference = count_files(&paths, Mode::Sequential, StoreKind::Map);
    let find = |word: &str| reference.iter().find(|wc| wc.word == word).map(|wc| wc.count);
    assert_eq!(find("common"), Some(20));
    assert_eq!(find("shared"), Some(40));
    assert_eq!(find("rep"), Some((1..=20u64).sum::<u64>()));

    // Reversed source order must not change anything
    let mut reversed = paths.clone();
    reversed.reverse();

    for mode in [Mode::FanIn, Mode::Shared] {
        for store in StoreKind::ALL {
            assert_eq!(count_files(&paths, mode, store), reference, "{mode}/{store}");
            assert_eq!(count_files(&reversed, mode, store), reference, "{mode}/{store}");
        }
    }
}

#[test]
fn test_buffered_channel_matches_rendezvous() {
    let dir = tempdir().unwrap();
    let paths = write_files(
        &dir,
        &[("a.txt", "one two three two"), ("b.txt", "three three four")],
    );

    let rendezvous = count_files(&paths, Mode::FanIn, StoreKind::Map);
    for capacity in [1, 16, 1024] {
        let config = CountConfig::default()
            .with_sources(paths.iter().cloned())
            .with_channel_capacity(capacity);
        let counts = CountCoordinator::new(config).run().unwrap().counts();
        assert_eq!(counts, rendezvous, "capacity {capacity}");
    }
}

#[test]
fn test_shared_state_stress_no_lost_updates() {
    // 50 producers, 1000 increments of "x" each, several runs
    for _run in 0..5 {
        let shared = Arc::new(SharedTable::with_store(StoreKind::Map));
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        shared.increment("x");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let table = Arc::try_unwrap(shared).ok().unwrap().into_inner();
        assert_eq!(table.find("x"), Some(50_000));
    }
}

#[test]
fn test_coordinator_stress_many_sources() {
    let provider = (0..50).fold(MemoryProvider::new(), |p, i| {
        p.with_source(format!("s{i}"), "xx ".repeat(1000))
    });
    let names = provider.names();
    let provider = Arc::new(provider);

    for mode in MODES {
        let config = CountConfig::default()
            .with_sources(names.iter().cloned())
            .with_mode(mode);
        let result = CountCoordinator::with_provider(config, provider.clone())
            .run()
            .unwrap();

        assert_eq!(result.table.find("xx"), Some(50_000), "{mode}");
        assert_eq!(result.words_counted, 50_000, "{mode}");
        assert_eq!(result.completion_order.len(), 50, "{mode}");
    }
}

#[test]
fn test_output_format() {
    let provider = Arc::new(
        MemoryProvider::new()
            .with_source("doc", "zebra apple Apple mango apple")
            .with_stdin(""),
    );
    let config = CountConfig::default().with_sources(["doc"]);
    let result = CountCoordinator::with_provider(config, provider)
        .run()
        .unwrap();

    let counts = result.counts();
    let mut first = Vec::new();
    write_counts(&mut first, &counts).unwrap();
    assert_eq!(
        String::from_utf8(first.clone()).unwrap(),
        "       3: apple\n       1: mango\n       1: zebra\n"
    );

    // Re-enumerating the finalized table is idempotent
    let mut second = Vec::new();
    write_counts(&mut second, &result.counts()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_files() {
    let dir = tempdir().unwrap();
    let paths = write_files(&dir, &[("empty.txt", ""), ("blank.txt", " \n\n 42 ")]);

    for mode in MODES {
        let config = CountConfig::default()
            .with_sources(paths.iter().cloned())
            .with_mode(mode);
        let result = CountCoordinator::new(config).run().unwrap();
        assert!(result.table.is_empty(), "{mode}");
        assert_eq!(result.sources_opened, 2, "{mode}");
    }
}
