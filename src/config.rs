//! Configuration types for wordct
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use crate::table::StoreKind;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Largest accepted word channel capacity
pub const MAX_CHANNEL_CAPACITY: usize = 1_000_000;

/// Count word frequencies across files, one thread per file
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordct",
    version,
    about = "Count word frequencies across files, one thread per file",
    long_about = "Splits each input into lowercase alphabetic words (two letters or more) and \
                  prints how often each word occurs.\n\n\
                  Every file gets its own producer thread. In fan-in mode the producers send \
                  words over a channel to a single aggregator thread that owns the table; in \
                  shared mode they increment one lock-guarded table directly.\n\n\
                  With no files, standard input is counted on the main thread.",
    after_help = "EXAMPLES:\n    \
        wordct notes.txt chapter*.txt\n    \
        wordct --mode shared --store vec a.txt b.txt\n    \
        cat book.txt | wordct --unsorted\n    \
        wordct --channel-capacity 1024 -q big/*.txt"
)]
pub struct CliArgs {
    /// Files to count (standard input if none)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Concurrency discipline
    #[arg(short = 'm', long, value_enum, default_value_t = Mode::FanIn)]
    pub mode: Mode,

    /// Frequency table backing store
    #[arg(short = 's', long, value_enum, default_value_t = StoreKind::Map)]
    pub store: StoreKind,

    /// Print words in table order instead of sorting them
    #[arg(long)]
    pub unsorted: bool,

    /// Word channel capacity in fan-in mode (0 = unbuffered)
    #[arg(long, default_value = "0", value_name = "NUM")]
    pub channel_capacity: usize,

    /// Quiet mode - suppress progress and summary output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (per-source events)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// How producers reach the frequency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Producers send words to one aggregator thread that owns the table
    #[default]
    FanIn,
    /// Producers increment a single lock-guarded table
    Shared,
    /// No threads: sources are counted one after another
    Sequential,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::FanIn => "fan-in",
            Mode::Shared => "shared",
            Mode::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct CountConfig {
    /// Source names, in request order
    pub sources: Vec<String>,

    /// Concurrency discipline
    pub mode: Mode,

    /// Table backing store
    pub store: StoreKind,

    /// Sort output lexicographically
    pub sorted: bool,

    /// Word channel capacity (fan-in only)
    pub channel_capacity: usize,

    /// Show progress and summary
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl CountConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(ConfigError::InvalidChannelCapacity {
                capacity: args.channel_capacity,
                max: MAX_CHANNEL_CAPACITY,
            });
        }

        let sources = args
            .files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        Ok(Self {
            sources,
            mode: args.mode,
            store: args.store,
            sorted: !args.unsorted,
            channel_capacity: args.channel_capacity,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Replace the source list
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Whether the run reads standard input instead of named sources
    pub fn reads_stdin(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            mode: Mode::FanIn,
            store: StoreKind::Map,
            sorted: true,
            channel_capacity: 0,
            show_progress: false,
            verbose: false,
        }
    }
}
