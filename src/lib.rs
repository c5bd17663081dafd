//! wordct - Concurrent Word Frequency Counter
//!
//! Counts how often each lowercase alphabetic word occurs across a set of
//! text sources, with one producer thread per source.
//!
//! # Features
//!
//! - **Fan-in engine**: producers send words over an unbuffered channel to a
//!   single aggregator thread that exclusively owns the table.
//!
//! - **Shared-state engine**: producers increment one table directly; a
//!   single lock covers each whole lookup-and-increment.
//!
//! - **Interchangeable stores**: vector, linked list or hash map behind one
//!   [`FrequencyTable`] trait.
//!
//! - **Degraded, not fatal**: sources that fail to open are reported and
//!   skipped; the run waits only for the producers it actually launched.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Coordinator                             │
//! │  open sources ─► spawn producers ─► wait ─► close ─► finalize   │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │
//!       ┌───────────────────────┼───────────────────────┐
//!       ▼                       ▼                       ▼
//! ┌───────────┐           ┌───────────┐           ┌───────────┐
//! │Producer 1 │           │Producer 2 │    ...    │Producer N │
//! │ Tokenizer │           │ Tokenizer │           │ Tokenizer │
//! └─────┬─────┘           └─────┬─────┘           └─────┬─────┘
//!       │                       │                       │
//!       └───────────────────────┼───────────────────────┘
//!                               ▼
//!            fan-in: channel ─► Aggregator ─► table
//!            shared: lock ─► table
//! ```
//!
//! # Example
//!
//! ```bash
//! # Count two files with the fan-in engine
//! wordct a.txt b.txt
//!
//! # Shared-state engine over a vector store
//! wordct --mode shared --store vec *.txt
//!
//! # Standard input
//! cat book.txt | wordct
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod source;
pub mod table;
pub mod tokenizer;

pub use config::{CliArgs, CountConfig, Mode};
pub use engine::{CountCoordinator, CountResult};
pub use error::{CountError, Result};
pub use source::{FileProvider, MemoryProvider, Source, SourceProvider};
pub use table::{FrequencyTable, SharedTable, StoreKind, WordCount};
pub use tokenizer::{normalize, Tokenizer, Words};
