//! Concurrent counting engine
//!
//! Two disciplines for keeping one frequency table correct while many
//! producers feed it, plus a sequential fallback.
//!
//! # Fan-in
//!
//! ```text
//! ┌──────────┐  ┌──────────┐         ┌──────────┐
//! │Producer 1│  │Producer 2│   ...   │Producer N│
//! │ tokenize │  │ tokenize │         │ tokenize │
//! └────┬─────┘  └────┬─────┘         └────┬─────┘
//!      │ word        │ word               │ word
//!      └─────────────┼────────────────────┘
//!                    ▼
//!        ┌──────────────────────┐
//!        │  Word channel        │
//!        │  (crossbeam, cap 0)  │
//!        └──────────┬───────────┘
//!                   ▼
//!        ┌──────────────────────┐
//!        │  Aggregator thread   │
//!        │  owns the table      │
//!        └──────────────────────┘
//! ```
//!
//! # Shared state
//!
//! ```text
//! Producer 1 ──┐
//! Producer 2 ──┼──► lock ─► increment ─► unlock   (SharedTable)
//! Producer N ──┘
//! ```
//!
//! In both cases every producer reports to a [`CompletionTracker`], and the
//! [`CountCoordinator`] waits for exactly the producers it launched.

pub mod aggregator;
pub mod channel;
pub mod completion;
pub mod coordinator;
pub mod producer;

pub use aggregator::{Aggregator, AggregatorStats};
pub use channel::{word_channel, ChannelStats, WordReceiver, WordSender};
pub use completion::{CompletionGuard, CompletionNotifier, CompletionSignal, CompletionTracker};
pub use coordinator::{CountCoordinator, CountResult};
pub use producer::{aggregate_stats, Producer, ProducerStats, ProducerTotals, WordSink};
