//! Aggregator thread for the fan-in engine
//!
//! The aggregator is the only code that ever touches the table during a
//! fan-in run. The table is moved into its thread at spawn and moved back out
//! by [`Aggregator::finish`], so exclusive ownership needs no lock.
//!
//! It keeps receiving until the word channel is closed and drained, even if
//! every producer has already finished, then reports completion.

use crate::engine::channel::WordReceiver;
use crate::engine::completion::{CompletionNotifier, CompletionSignal};
use crate::error::WorkerError;
use crate::table::FrequencyTable;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Statistics about aggregation
#[derive(Debug, Default)]
pub struct AggregatorStats {
    /// Words applied to the table
    pub words_counted: AtomicU64,
}

impl AggregatorStats {
    pub fn words_counted(&self) -> u64 {
        self.words_counted.load(Ordering::Relaxed)
    }
}

/// Sole owner of the table while a fan-in run is active
pub struct Aggregator {
    /// Thread handle; yields the table back when the thread ends
    handle: Option<JoinHandle<Box<dyn FrequencyTable>>>,

    stats: Arc<AggregatorStats>,
}

impl Aggregator {
    /// Spawn the aggregator thread, taking ownership of `table`
    pub fn spawn(
        table: Box<dyn FrequencyTable>,
        receiver: WordReceiver,
        done: CompletionNotifier,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(AggregatorStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name("aggregator".into())
            .spawn(move || aggregator_thread(table, receiver, done, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                name: "aggregator".into(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            handle: Some(handle),
            stats,
        })
    }

    pub fn stats(&self) -> &AggregatorStats {
        &self.stats
    }

    /// Wait for the aggregator to finish and take the table back
    ///
    /// Only returns once the word channel has been closed.
    pub fn finish(mut self) -> Result<Box<dyn FrequencyTable>, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked {
                name: "aggregator".into(),
                message: "Aggregator thread panicked".into(),
            }),
            None => Err(WorkerError::AggregatorExitedEarly),
        }
    }
}

/// Internal aggregator thread function
fn aggregator_thread(
    mut table: Box<dyn FrequencyTable>,
    receiver: WordReceiver,
    done: CompletionNotifier,
    stats: Arc<AggregatorStats>,
) -> Box<dyn FrequencyTable> {
    // Reports even if a store panics, so the coordinator never waits forever
    let completion = done.guard(CompletionSignal::Aggregator);

    debug!(
        store = %table.kind(),
        capacity = receiver.capacity(),
        "Aggregator starting"
    );

    while let Some(word) = receiver.recv() {
        table.increment(&word);
        stats.words_counted.fetch_add(1, Ordering::Relaxed);
    }

    info!(
        words = stats.words_counted(),
        distinct = table.len(),
        "Word channel closed, aggregation complete"
    );

    completion.complete();
    table
}
