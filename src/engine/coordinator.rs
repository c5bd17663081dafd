//! Count coordinator - orchestrates a counting run
//!
//! The coordinator is responsible for:
//! - Creating the table (and, in fan-in mode, the word channel and aggregator)
//! - Opening sources and launching one producer per opened source
//! - Waiting for every launched producer, then shutting down the aggregator
//! - Final statistics
//!
//! Shutdown order matters in fan-in mode. The coordinator holds its own word
//! sender for the whole run and drops it only after the last producer
//! signal, so the aggregator cannot see the channel close while words are
//! still on the way.

use crate::config::{CountConfig, Mode};
use crate::engine::aggregator::Aggregator;
use crate::engine::channel::word_channel;
use crate::engine::completion::CompletionTracker;
use crate::engine::producer::{aggregate_stats, Producer, ProducerTotals, WordSink};
use crate::error::{Result, SourceOutcome, WorkerError};
use crate::source::{FileProvider, Source, SourceProvider};
use crate::table::{FrequencyTable, SharedTable, WordCount};
use crate::tokenizer::Words;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed run
pub struct CountResult {
    /// Final, read-only table
    pub table: Box<dyn FrequencyTable>,

    /// Discipline used
    pub mode: Mode,

    /// Whether output should be sorted
    pub sorted: bool,

    /// Sources named in the request (0 for stdin)
    pub sources_requested: usize,

    /// Sources that opened and were counted
    pub sources_opened: usize,

    /// Per-source dispatch outcomes, in request order
    pub outcomes: Vec<SourceOutcome>,

    /// Producer completion signals in arrival order
    pub completion_order: Vec<String>,

    /// Words added to the table
    pub words_counted: u64,

    /// Words dropped for being too short
    pub words_skipped: u64,

    /// Bytes read across all sources
    pub bytes_read: u64,

    /// Sources cut short by a read failure
    pub read_errors: u64,

    /// Producer threads that failed to join cleanly
    pub producer_failures: u64,

    /// Time taken for the run
    pub duration: Duration,
}

impl CountResult {
    /// Enumerate the table in the configured order
    pub fn counts(&self) -> Vec<WordCount> {
        self.table.enumerate(self.sorted)
    }

    /// Names of sources that could not be opened
    pub fn failed_sources(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_counted())
            .map(|o| o.name())
            .collect()
    }

    /// Words counted per second
    pub fn words_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.words_counted as f64 / secs
        } else {
            0.0
        }
    }
}

impl std::fmt::Debug for CountResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountResult")
            .field("mode", &self.mode)
            .field("distinct", &self.table.len())
            .field("sources_requested", &self.sources_requested)
            .field("sources_opened", &self.sources_opened)
            .field("words_counted", &self.words_counted)
            .field("duration", &self.duration)
            .finish()
    }
}

/// Sources after the dispatch step
struct Dispatch {
    opened: Vec<Source>,
    outcomes: Vec<SourceOutcome>,
}

/// What the producers left behind once joined
struct Joined {
    totals: ProducerTotals,
    failures: u64,
}

/// Coordinates one counting run
pub struct CountCoordinator {
    config: Arc<CountConfig>,
    provider: Arc<dyn SourceProvider>,
}

impl CountCoordinator {
    /// Coordinator reading files from the local filesystem
    pub fn new(config: CountConfig) -> Self {
        Self::with_provider(config, Arc::new(FileProvider))
    }

    /// Coordinator reading from any source provider
    pub fn with_provider(config: CountConfig, provider: Arc<dyn SourceProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    pub fn config(&self) -> &CountConfig {
        &self.config
    }

    /// Run the count to completion
    pub fn run(self) -> Result<CountResult> {
        let start = Instant::now();

        info!(
            sources = self.config.sources.len(),
            mode = %self.config.mode,
            store = %self.config.store,
            "Starting word count"
        );

        let mut result = if self.config.reads_stdin() {
            self.run_stdin()
        } else {
            match self.config.mode {
                Mode::FanIn => self.run_fan_in()?,
                Mode::Shared => self.run_shared()?,
                Mode::Sequential => self.run_sequential(),
            }
        };

        result.duration = start.elapsed();

        info!(
            words = result.words_counted,
            distinct = result.table.len(),
            opened = result.sources_opened,
            failed = result.failed_sources().len(),
            duration_ms = result.duration.as_millis() as u64,
            "Count completed"
        );

        Ok(result)
    }

    /// Try to open every requested source; failures are logged and skipped
    fn dispatch(&self) -> Dispatch {
        let mut opened = Vec::with_capacity(self.config.sources.len());
        let mut outcomes = Vec::with_capacity(self.config.sources.len());

        for name in &self.config.sources {
            match self.provider.open(name) {
                Ok(source) => {
                    debug!(source = %name, "Source opened");
                    outcomes.push(SourceOutcome::Counted { name: name.clone() });
                    opened.push(source);
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "Skipping source");
                    outcomes.push(SourceOutcome::Skipped {
                        name: name.clone(),
                        error: e,
                    });
                }
            }
        }

        Dispatch { opened, outcomes }
    }

    /// Fan-in: producers -> word channel -> aggregator -> table
    fn run_fan_in(&self) -> Result<CountResult> {
        // Init
        let mut tracker = CompletionTracker::new();
        let (sender, receiver) = word_channel(self.config.channel_capacity);
        let aggregator = Aggregator::spawn(self.config.store.build(), receiver, tracker.notifier())?;

        // Dispatch
        let Dispatch { opened, outcomes } = self.dispatch();
        let producers = self.spawn_producers(opened, &mut tracker, || sender.clone())?;

        // Await-Producers
        let completion_order = tracker.wait_for_producers()?;
        debug!(producers = completion_order.len(), "All producers reported");

        // Shutdown-Aggregator
        sender.close();
        tracker.wait_for_aggregator()?;
        let words_counted = aggregator.stats().words_counted();
        let table = aggregator.finish()?;

        let joined = join_producers(producers);

        Ok(self.finalize(table, outcomes, completion_order, words_counted, joined))
    }

    /// Shared state: producers -> lock -> table
    fn run_shared(&self) -> Result<CountResult> {
        // Init
        let mut tracker = CompletionTracker::new();
        let shared = Arc::new(SharedTable::with_store(self.config.store));

        // Dispatch
        let Dispatch { opened, outcomes } = self.dispatch();
        let producers = self.spawn_producers(opened, &mut tracker, || Arc::clone(&shared))?;

        // Await-Producers
        let completion_order = tracker.wait_for_producers()?;
        debug!(producers = completion_order.len(), "All producers reported");

        let joined = join_producers(producers);

        // Every producer has dropped its handle once joined
        let shared = Arc::try_unwrap(shared).map_err(|_| WorkerError::TableStillShared)?;
        let words_counted = shared.increments();
        let table = shared.into_inner();

        Ok(self.finalize(table, outcomes, completion_order, words_counted, joined))
    }

    /// Sequential: every source counted in order on the calling thread
    fn run_sequential(&self) -> CountResult {
        let mut table = self.config.store.build();
        let Dispatch { opened, outcomes } = self.dispatch();

        let mut totals = ProducerTotals::default();
        let mut completion_order = Vec::with_capacity(opened.len());
        for source in opened {
            let name = source.name().to_string();
            count_inline(source, table.as_mut(), &mut totals);
            completion_order.push(name);
        }

        let words_counted = totals.words;
        let joined = Joined { totals, failures: 0 };
        self.finalize(table, outcomes, completion_order, words_counted, joined)
    }

    /// Single stream: standard input counted on the calling thread, no tasks
    fn run_stdin(&self) -> CountResult {
        let mut table = self.config.store.build();
        let mut totals = ProducerTotals::default();

        let source = self.provider.open_stdin();
        debug!(source = %source.name(), "Counting single stream inline");
        count_inline(source, table.as_mut(), &mut totals);

        let words_counted = totals.words;
        let joined = Joined { totals, failures: 0 };
        let mut result = self.finalize(table, Vec::new(), Vec::new(), words_counted, joined);
        result.sources_opened = 1;
        result
    }

    /// Launch one producer per opened source, registering each with the barrier
    ///
    /// A spawn failure aborts the run.
    fn spawn_producers<S, F>(
        &self,
        opened: Vec<Source>,
        tracker: &mut CompletionTracker,
        mut sink: F,
    ) -> std::result::Result<Vec<Producer>, WorkerError>
    where
        S: WordSink,
        F: FnMut() -> S,
    {
        let mut producers = Vec::with_capacity(opened.len());

        for (id, source) in opened.into_iter().enumerate() {
            let producer = Producer::spawn(id, source, sink(), tracker.notifier())?;
            tracker.register_producer();
            producers.push(producer);
        }

        info!(count = producers.len(), "Producers spawned");
        Ok(producers)
    }

    fn finalize(
        &self,
        table: Box<dyn FrequencyTable>,
        outcomes: Vec<SourceOutcome>,
        completion_order: Vec<String>,
        words_counted: u64,
        joined: Joined,
    ) -> CountResult {
        CountResult {
            table,
            mode: self.config.mode,
            sorted: self.config.sorted,
            sources_requested: self.config.sources.len(),
            sources_opened: outcomes.iter().filter(|o| o.is_counted()).count(),
            outcomes,
            completion_order,
            words_counted,
            words_skipped: joined.totals.skipped,
            bytes_read: joined.totals.bytes,
            read_errors: joined.totals.read_errors,
            producer_failures: joined.failures,
            duration: Duration::ZERO,
        }
    }
}

/// Join all producer threads and collect final stats
fn join_producers(producers: Vec<Producer>) -> Joined {
    let totals = aggregate_stats(&producers);
    let mut failures = 0;

    for producer in producers {
        let name = producer.name().to_string();
        if let Err(e) = producer.join() {
            warn!(source = %name, error = %e, "Producer failed to join cleanly");
            failures += 1;
        }
    }

    Joined { totals, failures }
}

/// Count one source on the calling thread
fn count_inline(source: Source, table: &mut dyn FrequencyTable, totals: &mut ProducerTotals) {
    let (name, reader) = source.into_parts();
    let mut words = Words::new(reader);

    for word in words.by_ref() {
        table.increment(&word);
        totals.words += 1;
    }

    totals.skipped += words.skipped();
    totals.bytes += words.tokenizer().bytes_read();
    if let Some(e) = words.tokenizer_mut().take_error() {
        totals.read_errors += 1;
        warn!(source = %name, error = %e, "Read failed, source truncated");
    }

    debug!(source = %name, "Source counted inline");
}
