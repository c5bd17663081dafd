//! Producer thread logic
//!
//! Each producer:
//! - Owns one opened source and a tokenizer over it
//! - Delivers every normalized word to its sink (word channel or shared table)
//! - Closes the source, then reports completion with the source name
//!
//! Completion is reported through a guard, so a producer that stops early or
//! panics still releases the coordinator's barrier.

use crate::engine::channel::WordSender;
use crate::engine::completion::{CompletionNotifier, CompletionSignal};
use crate::error::WorkerError;
use crate::source::Source;
use crate::table::SharedTable;
use crate::tokenizer::Words;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Destination for a producer's words
pub trait WordSink: Send + 'static {
    /// Deliver one normalized word
    fn deliver(&self, word: String) -> Result<(), DeliveryError>;
}

/// The sink can no longer accept words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryError;

impl WordSink for WordSender {
    fn deliver(&self, word: String) -> Result<(), DeliveryError> {
        self.send(word).map_err(|_| DeliveryError)
    }
}

impl WordSink for Arc<SharedTable> {
    fn deliver(&self, word: String) -> Result<(), DeliveryError> {
        self.increment(&word);
        Ok(())
    }
}

/// Statistics collected by a producer
#[derive(Debug, Default)]
pub struct ProducerStats {
    /// Words delivered to the sink
    pub words: AtomicU64,

    /// Words dropped for being too short
    pub skipped: AtomicU64,

    /// Bytes read from the source
    pub bytes: AtomicU64,

    /// Read failures that ended the source early
    pub read_errors: AtomicU64,
}

impl ProducerStats {
    fn record_word(&self) {
        self.words.fetch_add(1, Ordering::Relaxed);
    }

    pub fn words(&self) -> u64 {
        self.words.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }
}

/// Totals across a set of producers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerTotals {
    pub words: u64,
    pub skipped: u64,
    pub bytes: u64,
    pub read_errors: u64,
}

/// A thread that tokenizes one source
pub struct Producer {
    /// Producer ID
    id: usize,

    /// Source name
    name: String,

    /// Thread handle
    handle: Option<JoinHandle<Result<(), WorkerError>>>,

    /// Producer statistics
    stats: Arc<ProducerStats>,
}

impl Producer {
    /// Spawn a producer thread over an opened source
    pub fn spawn<S: WordSink>(
        id: usize,
        source: Source,
        sink: S,
        done: CompletionNotifier,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(ProducerStats::default());
        let stats_clone = Arc::clone(&stats);
        let name = source.name().to_string();

        let handle = thread::Builder::new()
            .name(format!("producer-{}", id))
            .spawn(move || producer_loop(id, source, sink, done, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                name: format!("producer for '{}'", name),
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            name,
            handle: Some(handle),
            stats,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Name of the source this producer reads
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &ProducerStats {
        &self.stats
    }

    /// Wait for the producer thread to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(result) => result,
                Err(_) => Err(WorkerError::Panicked {
                    name: format!("producer for '{}'", self.name),
                    message: "Producer thread panicked".into(),
                }),
            }
        } else {
            Ok(())
        }
    }
}

/// Main producer loop
fn producer_loop<S: WordSink>(
    id: usize,
    source: Source,
    sink: S,
    done: CompletionNotifier,
    stats: Arc<ProducerStats>,
) -> Result<(), WorkerError> {
    let (name, reader) = source.into_parts();
    let completion = done.guard(CompletionSignal::Producer { name: name.clone() });

    debug!(producer = id, source = %name, "Producer starting");

    let result = drain_words(id, &name, reader, &sink, &stats);

    // Release the sink before reporting, so the coordinator's view of open
    // senders is accurate once it has every signal
    drop(sink);
    completion.complete();

    match &result {
        Ok(()) => info!(
            producer = id,
            source = %name,
            words = stats.words(),
            "Source counted"
        ),
        Err(e) => error!(producer = id, source = %name, error = %e, "Producer stopped early"),
    }

    result
}

/// Tokenize `reader` to exhaustion, delivering every kept word
///
/// The reader is dropped (closing the source) before returning.
fn drain_words<S: WordSink>(
    id: usize,
    name: &str,
    reader: Box<dyn Read + Send>,
    sink: &S,
    stats: &ProducerStats,
) -> Result<(), WorkerError> {
    let mut words = Words::new(reader);
    let mut outcome = Ok(());

    for word in words.by_ref() {
        if sink.deliver(word).is_err() {
            outcome = Err(WorkerError::ChannelClosed {
                name: name.to_string(),
            });
            break;
        }
        stats.record_word();
    }

    stats.skipped.fetch_add(words.skipped(), Ordering::Relaxed);
    stats
        .bytes
        .fetch_add(words.tokenizer().bytes_read(), Ordering::Relaxed);

    if let Some(e) = words.tokenizer_mut().take_error() {
        stats.read_errors.fetch_add(1, Ordering::Relaxed);
        warn!(
            producer = id,
            source = %name,
            error = %e,
            "Read failed, source truncated"
        );
    }

    outcome
}

/// Sum statistics across producers
pub fn aggregate_stats(producers: &[Producer]) -> ProducerTotals {
    producers.iter().fold(ProducerTotals::default(), |acc, p| {
        let stats = p.stats();
        ProducerTotals {
            words: acc.words + stats.words(),
            skipped: acc.skipped + stats.skipped(),
            bytes: acc.bytes + stats.bytes(),
            read_errors: acc.read_errors + stats.read_errors(),
        }
    })
}
