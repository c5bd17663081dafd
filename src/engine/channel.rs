//! Word channel for the fan-in engine
//!
//! Producers send normalized words; the aggregator receives them. The
//! default capacity is zero, a rendezvous channel: every send blocks until
//! the aggregator takes the word.
//!
//! The channel closes when the last [`WordSender`] is dropped. Producers
//! drop theirs when they finish; the coordinator keeps one more and drops it
//! with [`WordSender::close`] only after every producer has reported, so the
//! aggregator cannot see the end of the stream early.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendError, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Statistics for the word channel
#[derive(Debug, Default)]
pub struct ChannelStats {
    /// Total words sent
    pub sent: AtomicU64,

    /// Total words received
    pub received: AtomicU64,
}

impl ChannelStats {
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Words sent but not yet received
    pub fn in_flight(&self) -> u64 {
        self.sent().saturating_sub(self.received())
    }
}

/// Create a word channel with the given capacity (0 = rendezvous)
pub fn word_channel(capacity: usize) -> (WordSender, WordReceiver) {
    let (sender, receiver) = bounded(capacity);
    let stats = Arc::new(ChannelStats::default());

    (
        WordSender {
            sender,
            stats: Arc::clone(&stats),
        },
        WordReceiver { receiver, stats },
    )
}

/// Handle for sending words (clone one per producer)
#[derive(Clone)]
pub struct WordSender {
    sender: Sender<String>,
    stats: Arc<ChannelStats>,
}

impl WordSender {
    /// Send a word, blocking until there is room (or a receiver, at capacity 0)
    ///
    /// Fails only if the receiving side is gone.
    pub fn send(&self, word: String) -> Result<(), SendError<String>> {
        self.sender.send(word)?;
        self.stats.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Get channel statistics
    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }

    /// Drop this handle; the channel closes once every clone is gone
    pub fn close(self) {
        drop(self);
    }
}

/// Handle for receiving words; owned by the aggregator
pub struct WordReceiver {
    receiver: Receiver<String>,
    stats: Arc<ChannelStats>,
}

impl WordReceiver {
    /// Receive the next word, blocking
    ///
    /// Returns `None` once the channel is closed and drained.
    pub fn recv(&self) -> Option<String> {
        match self.receiver.recv() {
            Ok(word) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Some(word)
            }
            Err(_) => None,
        }
    }

    /// Receive with timeout
    ///
    /// `Ok(None)` means the channel is closed; `Err` means the wait timed out.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<String>, RecvTimeoutError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(word) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Ok(Some(word))
            }
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get channel statistics
    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }

    /// Channel capacity (0 for rendezvous)
    pub fn capacity(&self) -> usize {
        self.receiver.capacity().unwrap_or(0)
    }

    /// Words currently buffered
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
