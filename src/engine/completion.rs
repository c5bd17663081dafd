//! Completion signals and the counting barrier
//!
//! Every producer and the aggregator report once when they finish. The
//! coordinator registers each launched producer with the
//! [`CompletionTracker`] and then blocks until exactly that many producer
//! signals have arrived, in any order. Sources that failed to open are never
//! registered, so they are never waited on.

use crate::error::WorkerError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use tracing::{debug, trace};

/// Identifies which task finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSignal {
    /// A producer finished its source
    Producer { name: String },

    /// The aggregator saw the word channel close
    Aggregator,
}

impl fmt::Display for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionSignal::Producer { name } => write!(f, "producer '{}'", name),
            CompletionSignal::Aggregator => f.write_str("aggregator"),
        }
    }
}

/// Handle a task uses to report its completion
#[derive(Clone)]
pub struct CompletionNotifier {
    sender: Sender<CompletionSignal>,
}

impl CompletionNotifier {
    /// Report completion
    ///
    /// The tracker holds the receiving end for the whole run, so a failed
    /// send only happens once the coordinator has given up; it is ignored.
    pub fn notify(&self, signal: CompletionSignal) {
        trace!(signal = %signal, "Completion signal sent");
        let _ = self.sender.send(signal);
    }

    /// Guard that reports `signal` when completed or dropped
    pub fn guard(&self, signal: CompletionSignal) -> CompletionGuard {
        CompletionGuard {
            notifier: self.clone(),
            signal: Some(signal),
        }
    }
}

/// Sends its signal exactly once: on [`CompletionGuard::complete`], or on
/// drop if the task exits early or unwinds
pub struct CompletionGuard {
    notifier: CompletionNotifier,
    signal: Option<CompletionSignal>,
}

impl CompletionGuard {
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(signal) = self.signal.take() {
            self.notifier.notify(signal);
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.fire();
    }
}

/// Counting barrier over completion signals
pub struct CompletionTracker {
    sender: Sender<CompletionSignal>,
    receiver: Receiver<CompletionSignal>,

    /// Producers registered and not yet reported
    pending: usize,

    /// Producers registered over the tracker's lifetime
    registered: usize,

    /// Aggregator signal observed while waiting for producers
    aggregator_done: bool,
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: 0,
            registered: 0,
            aggregator_done: false,
        }
    }

    /// Handle for tasks to report completion
    pub fn notifier(&self) -> CompletionNotifier {
        CompletionNotifier {
            sender: self.sender.clone(),
        }
    }

    /// Count one more launched producer
    pub fn register_producer(&mut self) {
        self.pending += 1;
        self.registered += 1;
    }

    /// Producers registered so far
    pub fn registered(&self) -> usize {
        self.registered
    }

    /// Producers still expected to report
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Block until every registered producer has reported
    ///
    /// Returns producer names in arrival order.
    pub fn wait_for_producers(&mut self) -> Result<Vec<String>, WorkerError> {
        let mut order = Vec::with_capacity(self.pending);

        while self.pending > 0 {
            match self.receiver.recv() {
                Ok(CompletionSignal::Producer { name }) => {
                    self.pending -= 1;
                    debug!(source = %name, remaining = self.pending, "Producer done");
                    order.push(name);
                }
                Ok(CompletionSignal::Aggregator) => {
                    // The word channel is still open; the aggregator can only
                    // stop this early if it failed
                    self.aggregator_done = true;
                    return Err(WorkerError::AggregatorExitedEarly);
                }
                Err(_) => return Err(WorkerError::CompletionChannelClosed),
            }
        }

        Ok(order)
    }

    /// Block until the aggregator reports
    ///
    /// Call only after every producer has reported and the word channel has
    /// been closed.
    pub fn wait_for_aggregator(&mut self) -> Result<(), WorkerError> {
        if self.aggregator_done {
            return Ok(());
        }

        loop {
            match self.receiver.recv() {
                Ok(CompletionSignal::Aggregator) => {
                    self.aggregator_done = true;
                    debug!("Aggregator done");
                    return Ok(());
                }
                Ok(CompletionSignal::Producer { name }) => {
                    // Only unregistered producers can still report here
                    debug!(source = %name, "Late producer signal ignored");
                }
                Err(_) => return Err(WorkerError::CompletionChannelClosed),
            }
        }
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_waits_for_registered_producers_only() {
        let mut tracker = CompletionTracker::new();
        let notifier = tracker.notifier();

        for _ in 0..3 {
            tracker.register_producer();
        }
        assert_eq!(tracker.pending(), 3);

        let handles: Vec<_> = ["c", "a", "b"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let notifier = notifier.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(5 * i as u64));
                    notifier.notify(CompletionSignal::Producer { name: name.into() });
                })
            })
            .collect();

        let mut order = tracker.wait_for_producers().unwrap();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.pending(), 0);
        assert_eq!(tracker.registered(), 3);
        order.sort();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_producers_returns_immediately() {
        let mut tracker = CompletionTracker::new();
        assert!(tracker.wait_for_producers().unwrap().is_empty());
    }

    #[test]
    fn test_guard_fires_once() {
        let mut tracker = CompletionTracker::new();
        tracker.register_producer();
        tracker.register_producer();
        let notifier = tracker.notifier();

        notifier
            .guard(CompletionSignal::Producer { name: "done".into() })
            .complete();
        {
            let _guard = notifier.guard(CompletionSignal::Producer {
                name: "dropped".into(),
            });
        }

        let order = tracker.wait_for_producers().unwrap();
        assert_eq!(order, vec!["done", "dropped"]);
        assert!(tracker.receiver.try_recv().is_err());
    }

    #[test]
    fn test_guard_fires_on_panic() {
        let mut tracker = CompletionTracker::new();
        tracker.register_producer();
        let notifier = tracker.notifier();

        let handle = thread::spawn(move || {
            let _guard = notifier.guard(CompletionSignal::Producer {
                name: "boom".into(),
            });
            panic!("producer failed");
        });

        assert_eq!(tracker.wait_for_producers().unwrap(), vec!["boom"]);
        assert!(handle.join().is_err());
    }

    #[test]
    fn test_early_aggregator_signal_is_an_error() {
        let mut tracker = CompletionTracker::new();
        tracker.register_producer();
        tracker.notifier().notify(CompletionSignal::Aggregator);

        assert!(matches!(
            tracker.wait_for_producers(),
            Err(WorkerError::AggregatorExitedEarly)
        ));
        assert!(tracker.wait_for_aggregator().is_ok());
    }

    #[test]
    fn test_wait_for_aggregator() {
        let mut tracker = CompletionTracker::new();
        let notifier = tracker.notifier();
        notifier.notify(CompletionSignal::Producer {
            name: "stray".into(),
        });
        notifier.notify(CompletionSignal::Aggregator);
        assert!(tracker.wait_for_aggregator().is_ok());
    }

    #[test]
    fn test_signal_display() {
        let signal = CompletionSignal::Producer { name: "a.txt".into() };
        assert_eq!(signal.to_string(), "producer 'a.txt'");
        assert_eq!(CompletionSignal::Aggregator.to_string(), "aggregator");
    }
}
