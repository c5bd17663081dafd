//! Error types for wordct
//!
//! This module defines the error hierarchy for a counting run:
//! - Source errors (a named input cannot be opened)
//! - Worker errors (producer/aggregator threads and their channels)
//! - Configuration and CLI errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Source failures are recoverable and never abort a run
//! - Only spawn failures and broken synchronization end a run early

use thiserror::Error;

/// Top-level error type for a counting run
#[derive(Error, Debug)]
pub enum CountError {
    /// Source-related errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (writing output, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel closed unexpectedly
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

/// Errors opening a named input source
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// Generic open failure
    #[error("Failed to open source '{name}': {reason}")]
    OpenFailed { name: String, reason: String },

    /// Source does not exist
    #[error("Source not found: '{name}'")]
    NotFound { name: String },

    /// Permission denied
    #[error("Permission denied: '{name}'")]
    PermissionDenied { name: String },
}

impl SourceError {
    /// Build a source error from an I/O error raised while opening `name`
    pub fn from_io(name: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                name: name.to_string(),
            },
            _ => SourceError::OpenFailed {
                name: name.to_string(),
                reason: err.to_string(),
            },
        }
    }

    /// Check if the run can continue without this source
    ///
    /// Every open failure is degraded, not fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SourceError::OpenFailed { .. }
                | SourceError::NotFound { .. }
                | SourceError::PermissionDenied { .. }
        )
    }

    /// Name of the source that failed
    pub fn name(&self) -> &str {
        match self {
            SourceError::OpenFailed { name, .. } => name,
            SourceError::NotFound { name } => name,
            SourceError::PermissionDenied { name } => name,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid word channel capacity
    #[error("Invalid channel capacity {capacity}: must be at most {max}")]
    InvalidChannelCapacity { capacity: usize, max: usize },
}

/// Producer/aggregator thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Thread could not be spawned
    #[error("Failed to spawn {name}: {reason}")]
    SpawnFailed { name: String, reason: String },

    /// Thread panicked
    #[error("{name} panicked: {message}")]
    Panicked { name: String, message: String },

    /// Word channel closed while a producer was still sending
    #[error("Word channel closed while producing '{name}'")]
    ChannelClosed { name: String },

    /// Completion channel closed before every task reported
    #[error("Completion channel closed unexpectedly")]
    CompletionChannelClosed,

    /// Aggregator reported completion before the word channel was closed
    #[error("Aggregator finished before the word channel was closed")]
    AggregatorExitedEarly,

    /// Shared table still referenced after all producers were joined
    #[error("Shared table still referenced after all producers finished")]
    TableStillShared,
}

/// Result type alias for CountError
pub type Result<T> = std::result::Result<T, CountError>;

/// Result type alias for SourceError
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Represents the outcome of dispatching a single source
#[derive(Debug)]
pub enum SourceOutcome {
    /// Source opened and a producer (or the inline counter) consumed it
    Counted { name: String },

    /// Source could not be opened and was skipped
    Skipped { name: String, error: SourceError },
}

impl SourceOutcome {
    /// Returns true if the source was counted
    pub fn is_counted(&self) -> bool {
        matches!(self, SourceOutcome::Counted { .. })
    }

    /// Returns the source name associated with this outcome
    pub fn name(&self) -> &str {
        match self {
            SourceOutcome::Counted { name } => name,
            SourceOutcome::Skipped { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_from_io() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let source_err = SourceError::from_io("missing.txt", &err);
        assert!(matches!(source_err, SourceError::NotFound { .. }));
        assert_eq!(source_err.name(), "missing.txt");
        assert!(source_err.is_recoverable());

        let err = std::io::Error::new(std::io::ErrorKind::Other, "weird");
        let source_err = SourceError::from_io("odd.txt", &err);
        assert!(matches!(source_err, SourceError::OpenFailed { .. }));
        assert!(source_err.to_string().contains("weird"));
    }

    #[test]
    fn test_error_conversion() {
        let source_err = SourceError::NotFound {
            name: "/missing".into(),
        };
        let count_err: CountError = source_err.into();
        assert!(matches!(count_err, CountError::Source(_)));

        let worker_err = WorkerError::TableStillShared;
        let count_err: CountError = worker_err.into();
        assert!(matches!(count_err, CountError::Worker(_)));
    }

    #[test]
    fn test_source_outcome() {
        let counted = SourceOutcome::Counted { name: "a.txt".into() };
        assert!(counted.is_counted());
        assert_eq!(counted.name(), "a.txt");

        let skipped = SourceOutcome::Skipped {
            name: "b.txt".into(),
            error: SourceError::NotFound { name: "b.txt".into() },
        };
        assert!(!skipped.is_counted());
        assert_eq!(skipped.name(), "b.txt");
    }
}
