//! Error types for the transfer library.

use std::fmt;

use thiserror::Error;

/// Boxed error produced by externally supplied sessions, readers and writers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which side of a pipe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Reading from the producer.
    Read,
    /// Writing into the consumer.
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => f.write_str("reading from producer"),
            Direction::Write => f.write_str("writing to consumer"),
        }
    }
}

/// State a consumer was left in after a failed or cancelled transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialWrite {
    /// Nothing reached the consumer.
    Nothing,
    /// Rows written by the failed transfer were discarded.
    Truncated,
    /// Rows already written remain in the consumer.
    Retained { rows: u64 },
}

impl fmt::Display for PartialWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialWrite::Nothing => f.write_str("consumer untouched"),
            PartialWrite::Truncated => f.write_str("partial rows discarded"),
            PartialWrite::Retained { rows } => write!(f, "{} rows left in consumer", rows),
        }
    }
}

fn pipe_label(pipe: &Option<usize>) -> String {
    match pipe {
        Some(index) => format!(" for pipe #{}", index + 1),
        None => String::new(),
    }
}

/// Main error type for transfer and execution-context operations.
#[derive(Error, Debug)]
pub enum XferError {
    /// The connection or endpoint does not support the requested capability.
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    /// Session could not be opened or a statement failed on the server.
    #[error("Connection error while {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A proposed identifier or pipeline shape was rejected before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Data movement failed for a producer/consumer pairing.
    #[error("Transfer failed{} while {direction}: {message} ({partial})", pipe_label(.pipe))]
    Transfer {
        pipe: Option<usize>,
        direction: Direction,
        message: String,
        partial: PartialWrite,
    },

    /// Data movement was cancelled through the progress monitor.
    #[error("Transfer cancelled{} ({partial})", pipe_label(.pipe))]
    TransferCancelled {
        pipe: Option<usize>,
        partial: PartialWrite,
    },

    /// Operation was cancelled before it changed any state.
    #[error("Operation cancelled")]
    Cancelled,

    /// Pipeline definition error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XferError {
    /// Create an Unsupported error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        XferError::Unsupported {
            operation: operation.into(),
        }
    }

    /// Wrap a lower-level failure as a Connection error.
    pub fn connection(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        XferError::Connection {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Create a Transfer error not yet attributed to a pipe.
    pub fn transfer(direction: Direction, message: impl Into<String>, partial: PartialWrite) -> Self {
        XferError::Transfer {
            pipe: None,
            direction,
            message: message.into(),
            partial,
        }
    }

    /// Attribute a transfer failure to the pipe at `index`.
    ///
    /// Other error kinds are returned unchanged.
    pub fn with_pipe(self, index: usize) -> Self {
        match self {
            XferError::Transfer {
                direction,
                message,
                partial,
                ..
            } => XferError::Transfer {
                pipe: Some(index),
                direction,
                message,
                partial,
            },
            XferError::TransferCancelled { partial, .. } => XferError::TransferCancelled {
                pipe: Some(index),
                partial,
            },
            other => other,
        }
    }

    /// Whether this error reports an unsupported capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, XferError::Unsupported { .. })
    }

    /// Whether this error came from a cancellation request.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            XferError::Cancelled | XferError::TransferCancelled { .. }
        )
    }

    /// Whether a caller may reasonably retry the operation.
    ///
    /// Only connection failures qualify; the core itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, XferError::Connection { .. })
    }

    /// How the consumer was left, for transfer failures.
    pub fn partial_write(&self) -> Option<PartialWrite> {
        match self {
            XferError::Transfer { partial, .. } | XferError::TransferCancelled { partial, .. } => {
                Some(*partial)
            }
            _ => None,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            XferError::Config(_) | XferError::Yaml(_) | XferError::Validation(_) => 2,
            XferError::Connection { .. } => 3,
            XferError::Transfer { .. } => 4,
            XferError::Unsupported { .. } => 5,
            XferError::Cancelled | XferError::TransferCancelled { .. } => 130,
            XferError::Io(_) | XferError::Json(_) => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for transfer operations.
pub type Result<T> = std::result::Result<T, XferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_pipe_only_touches_transfer_errors() {
        let err = XferError::transfer(Direction::Write, "disk full", PartialWrite::Truncated)
            .with_pipe(1);
        assert!(err.to_string().contains("pipe #2"));
        assert!(err.to_string().contains("writing to consumer"));
        assert_eq!(err.partial_write(), Some(PartialWrite::Truncated));

        let err = XferError::unsupported("stream import").with_pipe(3);
        assert!(err.is_unsupported());
        assert!(!err.to_string().contains("pipe"));
    }

    #[test]
    fn test_connection_error_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = XferError::connection("switching schema", cause);
        assert!(err.is_retryable());
        let detailed = err.format_detailed();
        assert!(detailed.contains("switching schema"));
        assert!(detailed.contains("Caused by"));
        assert!(detailed.contains("reset by peer"));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        assert_eq!(XferError::Validation("x".into()).exit_code(), 2);
        assert_eq!(XferError::unsupported("x").exit_code(), 5);
        assert_eq!(XferError::Cancelled.exit_code(), 130);
        assert!(XferError::Cancelled.is_cancelled());
        assert!(!XferError::unsupported("x").is_retryable());
    }
}
