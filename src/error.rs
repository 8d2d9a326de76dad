//! Error types for the tictac-q crate

use thiserror::Error;

/// Main error type for the tictac-q crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("position ({row}, {col}) is out of bounds (must be 0-2)")]
    InvalidPosition { row: usize, col: usize },

    #[error("state {state} is out of range (must be below {limit})")]
    StateOutOfRange { state: usize, limit: usize },

    #[error("selected action {action} targets an occupied cell in state {state}")]
    IllegalAction { state: usize, action: usize },

    #[error("state {state} has no empty cell to play")]
    NoLegalActions { state: usize },

    #[error(
        "value table at '{path}' has {actual} bytes, expected {expected} (19683 states x 9 actions x 8 bytes)"
    )]
    TableSizeMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the operation that failed
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
