//! Errors raised while loading and saving time-value files

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the time-file reader and writer
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A line did not hold a valid time of day
    #[error("malformed time value {text:?} at {path}:{line}: {source}")]
    MalformedTime {
        /// File being read
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// The offending text, after trimming
        text: String,
        /// Parser error
        source: chrono::ParseError,
    },

    /// The file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result alias for time-file operations
pub type Result<T> = std::result::Result<T, Error>;
