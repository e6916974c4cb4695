//! Error types for the benchdiff library.
//!
//! Extraction and statistics never fail: incomplete rounds are skipped and
//! hazardous ratios are omitted. Errors only come from the adapters that
//! read or write tabular/structured formats, and from configuration loading.

use thiserror::Error;

/// Main error type for the benchdiff library.
///
/// All fallible operations return `Result<T, BenchError>`.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Error parsing a record table.
    ///
    /// Contains the line and column where the error occurred, along with
    /// a descriptive message.
    #[error("CSV parsing error at line {line}, column {column}: {message}")]
    CsvParseError {
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Column number where the error occurred (1-indexed, 0 if unknown)
        column: usize,
        /// Description of the parsing error
        message: String,
    },

    /// Error from the underlying CSV reader or writer.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing or deserializing JSON.
    ///
    /// Wraps errors from the `serde_json` crate.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the invalid setting
        message: String,
    },

    /// I/O error.
    ///
    /// Wraps errors from standard I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for Results using `BenchError`.
pub type Result<T> = std::result::Result<T, BenchError>;
