use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the browser-returns pipeline.
#[derive(Error, Debug)]
pub enum ReturnsError {
    /// A row's date field is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },

    /// A row has fewer columns than the input contract requires.
    #[error("Malformed row {row}: expected {expected} columns, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A row carries an empty client identifier.
    #[error("Missing client id in row {0}")]
    MissingClientId(usize),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be parsed.
    #[error("Failed to parse CSV file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No CSV files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// The CSV files contained no data rows.
    #[error("No data rows found in {0} file(s)")]
    EmptyDataset(usize),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A background bucket computation panicked or was cancelled.
    #[error("Bucket task failed: {0}")]
    TaskJoin(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the returns crates.
pub type Result<T> = std::result::Result<T, ReturnsError>;
