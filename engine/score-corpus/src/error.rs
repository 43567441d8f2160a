//! Error types for the score corpus

use thiserror::Error;

/// Errors that abort a run before any metric is computed
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("No score tables found: {0}")]
    EmptyCorpus(String),

    #[error("Player directory not found: {0}")]
    MissingDirectory(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, CorpusError>;
