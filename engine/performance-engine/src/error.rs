//! Error types for the performance engine
//!
//! Only structural problems surface here. Statistical edge cases (too few
//! games, a zero mean, a cohort of one) are `None` values in the output.

use score_corpus::CorpusError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
