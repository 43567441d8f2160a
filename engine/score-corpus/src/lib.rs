//! Score Corpus - Typed per-game scoring facts and the player directory
//!
//! This crate turns loosely-typed score and roster tables into the validated
//! facts the performance engine works on: one score per player per week, and
//! one current position/name per player.

pub mod corpus;
pub mod directory;
pub mod error;
pub mod loader;
pub mod types;

pub use corpus::{BuildReport, ScoreCorpus};
pub use directory::PlayerDirectory;
pub use error::{CorpusError, Result};
pub use types::{PlayerProfile, RawPlayerRow, RawScoreRow, RawValue, ScoreFact};
