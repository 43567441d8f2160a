//! # Performance Engine
//!
//! Turns weekly fantasy scores into per-player, per-season consistency and
//! value metrics, normalizes them against each position's cohort, and reduces
//! the roster-relevant players of every position to a summary row.
//!
//! The pipeline is purely in-memory: [`PerformanceEngine::run`] takes a
//! [`ScoreCorpus`] and a [`PlayerDirectory`] and returns an [`EngineOutput`].
//! Reading inputs and persisting outputs is left to the CLI ([`cli`]).

pub mod calculator;
pub mod cli;
pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod replacement;
pub mod stats;

#[cfg(test)]
mod tests;

pub use calculator::{consistency_score, value_score, ConsistencyCalculator};
pub use cohort::CohortNormalizer;
pub use config::{EngineConfig, RosterLimits};
pub use engine::PerformanceEngine;
pub use error::{EngineError, Result};
pub use models::{EngineOutput, PlayerSeasonMetrics, PositionSummary, SeasonRow};
pub use replacement::{filter_to_replacement_level, summarize_positions};
pub use stats::BasicStats;

/// Re-export the input side so callers need a single dependency
pub use score_corpus::{PlayerDirectory, PlayerProfile, RawPlayerRow, RawScoreRow, ScoreCorpus, ScoreFact};

/// Default minimum games for a completed season
pub const DEFAULT_MIN_GAMES_HISTORICAL: usize = 8;

/// Default minimum games for the season in progress
pub const DEFAULT_MIN_GAMES_CURRENT: usize = 4;

/// Default minimum games to count towards cohort statistics
pub const DEFAULT_COHORT_MIN_GAMES: usize = 4;

/// Roster size used for positions without a configured limit
pub const DEFAULT_ROSTER_LIMIT: usize = 32;
