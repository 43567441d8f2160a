//! Configuration for the performance engine

use crate::error::{EngineError, Result};
use crate::{
    DEFAULT_COHORT_MIN_GAMES, DEFAULT_MIN_GAMES_CURRENT, DEFAULT_MIN_GAMES_HISTORICAL,
    DEFAULT_ROSTER_LIMIT,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Env files read before overrides; the ingestion scripts write `.ENV`
const ENV_FILES: [&str; 2] = [".env", ".ENV"];

/// League and sample-size settings for one engine run
///
/// Passed by value into the engine so runs with different league settings
/// can execute side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Season still in progress; it uses the lower games threshold
    pub current_season: i32,

    /// Minimum games for a completed season (default: 8)
    pub min_games_historical: usize,

    /// Minimum games for the current season (default: 4)
    pub min_games_current: usize,

    /// Minimum games for a player to count in cohort statistics (default: 4)
    pub cohort_min_games: usize,

    /// Positions starting with this prefix are team units and are skipped
    pub excluded_position_prefix: String,

    /// Replacement-level roster sizes per position
    pub roster_limits: RosterLimits,
}

/// Roster-relevant cohort size per position code
///
/// Defaults assume 16 teams per conference: one QB, kicker and punter per
/// team, up to two RB/TE, up to four WR/CB and up to three of each IDP slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterLimits {
    /// Limit for positions not listed below
    pub default_limit: usize,

    /// Position code to number of players kept
    pub limits: BTreeMap<String, usize>,
}

impl Default for RosterLimits {
    fn default() -> Self {
        let limits = [
            ("QB", 16),
            ("RB", 32),
            ("WR", 64),
            ("TE", 32),
            ("PK", 16),
            ("K", 16),
            ("PN", 16),
            ("DT", 48),
            ("DE", 48),
            ("LB", 48),
            ("CB", 64),
            ("S", 48),
            ("DL", 48),
            ("DB", 64),
        ]
        .into_iter()
        .map(|(pos, n)| (pos.to_string(), n))
        .collect();

        Self { default_limit: DEFAULT_ROSTER_LIMIT, limits }
    }
}

impl RosterLimits {
    /// Number of players kept for a position
    pub fn limit_for(&self, position: &str) -> usize {
        self.limits.get(position).copied().unwrap_or(self.default_limit)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            current_season: chrono::Utc::now().year(),
            min_games_historical: DEFAULT_MIN_GAMES_HISTORICAL,
            min_games_current: DEFAULT_MIN_GAMES_CURRENT,
            cohort_min_games: DEFAULT_COHORT_MIN_GAMES,
            excluded_position_prefix: "TM".to_string(),
            roster_limits: RosterLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Default settings for a given current season
    pub fn for_season(current_season: i32) -> Self {
        Self { current_season, ..Default::default() }
    }

    /// Games a player needs in `season` for that season to count
    pub fn min_games_for(&self, season: i32) -> usize {
        if season == self.current_season {
            self.min_games_current
        } else {
            self.min_games_historical
        }
    }

    /// Whether a position code is excluded from all computation
    pub fn is_excluded_position(&self, position: &str) -> bool {
        !self.excluded_position_prefix.is_empty()
            && position.starts_with(&self.excluded_position_prefix)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| EngineError::Io { path: path.display().to_string(), source })?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|source| EngineError::Io { path: path.display().to_string(), source })
    }

    /// Apply overrides from the process environment
    ///
    /// `.env` or `.ENV` in the working directory or one of its ancestors is
    /// loaded first. Variables already set in the process take precedence.
    pub fn apply_env(&mut self) -> Result<()> {
        for name in ENV_FILES {
            if let Ok(path) = dotenv::from_filename(name) {
                debug!("Loaded environment from {}", path.display());
            }
        }
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::apply_env`], reading env files from `dir` only
    pub fn apply_env_from(&mut self, dir: &Path) -> Result<()> {
        for name in ENV_FILES {
            if dotenv::from_path(dir.join(name)).is_ok() {
                debug!("Loaded environment from {}", dir.join(name).display());
            }
        }
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup
    ///
    /// `current_season` is accepted as well as `PERF_CURRENT_SEASON` so the
    /// ingestion scripts' `.env` file can be shared.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(season) = lookup("PERF_CURRENT_SEASON").or_else(|| lookup("current_season")) {
            self.current_season = parse_var("current_season", &season)?;
        }

        if let Some(games) = lookup("PERF_MIN_GAMES_HISTORICAL") {
            self.min_games_historical = parse_var("PERF_MIN_GAMES_HISTORICAL", &games)?;
        }

        if let Some(games) = lookup("PERF_MIN_GAMES_CURRENT") {
            self.min_games_current = parse_var("PERF_MIN_GAMES_CURRENT", &games)?;
        }

        if let Some(games) = lookup("PERF_COHORT_MIN_GAMES") {
            self.cohort_min_games = parse_var("PERF_COHORT_MIN_GAMES", &games)?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_games_historical == 0 || self.min_games_current == 0 {
            return Err(EngineError::Config(
                "minimum games thresholds must be at least 1".to_string(),
            ));
        }

        if self.cohort_min_games == 0 {
            return Err(EngineError::Config("cohort_min_games must be at least 1".to_string()));
        }

        if self.roster_limits.default_limit == 0 {
            return Err(EngineError::Config("default roster limit must be at least 1".to_string()));
        }

        if let Some((position, _)) = self.roster_limits.limits.iter().find(|(_, n)| **n == 0) {
            return Err(EngineError::Config(format!("roster limit for {position} is zero")));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .parse()
        .map_err(|_| EngineError::Config(format!("invalid value for {key}: {value:?}")))
}
