use crate::stats::BasicStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics for one player in one season
///
/// Field order is the column order of the exported table. Any metric whose
/// sample-size requirement is not met is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonMetrics {
    pub season: i32,
    pub player_id: String,
    pub player_name: Option<String>,
    pub position: String,
    pub games_played: usize,
    pub mean_score: Option<f64>,
    pub median_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub std_dev: Option<f64>,
    pub coefficient_variation: Option<f64>,
    pub floor_score: Option<f64>,
    pub ceiling_score: Option<f64>,
    /// z-score of `std_dev` within the position cohort; negative is steadier
    pub std_dev_vs_position: Option<f64>,
    /// z-score of `coefficient_variation` within the position cohort
    pub cv_vs_position: Option<f64>,
    pub value_score: Option<f64>,
    /// Season-to-date consistency score
    pub consistency_score_std: Option<f64>,
    /// 100 = position average
    pub consistency_index_vs_avg: Option<f64>,
    /// 100 = replacement level (25th percentile of the position)
    pub consistency_index_vs_replacement: Option<f64>,
    pub consistency_score_trailing_10: Option<f64>,
    pub consistency_score_trailing_5: Option<f64>,
    pub consistency_score_last_season: Option<f64>,
    pub consistency_score_2seasons_ago: Option<f64>,
}

impl PlayerSeasonMetrics {
    /// Row with basic statistics filled in and every derived score empty
    pub fn new(
        season: i32,
        player_id: impl Into<String>,
        player_name: Option<String>,
        position: impl Into<String>,
        stats: BasicStats,
    ) -> Self {
        Self {
            season,
            player_id: player_id.into(),
            player_name,
            position: position.into(),
            games_played: stats.games_played,
            mean_score: stats.mean_score,
            median_score: stats.median_score,
            min_score: stats.min_score,
            max_score: stats.max_score,
            std_dev: stats.std_dev,
            coefficient_variation: stats.coefficient_variation,
            floor_score: stats.floor_score,
            ceiling_score: stats.ceiling_score,
            std_dev_vs_position: None,
            cv_vs_position: None,
            value_score: None,
            consistency_score_std: None,
            consistency_index_vs_avg: None,
            consistency_index_vs_replacement: None,
            consistency_score_trailing_10: None,
            consistency_score_trailing_5: None,
            consistency_score_last_season: None,
            consistency_score_2seasons_ago: None,
        }
    }

    /// Clear every cohort-relative field
    pub fn clear_cohort_fields(&mut self) {
        self.std_dev_vs_position = None;
        self.cv_vs_position = None;
        self.consistency_index_vs_avg = None;
        self.consistency_index_vs_replacement = None;
    }
}

/// Aggregate statistics for one position in one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub season: i32,
    pub position: String,
    pub num_players: usize,
    pub avg_mean_score: Option<f64>,
    pub median_mean_score: Option<f64>,
    pub avg_std_dev: Option<f64>,
    pub median_std_dev: Option<f64>,
    pub avg_cv: Option<f64>,
    pub median_cv: Option<f64>,
    pub avg_floor_score: Option<f64>,
    pub median_floor_score: Option<f64>,
    pub avg_value_score: Option<f64>,
    pub median_value_score: Option<f64>,
    pub avg_consistency_score: Option<f64>,
    pub median_consistency_score: Option<f64>,
    /// Player with the highest value score in the cohort
    pub top_player: Option<String>,
    pub top_value_score: Option<f64>,
}

/// Rows that belong to a single season
pub trait SeasonRow {
    fn season(&self) -> i32;
}

impl SeasonRow for PlayerSeasonMetrics {
    fn season(&self) -> i32 {
        self.season
    }
}

impl SeasonRow for PositionSummary {
    fn season(&self) -> i32 {
        self.season
    }
}

/// Split an all-seasons table into per-season tables, preserving row order
pub fn partition_by_season<T: SeasonRow + Clone>(rows: &[T]) -> BTreeMap<i32, Vec<T>> {
    let mut by_season: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    for row in rows {
        by_season.entry(row.season()).or_default().push(row.clone());
    }
    by_season
}

/// Everything one engine run produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    /// Every qualifying player-season, all seasons
    pub metrics: Vec<PlayerSeasonMetrics>,

    /// Replacement-level cohorts, all seasons
    pub cohorts: Vec<PlayerSeasonMetrics>,

    /// One row per (season, position)
    pub summaries: Vec<PositionSummary>,
}

impl EngineOutput {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Seasons present in the metrics table, ascending
    pub fn seasons(&self) -> Vec<i32> {
        partition_by_season(&self.metrics).into_keys().collect()
    }

    pub fn metrics_by_season(&self) -> BTreeMap<i32, Vec<PlayerSeasonMetrics>> {
        partition_by_season(&self.metrics)
    }

    pub fn cohorts_by_season(&self) -> BTreeMap<i32, Vec<PlayerSeasonMetrics>> {
        partition_by_season(&self.cohorts)
    }

    pub fn summaries_by_season(&self) -> BTreeMap<i32, Vec<PositionSummary>> {
        partition_by_season(&self.summaries)
    }

    /// Highest value scores of a season
    pub fn top_by_value(&self, season: i32, n: usize) -> Vec<&PlayerSeasonMetrics> {
        let mut rows: Vec<_> = self.metrics.iter().filter(|m| m.season == season).collect();
        rows.sort_by(|a, b| crate::stats::descending_nulls_last(a.value_score, b.value_score));
        rows.truncate(n);
        rows
    }
}
