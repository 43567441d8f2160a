//! # Cohort Normalization
//!
//! Position-relative metrics for one season. Each (season, position) pair is
//! a cohort; only players with enough games take part in the cohort
//! statistics, and only they receive normalized values.

use crate::models::PlayerSeasonMetrics;
use crate::stats::{self, PoolStats};
use std::collections::BTreeMap;
use tracing::debug;

/// Computes z-scores and consistency indexes against a player's position cohort
#[derive(Debug, Clone, Copy)]
pub struct CohortNormalizer {
    min_games: usize,
}

impl CohortNormalizer {
    pub fn new(min_games: usize) -> Self {
        Self { min_games }
    }

    /// Fill in the cohort-relative fields of every row
    ///
    /// Rows may span several seasons; cohorts never cross a season boundary.
    /// Existing cohort fields are overwritten, ineligible rows end up `None`.
    pub fn normalize(&self, rows: &mut [PlayerSeasonMetrics]) {
        let mut cohorts: BTreeMap<(i32, String), Vec<usize>> = BTreeMap::new();
        for (idx, row) in rows.iter_mut().enumerate() {
            row.clear_cohort_fields();
            if row.games_played >= self.min_games {
                cohorts.entry((row.season, row.position.clone())).or_default().push(idx);
            }
        }

        for ((season, position), members) in cohorts {
            debug!("Normalizing {} {} cohort of {} players", season, position, members.len());
            self.normalize_cohort(rows, &members);
        }
    }

    fn normalize_cohort(&self, rows: &mut [PlayerSeasonMetrics], members: &[usize]) {
        let std_pool = pool(rows, members, |r| r.std_dev);
        let cv_pool = pool(rows, members, |r| r.coefficient_variation);

        let consistency: Vec<f64> =
            members.iter().filter_map(|&i| rows[i].consistency_score_std).collect();
        let average = stats::mean(&consistency);
        let replacement = stats::percentile(&consistency, 0.25);

        for &i in members {
            let row = &mut rows[i];

            row.std_dev_vs_position = z_score(row.std_dev, std_pool);
            row.cv_vs_position = z_score(row.coefficient_variation, cv_pool);

            if let Some(score) = row.consistency_score_std {
                row.consistency_index_vs_avg = average.and_then(|avg| stats::index_of(score, avg));
                row.consistency_index_vs_replacement =
                    replacement.and_then(|rep| stats::index_of(score, rep));
            }
        }
    }
}

fn pool<F>(rows: &[PlayerSeasonMetrics], members: &[usize], field: F) -> Option<PoolStats>
where
    F: Fn(&PlayerSeasonMetrics) -> Option<f64>,
{
    let values: Vec<f64> = members.iter().filter_map(|&i| field(&rows[i])).collect();
    PoolStats::from_values(&values)
}

fn z_score(value: Option<f64>, pool: Option<PoolStats>) -> Option<f64> {
    Some(pool?.z_score(value?))
}
