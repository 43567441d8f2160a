//! Summary statistics over a set of per-game scores

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Below this a spread is treated as zero
pub const EPSILON: f64 = 1e-9;

/// Fixed-shape summary of a list of scores
///
/// Variance-based fields need at least two games and are `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BasicStats {
    pub games_played: usize,
    pub mean_score: Option<f64>,
    pub median_score: Option<f64>,
    pub std_dev: Option<f64>,
    pub coefficient_variation: Option<f64>,
    /// 25th percentile
    pub floor_score: Option<f64>,
    /// 75th percentile
    pub ceiling_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

impl BasicStats {
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.len() < 2 {
            return Self {
                games_played: scores.len(),
                mean_score: scores.first().copied(),
                ..Default::default()
            };
        }

        let mean_score = mean(scores);
        let std_dev = population_std_dev(scores);
        let coefficient_variation = match (std_dev, mean_score) {
            (Some(sd), Some(m)) if m != 0.0 => Some(sd / m),
            _ => None,
        };

        Self {
            games_played: scores.len(),
            mean_score,
            median_score: median(scores),
            std_dev,
            coefficient_variation,
            floor_score: percentile(scores, 0.25),
            ceiling_score: percentile(scores, 0.75),
            min_score: scores.iter().copied().reduce(f64::min),
            max_score: scores.iter().copied().reduce(f64::max),
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with an N denominator
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

/// Quantile `q` in `[0, 1]`, linearly interpolated between order statistics
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Mean and population standard deviation of a comparison pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl PoolStats {
    /// `None` for fewer than two values or a spread that is effectively zero
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mean = mean(values)?;
        let std_dev = population_std_dev(values)?;
        (std_dev >= EPSILON).then_some(Self { mean, std_dev })
    }

    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// `numerator / denominator * 100`, `None` when the denominator is zero
pub fn index_of(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator.abs() >= EPSILON).then(|| numerator / denominator * 100.0)
}

/// Descending order for optional values, `None` last
pub fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
