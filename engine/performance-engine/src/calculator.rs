use crate::config::EngineConfig;
use crate::models::PlayerSeasonMetrics;
use crate::stats::{self, BasicStats};
use score_corpus::{PlayerProfile, ScoreFact};

/// Consistency score: `mean / (1 + population_std_dev)`
///
/// Higher is better. The `1 +` keeps the score finite for a player with no
/// variance and keeps its sign when the mean is low or negative.
pub fn consistency_score(scores: &[f64]) -> Option<f64> {
    if scores.len() < 2 {
        return None;
    }
    let mean = stats::mean(scores)?;
    let std_dev = stats::population_std_dev(scores)?;
    Some(mean / (1.0 + std_dev))
}

/// Value score: `mean * 1 / (1 + cv)`
///
/// Volume scaled down by relative volatility. A negative CV (negative mean)
/// would turn the penalty into a bonus, so it yields `None`.
pub fn value_score(mean_score: Option<f64>, coefficient_variation: Option<f64>) -> Option<f64> {
    let mean = mean_score?;
    let cv = coefficient_variation?;
    if cv < 0.0 {
        return None;
    }
    Some(mean * (1.0 / (1.0 + cv)))
}

/// Consistency calculator for windowed and per-season scores
///
/// `history` arguments are one player's games; order does not matter.
#[derive(Debug, Clone)]
pub struct ConsistencyCalculator {
    config: EngineConfig,
}

impl ConsistencyCalculator {
    /// Create a new consistency calculator
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Consistency over the `n` most recent games up to and including `through_season`
    ///
    /// Games are ordered by `(season, week)` across season boundaries. `None`
    /// if fewer than `n` games exist.
    pub fn trailing(&self, history: &[ScoreFact], through_season: i32, n: usize) -> Option<f64> {
        let mut games: Vec<&ScoreFact> =
            history.iter().filter(|f| f.season <= through_season).collect();
        if games.len() < n {
            return None;
        }

        games.sort_by(|a, b| (b.season, b.week).cmp(&(a.season, a.week)));
        let recent: Vec<f64> = games.iter().take(n).map(|f| f.score).collect();
        consistency_score(&recent)
    }

    /// Consistency over one full season, subject to that season's games threshold
    pub fn season(&self, history: &[ScoreFact], season: i32) -> Option<f64> {
        let scores = season_scores(history, season);
        if scores.len() < self.config.min_games_for(season) {
            return None;
        }
        consistency_score(&scores)
    }

    /// Consistency for the season being evaluated
    pub fn season_to_date(&self, history: &[ScoreFact], season: i32) -> Option<f64> {
        self.season(history, season)
    }

    /// Metrics row for one player-season
    ///
    /// `None` if the player did not play enough games that season to be
    /// reported at all.
    pub fn player_season(
        &self,
        profile: &PlayerProfile,
        position: &str,
        history: &[ScoreFact],
        season: i32,
    ) -> Option<PlayerSeasonMetrics> {
        let scores = season_scores(history, season);
        if scores.len() < self.config.min_games_for(season) {
            return None;
        }

        let stats = BasicStats::from_scores(&scores);
        let mut metrics = PlayerSeasonMetrics::new(
            season,
            profile.player_id.clone(),
            profile.name.clone(),
            position,
            stats,
        );

        metrics.consistency_score_std = self.season_to_date(history, season);
        metrics.consistency_score_last_season = self.season(history, season - 1);
        metrics.consistency_score_2seasons_ago = self.season(history, season - 2);
        metrics.consistency_score_trailing_10 = self.trailing(history, season, 10);
        metrics.consistency_score_trailing_5 = self.trailing(history, season, 5);
        metrics.value_score = value_score(stats.mean_score, stats.coefficient_variation);

        Some(metrics)
    }
}

fn season_scores(history: &[ScoreFact], season: i32) -> Vec<f64> {
    history.iter().filter(|f| f.season == season).map(|f| f.score).collect()
}
