use crate::calculator::ConsistencyCalculator;
use crate::cohort::CohortNormalizer;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{EngineOutput, PlayerSeasonMetrics};
use crate::replacement::{filter_to_replacement_level, summarize_positions};
use crate::stats::descending_nulls_last;
use rayon::prelude::*;
use score_corpus::{
    PlayerDirectory, PlayerProfile, RawPlayerRow, RawScoreRow, ScoreCorpus, ScoreFact,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Performance Metrics Engine
///
/// Runs the full batch: player-season metrics, per-season cohort
/// normalization, replacement-level filtering and position summaries.
pub struct PerformanceEngine {
    config: EngineConfig,
    calculator: ConsistencyCalculator,
    normalizer: CohortNormalizer,
}

/// One player's games with the attributes used for grouping
struct PlayerGames<'a> {
    profile: &'a PlayerProfile,
    position: &'a str,
    games: Vec<ScoreFact>,
}

impl PerformanceEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        info!(
            "Creating performance engine (current season {}, min games {} historical / {} current)",
            config.current_season, config.min_games_historical, config.min_games_current
        );

        Ok(Self {
            calculator: ConsistencyCalculator::new(config.clone()),
            normalizer: CohortNormalizer::new(config.cohort_min_games),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the corpus and directory from raw tables, then run
    pub fn run_tables<T: AsRef<[RawScoreRow]>>(
        &self,
        score_tables: &[T],
        directory: Option<&[RawPlayerRow]>,
    ) -> Result<EngineOutput> {
        let corpus = ScoreCorpus::build(score_tables)?;
        let directory = PlayerDirectory::resolve(directory)?;
        Ok(self.run(&corpus, &directory))
    }

    /// Run the whole pipeline
    pub fn run(&self, corpus: &ScoreCorpus, directory: &PlayerDirectory) -> EngineOutput {
        let metrics = self.compute_player_seasons(corpus, directory);
        if metrics.is_empty() {
            warn!("No player-seasons met the minimum games threshold");
            return EngineOutput::default();
        }

        let metrics = self.normalize(metrics);
        let cohorts = filter_to_replacement_level(&metrics, &self.config.roster_limits);
        let summaries = summarize_positions(&cohorts);

        info!(
            "Computed {} player-seasons, {} replacement-level rows, {} position summaries",
            metrics.len(),
            cohorts.len(),
            summaries.len()
        );

        EngineOutput { metrics, cohorts, summaries }
    }

    /// First grouping level: one metrics row per qualifying (player, season)
    ///
    /// Players without a directory position, and team units, are skipped.
    pub fn compute_player_seasons(
        &self,
        corpus: &ScoreCorpus,
        directory: &PlayerDirectory,
    ) -> Vec<PlayerSeasonMetrics> {
        let players = self.group_by_player(corpus, directory);

        info!(
            "Calculating metrics for {} players ({} score records)",
            players.len(),
            players.iter().map(|p| p.games.len()).sum::<usize>()
        );

        players
            .par_iter()
            .flat_map_iter(|player| {
                let seasons: BTreeSet<i32> = player.games.iter().map(|f| f.season).collect();
                seasons.into_iter().filter_map(move |season| {
                    self.calculator.player_season(
                        player.profile,
                        player.position,
                        &player.games,
                        season,
                    )
                })
            })
            .collect()
    }

    /// Second grouping level: cohort normalization within each season
    ///
    /// Returns rows ordered by season descending, then value score descending.
    pub fn normalize(&self, metrics: Vec<PlayerSeasonMetrics>) -> Vec<PlayerSeasonMetrics> {
        let mut seasons: BTreeMap<i32, Vec<PlayerSeasonMetrics>> = BTreeMap::new();
        for row in metrics {
            seasons.entry(row.season).or_default().push(row);
        }
        debug!("Normalizing {} seasons", seasons.len());

        let mut normalized: Vec<PlayerSeasonMetrics> = seasons
            .into_par_iter()
            .flat_map_iter(|(_, mut rows)| {
                self.normalizer.normalize(&mut rows);
                rows
            })
            .collect();

        normalized.sort_by(|a, b| {
            b.season
                .cmp(&a.season)
                .then_with(|| descending_nulls_last(a.value_score, b.value_score))
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        normalized
    }

    fn group_by_player<'a>(
        &self,
        corpus: &ScoreCorpus,
        directory: &'a PlayerDirectory,
    ) -> Vec<PlayerGames<'a>> {
        let histories: BTreeMap<String, Vec<ScoreFact>> = corpus.histories();
        let mut unknown = 0usize;
        let mut excluded = 0usize;

        let players: Vec<PlayerGames<'a>> = histories
            .into_iter()
            .filter_map(|(player_id, games)| {
                let Some(profile) = directory.get(&player_id) else {
                    unknown += 1;
                    return None;
                };
                let Some(position) = profile.position.as_deref() else {
                    unknown += 1;
                    return None;
                };
                if self.config.is_excluded_position(position) {
                    excluded += 1;
                    return None;
                }
                Some(PlayerGames { profile, position, games })
            })
            .collect();

        debug!("Skipped {} players without a position and {} team units", unknown, excluded);
        players
    }
}
