use crate::error::{CorpusError, Result};
use crate::types::{RawScoreRow, RawValue, ScoreFact};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Validated, typed table of per-game score facts
///
/// Every `(player_id, season, week)` appears at most once.
#[derive(Debug, Clone, Default)]
pub struct ScoreCorpus {
    facts: Vec<ScoreFact>,
}

/// Counts of rows dropped while building a corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub rows_read: usize,
    pub missing_id_or_score: usize,
    pub invalid_season_or_week: usize,
    pub duplicates: usize,
}

impl ScoreCorpus {
    /// Merge per-season score tables into one corpus
    ///
    /// Tables are concatenated in the order given. Rows without an id or a
    /// score are dropped (bye weeks and inactive players are expected), as are
    /// rows whose season or week cannot be read as an integer.
    pub fn build<T: AsRef<[RawScoreRow]>>(tables: &[T]) -> Result<Self> {
        Self::build_with_report(tables).map(|(corpus, _)| corpus)
    }

    /// Same as [`ScoreCorpus::build`], also returning what was dropped
    pub fn build_with_report<T: AsRef<[RawScoreRow]>>(tables: &[T]) -> Result<(Self, BuildReport)> {
        if tables.is_empty() {
            return Err(CorpusError::EmptyCorpus("zero score tables supplied".to_string()));
        }

        let mut report = BuildReport::default();
        let mut facts = Vec::new();

        for row in tables.iter().flat_map(|table| table.as_ref().iter()) {
            report.rows_read += 1;

            let player_id = row.id.as_ref().and_then(|v| v.as_player_id());
            let score = row.score.as_ref().and_then(|v| v.as_float());
            let (Some(player_id), Some(score)) = (player_id, score) else {
                report.missing_id_or_score += 1;
                continue;
            };

            let season = row.season.as_ref().and_then(as_i32);
            let week = row.week.as_ref().and_then(as_i32);
            let (Some(season), Some(week)) = (season, week) else {
                report.invalid_season_or_week += 1;
                continue;
            };

            facts.push(ScoreFact { player_id, season, week, score });
        }

        let before = facts.len();
        let corpus = Self::from_facts(facts);
        report.duplicates = before - corpus.len();

        debug!(
            "Dropped {} rows without id/score and {} rows with unreadable season/week",
            report.missing_id_or_score, report.invalid_season_or_week
        );
        if report.duplicates > 0 {
            warn!("Discarded {} duplicate (player, season, week) score rows", report.duplicates);
        }
        info!(
            "Built score corpus: {} facts for {} players across {} tables",
            corpus.len(),
            corpus.unique_players(),
            tables.len()
        );

        Ok((corpus, report))
    }

    /// Build from already-typed facts, keeping the first of any duplicates
    pub fn from_facts(facts: Vec<ScoreFact>) -> Self {
        let mut seen = HashSet::with_capacity(facts.len());
        let facts = facts
            .into_iter()
            .filter(|f| seen.insert((f.player_id.clone(), f.season, f.week)))
            .collect();
        Self { facts }
    }

    pub fn facts(&self) -> &[ScoreFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Number of distinct players
    pub fn unique_players(&self) -> usize {
        self.facts.iter().map(|f| f.player_id.as_str()).collect::<HashSet<_>>().len()
    }

    /// Distinct seasons, ascending
    pub fn seasons(&self) -> Vec<i32> {
        self.facts.iter().map(|f| f.season).collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Every player's games, ordered by `(season, week)` ascending
    pub fn histories(&self) -> BTreeMap<String, Vec<ScoreFact>> {
        let mut by_player: BTreeMap<String, Vec<ScoreFact>> = BTreeMap::new();
        for fact in &self.facts {
            by_player.entry(fact.player_id.clone()).or_default().push(fact.clone());
        }
        for games in by_player.values_mut() {
            games.sort_by_key(|f| (f.season, f.week));
        }
        by_player
    }
}

/// Integer cell that fits a season or week number
fn as_i32(value: &RawValue) -> Option<i32> {
    value.as_int().and_then(|v| i32::try_from(v).ok())
}
