//! # Replacement Level
//!
//! Cuts every (season, position) group down to the players a league would
//! actually roster, then reduces each group to a single summary row.

use crate::config::RosterLimits;
use crate::models::{PlayerSeasonMetrics, PositionSummary};
use crate::stats::{self, descending_nulls_last};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

/// Keep the top K players by `mean_score` for every (season, position)
///
/// Ranking is by volume, not consistency: the cohort is "who scores enough to
/// be rostered", and consistency is then measured within it. Output is
/// grouped by season descending, position ascending, and ranked within each
/// group; ties keep their input order.
pub fn filter_to_replacement_level(
    rows: &[PlayerSeasonMetrics],
    limits: &RosterLimits,
) -> Vec<PlayerSeasonMetrics> {
    let mut filtered = Vec::new();

    for ((Reverse(season), position), mut group) in group_by_season_position(rows) {
        let limit = limits.limit_for(&position);
        let available = group.len();

        group.sort_by(|a, b| descending_nulls_last(a.mean_score, b.mean_score));
        group.truncate(limit);

        debug!("{} {}: top {} of {} players", season, position, group.len(), available);
        filtered.extend(group.into_iter().cloned());
    }

    filtered
}

/// One summary row per (season, position), ordered by season then position
pub fn summarize_positions(cohort: &[PlayerSeasonMetrics]) -> Vec<PositionSummary> {
    let mut summaries: Vec<PositionSummary> = group_by_season_position(cohort)
        .into_iter()
        .map(|((Reverse(season), position), group)| summarize(season, position, &group))
        .collect();

    summaries.sort_by(|a, b| (a.season, &a.position).cmp(&(b.season, &b.position)));
    summaries
}

fn summarize(season: i32, position: String, group: &[&PlayerSeasonMetrics]) -> PositionSummary {
    let column = |field: fn(&PlayerSeasonMetrics) -> Option<f64>| -> Vec<f64> {
        group.iter().filter_map(|row| field(row)).collect()
    };

    let mean_score = column(|r| r.mean_score);
    let std_dev = column(|r| r.std_dev);
    let cv = column(|r| r.coefficient_variation);
    let floor = column(|r| r.floor_score);
    let value = column(|r| r.value_score);
    let consistency = column(|r| r.consistency_score_std);

    // Strictly greater: on an exact tie the earlier row stays on top
    let mut top: Option<&PlayerSeasonMetrics> = None;
    for row in group {
        if let Some(score) = row.value_score {
            if top.and_then(|t| t.value_score).map_or(true, |best| score > best) {
                top = Some(*row);
            }
        }
    }

    PositionSummary {
        season,
        position,
        num_players: group.len(),
        avg_mean_score: stats::mean(&mean_score),
        median_mean_score: stats::median(&mean_score),
        avg_std_dev: stats::mean(&std_dev),
        median_std_dev: stats::median(&std_dev),
        avg_cv: stats::mean(&cv),
        median_cv: stats::median(&cv),
        avg_floor_score: stats::mean(&floor),
        median_floor_score: stats::median(&floor),
        avg_value_score: stats::mean(&value),
        median_value_score: stats::median(&value),
        avg_consistency_score: stats::mean(&consistency),
        median_consistency_score: stats::median(&consistency),
        top_player: top.and_then(|t| t.player_name.clone()),
        top_value_score: top.and_then(|t| t.value_score),
    }
}

type GroupKey = (Reverse<i32>, String);

fn group_by_season_position(
    rows: &[PlayerSeasonMetrics],
) -> BTreeMap<GroupKey, Vec<&PlayerSeasonMetrics>> {
    let mut groups: BTreeMap<GroupKey, Vec<&PlayerSeasonMetrics>> = BTreeMap::new();
    for row in rows {
        groups.entry((Reverse(row.season), row.position.clone())).or_default().push(row);
    }
    groups
}
