//! Pipeline-level tests for the performance engine

use crate::{EngineConfig, EngineError, PerformanceEngine, PlayerSeasonMetrics};
use score_corpus::{
    CorpusError, PlayerDirectory, PlayerProfile, RawPlayerRow, RawScoreRow, ScoreCorpus, ScoreFact,
};

fn create_test_config() -> EngineConfig {
    EngineConfig::for_season(2024)
}

fn profile(id: &str, position: &str, name: &str) -> PlayerProfile {
    PlayerProfile {
        player_id: id.to_string(),
        position: Some(position.to_string()),
        name: Some(name.to_string()),
    }
}

fn season(id: &str, season: i32, scores: &[f64]) -> Vec<ScoreFact> {
    scores.iter().enumerate().map(|(i, s)| ScoreFact::new(id, season, i as i32 + 1, *s)).collect()
}

fn find<'a>(rows: &'a [PlayerSeasonMetrics], id: &str, season: i32) -> Option<&'a PlayerSeasonMetrics> {
    rows.iter().find(|r| r.player_id == id && r.season == season)
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("expected a value");
    assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_three_game_scenario() {
        let config = EngineConfig { min_games_current: 1, min_games_historical: 1, ..create_test_config() };
        let engine = PerformanceEngine::new(config).unwrap();

        let corpus = ScoreCorpus::from_facts(season("1", 2024, &[10.0, 20.0, 30.0]));
        let directory = PlayerDirectory::from_profiles([profile("1", "WR", "Chase, Ja'Marr")]);
        let output = engine.run(&corpus, &directory);

        let row = find(&output.metrics, "1", 2024).unwrap();
        assert_eq!(row.games_played, 3);
        assert_eq!(row.mean_score, Some(20.0));
        assert_close(row.std_dev, 8.165);
        assert_close(row.consistency_score_std, 2.1822);
        assert_close(row.coefficient_variation, 0.4082);
        assert_close(row.value_score, 14.202);
        assert_eq!(row.consistency_score_trailing_5, None);
        assert_eq!(row.consistency_score_trailing_10, None);
    }

    #[test]
    fn test_season_thresholds_decide_row_presence() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();

        let mut facts = season("hist8", 2023, &[10.0; 8]);
        facts.extend(season("hist7", 2023, &[10.0; 7]));
        facts.extend(season("cur4", 2024, &[10.0; 4]));
        facts.extend(season("cur3", 2024, &[10.0; 3]));
        let corpus = ScoreCorpus::from_facts(facts);
        let directory = PlayerDirectory::from_profiles(
            ["hist8", "hist7", "cur4", "cur3"].map(|id| profile(id, "TE", id)),
        );

        let output = engine.run(&corpus, &directory);
        assert!(find(&output.metrics, "hist8", 2023).is_some());
        assert!(find(&output.metrics, "hist7", 2023).is_none());
        assert!(find(&output.metrics, "cur4", 2024).is_some());
        assert!(find(&output.metrics, "cur3", 2024).is_none());
    }

    #[test]
    fn test_prior_season_windows() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();

        let mut facts = season("1", 2022, &[6.0; 8]);
        facts.extend(season("1", 2023, &[5.0, 7.0, 5.0, 7.0, 5.0, 7.0, 5.0]));
        facts.extend(season("1", 2024, &[12.0, 14.0, 12.0, 14.0]));
        let corpus = ScoreCorpus::from_facts(facts);
        let directory = PlayerDirectory::from_profiles([profile("1", "RB", "Barkley, Saquon")]);

        let output = engine.run(&corpus, &directory);
        let row = find(&output.metrics, "1", 2024).unwrap();

        // 2023 had seven games, below the completed-season threshold
        assert_eq!(row.consistency_score_last_season, None);
        assert_eq!(row.consistency_score_2seasons_ago, Some(6.0));
        assert_eq!(row.consistency_score_std, Some(13.0 / 2.0));
        assert!(row.consistency_score_trailing_10.is_some());

        // Trailing 5: the four 2024 games plus the last 2023 game
        let expected = crate::consistency_score(&[14.0, 12.0, 14.0, 12.0, 5.0]);
        assert_eq!(row.consistency_score_trailing_5, expected);

        // The 2022 season row sees no earlier history
        let first = find(&output.metrics, "1", 2022).unwrap();
        assert_eq!(first.consistency_score_last_season, None);
        assert_eq!(first.consistency_score_trailing_10, None);
    }

    #[test]
    fn test_positions_resolved_from_directory() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();

        let mut facts = season("qb", 2024, &[20.0, 22.0, 18.0, 25.0]);
        facts.extend(season("def", 2024, &[8.0, 9.0, 10.0, 11.0]));
        facts.extend(season("ghost", 2024, &[1.0, 2.0, 3.0, 4.0]));
        facts.extend(season("nopos", 2024, &[1.0, 2.0, 3.0, 4.0]));
        let corpus = ScoreCorpus::from_facts(facts);
        let directory = PlayerDirectory::from_profiles([
            profile("qb", "QB", "Mahomes, Patrick"),
            profile("def", "TMDF", "Chiefs"),
            PlayerProfile { player_id: "nopos".to_string(), position: None, name: None },
        ]);

        let output = engine.run(&corpus, &directory);
        let ids: Vec<_> = output.metrics.iter().map(|m| m.player_id.as_str()).collect();
        assert_eq!(ids, vec!["qb"]);
    }

    #[test]
    fn test_most_recent_position_is_used_for_every_season() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();
        let tables = vec![
            season("1", 2023, &[10.0; 8])
                .into_iter()
                .map(|f| RawScoreRow::new(f.player_id, f.season, f.week, f.score))
                .collect::<Vec<_>>(),
        ];
        let players = vec![
            RawPlayerRow::new("1", 2023, "WR", "Kmet, Cole"),
            RawPlayerRow::new("1", 2024, "TE", "Kmet, Cole"),
        ];

        let output = engine.run_tables(&tables, Some(players.as_slice())).unwrap();
        assert_eq!(output.metrics[0].position, "TE");
    }

    #[test]
    fn test_cohort_indexes_after_pipeline() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();

        // Constant scorers: consistency equals the score
        let mut facts = Vec::new();
        for (id, score) in [("a", 10.0), ("b", 20.0), ("c", 30.0)] {
            facts.extend(season(id, 2024, &[score; 4]));
        }
        let corpus = ScoreCorpus::from_facts(facts);
        let directory = PlayerDirectory::from_profiles(
            ["a", "b", "c"].map(|id| profile(id, "WR", &id.to_uppercase())),
        );

        let output = engine.run(&corpus, &directory);
        let b = find(&output.metrics, "b", 2024).unwrap();
        assert_eq!(b.consistency_index_vs_avg, Some(100.0));

        // p25 of [10, 20, 30] is 15
        let a = find(&output.metrics, "a", 2024).unwrap();
        assert_close(a.consistency_index_vs_replacement, 66.667);

        // Every std-dev is zero, so there is no spread to normalize against
        assert_eq!(a.std_dev_vs_position, None);

        let summary = &output.summaries[0];
        assert_eq!(summary.num_players, 3);
        assert_eq!(summary.top_player.as_deref(), Some("C"));
        assert_eq!(summary.top_value_score, Some(30.0));
    }

    #[test]
    fn test_metrics_ordering() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();

        let mut facts = season("low", 2024, &[5.0, 6.0, 5.0, 6.0]);
        facts.extend(season("high", 2024, &[25.0, 26.0, 25.0, 26.0]));
        facts.extend(season("old", 2023, &[40.0; 8]));
        let corpus = ScoreCorpus::from_facts(facts);
        let directory =
            PlayerDirectory::from_profiles(["low", "high", "old"].map(|id| profile(id, "RB", id)));

        let output = engine.run(&corpus, &directory);
        let ids: Vec<_> = output.metrics.iter().map(|m| m.player_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low", "old"]);
    }

    #[test]
    fn test_empty_corpus_produces_empty_output() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();
        let output = engine.run(&ScoreCorpus::default(), &PlayerDirectory::default());
        assert!(output.is_empty());
        assert!(output.cohorts.is_empty());
        assert!(output.summaries.is_empty());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[test]
    fn test_zero_score_tables() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();
        let tables: Vec<Vec<RawScoreRow>> = Vec::new();
        let players = vec![RawPlayerRow::new("1", 2024, "QB", "Someone")];

        let err = engine.run_tables(&tables, Some(players.as_slice())).unwrap_err();
        assert!(matches!(err, EngineError::Corpus(CorpusError::EmptyCorpus(_))));
        assert!(err.to_string().contains("No score tables found"));
    }

    #[test]
    fn test_missing_directory() {
        let engine = PerformanceEngine::new(create_test_config()).unwrap();
        let tables = vec![vec![RawScoreRow::new("1", 2024, 1, 10.0)]];

        let err = engine.run_tables(&tables, None).unwrap_err();
        assert!(matches!(err, EngineError::Corpus(CorpusError::MissingDirectory(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig { cohort_min_games: 0, ..create_test_config() };
        assert!(matches!(PerformanceEngine::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_concurrent_runs_with_different_settings() {
        let facts = season("1", 2023, &[10.0, 12.0, 14.0, 16.0, 18.0]);
        let corpus = ScoreCorpus::from_facts(facts);
        let directory = PlayerDirectory::from_profiles([profile("1", "QB", "Burrow, Joe")]);

        let strict = PerformanceEngine::new(create_test_config()).unwrap();
        let relaxed = PerformanceEngine::new(EngineConfig {
            min_games_historical: 5,
            ..create_test_config()
        })
        .unwrap();

        let (strict_out, relaxed_out) = std::thread::scope(|s| {
            let a = s.spawn(|| strict.run(&corpus, &directory));
            let b = s.spawn(|| relaxed.run(&corpus, &directory));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert!(strict_out.is_empty());
        assert_eq!(relaxed_out.metrics.len(), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::{consistency_score, value_score, BasicStats};
    use proptest::prelude::*;

    const POSITIONS: [&str; 3] = ["QB", "RB", "WR"];

    fn fact_strategy() -> impl Strategy<Value = ScoreFact> {
        (0u8..8, 2020i32..2025, 1i32..=18, -5.0f64..45.0)
            .prop_map(|(player, season, week, score)| ScoreFact::new(player.to_string(), season, week, score))
    }

    proptest! {
        #[test]
        fn short_lists_have_no_scores(scores in prop::collection::vec(-10.0f64..50.0, 0..2)) {
            let stats = BasicStats::from_scores(&scores);
            prop_assert_eq!(stats.games_played, scores.len());
            prop_assert_eq!(consistency_score(&scores), None);
            prop_assert_eq!(value_score(stats.mean_score, stats.coefficient_variation), None);
        }

        #[test]
        fn constant_lists_have_no_spread(value in -20.0f64..60.0, n in 2usize..20) {
            let scores = vec![value; n];
            let stats = BasicStats::from_scores(&scores);
            let std_dev = stats.std_dev.unwrap();
            prop_assert!(std_dev.abs() < 1e-9);
            let consistency = consistency_score(&scores).unwrap();
            prop_assert!((consistency - value).abs() < 1e-9);
        }

        #[test]
        fn per_season_tables_rebuild_all_seasons(facts in prop::collection::vec(fact_strategy(), 0..300)) {
            let config = EngineConfig {
                min_games_historical: 3,
                min_games_current: 2,
                ..EngineConfig::for_season(2024)
            };
            let engine = PerformanceEngine::new(config).unwrap();
            let corpus = ScoreCorpus::from_facts(facts);
            let directory = PlayerDirectory::from_profiles(
                (0u8..8).map(|p| profile(&p.to_string(), POSITIONS[p as usize % 3], "P")),
            );

            let output = engine.run(&corpus, &directory);

            let key = |r: &PlayerSeasonMetrics| (r.season, r.player_id.clone());
            let mut rebuilt: Vec<_> = output.metrics_by_season().into_values().flatten().collect();
            let mut all = output.metrics.clone();
            rebuilt.sort_by_key(key);
            all.sort_by_key(key);
            prop_assert_eq!(rebuilt, all);

            for row in &output.metrics {
                prop_assert!(row.games_played >= engine.config().min_games_for(row.season));
                if row.games_played < engine.config().cohort_min_games {
                    prop_assert!(row.std_dev_vs_position.is_none());
                    prop_assert!(row.consistency_index_vs_avg.is_none());
                }
            }

            for summary in &output.summaries {
                let limit = engine.config().roster_limits.limit_for(&summary.position);
                prop_assert!(summary.num_players <= limit);
            }
        }
    }
}
