//! # Command Line Interface
//!
//! Batch runner: load score and player tables, run the engine, write CSVs.

use crate::config::EngineConfig;
use crate::engine::PerformanceEngine;
use crate::export::write_output;
use crate::logging::{initialize_logging, initialize_logging_with_config};
use crate::models::EngineOutput;
use anyhow::{Context, Result};
use clap::Parser;
use score_corpus::{loader, PlayerDirectory, ScoreCorpus};
use std::path::PathBuf;
use tracing::info;

/// Player consistency and value metrics calculator
#[derive(Parser, Debug)]
#[command(name = "performance-engine")]
#[command(about = "Per-player consistency, value and position summaries from weekly fantasy scores")]
pub struct Cli {
    /// Directory containing playerScores_{YEAR}.csv tables
    #[arg(long, default_value = "data/playerScores")]
    pub scores_dir: PathBuf,

    /// Multi-year player directory table
    #[arg(long, default_value = "data/players/players_all.csv")]
    pub players: PathBuf,

    /// Directory for output tables
    #[arg(short, long, default_value = "data/performance")]
    pub out_dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Season in progress (overrides config and environment)
    #[arg(long)]
    pub current_season: Option<i32>,

    /// Minimum games for completed seasons
    #[arg(long)]
    pub min_games_historical: Option<usize>,

    /// Minimum games for the season in progress
    #[arg(long)]
    pub min_games_current: Option<usize>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG applies when omitted
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long)]
    pub log_format: Option<String>,
}

impl Cli {
    /// Install the tracing subscriber the flags ask for
    pub fn init_logging(&self) -> Result<()> {
        match (&self.log_level, &self.log_format) {
            (None, None) => initialize_logging(),
            (level, format) => initialize_logging_with_config(
                level.as_deref().unwrap_or("info"),
                format.as_deref().unwrap_or("compact"),
            ),
        }
    }

    /// Resolve configuration: defaults, then file, then environment, then flags
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        config.apply_env()?;

        if let Some(season) = self.current_season {
            config.current_season = season;
        }
        if let Some(games) = self.min_games_historical {
            config.min_games_historical = games;
        }
        if let Some(games) = self.min_games_current {
            config.min_games_current = games;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the batch end to end
pub fn run(cli: &Cli) -> Result<EngineOutput> {
    let config = cli.engine_config()?;
    info!("Current season: {}", config.current_season);

    let tables = loader::load_score_tables(&cli.scores_dir)
        .with_context(|| format!("Failed to load scores from {}", cli.scores_dir.display()))?;
    let corpus = ScoreCorpus::build(&tables)?;

    let players = loader::read_player_table(&cli.players)
        .with_context(|| "Run the players ingest first".to_string())?;
    let directory = PlayerDirectory::resolve(Some(players.as_slice()))?;

    let engine = PerformanceEngine::new(config)?;
    let output = engine.run(&corpus, &directory);

    if output.is_empty() {
        info!("No data to process; make sure score and player tables exist");
        return Ok(output);
    }

    write_output(&cli.out_dir, &output)
        .with_context(|| format!("Failed to write results to {}", cli.out_dir.display()))?;

    report(engine.config(), &output);
    Ok(output)
}

fn report(config: &EngineConfig, output: &EngineOutput) {
    let seasons = output.seasons();
    if let (Some(first), Some(last)) = (seasons.first(), seasons.last()) {
        info!("Seasons covered: {} - {}", first, last);

        info!("Top 10 players by value score in {}:", last);
        for m in output.top_by_value(*last, 10) {
            info!(
                "  {:<28} {:<4} games {:>2}  mean {:>6.2}  consistency {:>6.2}  value {:>6.2}",
                m.player_name.as_deref().unwrap_or("Unknown"),
                m.position,
                m.games_played,
                m.mean_score.unwrap_or_default(),
                m.consistency_score_std.unwrap_or_default(),
                m.value_score.unwrap_or_default(),
            );
        }
    }

    info!("Replacement level configuration:");
    for (position, limit) in &config.roster_limits.limits {
        let available = output.metrics.iter().filter(|m| &m.position == position).count();
        if available > 0 {
            info!("  {:<4}: top {:>3} players (total available: {})", position, limit, available);
        }
    }

    for summary in output.summaries.iter().filter(|s| Some(&s.season) == seasons.last()) {
        info!(
            "  {:<4} players {:>3}  avg mean {:>6.2}  avg value {:>6.2}  top {}",
            summary.position,
            summary.num_players,
            summary.avg_mean_score.unwrap_or_default(),
            summary.avg_value_score.unwrap_or_default(),
            summary.top_player.as_deref().unwrap_or("-"),
        );
    }
}
