//! CSV table loading
//!
//! Columns are matched by header name, so a table missing a column simply
//! yields `None` for it. All cells are read as text and coerced later by the
//! corpus builder and directory resolver.

use crate::error::{CorpusError, Result};
use crate::types::{RawPlayerRow, RawScoreRow, RawValue};
use csv::StringRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of per-season score exports
pub const SCORE_FILE_PREFIX: &str = "playerScores_";

/// Find the yearly score tables in a directory
///
/// Weekly files (`playerScores_2024_w3.csv`) are skipped; only the yearly
/// rollups are loaded. Paths are returned sorted.
pub fn discover_score_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CorpusError::EmptyCorpus(format!(
            "score directory {} does not exist",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|source| CorpusError::Io { path: dir.display().to_string(), source })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|source| CorpusError::Io { path: dir.display().to_string(), source })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(SCORE_FILE_PREFIX) && name.ends_with(".csv") && !name.contains("_w") {
            paths.push(entry.path());
        }
    }
    paths.sort();

    debug!("Found {} yearly score tables in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Load every yearly score table in a directory
pub fn load_score_tables(dir: &Path) -> Result<Vec<Vec<RawScoreRow>>> {
    let paths = discover_score_tables(dir)?;
    let tables = paths.iter().map(|p| read_score_table(p)).collect::<Result<Vec<_>>>()?;
    info!(
        "Loaded {} score rows from {} tables",
        tables.iter().map(Vec::len).sum::<usize>(),
        tables.len()
    );
    Ok(tables)
}

/// Read one score table
pub fn read_score_table(path: &Path) -> Result<Vec<RawScoreRow>> {
    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|source| csv_error(path, source))?.clone();

    let id = column(&headers, &["id", "player_id"]);
    let season = column(&headers, &["season"]);
    let week = column(&headers, &["week"]);
    let score = column(&headers, &["score"]);
    let is_available = column(&headers, &["isAvailable"]);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        rows.push(RawScoreRow {
            id: cell(&record, id),
            season: cell(&record, season),
            week: cell(&record, week),
            score: cell(&record, score),
            is_available: cell(&record, is_available),
        });
    }
    Ok(rows)
}

/// Read the multi-year player directory table
///
/// A missing file is reported as [`CorpusError::MissingDirectory`].
pub fn read_player_table(path: &Path) -> Result<Vec<RawPlayerRow>> {
    if !path.exists() {
        return Err(CorpusError::MissingDirectory(path.display().to_string()));
    }

    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|source| csv_error(path, source))?.clone();

    let id = column(&headers, &["id", "player_id"]);
    let year = column(&headers, &["year"]);
    let position = column(&headers, &["position"]);
    let name = column(&headers, &["name"]);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        rows.push(RawPlayerRow {
            id: cell(&record, id),
            year: cell(&record, year),
            position: text(&record, position),
            name: text(&record, name),
        });
    }

    info!("Loaded {} player directory rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> CorpusError {
    CorpusError::Csv { path: path.display().to_string(), source }
}

fn column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

fn text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn cell(record: &StringRecord, idx: Option<usize>) -> Option<RawValue> {
    text(record, idx).map(RawValue::Text)
}
