//! CSV export of engine output
//!
//! Every table is written once per season and once for all seasons.

use crate::error::{EngineError, Result};
use crate::models::{partition_by_season, EngineOutput, SeasonRow};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write all output tables into `out_dir`, returning the files written
pub fn write_output(out_dir: &Path, output: &EngineOutput) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .map_err(|source| EngineError::Io { path: out_dir.display().to_string(), source })?;

    let mut written = Vec::new();
    written.extend(write_by_season(out_dir, "consistency", &output.metrics)?);
    written.extend(write_by_season(out_dir, "consistency_replacement_level", &output.cohorts)?);
    written.extend(write_by_season(out_dir, "position_summary", &output.summaries)?);

    info!("Wrote {} output files to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Write `{stem}_{season}.csv` per season and `{stem}_all.csv`
pub fn write_by_season<T>(out_dir: &Path, stem: &str, rows: &[T]) -> Result<Vec<PathBuf>>
where
    T: SeasonRow + Serialize + Clone,
{
    let mut written = Vec::new();

    for (season, season_rows) in partition_by_season(rows) {
        let path = out_dir.join(format!("{stem}_{season}.csv"));
        write_table(&path, &season_rows)?;
        written.push(path);
    }

    let path = out_dir.join(format!("{stem}_all.csv"));
    write_table(&path, rows)?;
    written.push(path);

    Ok(written)
}

/// Write one table with a header row
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let csv_error = |source| EngineError::Csv { path: path.display().to_string(), source };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|source| EngineError::Io { path: path.display().to_string(), source })?;

    info!("Saved {} ({} rows)", path.display(), rows.len());
    Ok(())
}
