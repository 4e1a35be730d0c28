// CSV export of published tables.
//
// Layout: `<output_dir>/<partition stem>/<table name>.csv`, with the dataset's
// metadata column names, then one column per category, then VALUE and SALARY
// where the table carries them. A run is staged in a sibling directory and
// renamed into place, so a partition's directory always holds one whole run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hoopcast_core::config::MetadataColumns;
use hoopcast_core::pipeline::{PipelineOutput, PublishedTable};

pub const VALUE_COLUMN: &str = "VALUE";
pub const SALARY_COLUMN: &str = "SALARY";

fn header(table: &PublishedTable, metadata: &MetadataColumns) -> Vec<String> {
    let mut header: Vec<String> = metadata.names().iter().map(|s| s.to_string()).collect();
    header.extend(table.categories.iter().cloned());
    if table.has_value() {
        header.push(VALUE_COLUMN.into());
    }
    if table.has_salary() {
        header.push(SALARY_COLUMN.into());
    }
    header
}

/// Write one table into `dir`, returning the file path.
pub fn write_table(dir: &Path, table: &PublishedTable, metadata: &MetadataColumns) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", table.name));
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    wtr.write_record(header(table, metadata))
        .with_context(|| format!("failed to write header of {}", table.name))?;

    for row in &table.rows {
        let mut record = vec![
            row.player.clone(),
            row.team.clone(),
            row.position.clone(),
            row.games_played.to_string(),
        ];
        record.extend(row.values.iter().map(|v| v.to_string()));
        if table.has_value() {
            record.push(row.value.map(|v| v.to_string()).unwrap_or_default());
        }
        if table.has_salary() {
            record.push(row.salary.map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)
            .with_context(|| format!("failed to write {} row for {}", table.name, row.player))?;
    }

    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(path)
}

/// A run's tables written to a staging directory next to their final one.
///
/// Nothing is visible under `<output_dir>/<stem>/` until [`publish`] renames
/// the staging directory into place.
///
/// [`publish`]: StagedExport::publish
#[derive(Debug)]
pub struct StagedExport {
    staging: PathBuf,
    target: PathBuf,
    files: Vec<PathBuf>,
}

/// Write every table of a run into `<output_dir>/.<stem>.partial/`.
pub fn stage_output(
    output_dir: &Path,
    stem: &str,
    output: &PipelineOutput,
    metadata: &MetadataColumns,
) -> Result<StagedExport> {
    let staging = output_dir.join(format!(".{stem}.partial"));
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .with_context(|| format!("failed to clear {}", staging.display()))?;
    }
    std::fs::create_dir_all(&staging)
        .with_context(|| format!("failed to create export directory {}", staging.display()))?;

    let written: Result<Vec<PathBuf>> = output
        .tables()
        .iter()
        .map(|table| write_table(&staging, table, metadata))
        .collect();
    match written {
        Ok(files) => Ok(StagedExport {
            staging,
            target: output_dir.join(stem),
            files,
        }),
        Err(e) => {
            let _ = std::fs::remove_dir_all(&staging);
            Err(e)
        }
    }
}

impl StagedExport {
    /// Replace `<output_dir>/<stem>/` with the staged tables.
    pub fn publish(self) -> Result<Vec<PathBuf>> {
        if self.target.exists() {
            std::fs::remove_dir_all(&self.target)
                .with_context(|| format!("failed to remove {}", self.target.display()))?;
        }
        std::fs::rename(&self.staging, &self.target).with_context(|| {
            format!(
                "failed to move {} to {}",
                self.staging.display(),
                self.target.display()
            )
        })?;
        Ok(self
            .files
            .iter()
            .filter_map(|f| f.file_name())
            .map(|name| self.target.join(name))
            .collect())
    }

    /// Drop the staged tables without publishing them.
    pub fn discard(self) {
        let _ = std::fs::remove_dir_all(&self.staging);
    }
}
