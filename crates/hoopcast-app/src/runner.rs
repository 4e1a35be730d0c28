// Batch driver: load the effective scoring format, then run, store and
// export every partition.
//
// A partition that fails publishes nothing and is reported; the remaining
// partitions still run.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use hoopcast_core::config::{load_config_from, load_overrides, FantasyConfig};
use hoopcast_core::db::Database;
use hoopcast_core::pipeline::{self, PipelineOutput};
use hoopcast_core::stats::load_stats;

use crate::export::stage_output;
use crate::partitions::Partition;
use crate::settings::Settings;

/// Outcome of a batch over all partitions.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    /// Partition key and the rendered error chain.
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// League file with the configured overrides applied.
pub fn load_effective_config(settings: &Settings) -> Result<FantasyConfig> {
    let base = load_config_from(&settings.league_path)
        .with_context(|| format!("failed to load {}", settings.league_path.display()))?;

    let Some(overrides_path) = &settings.overrides_path else {
        return Ok(base);
    };
    if !overrides_path.exists() {
        warn!(
            "overrides file {} not found, using the league file as is",
            overrides_path.display()
        );
        return Ok(base);
    }
    let overrides = load_overrides(overrides_path)?;
    let config = base
        .with_overrides(&overrides)
        .with_context(|| format!("invalid overrides in {}", overrides_path.display()))?;
    info!("applied overrides from {}", overrides_path.display());
    Ok(config)
}

/// Value one partition, replace its stored tables and write its CSV export.
///
/// The export is staged before the store is written. A failure up to the
/// store commit leaves the previous store contents and export in place.
pub fn run_partition(
    partition: &Partition,
    config: &FantasyConfig,
    db: &Database,
    output_dir: &Path,
) -> Result<PipelineOutput> {
    let stats = load_stats(&partition.path, config)?;
    info!("{}: loaded {} players", partition.key, stats.rows.len());

    let output = pipeline::run(&stats, config)
        .with_context(|| format!("valuation failed for {}", partition.key))?;

    let staged = stage_output(output_dir, partition.stem(), &output, &config.metadata)?;
    if let Err(e) = db.save_output(&partition.key, &output, config) {
        staged.discard();
        return Err(e);
    }
    let files = staged.publish()?;
    info!(
        "{}: published {} tables ({} warnings)",
        partition.key,
        files.len(),
        output.warnings.len()
    );
    Ok(output)
}

/// Run every partition, continuing past failures.
pub fn run_all(
    partitions: &[Partition],
    config: &FantasyConfig,
    db: &Database,
    output_dir: &Path,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for partition in partitions {
        match run_partition(partition, config, db, output_dir) {
            Ok(_) => summary.succeeded.push(partition.key.clone()),
            Err(e) => {
                error!("{}: {e:#}", partition.key);
                summary.failed.push((partition.key.clone(), format!("{e:#}")));
            }
        }
    }
    summary
}
