// Partition discovery: one CSV file per season snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A raw dataset keyed by its file name (e.g. `2024.csv`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: String,
    pub path: PathBuf,
}

impl Partition {
    /// File name without the extension, used for the export directory.
    pub fn stem(&self) -> &str {
        Path::new(&self.key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.key)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Every `*.csv` file directly under `data_dir`, sorted by key.
pub fn discover(data_dir: &Path) -> Result<Vec<Partition>> {
    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("failed to read data directory {}", data_dir.display()))?;

    let mut partitions = Vec::new();
    for entry in entries {
        let entry = entry.context("failed to read data directory entry")?;
        let path = entry.path();
        if !path.is_file() || !is_csv(&path) {
            continue;
        }
        let Some(key) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        partitions.push(Partition {
            key: key.to_string(),
            path: path.clone(),
        });
    }
    partitions.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(partitions)
}
