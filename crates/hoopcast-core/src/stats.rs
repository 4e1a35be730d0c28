// Raw season statistics: table types and CSV ingestion.
//
// One CSV file is one partition (a snapshot of the season's projections).
// Columns are located by header name, so extra columns are ignored and
// column order does not matter.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::FantasyConfig;
use crate::valuation::percentage::ShootingStat;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player's raw statistics for a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub player: String,
    pub team: String,
    /// Raw eligibility string as published, e.g. "PG/SG".
    pub positions: String,
    pub games_played: f64,
    /// Category values aligned with `StatTable::categories`.
    pub values: Vec<f64>,
    /// Field-goal attempts (0 when FG% is not a configured category).
    pub fga: f64,
    /// Free-throw attempts (0 when FT% is not a configured category).
    pub fta: f64,
}

/// Raw statistics for every player in a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    pub categories: Vec<String>,
    pub rows: Vec<StatRow>,
}

impl StatTable {
    /// All values of one category, in row order.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.values[index]).collect()
    }

    /// Check that the categories are the scoring format's, in its order, and
    /// that every row carries one value per category.
    pub fn check_shape(&self, config: &FantasyConfig) -> Result<(), DataShapeError> {
        let expected = config.category_names();
        if self.categories != expected {
            if let Some(missing) = expected.iter().find(|c| !self.categories.contains(c)) {
                return Err(DataShapeError::MissingColumn {
                    column: missing.clone(),
                });
            }
            return Err(DataShapeError::CategoryMismatch {
                expected,
                found: self.categories.clone(),
            });
        }
        if let Some(row) = self.rows.iter().find(|r| r.values.len() != expected.len()) {
            return Err(DataShapeError::RowWidth {
                player: row.player.clone(),
                expected: expected.len(),
                found: row.values.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// The dataset does not have the shape the pipeline needs. A run that hits
/// one of these publishes nothing for the partition.
#[derive(Debug, thiserror::Error)]
pub enum DataShapeError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("required column `{column}` is missing")]
    MissingColumn { column: String },

    #[error("categories {found:?} do not match the scoring format {expected:?}")]
    CategoryMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("player `{player}` has {found} category values, expected {expected}")]
    RowWidth {
        player: String,
        expected: usize,
        found: usize,
    },

    #[error("player `{player}`: column `{column}` has invalid value `{value}`")]
    InvalidValue {
        player: String,
        column: String,
        value: String,
    },

    #[error("player `{player}` appears more than once")]
    DuplicatePlayer { player: String },

    #[error("player `{player}`: unknown position `{tag}`")]
    UnknownPosition { player: String, tag: String },

    #[error("player `{player}` has no eligible roster position")]
    NoEligiblePositions { player: String },

    #[error("dataset contains no players")]
    EmptyDataset,

    #[error("player `{player}` is missing from the punt table")]
    MissingPuntRow { player: String },
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

struct ColumnLayout {
    player: usize,
    team: usize,
    position: usize,
    games_played: usize,
    categories: Vec<usize>,
    fga: Option<usize>,
    fta: Option<usize>,
}

impl ColumnLayout {
    fn from_headers(
        headers: &csv::StringRecord,
        config: &FantasyConfig,
    ) -> Result<Self, DataShapeError> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let require = |column: &str| {
            index
                .get(column)
                .copied()
                .ok_or_else(|| DataShapeError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let meta = &config.metadata;
        let categories = config
            .categories
            .iter()
            .map(|c| require(&c.name))
            .collect::<Result<Vec<_>, _>>()?;

        // Attempts are only needed when the matching percentage is scored.
        let attempts = |stat: ShootingStat| -> Result<Option<usize>, DataShapeError> {
            if config.category_index(stat.category()).is_some() {
                require(stat.attempts_column()).map(Some)
            } else {
                Ok(None)
            }
        };

        Ok(ColumnLayout {
            player: require(&meta.player)?,
            team: require(&meta.team)?,
            position: require(&meta.position)?,
            games_played: require(&meta.games_played)?,
            categories,
            fga: attempts(ShootingStat::FieldGoal)?,
            fta: attempts(ShootingStat::FreeThrow)?,
        })
    }
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    player: &str,
    column: &str,
) -> Result<f64, DataShapeError> {
    let raw = record.get(index).unwrap_or("").trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DataShapeError::InvalidValue {
            player: player.to_string(),
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn read_table<R: Read>(
    rdr: R,
    config: &FantasyConfig,
    source: &str,
) -> Result<StatTable, DataShapeError> {
    let csv_error = |e: csv::Error| DataShapeError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let layout = ColumnLayout::from_headers(&headers, config)?;
    let meta = &config.metadata;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let player = record.get(layout.player).unwrap_or("").trim().to_string();
        if player.is_empty() {
            return Err(DataShapeError::InvalidValue {
                player: format!("<row {}>", rows.len() + 1),
                column: meta.player.clone(),
                value: String::new(),
            });
        }
        if !seen.insert(player.clone()) {
            return Err(DataShapeError::DuplicatePlayer { player });
        }

        let values = config
            .categories
            .iter()
            .zip(&layout.categories)
            .map(|(category, &i)| parse_number(&record, i, &player, &category.name))
            .collect::<Result<Vec<_>, _>>()?;

        let attempts = |column: Option<usize>, stat: ShootingStat| match column {
            Some(i) => parse_number(&record, i, &player, stat.attempts_column()),
            None => Ok(0.0),
        };

        rows.push(StatRow {
            team: record.get(layout.team).unwrap_or("").trim().to_string(),
            positions: record.get(layout.position).unwrap_or("").trim().to_string(),
            games_played: parse_number(&record, layout.games_played, &player, &meta.games_played)?,
            values,
            fga: attempts(layout.fga, ShootingStat::FieldGoal)?,
            fta: attempts(layout.fta, ShootingStat::FreeThrow)?,
            player,
        });
    }

    if rows.is_empty() {
        return Err(DataShapeError::EmptyDataset);
    }

    debug!("read {} players from {}", rows.len(), source);
    Ok(StatTable {
        categories: config.category_names(),
        rows,
    })
}

/// Read a partition from any reader (used by tests and in-memory sources).
pub fn load_stats_from_reader<R: Read>(
    rdr: R,
    config: &FantasyConfig,
) -> Result<StatTable, DataShapeError> {
    read_table(rdr, config, "<reader>")
}

/// Read a partition from a CSV file.
pub fn load_stats(path: &Path, config: &FantasyConfig) -> Result<StatTable, DataShapeError> {
    let file = std::fs::File::open(path).map_err(|e| DataShapeError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_table(file, config, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
