// Valuation engine: percentage adjustment, positional normalization,
// g-scores, slot aggregation, punting and auction salaries.

pub mod gscore;
pub mod percentage;
pub mod positional;
pub mod power;
pub mod punt;
pub mod salary;
pub mod slots;
pub mod zscore;

use std::fmt;

use crate::config::ConfigError;
use crate::position::Position;
use crate::stats::DataShapeError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Anything that aborts a valuation run for a partition.
#[derive(Debug, thiserror::Error)]
pub enum ValuationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    #[error("auction budget exhausted: {total} total, {sunk} already spent on drafted players")]
    BudgetExhausted { total: f64, sunk: f64 },

    #[error("salary ratio undefined: top auction pool has total value {pool_value}")]
    UndefinedSalaryRatio { pool_value: f64 },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Conditions worth reporting that do not abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValuationWarning {
    /// A position group had fewer than two distinct values for a category,
    /// so the category was set to 0 for that group.
    DegenerateGroup {
        position: Position,
        category: String,
        players: usize,
    },
    /// A blacklisted player does not appear in the dataset.
    BlacklistedPlayerMissing { player: String },
}

impl fmt::Display for ValuationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuationWarning::DegenerateGroup {
                position,
                category,
                players,
            } => write!(
                f,
                "degenerate group: {category} at {position} ({players} players) standardized to 0"
            ),
            ValuationWarning::BlacklistedPlayerMissing { player } => {
                write!(f, "blacklisted player `{player}` not found in dataset")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// A player's row duplicated for one eligible roster position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplodedRow {
    pub player: String,
    pub team: String,
    /// Raw eligibility string of the source row.
    pub positions: String,
    pub position: Position,
    pub games_played: f64,
    pub values: Vec<f64>,
}

/// Standardized category values, one row per (player, eligible position).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub categories: Vec<String>,
    pub rows: Vec<ExplodedRow>,
    pub warnings: Vec<ValuationWarning>,
}

/// G-scored row for one (player, position) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalValueRow {
    pub row: ExplodedRow,
    /// Sum of the row's category g-scores.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionalValueTable {
    pub categories: Vec<String>,
    pub rows: Vec<PositionalValueRow>,
}

/// One row per player with per-category values and an aggregate VALUE.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub player: String,
    pub team: String,
    pub positions: String,
    pub games_played: f64,
    pub values: Vec<f64>,
    pub value: f64,
}

/// Per-player values. Also the shape of the punt exposure and punt
/// z-score tables, where each category column holds the punt figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    pub categories: Vec<String>,
    pub rows: Vec<ValueRow>,
}

impl ValueTable {
    pub fn find(&self, player: &str) -> Option<&ValueRow> {
        self.rows.iter().find(|r| r.player == player)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRow {
    pub row: ValueRow,
    pub salary: f64,
}

/// Auction prices for every undrafted player, sorted by VALUE descending.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryTable {
    pub categories: Vec<String>,
    pub rows: Vec<SalaryRow>,
    /// League budget left after blacklist spend.
    pub remaining_budget: f64,
    /// Number of players whose VALUE set the price per unit of value.
    pub auction_pool: usize,
}
