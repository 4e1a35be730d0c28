// Valuation pipeline: raw stats in, every published table out.
//
// Stages run in a fixed order and each returns a new table. The function is
// pure in its inputs, so re-running a partition with the same stats and
// config reproduces the same output.

use std::fmt;

use tracing::{info, warn};

use crate::config::FantasyConfig;
use crate::stats::StatTable;
use crate::valuation::gscore::{g_score_table, g_score_undrafted};
use crate::valuation::percentage::adjust_percentages;
use crate::valuation::positional::normalize;
use crate::valuation::punt::{apply_punt_adjustment, punt_exposure, punt_zscores};
use crate::valuation::salary::allocate_salaries;
use crate::valuation::slots::{aggregate, SlotPolicy};
use crate::valuation::{
    NormalizedTable, PositionalValueTable, SalaryTable, ValuationError, ValuationWarning,
    ValueRow, ValueTable,
};

// ---------------------------------------------------------------------------
// Table names
// ---------------------------------------------------------------------------

/// The tables a run publishes for a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    NormalisedData,
    PositionalValueData,
    BlPositionalValueData,
    ValueData,
    BlValueData,
    PuntData,
    PuntValue,
    SalaryData,
}

impl TableName {
    pub const ALL: [TableName; 8] = [
        TableName::NormalisedData,
        TableName::PositionalValueData,
        TableName::BlPositionalValueData,
        TableName::ValueData,
        TableName::BlValueData,
        TableName::PuntData,
        TableName::PuntValue,
        TableName::SalaryData,
    ];

    /// Stable name used as storage key and export file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::NormalisedData => "normalised_data",
            TableName::PositionalValueData => "positional_value_data",
            TableName::BlPositionalValueData => "bl_positional_value_data",
            TableName::ValueData => "value_data",
            TableName::BlValueData => "bl_value_data",
            TableName::PuntData => "punt_data",
            TableName::PuntValue => "punt_value",
            TableName::SalaryData => "salary_data",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TableName::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Every table derived from one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub normalised: NormalizedTable,
    pub positional_values: PositionalValueTable,
    pub bl_positional_values: PositionalValueTable,
    pub values: ValueTable,
    pub bl_values: ValueTable,
    pub punt_data: ValueTable,
    pub punt_value: ValueTable,
    pub salaries: SalaryTable,
    pub warnings: Vec<ValuationWarning>,
}

/// A uniform row view over any published table.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRow {
    pub player: String,
    pub team: String,
    /// Resolved position for positional tables, raw eligibility otherwise.
    pub position: String,
    pub games_played: f64,
    pub values: Vec<f64>,
    pub value: Option<f64>,
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedTable {
    pub name: TableName,
    pub categories: Vec<String>,
    pub rows: Vec<PublishedRow>,
}

impl PublishedTable {
    pub fn has_value(&self) -> bool {
        self.name != TableName::NormalisedData
    }

    pub fn has_salary(&self) -> bool {
        self.name == TableName::SalaryData
    }
}

fn positional_rows(table: &PositionalValueTable) -> Vec<PublishedRow> {
    table
        .rows
        .iter()
        .map(|r| PublishedRow {
            player: r.row.player.clone(),
            team: r.row.team.clone(),
            position: r.row.position.to_string(),
            games_played: r.row.games_played,
            values: r.row.values.clone(),
            value: Some(r.value),
            salary: None,
        })
        .collect()
}

fn value_row(row: &ValueRow) -> PublishedRow {
    PublishedRow {
        player: row.player.clone(),
        team: row.team.clone(),
        position: row.positions.clone(),
        games_played: row.games_played,
        values: row.values.clone(),
        value: Some(row.value),
        salary: None,
    }
}

fn value_rows(table: &ValueTable) -> Vec<PublishedRow> {
    table.rows.iter().map(value_row).collect()
}

impl PipelineOutput {
    /// Row view of one named table.
    pub fn table(&self, name: TableName) -> PublishedTable {
        let (categories, rows): (&Vec<String>, Vec<PublishedRow>) = match name {
            TableName::NormalisedData => (
                &self.normalised.categories,
                self.normalised
                    .rows
                    .iter()
                    .map(|r| PublishedRow {
                        player: r.player.clone(),
                        team: r.team.clone(),
                        position: r.position.to_string(),
                        games_played: r.games_played,
                        values: r.values.clone(),
                        value: None,
                        salary: None,
                    })
                    .collect(),
            ),
            TableName::PositionalValueData => (
                &self.positional_values.categories,
                positional_rows(&self.positional_values),
            ),
            TableName::BlPositionalValueData => (
                &self.bl_positional_values.categories,
                positional_rows(&self.bl_positional_values),
            ),
            TableName::ValueData => (&self.values.categories, value_rows(&self.values)),
            TableName::BlValueData => (&self.bl_values.categories, value_rows(&self.bl_values)),
            TableName::PuntData => (&self.punt_data.categories, value_rows(&self.punt_data)),
            TableName::PuntValue => (&self.punt_value.categories, value_rows(&self.punt_value)),
            TableName::SalaryData => (
                &self.salaries.categories,
                self.salaries
                    .rows
                    .iter()
                    .map(|r| PublishedRow {
                        salary: Some(r.salary),
                        ..value_row(&r.row)
                    })
                    .collect(),
            ),
        };
        PublishedTable {
            name,
            categories: categories.clone(),
            rows,
        }
    }

    /// Row views of every table, in publication order.
    pub fn tables(&self) -> Vec<PublishedTable> {
        TableName::ALL.iter().map(|&name| self.table(name)).collect()
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run every stage over one partition's stats.
pub fn run(stats: &StatTable, config: &FantasyConfig) -> Result<PipelineOutput, ValuationError> {
    stats.check_shape(config)?;

    let mut warnings: Vec<ValuationWarning> = config
        .blacklist
        .keys()
        .filter(|player| !stats.rows.iter().any(|r| &r.player == *player))
        .map(|player| ValuationWarning::BlacklistedPlayerMissing {
            player: player.clone(),
        })
        .collect();
    for warning in &warnings {
        warn!("{warning}");
    }

    let adjusted = adjust_percentages(stats, config);

    let normalised = normalize(&adjusted, config)?;
    info!(
        "normalized {} players into {} position rows",
        stats.rows.len(),
        normalised.rows.len()
    );
    warnings.extend(normalised.warnings.iter().cloned());

    let positional_values = g_score_table(&normalised, config);
    let bl_positional_values = g_score_undrafted(&normalised, config);

    let values = aggregate(&positional_values, config, SlotPolicy::Open);
    let bl_values = aggregate(&bl_positional_values, config, SlotPolicy::BenchBlended);
    info!(
        "valued {} players ({} undrafted)",
        values.rows.len(),
        bl_values.rows.len()
    );

    let punt_data = punt_exposure(&values);
    let punt_value = punt_zscores(&punt_data);
    let punted = apply_punt_adjustment(&bl_values, &punt_value, config)?;

    let salaries = allocate_salaries(&punted, config)?;
    info!(
        "priced {} players from ${:.0} remaining across a pool of {}",
        salaries.rows.len(),
        salaries.remaining_budget,
        salaries.auction_pool
    );

    Ok(PipelineOutput {
        normalised,
        positional_values,
        bl_positional_values,
        values,
        bl_values,
        punt_data,
        punt_value,
        salaries,
        warnings,
    })
}
