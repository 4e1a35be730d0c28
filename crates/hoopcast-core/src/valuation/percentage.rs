// Volume-weighted shooting percentages.
//
// A raw percentage is not comparable between a player taking 3 shots a game
// and one taking 20. Weighting the distance from a team baseline by attempts
// turns it into an additive quantity that sums like a counting stat.

use crate::config::FantasyConfig;
use crate::stats::{StatRow, StatTable};

/// Shooting percentages with an attempts column and a team baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingStat {
    FieldGoal,
    FreeThrow,
}

impl ShootingStat {
    pub const ALL: [ShootingStat; 2] = [ShootingStat::FieldGoal, ShootingStat::FreeThrow];

    /// Category name of the percentage column.
    pub fn category(&self) -> &'static str {
        match self {
            ShootingStat::FieldGoal => "FG%",
            ShootingStat::FreeThrow => "FT%",
        }
    }

    /// Column holding the attempts that weight this percentage.
    pub fn attempts_column(&self) -> &'static str {
        match self {
            ShootingStat::FieldGoal => "FGA",
            ShootingStat::FreeThrow => "FTA",
        }
    }

    pub fn attempts(&self, row: &StatRow) -> f64 {
        match self {
            ShootingStat::FieldGoal => row.fga,
            ShootingStat::FreeThrow => row.fta,
        }
    }

    /// Configured team baseline (0 = unset).
    pub fn team_baseline(&self, config: &FantasyConfig) -> f64 {
        match self {
            ShootingStat::FieldGoal => config.team_fg,
            ShootingStat::FreeThrow => config.team_ft,
        }
    }
}

/// Percentage value: `(percent - baseline) * attempts`.
///
/// A `team_percent` of 0 means "unset": the mean of `percent` is used as
/// the baseline, so a player shooting exactly the league mean scores 0.
pub fn percentage_value(attempts: &[f64], percent: &[f64], team_percent: f64) -> Vec<f64> {
    let baseline = if team_percent == 0.0 {
        if percent.is_empty() {
            0.0
        } else {
            percent.iter().sum::<f64>() / percent.len() as f64
        }
    } else {
        team_percent
    };

    percent
        .iter()
        .zip(attempts)
        .map(|(&pct, &att)| (pct - baseline) * att)
        .collect()
}

/// Replace every configured shooting percentage with its volume-weighted value.
pub fn adjust_percentages(table: &StatTable, config: &FantasyConfig) -> StatTable {
    let mut adjusted = table.clone();

    for stat in ShootingStat::ALL {
        let Some(index) = table.categories.iter().position(|c| c == stat.category()) else {
            continue;
        };
        let attempts: Vec<f64> = table.rows.iter().map(|r| stat.attempts(r)).collect();
        let values = percentage_value(&attempts, &table.column(index), stat.team_baseline(config));
        for (row, value) in adjusted.rows.iter_mut().zip(values) {
            row.values[index] = value;
        }
    }

    adjusted
}
