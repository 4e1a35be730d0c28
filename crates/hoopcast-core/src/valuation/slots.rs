// Slot-weighted aggregation of positional values into one row per player.
//
// A player eligible at several positions is worth a blend of their positional
// values, weighted by how many roster slots each position contributes.

use std::collections::HashMap;

use crate::config::{FantasyConfig, PositionConfig};
use crate::valuation::{PositionalValueRow, PositionalValueTable, ValueRow, ValueTable};

/// How many slots a position row contributes to a player's aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// The open slots of the user's team.
    Open,
    /// Open slots for the starting share of the roster, structural slots
    /// for the bench share. Used once drafted players are removed.
    BenchBlended,
}

impl SlotPolicy {
    /// Slot weight of one position under this policy.
    pub fn slots(&self, position: &PositionConfig, config: &FantasyConfig) -> f64 {
        let open = position.open_slots as f64;
        match self {
            SlotPolicy::Open => open,
            SlotPolicy::BenchBlended => {
                let team_size = config.team_size() as f64;
                let bench = config.bench_size as f64;
                open * (team_size - bench) / team_size + position.slots as f64 * bench / team_size
            }
        }
    }
}

/// Category values scaled by weight; VALUE is their sum scaled by the
/// share of the season the player appears in.
fn weighted_row(row: &PositionalValueRow, config: &FantasyConfig) -> (Vec<f64>, f64) {
    let values: Vec<f64> = row
        .row
        .values
        .iter()
        .zip(&config.categories)
        .map(|(value, category)| value * category.weight)
        .collect();
    let total: f64 = values.iter().sum();
    let value = total * (row.row.games_played / config.games_in_season);
    (values, value)
}

/// Collapse position rows into one row per player.
///
/// Every category and VALUE becomes `sum(x * SLOTS) / sum(SLOTS)` over the
/// player's rows. A player whose positions carry no slots aggregates to 0.
/// Players keep their first-appearance order.
pub fn aggregate(
    table: &PositionalValueTable,
    config: &FantasyConfig,
    policy: SlotPolicy,
) -> ValueTable {
    let width = table.categories.len();
    let mut order: Vec<String> = Vec::new();
    // player -> (slot-weighted sums, total slots)
    let mut sums: HashMap<&str, (ValueRow, f64)> = HashMap::new();

    for row in &table.rows {
        let slots = config
            .position(row.row.position)
            .map(|p| policy.slots(p, config))
            .unwrap_or(0.0);
        let (values, value) = weighted_row(row, config);

        let (acc, total_slots) = sums.entry(row.row.player.as_str()).or_insert_with(|| {
            order.push(row.row.player.clone());
            (
                ValueRow {
                    player: row.row.player.clone(),
                    team: row.row.team.clone(),
                    positions: row.row.positions.clone(),
                    games_played: row.row.games_played,
                    values: vec![0.0; width],
                    value: 0.0,
                },
                0.0,
            )
        });
        for (sum, v) in acc.values.iter_mut().zip(&values) {
            *sum += v * slots;
        }
        acc.value += value * slots;
        *total_slots += slots;
    }

    let rows = order
        .iter()
        .filter_map(|player| sums.remove(player.as_str()))
        .map(|(mut row, total_slots)| {
            if total_slots > 0.0 {
                row.values.iter_mut().for_each(|v| *v /= total_slots);
                row.value /= total_slots;
            } else {
                row.values.iter_mut().for_each(|v| *v = 0.0);
                row.value = 0.0;
            }
            row
        })
        .collect();

    ValueTable {
        categories: table.categories.clone(),
        rows,
    }
}
