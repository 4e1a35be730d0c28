// Punting: value a player gains when a manager abandons their weakest
// categories.
//
// The punt exposure of a category is the player's total without it. After
// z-scoring exposures across the pool, a player's highest punt z-score marks
// the category whose removal costs them least relative to everyone else.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::config::FantasyConfig;
use crate::stats::DataShapeError;
use crate::valuation::zscore::{zscores, Deviation};
use crate::valuation::{ValueRow, ValueTable};

/// Fewest scored categories a punt strategy may leave.
pub const MIN_RETAINED_CATEGORIES: usize = 6;

/// Each category replaced by the sum of all categories minus that one.
/// VALUE is carried through unchanged.
pub fn punt_exposure(values: &ValueTable) -> ValueTable {
    let rows = values
        .rows
        .iter()
        .map(|row| {
            let total: f64 = row.values.iter().sum();
            ValueRow {
                values: row.values.iter().map(|v| total - v).collect(),
                ..row.clone()
            }
        })
        .collect();
    ValueTable {
        categories: values.categories.clone(),
        rows,
    }
}

/// Z-score every exposure column and VALUE across players (sample deviation).
pub fn punt_zscores(exposure: &ValueTable) -> ValueTable {
    let mut table = exposure.clone();
    for c in 0..exposure.categories.len() {
        let column: Vec<f64> = exposure.rows.iter().map(|r| r.values[c]).collect();
        for (row, z) in table.rows.iter_mut().zip(zscores(&column, Deviation::Sample)) {
            row.values[c] = z;
        }
    }
    let value: Vec<f64> = exposure.rows.iter().map(|r| r.value).collect();
    for (row, z) in table.rows.iter_mut().zip(zscores(&value, Deviation::Sample)) {
        row.value = z;
    }
    table
}

/// Number of categories at which punting stops.
pub fn retained_floor(scored: usize) -> usize {
    MIN_RETAINED_CATEGORIES.max(scored.saturating_sub(1))
}

/// Best VALUE a player reaches by punting, never below `value`.
///
/// Repeatedly drops the remaining scored category with the highest punt
/// z-score (first on ties) and scores `(current - category) * remaining /
/// scored`. Stops at the retained floor or at the first candidate that does
/// not improve on the current value.
pub fn peak_value(row: &ValueRow, punt: &ValueRow, scored: &[usize]) -> f64 {
    let floor = retained_floor(scored.len());
    let total = scored.len() as f64;
    let mut remaining: Vec<usize> = scored.to_vec();

    let outcome = std::iter::from_fn(|| {
        if remaining.len() <= floor {
            return None;
        }
        let slot = (0..remaining.len()).fold(0, |best, i| {
            match punt.values[remaining[i]]
                .partial_cmp(&punt.values[remaining[best]])
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Greater => i,
                _ => best,
            }
        });
        let share = remaining.len() as f64 / total;
        Some((remaining.remove(slot), share))
    })
    .try_fold(row.value, |current, (category, share)| {
        let candidate = (current - row.values[category]) * share;
        if candidate > current {
            ControlFlow::Continue(candidate)
        } else {
            ControlFlow::Break(current)
        }
    });

    match outcome {
        ControlFlow::Continue(value) | ControlFlow::Break(value) => value.max(row.value),
    }
}

/// Punt-adjust every player of `values` using the punt z-score table.
///
/// Only categories with a non-zero weight are punt candidates. A player
/// missing from `punt` is a shape error.
pub fn apply_punt_adjustment(
    values: &ValueTable,
    punt: &ValueTable,
    config: &FantasyConfig,
) -> Result<ValueTable, DataShapeError> {
    let scored = config.scored_categories();
    let punt_rows: HashMap<&str, &ValueRow> =
        punt.rows.iter().map(|r| (r.player.as_str(), r)).collect();

    let rows = values
        .rows
        .iter()
        .map(|row| {
            let punt_row = punt_rows.get(row.player.as_str()).ok_or_else(|| {
                DataShapeError::MissingPuntRow {
                    player: row.player.clone(),
                }
            })?;
            Ok(ValueRow {
                value: peak_value(row, punt_row, &scored),
                ..row.clone()
            })
        })
        .collect::<Result<Vec<_>, DataShapeError>>()?;

    Ok(ValueTable {
        categories: values.categories.clone(),
        rows,
    })
}
