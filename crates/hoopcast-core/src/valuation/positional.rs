// Position explosion and per-position normalization.
//
// A multi-eligible player is duplicated into one row per roster position they
// can fill, so each position group is standardized against only the players
// who compete for it.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::FantasyConfig;
use crate::position::{parse_listed_positions, Position};
use crate::stats::{DataShapeError, StatRow, StatTable};
use crate::valuation::power::power_transform;
use crate::valuation::{ExplodedRow, NormalizedTable, ValuationWarning};

/// Full set of roster positions a player can fill, in enumeration order.
///
/// Each listed tag contributes its configured eligibility set; the result is
/// the union. A tag the scoring format does not configure is an error, as is
/// an eligibility string that lists nothing.
pub fn eligible_positions(
    row: &StatRow,
    config: &FantasyConfig,
) -> Result<BTreeSet<Position>, DataShapeError> {
    let unknown = |tag: String| DataShapeError::UnknownPosition {
        player: row.player.clone(),
        tag,
    };

    let listed = parse_listed_positions(&row.positions).map_err(unknown)?;

    let mut eligible = BTreeSet::new();
    for tag in listed {
        let settings = config
            .position(tag)
            .ok_or_else(|| unknown(tag.to_string()))?;
        eligible.extend(settings.eligible_positions.iter().copied());
    }

    if eligible.is_empty() {
        return Err(DataShapeError::NoEligiblePositions {
            player: row.player.clone(),
        });
    }
    Ok(eligible)
}

/// Duplicate every row once per eligible position.
///
/// Rows keep input player order; a player's copies follow position
/// enumeration order.
pub fn explode(table: &StatTable, config: &FantasyConfig) -> Result<Vec<ExplodedRow>, DataShapeError> {
    let mut exploded = Vec::with_capacity(table.rows.len() * 3);
    for row in &table.rows {
        for position in eligible_positions(row, config)? {
            exploded.push(ExplodedRow {
                player: row.player.clone(),
                team: row.team.clone(),
                positions: row.positions.clone(),
                position,
                games_played: row.games_played,
                values: row.values.clone(),
            });
        }
    }
    Ok(exploded)
}

/// Explode the table and standardize every category within each position.
///
/// Values are first scaled by `mean_schedule_week`, then Yeo-Johnson
/// transformed and standardized. A group with fewer than two distinct values
/// for a category is set to 0 and reported as a warning.
pub fn normalize(
    table: &StatTable,
    config: &FantasyConfig,
) -> Result<NormalizedTable, DataShapeError> {
    let mut rows = explode(table, config)?;
    let mut warnings = Vec::new();

    for settings in &config.positions {
        let position = settings.position;
        let members: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.position == position)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }

        for (c, category) in table.categories.iter().enumerate() {
            let scaled: Vec<f64> = members
                .iter()
                .map(|&i| rows[i].values[c] * config.mean_schedule_week)
                .collect();

            let standardized = match power_transform(&scaled) {
                Some(fit) => {
                    debug!("{category} at {position}: lambda {:.4}", fit.lambda);
                    fit.values
                }
                None => {
                    let warning = ValuationWarning::DegenerateGroup {
                        position,
                        category: category.clone(),
                        players: members.len(),
                    };
                    warn!("{warning}");
                    warnings.push(warning);
                    vec![0.0; members.len()]
                }
            };

            for (&i, value) in members.iter().zip(standardized) {
                rows[i].values[c] = value;
            }
        }
    }

    debug!("normalized {} position rows", rows.len());
    Ok(NormalizedTable {
        categories: table.categories.clone(),
        rows,
        warnings,
    })
}
