// Auction salary allocation.
//
// Converts punt-adjusted VALUE into auction dollars for a salary-cap draft.
// The budget left after blacklist spend is spread in proportion to VALUE,
// using the top of the pool (one roster's worth of players per team) as the
// normalizing denominator, with a $1 floor.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::FantasyConfig;
use crate::valuation::{SalaryRow, SalaryTable, ValuationError, ValueTable};

/// Smallest auction pool used for the price ratio, regardless of league size.
pub const MIN_AUCTION_POOL: usize = 20;

/// Lowest price any player can go for.
pub const MIN_SALARY: f64 = 1.0;

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// League money still to be spent: `teams * cap - sum(blacklist prices)`.
pub fn remaining_budget(config: &FantasyConfig) -> Result<f64, ValuationError> {
    let total = config.total_budget();
    let sunk = config.sunk_spend();
    let remaining = total - sunk;
    if remaining <= 0.0 {
        return Err(ValuationError::BudgetExhausted { total, sunk });
    }
    Ok(remaining)
}

/// Number of top players whose VALUE sets the dollars-per-value ratio.
pub fn auction_pool_size(config: &FantasyConfig) -> usize {
    config.total_drafted_players().max(MIN_AUCTION_POOL)
}

/// Apply the floor to a computed salary.
pub fn floor_salary(raw: f64) -> f64 {
    if raw <= MIN_SALARY {
        MIN_SALARY
    } else {
        raw
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Price every player of the (blacklist-filtered, punt-adjusted) table.
///
/// Algorithm:
/// 1. Sort by VALUE descending (stable, so ties keep table order)
/// 2. `pool_value` = sum of VALUE over the top `auction_pool_size` players
/// 3. `salary` = `VALUE * remaining_budget / pool_value` for every player
/// 4. Anything at or below $1 becomes $1
///
/// Before the floor, salaries over the top pool plus blacklist spend add up
/// to the league budget exactly; the floor only adds money.
pub fn allocate_salaries(
    values: &ValueTable,
    config: &FantasyConfig,
) -> Result<SalaryTable, ValuationError> {
    let remaining = remaining_budget(config)?;

    let mut ranked = values.rows.clone();
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));

    let pool = auction_pool_size(config).min(ranked.len());
    let pool_value: f64 = ranked.iter().take(pool).map(|r| r.value).sum();
    if ranked.is_empty() || pool_value <= 0.0 || !pool_value.is_finite() {
        return Err(ValuationError::UndefinedSalaryRatio { pool_value });
    }

    let dollars_per_value = remaining / pool_value;
    debug!(
        "auction pool of {pool} players, ${remaining:.0} remaining, ${dollars_per_value:.3} per unit of value"
    );

    let rows = ranked
        .into_iter()
        .map(|row| SalaryRow {
            salary: floor_salary(row.value * dollars_per_value),
            row,
        })
        .collect();

    Ok(SalaryTable {
        categories: values.categories.clone(),
        rows,
        remaining_budget: remaining,
        auction_pool: pool,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
