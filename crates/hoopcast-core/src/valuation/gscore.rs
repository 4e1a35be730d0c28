// G-scores: standardized values rescaled by week-to-week variability.

use crate::config::FantasyConfig;
use crate::valuation::zscore::{zscores, Deviation};
use crate::valuation::{NormalizedTable, PositionalValueRow, PositionalValueTable};

/// Sign-preserving variability rescale of a single z-score.
pub fn g_score(z: f64, week_variability: f64) -> f64 {
    z.signum() * z.abs() * week_variability
}

/// G-score every position group of a normalized table.
///
/// Within each group a category is z-scored (sample deviation) and rescaled
/// by its week variability. The rescale is linear, so each group's total is
/// the g-score of its z-score total and no renormalization step is needed.
/// VALUE of each row is the sum of its category g-scores.
pub fn g_score_table(table: &NormalizedTable, config: &FantasyConfig) -> PositionalValueTable {
    let mut rows: Vec<PositionalValueRow> = table
        .rows
        .iter()
        .map(|row| PositionalValueRow {
            row: row.clone(),
            value: 0.0,
        })
        .collect();

    for settings in &config.positions {
        let members: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.row.position == settings.position)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }

        for (c, category) in config.categories.iter().enumerate() {
            let column: Vec<f64> = members.iter().map(|&i| rows[i].row.values[c]).collect();
            let scores: Vec<f64> = zscores(&column, Deviation::Sample)
                .into_iter()
                .map(|z| g_score(z, category.week_variability))
                .collect();

            for (&i, score) in members.iter().zip(scores) {
                rows[i].row.values[c] = score;
            }
        }
    }

    for row in &mut rows {
        row.value = row.row.values.iter().sum();
    }

    PositionalValueTable {
        categories: table.categories.clone(),
        rows,
    }
}

/// Same as [`g_score_table`] after removing blacklisted players, so the
/// remaining pool is re-centred without the drafted players.
pub fn g_score_undrafted(table: &NormalizedTable, config: &FantasyConfig) -> PositionalValueTable {
    let undrafted = NormalizedTable {
        categories: table.categories.clone(),
        rows: table
            .rows
            .iter()
            .filter(|r| !config.is_blacklisted(&r.player))
            .cloned()
            .collect(),
        warnings: Vec::new(),
    };
    g_score_table(&undrafted, config)
}
