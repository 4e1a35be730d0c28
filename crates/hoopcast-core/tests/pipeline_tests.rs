// Integration tests for the valuation pipeline.
//
// These run the full pipeline over a fixture partition through the library's
// public API and check the properties every run must hold: explosion
// completeness, slot-weighted aggregation, punt monotonicity, salary floor
// and budget conservation, idempotence, and persistence round trips.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use hoopcast_core::config::{ConfigOverrides, FantasyConfig};
use hoopcast_core::db::Database;
use hoopcast_core::pipeline::{self, PipelineOutput, TableName};
use hoopcast_core::position::Position;
use hoopcast_core::stats::{load_stats, DataShapeError, StatTable};
use hoopcast_core::valuation::positional::eligible_positions;
use hoopcast_core::valuation::salary::remaining_budget;
use hoopcast_core::valuation::slots::{aggregate, SlotPolicy};
use hoopcast_core::valuation::{
    ExplodedRow, PositionalValueRow, PositionalValueTable, ValuationError, ValuationWarning,
};

// ===========================================================================
// Test helpers
// ===========================================================================

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/season.csv")
}

/// A one-team league keeps the auction pool (20 players) well inside the
/// 30-player fixture.
fn small_league() -> FantasyConfig {
    let mut config = FantasyConfig::default_format().unwrap();
    config.fantasy_teams = 1;
    config.salary_cap = 500;
    config
}

fn with_blacklist(mut config: FantasyConfig) -> FantasyConfig {
    config.blacklist = BTreeMap::from([
        ("Marcus Hale".to_string(), 45),
        ("Gabe Jansen".to_string(), 30),
    ]);
    config
}

fn fixture_stats(config: &FantasyConfig) -> StatTable {
    load_stats(&fixture_path(), config).unwrap()
}

fn run_fixture(config: &FantasyConfig) -> PipelineOutput {
    pipeline::run(&fixture_stats(config), config).unwrap()
}

fn value_of(output: &PipelineOutput, player: &str) -> f64 {
    output.values.find(player).unwrap().value
}

// ===========================================================================
// Position explosion
// ===========================================================================

#[test]
fn explosion_covers_every_eligible_position() {
    let config = small_league();
    let stats = fixture_stats(&config);
    let output = pipeline::run(&stats, &config).unwrap();

    let expected: usize = stats
        .rows
        .iter()
        .map(|row| eligible_positions(row, &config).unwrap().len())
        .sum();
    assert_eq!(output.normalised.rows.len(), expected);

    for row in &stats.rows {
        assert!(
            output.normalised.rows.iter().any(|r| r.player == row.player),
            "{} missing from normalised data",
            row.player
        );
    }

    // Every player is UTIL-eligible.
    let util = output
        .normalised
        .rows
        .iter()
        .filter(|r| r.position == Position::UTIL)
        .count();
    assert_eq!(util, stats.rows.len());
}

#[test]
fn normalised_groups_are_centred() {
    let output = run_fixture(&small_league());
    for position in [Position::PG, Position::C, Position::UTIL] {
        let column: Vec<f64> = output
            .normalised
            .rows
            .iter()
            .filter(|r| r.position == position)
            .map(|r| r.values[0])
            .collect();
        let mean = column.iter().sum::<f64>() / column.len() as f64;
        assert!(approx_eq(mean, 0.0, 1e-9), "{position} PTS mean {mean}");
    }
}

// ===========================================================================
// Aggregation
// ===========================================================================

#[test]
fn one_value_row_per_player() {
    let config = with_blacklist(small_league());
    let output = run_fixture(&config);

    assert_eq!(output.values.rows.len(), 30);
    assert_eq!(output.bl_values.rows.len(), 28);
    assert!(output.bl_values.find("Marcus Hale").is_none());
    assert!(output.values.find("Marcus Hale").is_some());
    assert!(output.salaries.rows.iter().all(|r| r.row.player != "Gabe Jansen"));

    // POS is the raw eligibility string again.
    assert_eq!(output.values.find("Elijah Ivory").unwrap().positions, "PF/C");
}

#[test]
fn aggregated_value_is_slot_weighted_mean_of_positions() {
    let config = small_league();
    let output = run_fixture(&config);

    for row in &output.values.rows {
        let (weighted, slots) = output
            .positional_values
            .rows
            .iter()
            .filter(|r| r.row.player == row.player)
            .fold((0.0, 0.0), |(weighted, slots), r| {
                let s = config.position(r.row.position).unwrap().open_slots as f64;
                let category_sum: f64 = r
                    .row
                    .values
                    .iter()
                    .zip(&config.categories)
                    .map(|(v, c)| v * c.weight)
                    .sum();
                let value = category_sum * r.row.games_played / config.games_in_season;
                (weighted + value * s, slots + s)
            });
        assert!(
            approx_eq(row.value, weighted / slots, 1e-9),
            "{}: {} vs {}",
            row.player,
            row.value,
            weighted / slots
        );
    }
}

#[test]
fn multi_position_player_weighted_toward_larger_slot_count() {
    let mut config = small_league();
    for p in &mut config.positions {
        if p.position == Position::PG {
            p.open_slots = 3;
        }
    }
    let pts_variability = config.categories[0].week_variability;

    let row = |position: Position, z: f64| {
        let mut values = vec![0.0; config.categories.len()];
        values[0] = z * pts_variability;
        PositionalValueRow {
            row: ExplodedRow {
                player: "Combo Guard".into(),
                team: "BOS".into(),
                positions: "PG/SG".into(),
                position,
                games_played: 82.0,
                values,
            },
            value: z * pts_variability,
        }
    };
    let table = PositionalValueTable {
        categories: config.category_names(),
        rows: vec![row(Position::PG, 1.5), row(Position::SG, 1.0)],
    };

    let values = aggregate(&table, &config, SlotPolicy::Open);
    let pts = values.rows[0].values[0];
    // (1.2 * 3 + 0.8 * 1) / 4
    assert!(approx_eq(pts, 1.1, 1e-12));
    assert!(pts - 0.8 > 1.2 - pts, "should sit closer to the PG value");
}

// ===========================================================================
// Zero-weight categories
// ===========================================================================

#[test]
fn zero_weight_category_contributes_nothing() {
    let config = small_league();
    let to = config.category_index("TO").unwrap();
    let output = run_fixture(&config);

    assert!(output.values.rows.iter().all(|r| r.values[to] == 0.0));
    assert!(output.salaries.rows.iter().all(|r| r.row.values[to] == 0.0));

    // Changing turnovers changes nothing downstream of weighting.
    let mut stats = fixture_stats(&config);
    for (i, row) in stats.rows.iter_mut().enumerate() {
        row.values[to] = 10.0 - (i % 7) as f64;
    }
    let altered = pipeline::run(&stats, &config).unwrap();
    for (a, b) in output.values.rows.iter().zip(&altered.values.rows) {
        assert_eq!(a.value, b.value, "{}", a.player);
    }
    for (a, b) in output.salaries.rows.iter().zip(&altered.salaries.rows) {
        assert_eq!(a.salary, b.salary, "{}", a.row.player);
    }
}

// ===========================================================================
// Punting
// ===========================================================================

#[test]
fn punting_never_lowers_value() {
    let config = with_blacklist(small_league());
    let output = run_fixture(&config);

    for priced in &output.salaries.rows {
        let before = output.bl_values.find(&priced.row.player).unwrap().value;
        assert!(
            priced.row.value >= before,
            "{}: {} < {}",
            priced.row.player,
            priced.row.value,
            before
        );
    }
}

#[test]
fn punt_tables_cover_every_player() {
    let output = run_fixture(&small_league());
    assert_eq!(output.punt_data.rows.len(), output.values.rows.len());
    assert_eq!(output.punt_value.rows.len(), output.values.rows.len());

    // Exposure: total minus the category.
    let raw = &output.values.rows[3];
    let exposure = &output.punt_data.rows[3];
    let total: f64 = raw.values.iter().sum();
    assert!(approx_eq(exposure.values[1], total - raw.values[1], 1e-12));

    // Punt z-scores are centred across players.
    let mean: f64 = output.punt_value.rows.iter().map(|r| r.values[0]).sum::<f64>()
        / output.punt_value.rows.len() as f64;
    assert!(approx_eq(mean, 0.0, 1e-9));
}

// ===========================================================================
// Salaries
// ===========================================================================

#[test]
fn salaries_respect_floor_and_conserve_budget_before_clamp() {
    let config = with_blacklist(small_league());
    let output = run_fixture(&config);
    let salaries = &output.salaries;

    assert_eq!(salaries.auction_pool, 20);
    assert!(approx_eq(salaries.remaining_budget, 500.0 - 75.0, 1e-9));
    assert!(salaries.rows.iter().all(|r| r.salary >= 1.0));

    // Sorted by VALUE descending.
    assert!(salaries
        .rows
        .windows(2)
        .all(|w| w[0].row.value >= w[1].row.value));

    // The top player is well above the floor, so their price carries the ratio.
    let top = &salaries.rows[0];
    assert!(top.salary > 1.0);
    let ratio = top.salary / top.row.value;
    let pool_dollars: f64 = salaries
        .rows
        .iter()
        .take(salaries.auction_pool)
        .map(|r| r.row.value * ratio)
        .sum();
    assert!(approx_eq(pool_dollars + config.sunk_spend(), 500.0, 1e-6));

    for r in &salaries.rows {
        if r.salary > 1.0 {
            assert!(approx_eq(r.salary, r.row.value * ratio, 1e-9));
        }
    }
}

#[test]
fn blacklist_spend_reduces_league_budget() {
    let mut config = FantasyConfig::default_format().unwrap();
    config.blacklist.insert("Marcus Hale".into(), 40);
    assert!(approx_eq(remaining_budget(&config).unwrap(), 2360.0, 1e-9));
}

#[test]
fn overspent_blacklist_aborts_run() {
    let mut config = small_league();
    config.blacklist.insert("Marcus Hale".into(), 500);
    let err = pipeline::run(&fixture_stats(&config), &config).unwrap_err();
    assert!(matches!(err, ValuationError::BudgetExhausted { .. }));
}

// ===========================================================================
// Overrides
// ===========================================================================

#[test]
fn overrides_flow_through_the_run() {
    let base = small_league();
    let overrides = ConfigOverrides::from_json_str(
        r#"{"weights": {"PTS": 0.0}, "slots": {"UTIL": 1}, "blacklist": {"Devin Hayes": 20}}"#,
    )
    .unwrap();
    let config = base.with_overrides(&overrides).unwrap();
    let output = run_fixture(&config);

    assert!(output.values.rows.iter().all(|r| r.values[0] == 0.0));
    assert!(output.bl_values.find("Devin Hayes").is_none());
    assert!(approx_eq(output.salaries.remaining_budget, 480.0, 1e-9));
}

// ===========================================================================
// Warnings and errors
// ===========================================================================

#[test]
fn missing_blacklisted_player_is_reported() {
    let mut config = small_league();
    config.blacklist.insert("Retired Player".into(), 5);
    let output = run_fixture(&config);
    assert!(output.warnings.contains(&ValuationWarning::BlacklistedPlayerMissing {
        player: "Retired Player".into()
    }));
}

#[test]
fn lone_center_group_is_degenerate_but_run_completes() {
    let config = small_league();
    let mut stats = fixture_stats(&config);
    // Keep a single C-eligible player.
    let mut kept_center = false;
    stats.rows.retain(|r| {
        if !r.positions.contains('C') {
            return true;
        }
        !std::mem::replace(&mut kept_center, true)
    });

    let output = pipeline::run(&stats, &config).unwrap();
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        ValuationWarning::DegenerateGroup { position: Position::C, players: 1, .. }
    )));
    let center = output
        .normalised
        .rows
        .iter()
        .find(|r| r.position == Position::C)
        .unwrap();
    assert!(center.values.iter().all(|&v| v == 0.0));
}

#[test]
fn unknown_position_aborts_run() {
    let config = small_league();
    let mut stats = fixture_stats(&config);
    stats.rows[0].positions = "PG/WR".into();
    let err = pipeline::run(&stats, &config).unwrap_err();
    assert!(matches!(
        err,
        ValuationError::DataShape(DataShapeError::UnknownPosition { .. })
    ));
}

#[test]
fn narrow_stat_table_aborts_run() {
    let config = small_league();
    let mut stats = fixture_stats(&config);
    stats.categories.truncate(2);
    for row in &mut stats.rows {
        row.values.truncate(2);
    }
    let err = pipeline::run(&stats, &config).unwrap_err();
    assert!(matches!(
        err,
        ValuationError::DataShape(DataShapeError::MissingColumn { ref column }) if column == "AST"
    ));
}

#[test]
fn short_row_aborts_run() {
    let config = small_league();
    let mut stats = fixture_stats(&config);
    stats.rows[3].values.truncate(5);
    let err = pipeline::run(&stats, &config).unwrap_err();
    assert!(matches!(
        err,
        ValuationError::DataShape(DataShapeError::RowWidth { expected: 9, found: 5, .. })
    ));
}

#[test]
fn reordered_categories_abort_run() {
    let config = small_league();
    let mut stats = fixture_stats(&config);
    stats.categories.swap(0, 1);
    let err = pipeline::run(&stats, &config).unwrap_err();
    assert!(matches!(
        err,
        ValuationError::DataShape(DataShapeError::CategoryMismatch { .. })
    ));
}

// ===========================================================================
// Idempotence
// ===========================================================================

#[test]
fn reruns_are_identical() {
    let config = with_blacklist(small_league());
    let stats = fixture_stats(&config);
    let first = pipeline::run(&stats, &config).unwrap();
    let second = pipeline::run(&stats, &config).unwrap();
    assert_eq!(first, second);
    assert!(value_of(&first, "Hakeem Kowalski").is_finite());
}

// ===========================================================================
// Persistence
// ===========================================================================

#[test]
fn saved_tables_load_back_in_order() {
    let config = with_blacklist(small_league());
    let output = run_fixture(&config);
    let db = Database::open(":memory:").unwrap();
    db.save_output("season.csv", &output, &config).unwrap();

    for name in TableName::ALL {
        let stored = db.load_table("season.csv", name).unwrap().unwrap();
        assert_eq!(stored, output.table(name), "{name} differs after load");
    }

    let salary = db
        .load_table("season.csv", TableName::SalaryData)
        .unwrap()
        .unwrap();
    assert!(salary.rows.iter().all(|r| r.salary.is_some()));
    let normalised = db
        .load_table("season.csv", TableName::NormalisedData)
        .unwrap()
        .unwrap();
    assert!(normalised.rows.iter().all(|r| r.value.is_none()));
    assert_eq!(db.partitions().unwrap(), vec!["season.csv".to_string()]);
}

#[test]
fn saving_again_replaces_partition() {
    let db = Database::open(":memory:").unwrap();
    let config = small_league();
    let output = run_fixture(&config);
    db.save_output("season.csv", &output, &config).unwrap();

    let blacklisted = with_blacklist(small_league());
    let rerun = run_fixture(&blacklisted);
    db.save_output("season.csv", &rerun, &blacklisted).unwrap();

    let stored = db
        .load_table("season.csv", TableName::BlValueData)
        .unwrap()
        .unwrap();
    assert_eq!(stored.rows.len(), 28);

    let run = db.latest_run("season.csv").unwrap().unwrap();
    assert_eq!(run.partition, "season.csv");
    assert_eq!(run.config["blacklist"]["Marcus Hale"], 45);
}

#[test]
fn partitions_are_stored_independently() {
    let db = Database::open(":memory:").unwrap();
    let config = small_league();
    let output = run_fixture(&config);
    db.save_output("a.csv", &output, &config).unwrap();
    db.save_output("b.csv", &output, &config).unwrap();

    let counts: HashMap<String, usize> = db
        .partitions()
        .unwrap()
        .into_iter()
        .map(|p| {
            let rows = db.load_table(&p, TableName::ValueData).unwrap().unwrap().rows.len();
            (p, rows)
        })
        .collect();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts["a.csv"], 30);
    assert_eq!(counts["b.csv"], 30);
}
