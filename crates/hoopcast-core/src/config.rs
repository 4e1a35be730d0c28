// Scoring-format configuration: loading, validation, and run-time overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::position::Position;

/// The scoring format shipped with the crate (12 teams, $200, 9 categories).
pub const DEFAULT_LEAGUE_TOML: &str = include_str!("../defaults/league.toml");

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse overrides {path}: {source}")]
    OverridesParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("unknown category `{name}`")]
    UnknownCategory { name: String },

    #[error("unknown position `{name}`")]
    UnknownPosition { name: String },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Public config
// ---------------------------------------------------------------------------

/// Immutable description of a scoring format.
///
/// Every pipeline stage receives this value explicitly; nothing in the
/// valuation code reads a process-wide default.
#[derive(Debug, Clone, Serialize)]
pub struct FantasyConfig {
    pub fantasy_teams: u32,
    pub salary_cap: u32,
    /// Average number of games a player appears in per scoring week.
    pub mean_schedule_week: f64,
    pub games_in_season: f64,
    pub bench_size: u32,
    /// Team field-goal baseline. 0 means "use the league mean".
    pub team_fg: f64,
    /// Team free-throw baseline. 0 means "use the league mean".
    pub team_ft: f64,
    pub metadata: MetadataColumns,
    /// Scored categories, in column order.
    pub categories: Vec<CategoryConfig>,
    /// Roster positions, in declaration order.
    pub positions: Vec<PositionConfig>,
    /// Already-drafted players and their sunk auction prices.
    pub blacklist: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryConfig {
    pub name: String,
    pub weight: f64,
    pub week_variability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionConfig {
    pub position: Position,
    pub eligible_positions: Vec<Position>,
    /// Roster slots for this position in the scoring format.
    pub slots: u32,
    /// Slots still open for the user's team. Equal to `slots` until a
    /// configuration source overrides it.
    pub open_slots: u32,
}

/// Column names of the non-stat fields in the raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataColumns {
    #[serde(default = "default_player_column")]
    pub player: String,
    #[serde(default = "default_team_column")]
    pub team: String,
    #[serde(default = "default_position_column")]
    pub position: String,
    #[serde(default = "default_games_column")]
    pub games_played: String,
}

fn default_player_column() -> String {
    "PLAYER".into()
}
fn default_team_column() -> String {
    "TEAM".into()
}
fn default_position_column() -> String {
    "POS".into()
}
fn default_games_column() -> String {
    "GP".into()
}

impl Default for MetadataColumns {
    fn default() -> Self {
        MetadataColumns {
            player: default_player_column(),
            team: default_team_column(),
            position: default_position_column(),
            games_played: default_games_column(),
        }
    }
}

impl MetadataColumns {
    /// Column names in output order.
    pub fn names(&self) -> [&str; 4] {
        [&self.player, &self.team, &self.position, &self.games_played]
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    #[serde(default)]
    metadata: MetadataColumns,
    #[serde(rename = "category")]
    categories: Vec<RawCategory>,
    #[serde(rename = "position")]
    positions: Vec<RawPosition>,
    #[serde(default)]
    blacklist: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    fantasy_teams: u32,
    salary_cap: u32,
    mean_schedule_week: f64,
    #[serde(default = "default_games_in_season")]
    games_in_season: f64,
    #[serde(default = "default_bench_size")]
    bench_size: u32,
    #[serde(default)]
    team_fg: f64,
    #[serde(default)]
    team_ft: f64,
}

fn default_games_in_season() -> f64 {
    82.0
}
fn default_bench_size() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
struct RawCategory {
    name: String,
    #[serde(default = "default_one")]
    weight: f64,
    #[serde(default = "default_one")]
    week_variability: f64,
}

fn default_one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
struct RawPosition {
    tag: String,
    eligible: Vec<String>,
    slots: i64,
}

// ---------------------------------------------------------------------------
// Run-time overrides
// ---------------------------------------------------------------------------

/// Per-run changes supplied by the configuration source (e.g. a user who
/// marked players as drafted and re-weighted categories).
///
/// Only weights, open slots, the blacklist and team baselines may change;
/// which categories and positions exist is fixed by the scoring format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub slots: BTreeMap<String, i64>,
    #[serde(default)]
    pub blacklist: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub team_ft: Option<f64>,
    #[serde(default)]
    pub team_fg: Option<f64>,
}

impl ConfigOverrides {
    /// Parse an overrides document. The configuration source may write the
    /// payload either as a JSON object or as a JSON string holding the object.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(text)? {
            serde_json::Value::String(inner) => serde_json::from_str(&inner),
            value => serde_json::from_value(value),
        }
    }
}

/// Load an overrides document from disk.
pub fn load_overrides(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    let text = read_file(path)?;
    ConfigOverrides::from_json_str(&text).map_err(|e| ConfigError::OverridesParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

impl FantasyConfig {
    /// Parse and validate a league.toml document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// The built-in default scoring format.
    pub fn default_format() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_LEAGUE_TOML, Path::new("<defaults/league.toml>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: LeagueFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let categories = file
            .categories
            .into_iter()
            .map(|c| CategoryConfig {
                name: c.name.trim().to_string(),
                weight: c.weight,
                week_variability: c.week_variability,
            })
            .collect();

        let positions = file
            .positions
            .into_iter()
            .enumerate()
            .map(|(i, raw)| convert_position(i, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let config = FantasyConfig {
            fantasy_teams: file.league.fantasy_teams,
            salary_cap: file.league.salary_cap,
            mean_schedule_week: file.league.mean_schedule_week,
            games_in_season: file.league.games_in_season,
            bench_size: file.league.bench_size,
            team_fg: file.league.team_fg,
            team_ft: file.league.team_ft,
            metadata: file.metadata,
            categories,
            positions,
            blacklist: file.blacklist,
        };

        validate(&config)?;
        Ok(config)
    }

    /// Return a new config with the overrides applied and re-validated.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = self.clone();

        for (name, &weight) in &overrides.weights {
            let category = config
                .categories
                .iter_mut()
                .find(|c| c.name == *name)
                .ok_or_else(|| ConfigError::UnknownCategory { name: name.clone() })?;
            category.weight = weight;
        }

        for (name, &slots) in &overrides.slots {
            let position =
                Position::from_str_pos(name).ok_or_else(|| ConfigError::UnknownPosition {
                    name: name.clone(),
                })?;
            let entry = config
                .positions
                .iter_mut()
                .find(|p| p.position == position)
                .ok_or_else(|| ConfigError::UnknownPosition { name: name.clone() })?;
            entry.open_slots = slot_count(&format!("slots.{name}"), slots)?;
        }

        if let Some(blacklist) = &overrides.blacklist {
            config.blacklist = blacklist
                .iter()
                .map(|(player, &price)| (player.trim().to_string(), price))
                .collect();
        }
        if let Some(team_ft) = overrides.team_ft {
            config.team_ft = team_ft;
        }
        if let Some(team_fg) = overrides.team_fg {
            config.team_fg = team_fg;
        }

        validate(&config)?;
        Ok(config)
    }

    // -- Lookups --

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn position(&self, position: Position) -> Option<&PositionConfig> {
        self.positions.iter().find(|p| p.position == position)
    }

    /// Indices of categories with a non-zero weight. Only these count
    /// towards punting.
    pub fn scored_categories(&self) -> Vec<usize> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| c.weight != 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    // -- Derived quantities --

    /// Roster size per team: every position slot plus the bench.
    pub fn team_size(&self) -> u32 {
        self.checked_team_size().unwrap_or(u32::MAX)
    }

    /// `None` when the slot counts do not fit in a `u32`.
    fn checked_team_size(&self) -> Option<u32> {
        self.positions
            .iter()
            .try_fold(self.bench_size, |total, p| total.checked_add(p.slots))
    }

    /// Players still to be drafted across the league.
    pub fn total_drafted_players(&self) -> usize {
        (self.team_size() as usize * self.fantasy_teams as usize)
            .saturating_sub(self.blacklist.len())
    }

    /// League-wide auction money before any purchase.
    pub fn total_budget(&self) -> f64 {
        self.fantasy_teams as f64 * self.salary_cap as f64
    }

    /// Money already committed to blacklisted players.
    pub fn sunk_spend(&self) -> f64 {
        self.blacklist.values().map(|&price| price as f64).sum()
    }

    pub fn is_blacklisted(&self, player: &str) -> bool {
        self.blacklist.contains_key(player)
    }
}

/// Load and validate a league.toml file.
pub fn load_config_from(path: &Path) -> Result<FantasyConfig, ConfigError> {
    let text = read_file(path)?;
    FantasyConfig::parse(&text, path)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn slot_count(field: &str, slots: i64) -> Result<u32, ConfigError> {
    u32::try_from(slots).map_err(|_| invalid(field, format!("must be a non-negative count, got {slots}")))
}

fn parse_tag(field: &str, tag: &str) -> Result<Position, ConfigError> {
    Position::from_str_pos(tag)
        .ok_or_else(|| invalid(field, format!("`{tag}` is not a roster position")))
}

fn convert_position(index: usize, raw: RawPosition) -> Result<PositionConfig, ConfigError> {
    let field = format!("position[{index}]");
    let position = parse_tag(&format!("{field}.tag"), &raw.tag)?;

    let mut eligible_positions = Vec::with_capacity(raw.eligible.len());
    for tag in &raw.eligible {
        let eligible = parse_tag(&format!("{field}.eligible"), tag)?;
        if !eligible_positions.contains(&eligible) {
            eligible_positions.push(eligible);
        }
    }

    let slots = slot_count(&format!("{field}.slots"), raw.slots)?;
    Ok(PositionConfig {
        position,
        eligible_positions,
        slots,
        open_slots: slots,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &FantasyConfig) -> Result<(), ConfigError> {
    if config.fantasy_teams == 0 {
        return Err(invalid("league.fantasy_teams", "must be greater than 0"));
    }
    if config.salary_cap == 0 {
        return Err(invalid("league.salary_cap", "must be greater than 0"));
    }

    let positive_fields: &[(&str, f64)] = &[
        ("league.mean_schedule_week", config.mean_schedule_week),
        ("league.games_in_season", config.games_in_season),
    ];
    for (name, val) in positive_fields {
        if !val.is_finite() || *val <= 0.0 {
            return Err(invalid(*name, format!("must be > 0, got {val}")));
        }
    }

    let baseline_fields: &[(&str, f64)] = &[
        ("league.team_fg", config.team_fg),
        ("league.team_ft", config.team_ft),
    ];
    for (name, val) in baseline_fields {
        if !(0.0..=1.0).contains(val) {
            return Err(invalid(
                *name,
                format!("must be between 0.0 and 1.0 inclusive, got {val}"),
            ));
        }
    }

    if config.categories.is_empty() {
        return Err(invalid("category", "at least one category is required"));
    }
    let mut seen = BTreeSet::new();
    for category in &config.categories {
        let field = format!("category.{}", category.name);
        if category.name.is_empty() {
            return Err(invalid("category.name", "must not be empty"));
        }
        if !seen.insert(category.name.as_str()) {
            return Err(invalid(field, "declared more than once"));
        }
        if !category.weight.is_finite() {
            return Err(invalid(
                format!("{field}.weight"),
                format!("must be finite, got {}", category.weight),
            ));
        }
        if !category.week_variability.is_finite() || category.week_variability < 0.0 {
            return Err(invalid(
                format!("{field}.week_variability"),
                format!("must be >= 0, got {}", category.week_variability),
            ));
        }
    }

    if config.positions.is_empty() {
        return Err(invalid("position", "at least one position is required"));
    }
    let declared: BTreeSet<Position> = config.positions.iter().map(|p| p.position).collect();
    if declared.len() != config.positions.len() {
        return Err(invalid("position", "a position tag is declared more than once"));
    }
    for position in &config.positions {
        let field = format!("position.{}", position.position);
        if position.eligible_positions.is_empty() {
            return Err(invalid(
                format!("{field}.eligible"),
                "must list at least one position",
            ));
        }
        if let Some(missing) = position
            .eligible_positions
            .iter()
            .find(|p| !declared.contains(p))
        {
            return Err(invalid(
                format!("{field}.eligible"),
                format!("`{missing}` is not a configured position"),
            ));
        }
    }

    match config.checked_team_size() {
        None => {
            return Err(invalid(
                "position.slots",
                "total roster size is too large",
            ))
        }
        Some(0) => return Err(invalid("position.slots", "roster has no slots")),
        Some(_) => {}
    }

    for (player, _) in &config.blacklist {
        if player.trim().is_empty() {
            return Err(invalid("blacklist", "player name must not be empty"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> FantasyConfig {
        FantasyConfig::default_format().expect("bundled league.toml should be valid")
    }

    const MINIMAL: &str = r#"
[league]
fantasy_teams = 2
salary_cap = 100
mean_schedule_week = 3.0

[[category]]
name = "PTS"
weight = 1.0
week_variability = 0.8

[[position]]
tag = "C"
eligible = ["C"]
slots = 1
"#;

    #[test]
    fn default_format_matches_bundled_league() {
        let config = default_config();
        assert_eq!(config.fantasy_teams, 12);
        assert_eq!(config.salary_cap, 200);
        assert!((config.mean_schedule_week - 3.28).abs() < f64::EPSILON);
        assert!((config.games_in_season - 82.0).abs() < f64::EPSILON);
        assert_eq!(config.bench_size, 3);
        assert_eq!(
            config.category_names(),
            vec!["PTS", "REB", "AST", "STL", "BLK", "3PM", "FG%", "FT%", "TO"]
        );
        let to = &config.categories[config.category_index("TO").unwrap()];
        assert_eq!(to.weight, 0.0);
        assert!((to.week_variability - 0.6).abs() < f64::EPSILON);

        let pg = config.position(Position::PG).unwrap();
        assert_eq!(
            pg.eligible_positions,
            vec![Position::PG, Position::G, Position::UTIL]
        );
        assert_eq!(config.position(Position::UTIL).unwrap().slots, 3);
        assert!(config.position(Position::BENCH).is_none());
        assert!(config.blacklist.is_empty());
        assert_eq!(config.metadata, MetadataColumns::default());
    }

    #[test]
    fn derived_roster_quantities() {
        let mut config = default_config();
        // 7 single slots + 3 UTIL + 3 bench
        assert_eq!(config.team_size(), 13);
        assert_eq!(config.total_drafted_players(), 13 * 12);

        config.blacklist.insert("Drafted".into(), 40);
        assert_eq!(config.total_drafted_players(), 13 * 12 - 1);
        assert!((config.total_budget() - 2400.0).abs() < f64::EPSILON);
        assert!((config.sunk_spend() - 40.0).abs() < f64::EPSILON);
        assert!(config.is_blacklisted("Drafted"));
    }

    #[test]
    fn scored_categories_skip_zero_weight() {
        let config = default_config();
        let scored = config.scored_categories();
        assert_eq!(scored.len(), 8);
        assert!(!scored.contains(&config.category_index("TO").unwrap()));
    }

    #[test]
    fn minimal_config_applies_defaults() {
        let config = FantasyConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.bench_size, 3);
        assert_eq!(config.team_fg, 0.0);
        assert_eq!(config.metadata.player, "PLAYER");
        assert_eq!(config.position(Position::C).unwrap().open_slots, 1);
    }

    #[test]
    fn negative_slot_count_rejected() {
        let text = MINIMAL.replace("slots = 1", "slots = -1");
        let err = FantasyConfig::from_toml_str(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "position[0].slots"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn oversized_roster_rejected() {
        let text = format!(
            "{}\n[[position]]\ntag = \"UTIL\"\neligible = [\"C\", \"UTIL\"]\nslots = 4294967295\n",
            MINIMAL.replace("slots = 1", "slots = 4294967295")
        );
        let err = FantasyConfig::from_toml_str(&text).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "position.slots"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn non_enumerated_position_tag_rejected() {
        let text = MINIMAL.replace("tag = \"C\"", "tag = \"QB\"");
        assert!(matches!(
            FantasyConfig::from_toml_str(&text),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn eligible_tag_must_be_configured() {
        let text = MINIMAL.replace("eligible = [\"C\"]", "eligible = [\"C\", \"UTIL\"]");
        let err = FantasyConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("UTIL"), "got: {err}");
    }

    #[test]
    fn zero_teams_rejected() {
        let text = MINIMAL.replace("fantasy_teams = 2", "fantasy_teams = 0");
        let err = FantasyConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("league.fantasy_teams"));
    }

    #[test]
    fn team_baseline_out_of_range_rejected() {
        let text = MINIMAL.replace("mean_schedule_week = 3.0", "mean_schedule_week = 3.0\nteam_fg = 47.0");
        let err = FantasyConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("league.team_fg"));
    }

    #[test]
    fn duplicate_category_rejected() {
        let text = format!(
            "{MINIMAL}\n[[category]]\nname = \"PTS\"\nweight = 1.0\nweek_variability = 0.5\n"
        );
        assert!(matches!(
            FantasyConfig::from_toml_str(&text),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            FantasyConfig::from_toml_str("[league\nfantasy_teams = 1"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_reported() {
        let err = load_config_from(Path::new("/nonexistent/league.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    // ---- Overrides ----

    #[test]
    fn overrides_replace_weights_slots_and_blacklist() {
        let config = default_config();
        let mut overrides = ConfigOverrides::default();
        overrides.weights.insert("PTS".into(), 0.5);
        overrides.slots.insert("UTIL".into(), 1);
        overrides.blacklist = Some(BTreeMap::from([("Star".to_string(), 60)]));
        overrides.team_ft = Some(0.78);

        let updated = config.with_overrides(&overrides).unwrap();
        assert_eq!(updated.categories[0].weight, 0.5);
        let util = updated.position(Position::UTIL).unwrap();
        assert_eq!(util.open_slots, 1);
        assert_eq!(util.slots, 3, "roster slots are structural");
        assert_eq!(updated.blacklist.get("Star"), Some(&60));
        assert!((updated.team_ft - 0.78).abs() < f64::EPSILON);
        assert_eq!(updated.team_fg, config.team_fg);

        // The source config is untouched.
        assert_eq!(config.categories[0].weight, 1.0);
    }

    #[test]
    fn override_unknown_category_rejected() {
        let mut overrides = ConfigOverrides::default();
        overrides.weights.insert("DD".into(), 1.0);
        assert!(matches!(
            default_config().with_overrides(&overrides),
            Err(ConfigError::UnknownCategory { name }) if name == "DD"
        ));
    }

    #[test]
    fn override_unknown_position_rejected() {
        let mut overrides = ConfigOverrides::default();
        overrides.slots.insert("BENCH".into(), 2);
        assert!(matches!(
            default_config().with_overrides(&overrides),
            Err(ConfigError::UnknownPosition { .. })
        ));
    }

    #[test]
    fn override_negative_slots_rejected() {
        let mut overrides = ConfigOverrides::default();
        overrides.slots.insert("PG".into(), -2);
        assert!(matches!(
            default_config().with_overrides(&overrides),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn overrides_parse_plain_and_string_encoded_json() {
        let plain = r#"{"weights": {"PTS": 0.75}, "slots": {"PG": 0}, "blacklist": {"A": 12}, "team_ft": 0.8, "team_fg": 0.47}"#;
        let parsed = ConfigOverrides::from_json_str(plain).unwrap();
        assert_eq!(parsed.weights.get("PTS"), Some(&0.75));
        assert_eq!(parsed.slots.get("PG"), Some(&0));
        assert_eq!(parsed.team_fg, Some(0.47));

        let encoded = serde_json::to_string(plain).unwrap();
        let reparsed = ConfigOverrides::from_json_str(&encoded).unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn overrides_default_to_no_change() {
        let parsed = ConfigOverrides::from_json_str("{}").unwrap();
        assert_eq!(parsed, ConfigOverrides::default());
        let config = default_config();
        let same = config.with_overrides(&parsed).unwrap();
        assert_eq!(same.categories, config.categories);
        assert_eq!(same.positions, config.positions);
    }
}
