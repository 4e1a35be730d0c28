// Roster position tags and eligibility-string parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between listed positions in a raw eligibility string ("PG/SG").
pub const POSITION_SEPARATOR: char = '/';

/// Basketball roster position tags.
///
/// The set is closed: configuration and data may only name these tags.
/// Variant order is the deterministic ordering used for exploded rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
    G,
    F,
    UTIL,
    BENCH,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
        Position::G,
        Position::F,
        Position::UTIL,
        Position::BENCH,
    ];

    /// Parse a position tag. Case-insensitive; surrounding whitespace is ignored.
    ///
    /// "BN"/"BE" are accepted as bench aliases.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PG" => Some(Position::PG),
            "SG" => Some(Position::SG),
            "SF" => Some(Position::SF),
            "PF" => Some(Position::PF),
            "C" => Some(Position::C),
            "G" => Some(Position::G),
            "F" => Some(Position::F),
            "UTIL" => Some(Position::UTIL),
            "BENCH" | "BE" | "BN" => Some(Position::BENCH),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
            Position::G => "G",
            Position::F => "F",
            Position::UTIL => "UTIL",
            Position::BENCH => "BENCH",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Split a raw eligibility string into its listed tags.
///
/// Returns `Err(token)` with the first token that is not a known position.
/// Empty tokens (e.g. a trailing separator) are skipped.
pub fn parse_listed_positions(raw: &str) -> Result<Vec<Position>, String> {
    raw.split(POSITION_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Position::from_str_pos(token).ok_or_else(|| token.to_string()))
        .collect()
}
