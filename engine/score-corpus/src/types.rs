use serde::{Deserialize, Serialize};
use std::fmt;

/// A single loosely-typed cell from an input table
///
/// Score and roster tables arrive from several seasons of exports whose column
/// types drift (ids written as `12345` in one year and `12345.0` in another).
/// Every cell is coerced through this type so both the CSV loader and
/// in-memory callers share one set of rules.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to an integer, truncating floats
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(v) => Some(*v),
            RawValue::Float(v) => truncate(*v),
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
        }
    }

    /// Coerce to a float; NaN and infinities count as missing
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RawValue::Int(v) => Some(*v as f64),
            RawValue::Float(v) => Some(*v).filter(|v| v.is_finite()),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Canonical player id
    ///
    /// Numeric ids are truncated to an integer before stringifying so that
    /// `12345`, `12345.0` and `"12345.0"` all resolve to `"12345"`. Numbers
    /// too large for an integer keep their original text.
    pub fn as_player_id(&self) -> Option<String> {
        match self {
            RawValue::Int(v) => Some(v.to_string()),
            RawValue::Float(v) if v.is_finite() => {
                Some(truncate(*v).map_or_else(|| v.to_string(), |id| id.to_string()))
            }
            RawValue::Float(_) => None,
            RawValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                if let Ok(id) = s.parse::<i64>() {
                    return Some(id.to_string());
                }
                match s.parse::<f64>().ok().and_then(truncate) {
                    Some(id) => Some(id.to_string()),
                    None => Some(s.to_string()),
                }
            }
        }
    }
}

/// Truncate toward zero; `None` outside the `i64` range
fn truncate(v: f64) -> Option<i64> {
    let v = v.trunc();
    (v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64).then(|| v as i64)
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// One row of a per-season score table before validation
///
/// Any column may be missing; missing columns are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScoreRow {
    /// Player id (`id` or `player_id` column)
    pub id: Option<RawValue>,
    pub season: Option<RawValue>,
    pub week: Option<RawValue>,
    pub score: Option<RawValue>,
    /// `isAvailable` flag from the export, not used in computation
    pub is_available: Option<RawValue>,
}

impl RawScoreRow {
    /// Convenience constructor for a fully-populated row
    pub fn new(
        id: impl Into<RawValue>,
        season: impl Into<RawValue>,
        week: impl Into<RawValue>,
        score: impl Into<RawValue>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            season: Some(season.into()),
            week: Some(week.into()),
            score: Some(score.into()),
            is_available: None,
        }
    }
}

/// One row of the multi-year player directory before resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlayerRow {
    pub id: Option<RawValue>,
    pub year: Option<RawValue>,
    pub position: Option<String>,
    pub name: Option<String>,
}

impl RawPlayerRow {
    pub fn new(
        id: impl Into<RawValue>,
        year: impl Into<RawValue>,
        position: &str,
        name: &str,
    ) -> Self {
        Self {
            id: Some(id.into()),
            year: Some(year.into()),
            position: Some(position.to_string()),
            name: Some(name.to_string()),
        }
    }
}

/// One player's fantasy score in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFact {
    pub player_id: String,
    pub season: i32,
    pub week: i32,
    pub score: f64,
}

impl ScoreFact {
    pub fn new(player_id: impl Into<String>, season: i32, week: i32, score: f64) -> Self {
        Self { player_id: player_id.into(), season, week, score }
    }
}

/// Most recently observed attributes of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,

    /// Position code (e.g., "QB", "RB", "WR"); `None` if never recorded
    pub position: Option<String>,

    pub name: Option<String>,
}

impl fmt::Display for PlayerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.name.as_deref().unwrap_or("Unknown"),
            self.position.as_deref().unwrap_or("-"),
            self.player_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_canonical_form() {
        assert_eq!(RawValue::Int(12345).as_player_id().as_deref(), Some("12345"));
        assert_eq!(RawValue::Float(12345.0).as_player_id().as_deref(), Some("12345"));
        assert_eq!(RawValue::from("12345.0").as_player_id().as_deref(), Some("12345"));
        assert_eq!(RawValue::from(" 0042 ").as_player_id().as_deref(), Some("42"));
        assert_eq!(RawValue::from("DEF_BUF").as_player_id().as_deref(), Some("DEF_BUF"));
        assert_eq!(RawValue::from("  ").as_player_id(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_player_id(), None);
    }

    #[test]
    fn test_oversized_player_ids_stay_distinct() {
        let a = RawValue::from("99999999999999999999").as_player_id();
        let b = RawValue::from(" 1e30 ").as_player_id();
        assert_eq!(a.as_deref(), Some("99999999999999999999"));
        assert_eq!(b.as_deref(), Some("1e30"));
        assert_ne!(RawValue::Float(1e30).as_player_id(), RawValue::Float(2e30).as_player_id());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(RawValue::from("2024").as_int(), Some(2024));
        assert_eq!(RawValue::from("2024.0").as_int(), Some(2024));
        assert_eq!(RawValue::Float(7.9).as_int(), Some(7));
        assert_eq!(RawValue::from("week").as_int(), None);

        assert_eq!(RawValue::from("12.5").as_float(), Some(12.5));
        assert_eq!(RawValue::Int(3).as_float(), Some(3.0));
        assert_eq!(RawValue::from("").as_float(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_float(), None);
    }

    #[test]
    fn test_out_of_range_numbers_are_missing() {
        assert_eq!(RawValue::from("1e30").as_int(), None);
        assert_eq!(RawValue::Float(-1e19).as_int(), None);
        assert_eq!(RawValue::Float(f64::INFINITY).as_int(), None);

        assert_eq!(RawValue::from("inf").as_float(), None);
        assert_eq!(RawValue::from("-infinity").as_float(), None);
        assert_eq!(RawValue::Float(f64::NEG_INFINITY).as_float(), None);
    }

    #[test]
    fn test_profile_display() {
        let profile = PlayerProfile {
            player_id: "13604".to_string(),
            position: Some("QB".to_string()),
            name: Some("Allen, Josh".to_string()),
        };
        assert_eq!(profile.to_string(), "Allen, Josh (QB, 13604)");
    }
}
