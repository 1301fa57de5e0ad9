//! Boxer records as returned by `GET /api/boxer/{id}`.
//!
//! Every field is optional and `null` is treated like an absent key. Display
//! fields accept either numbers or strings because the ratio columns come
//! back as floats from some deployments and pre-formatted strings from others.
//! Fields the panel never shows are parsed leniently: a value of the wrong
//! type is dropped instead of failing the whole record.

use crate::result::{RingsideError, RingsideResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A scalar value shown in a detail panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(serde_json::Number),
    /// JSON string
    Text(String),
}

impl StatValue {
    /// Numeric value from an integer
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Number(value.into())
    }

    /// Numeric value from a float; non-finite floats become `null`-like text
    #[must_use]
    pub fn float(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or_else(|| Self::Text(String::new()), Self::Number)
    }

    /// Text value
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// JavaScript truthiness: `0`, `""` and `false` are falsy
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{i}")
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{u}")
                } else {
                    write_js_number(f, n.as_f64().unwrap_or_default())
                }
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Format a float the way JavaScript's `String(number)` does.
///
/// Plain decimal between `1e-6` and `1e21`, exponent form outside it
/// (`1e+21`, `1.5e-7`). `f64` Display already drops a zero fraction.
fn write_js_number(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let exp = format!("{value:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{mantissa}e+{power}")
            }
            _ => f.write_str(&exp),
        }
    } else {
        write!(f, "{value}")
    }
}

/// Keep a value only if it has the expected type
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One bout in a boxer's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightSummary {
    /// Fight id
    #[serde(deserialize_with = "lenient")]
    pub id: Option<i64>,
    /// First boxer
    #[serde(deserialize_with = "lenient")]
    pub boxer_a_id: Option<i64>,
    /// Second boxer
    #[serde(deserialize_with = "lenient")]
    pub boxer_b_id: Option<i64>,
    /// Winner's id, absent for a draw
    #[serde(deserialize_with = "lenient")]
    pub winner_id: Option<i64>,
    /// ISO date (`YYYY-MM-DD`)
    #[serde(deserialize_with = "lenient")]
    pub date: Option<String>,
    /// Rounds fought
    #[serde(deserialize_with = "lenient")]
    pub rounds_completed: Option<i64>,
    /// KO, TKO, UD, SD, ...
    #[serde(deserialize_with = "lenient")]
    pub method: Option<String>,
    /// Venue
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    /// Whether a title was on the line
    #[serde(deserialize_with = "lenient")]
    pub title_fight: Option<bool>,
}

/// A boxer profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxerRecord {
    /// Photo URL
    pub photo: Option<String>,
    /// Ring name, shown without a label
    pub alias: Option<String>,
    /// Height in centimetres
    pub height_cm: Option<StatValue>,
    /// Reach in centimetres
    pub reach_cm: Option<StatValue>,
    /// Orthodox, Southpaw, ...
    pub stance: Option<StatValue>,
    /// Career wins
    pub wins: Option<StatValue>,
    /// Career losses
    pub losses: Option<StatValue>,
    /// Share of wins by knockout
    pub ko_ratio: Option<StatValue>,
    /// Share of fights won
    pub win_ratio: Option<StatValue>,
    /// Era(s) the boxer was active in
    pub eras: Option<StatValue>,

    // Carried but not rendered
    /// Full name
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Elo rating
    #[serde(deserialize_with = "lenient")]
    pub elo_rating: Option<f64>,
    /// Era-adjusted z-score
    #[serde(deserialize_with = "lenient")]
    pub adjusted_z_score: Option<f64>,
    /// Composite performance score
    #[serde(deserialize_with = "lenient")]
    pub performance_score: Option<f64>,
    /// Number of recorded fights
    #[serde(deserialize_with = "lenient")]
    pub num_of_fights: Option<f64>,
    /// Wins by knockout
    #[serde(deserialize_with = "lenient")]
    pub wins_by_ko: Option<f64>,
    /// Wins on points
    #[serde(deserialize_with = "lenient")]
    pub wins_by_decision: Option<f64>,
    /// Wins by disqualification
    #[serde(deserialize_with = "lenient")]
    pub wins_by_dq: Option<f64>,
    /// Losses by knockout
    #[serde(deserialize_with = "lenient")]
    pub losses_by_ko: Option<f64>,
    /// Losses on points
    #[serde(deserialize_with = "lenient")]
    pub losses_by_decision: Option<f64>,
    /// Losses by disqualification
    #[serde(deserialize_with = "lenient")]
    pub losses_by_dq: Option<f64>,
    /// Fight history; entries that are not objects drop the whole list
    #[serde(deserialize_with = "lenient")]
    pub fights: Option<Vec<FightSummary>>,
}

impl BoxerRecord {
    /// Parse a response body. The body must be a JSON object.
    pub fn from_json(body: &str) -> RingsideResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(RingsideError::MalformedRecord {
                found: json_type(&value),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fight history (empty when the server sent none)
    #[must_use]
    pub fn fights(&self) -> &[FightSummary] {
        self.fights.as_deref().unwrap_or_default()
    }

    /// Name for log lines: name, then alias, then a placeholder
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.alias.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or("<unnamed>")
    }
}

/// Error body the API sends with non-200 statuses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    /// Server's message
    pub error: String,
}

impl ApiErrorBody {
    /// Extract the server's message from a body, if it has one
    #[must_use]
    pub fn message(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body).ok().map(|b| b.error)
    }
}
