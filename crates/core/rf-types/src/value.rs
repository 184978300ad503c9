//! Scalar cell values.

use serde::{Deserialize, Serialize};

/// A single cell value in a record.
///
/// The engine works on flat rows of scalars; nested arrays and objects are
/// not part of the data model. Numeric results with a zero fractional part
/// are represented as [`Value::Int`], everything else as [`Value::Float`]
/// (see [`Value::from_number`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent/null cell
    Null,
    /// Boolean
    Bool(bool),
    /// Integer (also used for whole-number arithmetic results)
    Int(i64),
    /// Floating point
    Float(f64),
    /// String
    String(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stringified form of the value, or `None` for null.
    ///
    /// This is the representation used by `concat`, `uppercase`/`lowercase`
    /// and `equals` comparisons: integers print without a fractional part,
    /// booleans as `true`/`false`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
        }
    }

    /// Best-effort numeric interpretation used by `add`/`multiply`.
    ///
    /// Strings are parsed; null, booleans, and unparsable strings yield
    /// `None` and are silently skipped by arithmetic operations.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => s.trim().parse::<f64>().ok(),
            Self::Null | Self::Bool(_) => None,
        }
    }

    /// Builds a numeric value from an arithmetic result.
    ///
    /// Whole numbers become [`Value::Int`]; anything with a fractional part,
    /// a non-finite value, or a magnitude that cannot be represented exactly
    /// in an `i64` stays [`Value::Float`]. Holds across the full range
    /// including negatives.
    pub fn from_number(n: f64) -> Self {
        const I64_EXACT_MAX: f64 = 9_007_199_254_740_992.0; // 2^53
        if n.is_finite() && n.fract() == 0.0 && n.abs() <= I64_EXACT_MAX {
            Self::Int(n as i64)
        } else {
            Self::Float(n)
        }
    }

    /// Converts a JSON scalar into a [`Value`].
    ///
    /// Returns `None` for arrays and objects, which have no place in the
    /// flat-record model.
    pub fn from_json_scalar(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
