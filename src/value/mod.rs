//! Element values and identity
//!
//! A value is an integer, a float or opaque text. Ordering is only
//! defined between numeric values; anything that needs a key (BST
//! descent, merge-tree weights) must go through [`Value::compare`]
//! or [`Value::weight`] and handle the error.

mod ids;

pub use ids::{IdCounter, NodeId};

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::VizError;

/// Tagged element value
///
/// Serialized untagged, so `5`, `2.5` and `"abc"` map straight onto
/// the three variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole number
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Opaque text (sequence-like structures only)
    Text(String),
}

impl Value {
    /// Coerce a single token: integer first, then finite float,
    /// otherwise text. `nan` and `inf` stay text.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
        match token.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(token.to_string()),
        }
    }

    /// Whether this value participates in numeric ordering
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite(),
            Value::Text(_) => false,
        }
    }

    /// False only for NaN and infinite floats, which JSON cannot hold.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::Int(_) | Value::Text(_) => true,
        }
    }

    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    /// Weight used by the merge-tree builder.
    ///
    /// Numbers convert directly; text is accepted only if it parses as
    /// a finite float.
    pub fn weight(&self) -> Result<f64, VizError> {
        let weight = match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        };
        match weight {
            Some(w) if w.is_finite() => Ok(w),
            _ => Err(VizError::InvalidValue(format!(
                "'{}' is not a numeric weight",
                self
            ))),
        }
    }

    /// Numeric comparison used for key ordering.
    ///
    /// Exact for every pair, including integers beyond 2^53 against
    /// floats. Text or a non-finite float on either side is an error.
    pub fn compare(&self, other: &Value) -> Result<Ordering, VizError> {
        self.require_numeric()?;
        other.require_numeric()?;
        let ordering = match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => Some(cmp_int_float(*a, *b)),
            (Value::Float(a), Value::Int(b)) => Some(cmp_int_float(*b, *a).reverse()),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            _ => None,
        };
        ordering.ok_or_else(|| {
            VizError::InvalidValue(format!("cannot order {} against {}", self, other))
        })
    }

    /// Fail with [`VizError::InvalidValue`] unless the value is numeric.
    pub fn require_numeric(&self) -> Result<f64, VizError> {
        match self.as_f64() {
            Some(f) if self.is_numeric() => Ok(f),
            _ => Err(VizError::InvalidValue(format!(
                "numeric value required, got {}",
                self
            ))),
        }
    }
}

/// Order an integer against a finite float without rounding the integer.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    // i64::MIN is exactly -2^63; 2^63 itself is one past i64::MAX
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if float >= TWO_63 {
        return Ordering::Less;
    }
    if float < -TWO_63 {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.total_cmp(&(float - whole)),
        unequal => unequal,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Split raw user input into values.
///
/// Accepts commas (ASCII or full-width) and any whitespace as
/// separators; empty tokens are dropped.
pub fn parse_sequence(text: &str) -> Vec<Value> {
    text.split(|c: char| c == ',' || c == '，' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(Value::parse)
        .collect()
}
