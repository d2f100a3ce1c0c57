//! # Numeric Normalizer
//! Turns the loosely-typed scalars an extractor emits (`1200000`, `"$1.2M"`,
//! `"1,200"`, `"5k"`, `null`) into a single `Option<f64>`.
//!
//! Total function: anything that does not parse becomes `None`, never an error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A scalar as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Shorthand for [`normalize`].
    pub fn as_f64(&self) -> Option<f64> {
        normalize(self)
    }
}

impl From<Value> for ScalarValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => ScalarValue::Null,
            Value::Number(n) => n.as_f64().map(ScalarValue::Number).unwrap_or_default(),
            Value::String(s) => ScalarValue::Text(s),
            // Booleans count as 1/0, the way extractors sometimes flag presence.
            Value::Bool(b) => ScalarValue::Number(if b { 1.0 } else { 0.0 }),
            Value::Array(_) | Value::Object(_) => ScalarValue::Null,
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(x: f64) -> Self {
        ScalarValue::Number(x)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

// Accept any JSON shape; unexpected ones collapse to Null instead of failing the record.
impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(ScalarValue::from(v))
    }
}

/// Normalize a scalar into a finite `f64`, or `None` if it is null or unparseable.
pub fn normalize(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Null => None,
        ScalarValue::Number(x) => finite(*x),
        ScalarValue::Text(s) => parse_amount(s),
    }
}

/// Parse a money/percentage string such as `"$1.2M"`, `"USD 250k"` or `"1,200"`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '$')
        .collect();
    let s = stripped.to_lowercase().replace("usd", "");

    let (digits, mult) = match s.chars().last() {
        Some('k') => (&s[..s.len() - 1], 1_000.0),
        Some('m') => (&s[..s.len() - 1], 1_000_000.0),
        Some('b') => (&s[..s.len() - 1], 1_000_000_000.0),
        _ => (s.as_str(), 1.0),
    };

    let x = digits.parse::<f64>().ok()?;
    finite(x * mult)
}

// NaN/inf parse fine as floats but carry no business meaning.
fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}
