//! Tolerant decoding of unit counts.
//!
//! Advisory services send quantities as `40`, `40.0` or `"40"`. All three
//! decode to the same count. Negative and fractional values are rejected.
//!
//! Used through `#[serde(deserialize_with = "...")]` on quantity fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Int(u64),
    Float(f64),
    Text(String),
}

impl RawQuantity {
    fn into_count(self) -> Result<u64, String> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Float(f) => from_float(f),
            Self::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<u64>() {
                    Ok(n) => Ok(n),
                    Err(_) => trimmed
                        .parse::<f64>()
                        .map_err(|_| format!("invalid quantity '{s}'"))
                        .and_then(from_float),
                }
            }
        }
    }
}

fn from_float(f: f64) -> Result<u64, String> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Ok(f as u64)
    } else {
        Err(format!("quantity must be a non-negative integer, got {f}"))
    }
}

/// Decodes a required quantity.
pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    RawQuantity::deserialize(deserializer)?
        .into_count()
        .map_err(serde::de::Error::custom)
}

/// Decodes an optional quantity. `null` is `None`.
pub(crate) fn deserialize_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    Option::<RawQuantity>::deserialize(deserializer)?
        .map(RawQuantity::into_count)
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Reads a quantity out of an already-decoded value, or `None` if it is
/// not one.
pub(crate) fn from_value(value: &Value) -> Option<u64> {
    RawQuantity::deserialize(value).ok()?.into_count().ok()
}
