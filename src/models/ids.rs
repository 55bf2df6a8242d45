//! Identifier types for lines and strips.
//!
//! Advisory services are loose about identifier encoding: a line id may
//! arrive as `"L2"`, `"0002"` or `2`, a strip id as `7` or `"7"`. Both
//! identifiers accept either form on decode and compare by value: a line
//! id whose text is an integer compares as that integer, so `"0002"`,
//! `"2"` and `2` name the same line.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a strip (one scheduled order instance).
///
/// Positive ids come from the persisted schedule. Negative ids are
/// temporary: they mark strips synthesized by a split that no downstream
/// system has persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StripId(pub i64);

impl StripId {
    /// Whether this id was allocated locally and is not yet persisted.
    #[inline]
    pub fn is_temporary(self) -> bool {
        self.0 < 0
    }

    /// Raw numeric value.
    #[inline]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for StripId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for StripId {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl fmt::Display for StripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for StripId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for StripId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Ok(Self(n)),
            RawId::Float(f) if f.fract() == 0.0 => Ok(Self(f as i64)),
            RawId::Float(f) => Err(serde::de::Error::custom(format!(
                "strip id must be an integer, got {f}"
            ))),
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid strip id '{s}'"))),
        }
    }
}

/// Identifier of a production line.
///
/// Ids whose text parses as an integer compare numerically, so `2`,
/// `"2"` and `"0002"` name the same line. Other ids compare by text.
/// Remembers whether it was decoded from a JSON number so the board
/// re-encodes it the way the source sent it.
#[derive(Debug, Clone, Eq)]
pub struct LineId {
    text: String,
    numeric: bool,
}

impl LineId {
    /// Creates a textual line id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: false,
        }
    }

    /// Creates a line id that encodes as a JSON number.
    pub fn numeric(value: i64) -> Self {
        Self {
            text: value.to_string(),
            numeric: true,
        }
    }

    /// Textual form as sent, used for display.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the id is empty (after trimming whitespace).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn canonical(&self) -> CanonicalLineId<'_> {
        match self.text.trim().parse::<i64>() {
            Ok(n) => CanonicalLineId::Number(n),
            Err(_) => CanonicalLineId::Text(&self.text),
        }
    }
}

/// Comparison key of a [`LineId`].
#[derive(PartialEq, Eq, Hash)]
enum CanonicalLineId<'a> {
    Number(i64),
    Text(&'a str),
}

impl PartialEq for LineId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Hash for LineId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LineId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(n) = self.text.parse::<i64>() {
                return serializer.serialize_i64(n);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self::new(s),
            RawId::Int(n) => Self::numeric(n),
            RawId::Float(f) if f.fract() == 0.0 => Self::numeric(f as i64),
            RawId::Float(f) => Self::new(f.to_string()),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}
