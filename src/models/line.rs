//! Production line model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{LineId, Strip, StripId};

/// One physical production line.
///
/// Strips are kept in insertion order, which is display order and not
/// necessarily time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Stable line identifier, the target of moves.
    pub line_id: LineId,
    /// Human-readable label.
    #[serde(default)]
    pub line_code: String,
    /// Scheduled strips in display order.
    #[serde(rename = "ordersData", default)]
    pub orders: Vec<Strip>,
    /// Unrecognized fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Line {
    /// Creates an empty line.
    pub fn new(line_id: impl Into<LineId>, line_code: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            line_code: line_code.into(),
            orders: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Appends a strip.
    pub fn with_strip(mut self, strip: Strip) -> Self {
        self.orders.push(strip);
        self
    }

    /// Position of a strip in this line's order sequence.
    pub fn position_of(&self, strip_id: StripId) -> Option<usize> {
        self.orders.iter().position(|s| s.strip_id == strip_id)
    }

    /// Whether this line holds the given strip.
    pub fn contains(&self, strip_id: StripId) -> bool {
        self.position_of(strip_id).is_some()
    }

    /// Sum of strip quantities on this line.
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(|s| s.quantity).sum()
    }
}
