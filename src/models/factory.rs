//! Factory (board root) model.
//!
//! The factory is the full schedule: ordered lines, each with ordered
//! strips, plus an opaque grid context forwarded untouched to advisory
//! services. It is treated as a value: mutations derive a new factory
//! from the current one and the store swaps it in whole.
//!
//! # Wire Shape
//!
//! ```json
//! { "factoryData": { "data": [ { "lineId": "L1", "lineCode": "0001", "ordersData": [] } ] },
//!   "gridData": { } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Line, LineId, Strip, StripId};

/// Opaque grid/context blob accompanying the schedule.
pub type Grid = Value;

/// Position of a strip on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLocation {
    /// Index of the owning line in [`Factory::lines`].
    pub line_index: usize,
    /// Index of the strip in that line's order sequence.
    pub position: usize,
}

/// The full production schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FactoryRecord", into = "FactoryRecord")]
pub struct Factory {
    /// Production lines in display order.
    pub lines: Vec<Line>,
    /// Opaque grid context.
    pub grid: Grid,
    /// Unrecognized `factoryData` fields.
    pub factory_extra: Map<String, Value>,
    /// Unrecognized top-level fields.
    pub extra: Map<String, Value>,
}

impl Factory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line.
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    /// Sets the grid context.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    /// Decodes a factory from its JSON source shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The `factoryData` object as sent to advisory services.
    pub fn factory_data(&self) -> Value {
        let mut data = self.factory_extra.clone();
        data.insert(
            "data".into(),
            serde_json::to_value(&self.lines).unwrap_or(Value::Array(Vec::new())),
        );
        Value::Object(data)
    }

    /// Locates a strip by id, scanning lines in order. First match wins.
    pub fn locate_strip(&self, strip_id: StripId) -> Option<StripLocation> {
        self.lines.iter().enumerate().find_map(|(line_index, line)| {
            line.position_of(strip_id).map(|position| StripLocation {
                line_index,
                position,
            })
        })
    }

    /// Finds a strip by id.
    pub fn find_strip(&self, strip_id: StripId) -> Option<&Strip> {
        let loc = self.locate_strip(strip_id)?;
        self.lines[loc.line_index].orders.get(loc.position)
    }

    /// Index of a line by id.
    pub fn line_index(&self, line_id: &LineId) -> Option<usize> {
        self.lines.iter().position(|l| &l.line_id == line_id)
    }

    /// Finds a line by id.
    pub fn line(&self, line_id: &LineId) -> Option<&Line> {
        self.lines.iter().find(|l| &l.line_id == line_id)
    }

    /// Line currently owning a strip.
    pub fn owner_of(&self, strip_id: StripId) -> Option<&Line> {
        self.locate_strip(strip_id)
            .map(|loc| &self.lines[loc.line_index])
    }

    /// All strip ids in board order.
    pub fn strip_ids(&self) -> Vec<StripId> {
        self.strips().map(|s| s.strip_id).collect()
    }

    /// Iterates all strips in board order.
    pub fn strips(&self) -> impl Iterator<Item = &Strip> {
        self.lines.iter().flat_map(|l| l.orders.iter())
    }

    /// Number of lines holding the given strip. Exactly 1 for a healthy board.
    pub fn owner_count(&self, strip_id: StripId) -> usize {
        self.lines.iter().filter(|l| l.contains(strip_id)).count()
    }

    /// Smallest strip id on the board, if any.
    pub fn min_strip_id(&self) -> Option<StripId> {
        self.strips().map(|s| s.strip_id).min()
    }

    /// Total number of strips.
    pub fn strip_count(&self) -> usize {
        self.lines.iter().map(|l| l.orders.len()).sum()
    }

    /// Sum of all strip quantities.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(Line::total_quantity).sum()
    }
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FactoryRecord {
    #[serde(default)]
    factory_data: FactoryDataRecord,
    #[serde(default)]
    grid_data: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FactoryDataRecord {
    #[serde(default)]
    data: Vec<Line>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<FactoryRecord> for Factory {
    fn from(record: FactoryRecord) -> Self {
        Self {
            lines: record.factory_data.data,
            grid: record.grid_data,
            factory_extra: record.factory_data.extra,
            extra: record.extra,
        }
    }
}

impl From<Factory> for FactoryRecord {
    fn from(factory: Factory) -> Self {
        Self {
            factory_data: FactoryDataRecord {
                data: factory.lines,
                extra: factory.factory_extra,
            },
            grid_data: factory.grid,
            extra: factory.extra,
        }
    }
}
