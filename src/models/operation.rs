//! Board operations.
//!
//! An operation is one structured schedule mutation, tagged by
//! `actionType` exactly as the advisory services emit it:
//!
//! | actionType | Variant |
//! |------------|---------|
//! | `move_along_line` | [`Operation::MoveAlongLine`] |
//! | `move_across_lines` | [`Operation::MoveAcrossLines`] |
//! | `split_parent` | [`Operation::SplitParent`] |
//! | `split_child` | [`Operation::SplitChild`] |
//! | anything else | [`Operation::Unrecognized`] (no-op) |

use serde::{Deserialize, Serialize};

use super::quantity;
use super::{LineId, StripId};

/// A structured schedule mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType", rename_all = "snake_case")]
pub enum Operation {
    /// Reschedule a strip in place.
    MoveAlongLine(MoveOrder),
    /// Reschedule a strip and move it to another line.
    MoveAcrossLines(MoveOrder),
    /// Shrink a strip to the parent share of a split.
    SplitParent(SplitParent),
    /// Create the child strip of a split.
    SplitChild(SplitChild),
    /// Any action type the engine does not know. Applying it is a no-op.
    #[serde(other)]
    Unrecognized,
}

/// Coarse classification used for card labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Along or across lines.
    Move,
    /// Parent or child half of a split.
    Split,
    /// Unrecognized.
    Other,
}

/// Payload of `move_along_line` / `move_across_lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOrder {
    /// Strip to move.
    pub strip_id: StripId,
    /// New window start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_from: Option<String>,
    /// New window end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_to: Option<String>,
    /// Destination line (across-lines moves only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id_to: Option<LineId>,
}

/// Payload of `split_parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitParent {
    /// Strip being split.
    pub strip_id: StripId,
    /// Quantity remaining on the parent.
    #[serde(
        default,
        deserialize_with = "quantity::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity_to: Option<u64>,
    /// Optional relocation of the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id_to: Option<LineId>,
}

/// Payload of `split_child`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChild {
    /// Line receiving the child strip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line_id: Option<LineId>,
    /// Child window start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_start_date: Option<String>,
    /// Child quantity. Not derived from the parent.
    #[serde(default, deserialize_with = "quantity::deserialize")]
    pub new_quantity: u64,
    /// Originating parent, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_strip_id: Option<StripId>,
}

impl Operation {
    /// `move_along_line` with optional new window.
    pub fn move_along_line(strip_id: impl Into<StripId>) -> Self {
        Self::MoveAlongLine(MoveOrder::new(strip_id))
    }

    /// `move_across_lines` to the given line.
    pub fn move_across_lines(strip_id: impl Into<StripId>, line_id_to: impl Into<LineId>) -> Self {
        Self::MoveAcrossLines(MoveOrder::new(strip_id).to_line(line_id_to))
    }

    /// `split_parent` keeping `quantity_to` on the parent.
    pub fn split_parent(strip_id: impl Into<StripId>, quantity_to: u64) -> Self {
        Self::SplitParent(SplitParent {
            strip_id: strip_id.into(),
            quantity_to: Some(quantity_to),
            line_id_to: None,
        })
    }

    /// `split_child` placing `new_quantity` units on `new_line_id`.
    pub fn split_child(new_line_id: impl Into<LineId>, new_quantity: u64) -> Self {
        Self::SplitChild(SplitChild {
            new_line_id: Some(new_line_id.into()),
            new_start_date: None,
            new_quantity,
            parent_strip_id: None,
        })
    }

    /// Wire tag of this operation.
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::MoveAlongLine(_) => "move_along_line",
            Self::MoveAcrossLines(_) => "move_across_lines",
            Self::SplitParent(_) => "split_parent",
            Self::SplitChild(_) => "split_child",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Coarse classification.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::MoveAlongLine(_) | Self::MoveAcrossLines(_) => ActionKind::Move,
            Self::SplitParent(_) | Self::SplitChild(_) => ActionKind::Split,
            Self::Unrecognized => ActionKind::Other,
        }
    }

    /// Strip the operation is about. For a split child, its parent.
    pub fn subject_strip(&self) -> Option<StripId> {
        match self {
            Self::MoveAlongLine(m) | Self::MoveAcrossLines(m) => Some(m.strip_id),
            Self::SplitParent(s) => Some(s.strip_id),
            Self::SplitChild(c) => c.parent_strip_id,
            Self::Unrecognized => None,
        }
    }
}

impl MoveOrder {
    /// Move of the given strip with no window change.
    pub fn new(strip_id: impl Into<StripId>) -> Self {
        Self {
            strip_id: strip_id.into(),
            start_date_from: None,
            start_date_to: None,
            line_id_to: None,
        }
    }

    /// Sets the new window.
    pub fn with_window(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.start_date_from = Some(from.into());
        self.start_date_to = Some(to.into());
        self
    }

    /// Sets the destination line.
    pub fn to_line(mut self, line_id: impl Into<LineId>) -> Self {
        self.line_id_to = Some(line_id.into());
        self
    }
}

impl SplitParent {
    /// Sets the relocation line.
    pub fn to_line(mut self, line_id: impl Into<LineId>) -> Self {
        self.line_id_to = Some(line_id.into());
        self
    }
}

impl SplitChild {
    /// Sets the child window start.
    pub fn starting(mut self, start: impl Into<String>) -> Self {
        self.new_start_date = Some(start.into());
        self
    }

    /// Sets the parent back-reference.
    pub fn of_parent(mut self, parent: impl Into<StripId>) -> Self {
        self.parent_strip_id = Some(parent.into());
        self
    }
}
