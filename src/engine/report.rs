//! Outcome reporting for applied operations.

use std::fmt;

use crate::models::{LineId, StripId};

/// A reference in an operation that did not resolve on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReference {
    /// No line holds a strip with this id.
    Strip(StripId),
    /// No line has this id.
    Line(LineId),
    /// A split child named no target line at all.
    UnspecifiedLine,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strip(id) => write!(f, "strip #{id}"),
            Self::Line(id) => write!(f, "line '{id}'"),
            Self::UnspecifiedLine => f.write_str("target line (none given)"),
        }
    }
}

/// What one operation did to the board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyReport {
    /// Wire tag of the applied operation.
    pub action_type: &'static str,
    /// Whether any sub-step changed the board.
    pub changed: bool,
    /// Sub-steps skipped because a reference did not resolve.
    pub skipped: Vec<MissingReference>,
    /// Strip created by the operation (split child).
    pub created: Option<StripId>,
    /// Line a strip was relocated to.
    pub relocated_to: Option<LineId>,
}

impl ApplyReport {
    pub(crate) fn new(action_type: &'static str) -> Self {
        Self {
            action_type,
            ..Default::default()
        }
    }

    /// Whether the operation left the board untouched.
    pub fn is_noop(&self) -> bool {
        !self.changed
    }

    /// Whether every sub-step resolved.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
