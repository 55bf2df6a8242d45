//! Action tokens identifying user-facing action cards.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What an action card applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// One operation from the optimizer.
    Proposal,
    /// An ordered batch of operations from the simulator.
    Scenario,
}

impl CardKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Proposal => "prop",
            Self::Scenario => "scen",
        }
    }
}

/// Opaque, unique identifier of one action card.
///
/// Formatted `prop-<uuid>` or `scen-<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionToken(String);

impl ActionToken {
    /// Generates a fresh token for a card of the given kind.
    pub fn generate(kind: CardKind) -> Self {
        Self(format!("{}-{}", kind.prefix(), Uuid::new_v4().simple()))
    }

    /// Wraps an existing token string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Card kind encoded in the prefix, if recognizable.
    pub fn kind(&self) -> Option<CardKind> {
        if self.0.starts_with("scen-") {
            Some(CardKind::Scenario)
        } else if self.0.starts_with("prop-") {
            Some(CardKind::Proposal)
        } else {
            None
        }
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
