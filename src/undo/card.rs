//! Action card lifecycle.
//!
//! # State Flow
//!
//! ```text
//! Proposed ──apply──▶ Applied ──undo──▶ Undone ──apply──▶ Applied ...
//!    │                                     │
//!    └───────────dismiss──────▶ Dismissed ◀┘
//! ```
//!
//! Every apply takes a fresh snapshot, so undo always returns to the
//! board as it was right before the most recent apply.

use std::fmt;
use thiserror::Error;

use super::{ActionToken, CardKind};
use crate::models::Operation;

/// Lifecycle state of an action card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardState {
    /// Shown to the user, never applied.
    Proposed,
    /// Applied to the board; a snapshot exists.
    Applied,
    /// Applied, then restored from its snapshot.
    Undone,
    /// Dismissed by the user (terminal).
    Dismissed,
}

impl CardState {
    /// Whether the card can no longer change state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dismissed)
    }
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Proposed => "proposed",
            Self::Applied => "applied",
            Self::Undone => "undone",
            Self::Dismissed => "dismissed",
        };
        f.write_str(name)
    }
}

/// User gesture on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Apply the card's operations. Allowed from `Proposed` and `Undone`.
    Apply,
    /// Restore the board from before the apply. Allowed from `Applied`.
    Undo,
    /// Hide the card. Allowed from `Proposed` and `Undone`.
    Dismiss,
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Apply => "apply",
            Self::Undo => "undo",
            Self::Dismiss => "dismiss",
        };
        f.write_str(name)
    }
}

/// Rejected card transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot {action} action {token} while it is {from}")]
pub struct TransitionError {
    pub token: ActionToken,
    pub from: CardState,
    pub action: CardAction,
}

/// One user-facing action: a proposal or a scenario, with its operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCard {
    token: ActionToken,
    kind: CardKind,
    operations: Vec<Operation>,
    state: CardState,
}

impl ActionCard {
    /// Card for a single proposal.
    pub fn proposal(operation: Operation) -> Self {
        Self::with_token(
            ActionToken::generate(CardKind::Proposal),
            CardKind::Proposal,
            vec![operation],
        )
    }

    /// Card for a scenario's ordered operations.
    pub fn scenario(operations: Vec<Operation>) -> Self {
        Self::with_token(
            ActionToken::generate(CardKind::Scenario),
            CardKind::Scenario,
            operations,
        )
    }

    /// Card with an explicit token.
    pub fn with_token(token: ActionToken, kind: CardKind, operations: Vec<Operation>) -> Self {
        Self {
            token,
            kind,
            operations,
            state: CardState::Proposed,
        }
    }

    /// Token keying this card's snapshot.
    pub fn token(&self) -> &ActionToken {
        &self.token
    }

    /// Proposal or scenario.
    pub fn kind(&self) -> CardKind {
        self.kind
    }

    /// Operations in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Checks whether `action` is allowed in the current state.
    pub fn check(&self, action: CardAction) -> Result<(), TransitionError> {
        let allowed = match action {
            CardAction::Apply => matches!(self.state, CardState::Proposed | CardState::Undone),
            CardAction::Undo => self.state == CardState::Applied,
            CardAction::Dismiss => matches!(self.state, CardState::Proposed | CardState::Undone),
        };
        if allowed {
            Ok(())
        } else {
            Err(TransitionError {
                token: self.token.clone(),
                from: self.state,
                action,
            })
        }
    }

    /// Performs `action`, moving to its target state.
    pub fn transition(&mut self, action: CardAction) -> Result<CardState, TransitionError> {
        self.check(action)?;
        self.state = match action {
            CardAction::Apply => CardState::Applied,
            CardAction::Undo => CardState::Undone,
            CardAction::Dismiss => CardState::Dismissed,
        };
        Ok(self.state)
    }
}
