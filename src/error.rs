//! Crate-level error type.
//!
//! Each subsystem has its own error enum; [`BoardError`] unifies them for
//! callers driving the whole board through [`crate::session::Session`].

use thiserror::Error;

use crate::advisory::AdvisoryError;
use crate::config::ConfigError;
use crate::engine::MutationError;
use crate::intake::IntakeError;
use crate::undo::{ActionToken, TransitionError, UndoError};

/// Errors surfaced by the board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Advisory(#[from] AdvisoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown action card {0}")]
    UnknownCard(ActionToken),

    #[error("Invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
