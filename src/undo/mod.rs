//! Snapshot/undo registry and action card lifecycle.
//!
//! Each action card gets a unique [`ActionToken`]. Applying a card records
//! a deep copy of the board under that token; undoing it swaps the copy
//! back in. Restores are non-consuming, so repeating an undo is harmless.

mod card;
mod registry;
mod token;

pub use card::{ActionCard, CardAction, CardState, TransitionError};
pub use registry::{SnapshotRegistry, UndoError};
pub use token::{ActionToken, CardKind};
