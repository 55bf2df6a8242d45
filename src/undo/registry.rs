//! Snapshot registry for point-in-time undo.
//!
//! Maps an action token to a deep copy of the factory taken right before
//! that card's change was applied. Undo is a wholesale restore, not an
//! inverse-operation replay.

use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use super::ActionToken;
use crate::models::Factory;

/// Errors from the snapshot registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error("No snapshot recorded for action {0}")]
    NotFound(ActionToken),
}

/// Pre-mutation factory copies keyed by action token.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRegistry {
    snapshots: HashMap<ActionToken, Factory>,
}

impl SnapshotRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a deep copy of `factory` under `token`, replacing any
    /// earlier snapshot for the same token.
    pub fn snapshot(&mut self, token: &ActionToken, factory: &Factory) {
        let replaced = self
            .snapshots
            .insert(token.clone(), factory.clone())
            .is_some();
        info!(%token, replaced, "snapshot recorded");
    }

    /// Returns a copy of the snapshot for `token`. The snapshot stays in
    /// the registry, so restoring twice yields the same factory.
    pub fn restore(&self, token: &ActionToken) -> Result<Factory, UndoError> {
        self.snapshots
            .get(token)
            .cloned()
            .ok_or_else(|| UndoError::NotFound(token.clone()))
    }

    /// Whether a snapshot exists for `token`.
    pub fn contains(&self, token: &ActionToken) -> bool {
        self.snapshots.contains_key(token)
    }

    /// Drops the snapshot for `token`, returning it.
    pub fn discard(&mut self, token: &ActionToken) -> Option<Factory> {
        self.snapshots.remove(token)
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot is recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
