//! Board store: the single owned factory value.

use crate::models::Factory;

/// Owns the current factory. All changes go through [`BoardStore::replace`],
/// which swaps a fully derived value in one step.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    factory: Factory,
    revision: u64,
}

impl BoardStore {
    /// Creates a store holding `factory` at revision 0.
    pub fn new(factory: Factory) -> Self {
        Self {
            factory,
            revision: 0,
        }
    }

    /// The current factory.
    pub fn current(&self) -> &Factory {
        &self.factory
    }

    /// Swaps in `next`, returning the previous factory.
    pub fn replace(&mut self, next: Factory) -> Factory {
        self.revision += 1;
        std::mem::replace(&mut self.factory, next)
    }

    /// Number of replacements since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
