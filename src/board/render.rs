//! Presentation boundary.

use crate::models::Factory;

/// Receives the board whenever it should be redrawn.
///
/// Called once per visible change: once per single operation applied with
/// rendering enabled, once per scenario, once per restore.
pub trait RenderSink {
    /// Shows `factory`, which the store now holds at `revision`.
    fn render(&mut self, factory: &Factory, revision: u64);
}

/// Discards render signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _factory: &Factory, _revision: u64) {}
}

/// Counts render signals and remembers the last revision drawn.
#[derive(Debug, Clone, Default)]
pub struct RenderCounter {
    pub renders: usize,
    pub last_revision: Option<u64>,
}

impl RenderSink for RenderCounter {
    fn render(&mut self, _factory: &Factory, revision: u64) {
        self.renders += 1;
        self.last_revision = Some(revision);
    }
}
