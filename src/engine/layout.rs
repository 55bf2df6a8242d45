//! Presentation-only layout heuristics.
//!
//! Moving or splitting a strip should leave the visual board plausible,
//! but offsets and widths carry no scheduling meaning. The heuristics
//! live behind [`LayoutPolicy`] so tests can pin them down exactly.
//!
//! Every policy is a pure function of the strip it is given: applying the
//! same operation to the same factory always yields the same layout.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

use crate::config::LayoutConfig;
use crate::models::{Strip, StripLayout};

/// Window end assigned to a freshly split child strip.
pub const SPLIT_CHILD_END_DATE: &str = "2025-02-02T08:00:00";
/// Buyer label marking a split product.
pub const SPLIT_CHILD_BUYER: &str = "SPLIT-CHILD";
/// Offset of a freshly split child strip.
pub const SPLIT_CHILD_OFFSET: f64 = 35.0;
/// Width of a freshly split child strip.
pub const SPLIT_CHILD_WIDTH: f64 = 10.0;
/// Background of a split product.
pub const SPLIT_CHILD_BACKGROUND: &str = "#dcfce7";
/// Border of a split product.
pub const SPLIT_CHILD_BORDER: &str = "1px solid #86efac";

/// Layout heuristics applied by the mutation engine.
pub trait LayoutPolicy: Send + Sync + Debug {
    /// Offset after the strip was moved.
    fn nudged_offset(&self, strip: &Strip) -> f64;

    /// Width after the strip became a split parent.
    fn shrunk_width(&self, strip: &Strip) -> f64;

    /// Layout of a newly created split child.
    fn child_layout(&self) -> StripLayout {
        StripLayout::new(SPLIT_CHILD_OFFSET, SPLIT_CHILD_WIDTH)
            .with_style(SPLIT_CHILD_BACKGROUND, SPLIT_CHILD_BORDER)
    }
}

/// Deterministic layout: even strip ids nudge right, odd ids nudge left.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLayout {
    /// Offset change per move.
    pub nudge_step: f64,
    /// Offset assumed when a strip has none.
    pub default_offset: f64,
    /// Width assumed when a strip has none.
    pub default_width: f64,
    /// Width multiplier for a split parent.
    pub shrink_factor: f64,
}

impl Default for FixedLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl FixedLayout {
    /// Builds the policy from the `[layout]` configuration section.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            nudge_step: config.nudge_step,
            default_offset: config.default_offset,
            default_width: config.default_width,
            shrink_factor: config.shrink_factor,
        }
    }

    fn base_offset(&self, strip: &Strip) -> f64 {
        strip.layout.offset.unwrap_or(self.default_offset)
    }
}

impl LayoutPolicy for FixedLayout {
    fn nudged_offset(&self, strip: &Strip) -> f64 {
        let direction = if strip.strip_id.value() % 2 == 0 { 1.0 } else { -1.0 };
        self.base_offset(strip) + direction * self.nudge_step
    }

    fn shrunk_width(&self, strip: &Strip) -> f64 {
        strip.layout.width.unwrap_or(self.default_width) * self.shrink_factor
    }
}

/// Random left/right nudges, reproducible from a seed.
///
/// The generator is re-seeded per strip from `(seed, strip id, current
/// offset)`, so the outcome depends only on the input strip.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededJitter {
    base: FixedLayout,
    seed: u64,
}

impl SeededJitter {
    /// Wraps a fixed layout, replacing its nudge direction with a seeded coin flip.
    pub fn new(base: FixedLayout, seed: u64) -> Self {
        Self { base, seed }
    }

    fn rng_for(&self, strip: &Strip) -> StdRng {
        let offset_bits = self.base.base_offset(strip).to_bits();
        let id_bits = (strip.strip_id.value() as u64).rotate_left(17);
        StdRng::seed_from_u64(self.seed ^ id_bits ^ offset_bits)
    }
}

impl LayoutPolicy for SeededJitter {
    fn nudged_offset(&self, strip: &Strip) -> f64 {
        let direction = if self.rng_for(strip).random_bool(0.5) { 1.0 } else { -1.0 };
        self.base.base_offset(strip) + direction * self.base.nudge_step
    }

    fn shrunk_width(&self, strip: &Strip) -> f64 {
        self.base.shrunk_width(strip)
    }
}
