//! Mutation engine: applies operations to a factory.
//!
//! # Algorithm
//!
//! 1. Clone the input factory into a working copy.
//! 2. Resolve every reference the operation needs (strip, destination line)
//!    before touching the copy.
//! 3. Under [`ReferencePolicy::Strict`], an unresolved reference aborts with
//!    [`MutationError::ReferenceNotFound`]; under
//!    [`ReferencePolicy::BestEffort`] only the dependent sub-step is skipped.
//! 4. Apply the remaining sub-steps and return the copy with a report.
//!
//! The input factory is never modified, so callers can keep it as the
//! undo point.
//!
//! # Complexity
//! O(L + S) per operation where L = lines and S = strips (linear id scan).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::layout::{FixedLayout, LayoutPolicy, SPLIT_CHILD_BUYER, SPLIT_CHILD_END_DATE};
use super::report::{ApplyReport, MissingReference};
use crate::models::{Factory, LineId, MoveOrder, Operation, SplitChild, SplitParent, Strip, StripId};

/// What the engine does when an operation references something absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Skip the dependent sub-step and apply the rest. Keeps the board
    /// usable when the advisory service saw a slightly stale board.
    #[default]
    BestEffort,
    /// Reject the whole operation and leave the board unchanged.
    Strict,
}

/// Errors from applying an operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("{action} references unknown {missing}")]
    ReferenceNotFound {
        action: &'static str,
        missing: MissingReference,
    },

    #[error("Operation {index} of batch failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<MutationError>,
    },
}

/// A factory derived by applying one operation.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The next factory state.
    pub factory: Factory,
    /// What the operation did.
    pub report: ApplyReport,
}

/// A factory derived by applying an ordered batch of operations.
#[derive(Debug, Clone)]
pub struct BatchApplied {
    /// The factory after the last operation.
    pub factory: Factory,
    /// One report per operation, in application order.
    pub reports: Vec<ApplyReport>,
}

/// Applies board operations under a reference policy and layout policy.
///
/// # Example
/// ```
/// use u_board::engine::MutationEngine;
/// use u_board::models::{Factory, Line, Operation, Strip, StripId};
///
/// let factory = Factory::new()
///     .with_line(Line::new("L1", "0001").with_strip(Strip::new(7, 100)));
///
/// let engine = MutationEngine::new();
/// let applied = engine.apply(&factory, &Operation::split_parent(7, 40)).unwrap();
///
/// assert_eq!(applied.factory.find_strip(StripId(7)).unwrap().quantity, 40);
/// assert_eq!(factory.find_strip(StripId(7)).unwrap().quantity, 100);
/// ```
#[derive(Debug, Clone)]
pub struct MutationEngine {
    layout: Arc<dyn LayoutPolicy>,
    policy: ReferencePolicy,
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationEngine {
    /// Best-effort engine with the deterministic [`FixedLayout`].
    pub fn new() -> Self {
        Self {
            layout: Arc::new(FixedLayout::default()),
            policy: ReferencePolicy::BestEffort,
        }
    }

    /// Engine using a shared layout policy.
    pub fn from_layout(layout: Arc<dyn LayoutPolicy>) -> Self {
        Self {
            layout,
            policy: ReferencePolicy::BestEffort,
        }
    }

    /// Replaces the layout policy.
    pub fn with_layout<L: LayoutPolicy + 'static>(mut self, layout: L) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    /// Sets the reference policy.
    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active reference policy.
    pub fn reference_policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Derives the next factory from `factory` by applying `operation`.
    pub fn apply(&self, factory: &Factory, operation: &Operation) -> Result<Applied, MutationError> {
        let mut next = factory.clone();
        let report = self.apply_in_place(&mut next, operation)?;
        Ok(Applied {
            factory: next,
            report,
        })
    }

    /// Applies operations in order; later operations see earlier results.
    ///
    /// Fails on the first operation rejected under the strict policy,
    /// in which case no state is returned at all.
    pub fn apply_batch(
        &self,
        factory: &Factory,
        operations: &[Operation],
    ) -> Result<BatchApplied, MutationError> {
        let mut next = factory.clone();
        let mut reports = Vec::with_capacity(operations.len());
        for (index, operation) in operations.iter().enumerate() {
            let report = self
                .apply_in_place(&mut next, operation)
                .map_err(|source| MutationError::Batch {
                    index,
                    source: Box::new(source),
                })?;
            reports.push(report);
        }
        Ok(BatchApplied {
            factory: next,
            reports,
        })
    }

    /// Applies one operation to a working copy.
    ///
    /// References are resolved before the first write, so an `Err` leaves
    /// `factory` untouched.
    fn apply_in_place(
        &self,
        factory: &mut Factory,
        operation: &Operation,
    ) -> Result<ApplyReport, MutationError> {
        let mut report = ApplyReport::new(operation.action_type());
        match operation {
            Operation::MoveAlongLine(m) => self.move_strip(factory, m, false, &mut report)?,
            Operation::MoveAcrossLines(m) => self.move_strip(factory, m, true, &mut report)?,
            Operation::SplitParent(s) => self.split_parent(factory, s, &mut report)?,
            Operation::SplitChild(c) => self.split_child(factory, c, &mut report)?,
            Operation::Unrecognized => {
                debug!("unrecognized operation ignored");
            }
        }

        debug!(
            action = report.action_type,
            changed = report.changed,
            skipped = report.skipped.len(),
            "operation applied"
        );
        Ok(report)
    }

    fn move_strip(
        &self,
        factory: &mut Factory,
        order: &MoveOrder,
        across: bool,
        report: &mut ApplyReport,
    ) -> Result<(), MutationError> {
        let Some(loc) = factory.locate_strip(order.strip_id) else {
            return self.skip(report, MissingReference::Strip(order.strip_id));
        };
        let destination = if across {
            self.resolve_destination(factory, loc.line_index, order.line_id_to.as_ref(), report)?
        } else {
            None
        };

        let strip = &mut factory.lines[loc.line_index].orders[loc.position];
        if let Some(from) = &order.start_date_from {
            strip.start_date = Some(from.clone());
        }
        if let Some(to) = &order.start_date_to {
            strip.end_date = Some(to.clone());
        }
        let offset = self.layout.nudged_offset(strip);
        strip.layout.offset = Some(offset);
        report.changed = true;

        if let Some(dest) = destination {
            relocate(factory, loc.line_index, loc.position, dest, report);
        }
        Ok(())
    }

    fn split_parent(
        &self,
        factory: &mut Factory,
        split: &SplitParent,
        report: &mut ApplyReport,
    ) -> Result<(), MutationError> {
        let Some(loc) = factory.locate_strip(split.strip_id) else {
            return self.skip(report, MissingReference::Strip(split.strip_id));
        };
        let destination =
            self.resolve_destination(factory, loc.line_index, split.line_id_to.as_ref(), report)?;

        let strip = &mut factory.lines[loc.line_index].orders[loc.position];
        if let Some(quantity) = split.quantity_to {
            strip.quantity = quantity;
        }
        let width = self.layout.shrunk_width(strip);
        strip.layout.width = Some(width);
        report.changed = true;

        if let Some(dest) = destination {
            relocate(factory, loc.line_index, loc.position, dest, report);
        }
        Ok(())
    }

    fn split_child(
        &self,
        factory: &mut Factory,
        child: &SplitChild,
        report: &mut ApplyReport,
    ) -> Result<(), MutationError> {
        let Some(line_id) = &child.new_line_id else {
            return self.skip(report, MissingReference::UnspecifiedLine);
        };
        let Some(dest) = factory.line_index(line_id) else {
            return self.skip(report, MissingReference::Line(line_id.clone()));
        };

        let strip_id = next_temporary_id(factory);
        let reference = match child.parent_strip_id {
            Some(parent) => format!("Child of #{parent}"),
            None => "Child of #?".to_string(),
        };

        let mut strip = Strip::new(strip_id, child.new_quantity)
            .with_layout(self.layout.child_layout())
            .with_buyer(SPLIT_CHILD_BUYER)
            .with_reference(reference);
        strip.start_date = child.new_start_date.clone();
        strip.end_date = Some(SPLIT_CHILD_END_DATE.to_string());
        strip.order_details.pic_file_name = Some(String::new());
        strip.parent_strip_id = child.parent_strip_id;

        factory.lines[dest].orders.push(strip);
        report.changed = true;
        report.created = Some(strip_id);
        Ok(())
    }

    /// Resolves the line a strip should be relocated to, if any.
    ///
    /// `None` when no relocation is requested, the target is the current
    /// line, or (best effort) the target does not exist.
    fn resolve_destination(
        &self,
        factory: &Factory,
        current: usize,
        target: Option<&LineId>,
        report: &mut ApplyReport,
    ) -> Result<Option<usize>, MutationError> {
        let Some(target) = target else {
            return Ok(None);
        };
        if &factory.lines[current].line_id == target {
            return Ok(None);
        }
        match factory.line_index(target) {
            Some(index) => Ok(Some(index)),
            None => self
                .skip(report, MissingReference::Line(target.clone()))
                .map(|_| None),
        }
    }

    fn skip(&self, report: &mut ApplyReport, missing: MissingReference) -> Result<(), MutationError> {
        match self.policy {
            ReferencePolicy::Strict => Err(MutationError::ReferenceNotFound {
                action: report.action_type,
                missing,
            }),
            ReferencePolicy::BestEffort => {
                warn!(action = report.action_type, %missing, "reference not found, sub-step skipped");
                report.skipped.push(missing);
                Ok(())
            }
        }
    }
}

/// Removes a strip from its line and appends it to `dest`, keeping its id.
fn relocate(
    factory: &mut Factory,
    line_index: usize,
    position: usize,
    dest: usize,
    report: &mut ApplyReport,
) {
    let strip = factory.lines[line_index].orders.remove(position);
    factory.lines[dest].orders.push(strip);
    report.relocated_to = Some(factory.lines[dest].line_id.clone());
}

/// Fresh temporary id: negative and below every id on the board.
pub fn next_temporary_id(factory: &Factory) -> StripId {
    let floor = factory.min_strip_id().map_or(0, |id| id.value().min(0));
    StripId(floor - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Line, StripLayout};

    fn sample() -> Factory {
        Factory::new()
            .with_line(
                Line::new("L1", "0001")
                    .with_strip(
                        Strip::new(7, 100)
                            .with_window("2025-01-30T08:00:00", "2025-01-31T08:00:00")
                            .with_layout(StripLayout::new(10.0, 20.0))
                            .with_buyer("ACME"),
                    )
                    .with_strip(Strip::new(8, 50)),
            )
            .with_line(Line::new("L2", "0002"))
    }

    fn strict() -> MutationEngine {
        MutationEngine::new().with_reference_policy(ReferencePolicy::Strict)
    }

    #[test]
    fn test_split_parent_sets_quantity_and_shrinks() {
        let f = sample();
        let applied = MutationEngine::new()
            .apply(&f, &Operation::split_parent(7, 40))
            .unwrap();

        let strip = applied.factory.find_strip(StripId(7)).unwrap();
        assert_eq!(strip.quantity, 40);
        assert_eq!(strip.legacy_quantities().order_details, 40);
        assert_eq!(strip.legacy_quantities().oc_units, 40);
        assert!(strip.layout.width.unwrap() < 20.0);
        assert!(applied.report.is_complete());
    }

    #[test]
    fn test_split_parent_without_quantity_only_shrinks() {
        let f = sample();
        let op = Operation::SplitParent(SplitParent {
            strip_id: StripId(7),
            quantity_to: None,
            line_id_to: None,
        });
        let applied = MutationEngine::new().apply(&f, &op).unwrap();
        let strip = applied.factory.find_strip(StripId(7)).unwrap();
        assert_eq!(strip.quantity, 100);
        assert!((strip.layout.width.unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_parent_with_relocation() {
        let f = sample();
        let op = Operation::SplitParent(SplitParent {
            strip_id: StripId(7),
            quantity_to: Some(30),
            line_id_to: Some("L2".into()),
        });
        let applied = MutationEngine::new().apply(&f, &op).unwrap();
        assert!(!applied.factory.lines[0].contains(StripId(7)));
        assert!(applied.factory.lines[1].contains(StripId(7)));
        assert_eq!(applied.report.relocated_to, Some(LineId::new("L2")));
    }

    #[test]
    fn test_split_child_creates_temporary_strip() {
        let f = sample();
        let op = Operation::SplitChild(
            SplitChild {
                new_line_id: Some("L2".into()),
                new_start_date: None,
                new_quantity: 60,
                parent_strip_id: None,
            }
            .starting("2025-02-01T08:00:00")
            .of_parent(7),
        );
        let applied = MutationEngine::new().apply(&f, &op).unwrap();

        let child_id = applied.report.created.unwrap();
        assert!(child_id.is_temporary());
        let line = &applied.factory.lines[1];
        let child = line.orders.last().unwrap();
        assert_eq!(child.strip_id, child_id);
        assert_eq!(child.quantity, 60);
        assert_eq!(child.buyer_label(), SPLIT_CHILD_BUYER);
        assert_eq!(child.order_details.order_reference_number.as_deref(), Some("Child of #7"));
        assert_eq!(child.parent_strip_id, Some(StripId(7)));
        assert_eq!(child.start_date.as_deref(), Some("2025-02-01T08:00:00"));
        assert_eq!(child.end_date.as_deref(), Some(SPLIT_CHILD_END_DATE));
    }

    #[test]
    fn test_split_child_unknown_parent_reference() {
        let f = sample();
        let applied = MutationEngine::new()
            .apply(&f, &Operation::split_child("L1", 5))
            .unwrap();
        let child = applied.factory.lines[0].orders.last().unwrap();
        assert_eq!(child.order_details.order_reference_number.as_deref(), Some("Child of #?"));
    }

    #[test]
    fn test_temporary_ids_stay_distinct() {
        let f = sample();
        let engine = MutationEngine::new();
        let once = engine.apply(&f, &Operation::split_child("L2", 1)).unwrap();
        let twice = engine.apply(&once.factory, &Operation::split_child("L2", 1)).unwrap();
        assert_eq!(once.report.created, Some(StripId(-1)));
        assert_eq!(twice.report.created, Some(StripId(-2)));
    }

    #[test]
    fn test_move_along_line_updates_window_and_nudges() {
        let f = sample();
        let op = Operation::MoveAlongLine(
            MoveOrder::new(7).with_window("2025-02-03T08:00:00", "2025-02-04T08:00:00"),
        );
        let applied = MutationEngine::new().apply(&f, &op).unwrap();

        let strip = applied.factory.find_strip(StripId(7)).unwrap();
        assert_eq!(strip.start_date.as_deref(), Some("2025-02-03T08:00:00"));
        assert_eq!(strip.end_date.as_deref(), Some("2025-02-04T08:00:00"));
        assert_eq!(strip.layout.offset, Some(5.0));
        assert!(applied.factory.lines[0].contains(StripId(7)));
    }

    #[test]
    fn test_move_is_deterministic() {
        let f = sample();
        let op = Operation::move_along_line(8);
        let engine = MutationEngine::new();
        let a = engine.apply(&f, &op).unwrap().factory;
        let b = engine.apply(&f, &op).unwrap().factory;
        assert_eq!(a, b);
    }

    #[test]
    fn test_move_across_lines_transfers_ownership() {
        let f = sample();
        let applied = MutationEngine::new()
            .apply(&f, &Operation::move_across_lines(7, "L2"))
            .unwrap();

        assert!(!applied.factory.lines[0].contains(StripId(7)));
        assert_eq!(applied.factory.lines[1].orders.last().unwrap().strip_id, StripId(7));
        assert_eq!(applied.factory.owner_count(StripId(7)), 1);
    }

    #[test]
    fn test_move_across_to_same_line_stays() {
        let f = sample();
        let applied = MutationEngine::new()
            .apply(&f, &Operation::move_across_lines(7, "L1"))
            .unwrap();
        assert_eq!(applied.factory.lines[0].position_of(StripId(7)), Some(0));
        assert!(applied.report.is_complete());
    }

    #[test]
    fn test_move_across_missing_line_keeps_strip_in_place() {
        let f = sample();
        let op = Operation::MoveAcrossLines(
            MoveOrder::new(7)
                .with_window("2025-03-01T08:00:00", "2025-03-02T08:00:00")
                .to_line("L9"),
        );
        let applied = MutationEngine::new().apply(&f, &op).unwrap();

        assert!(applied.factory.lines[0].contains(StripId(7)));
        assert_eq!(applied.factory.owner_count(StripId(7)), 1);
        let strip = applied.factory.find_strip(StripId(7)).unwrap();
        assert_eq!(strip.start_date.as_deref(), Some("2025-03-01T08:00:00"));
        assert_eq!(applied.report.skipped, vec![MissingReference::Line("L9".into())]);
    }

    #[test]
    fn test_missing_strip_is_noop() {
        let f = sample();
        let engine = MutationEngine::new();
        for op in [
            Operation::move_along_line(999),
            Operation::move_across_lines(999, "L2"),
            Operation::split_parent(999, 1),
        ] {
            let applied = engine.apply(&f, &op).unwrap();
            assert_eq!(applied.factory, f);
            assert!(applied.report.is_noop());
            assert_eq!(applied.report.skipped, vec![MissingReference::Strip(StripId(999))]);
        }
    }

    #[test]
    fn test_unrecognized_is_noop() {
        let f = sample();
        let applied = MutationEngine::new().apply(&f, &Operation::Unrecognized).unwrap();
        assert_eq!(applied.factory, f);
        assert!(applied.report.is_noop());
        assert!(applied.report.is_complete());
    }

    #[test]
    fn test_split_child_missing_line_skipped() {
        let f = sample();
        let applied = MutationEngine::new()
            .apply(&f, &Operation::split_child("L9", 5))
            .unwrap();
        assert_eq!(applied.factory, f);

        let op = Operation::SplitChild(SplitChild {
            new_line_id: None,
            new_start_date: None,
            new_quantity: 5,
            parent_strip_id: None,
        });
        let applied = MutationEngine::new().apply(&f, &op).unwrap();
        assert_eq!(applied.report.skipped, vec![MissingReference::UnspecifiedLine]);
    }

    #[test]
    fn test_strict_rejects_missing_strip() {
        let err = strict()
            .apply(&sample(), &Operation::split_parent(999, 1))
            .unwrap_err();
        assert_eq!(
            err,
            MutationError::ReferenceNotFound {
                action: "split_parent",
                missing: MissingReference::Strip(StripId(999)),
            }
        );
    }

    #[test]
    fn test_strict_rejects_missing_destination_before_writing() {
        let f = sample();
        let op = Operation::MoveAcrossLines(
            MoveOrder::new(7).with_window("x", "y").to_line("L9"),
        );
        assert!(strict().apply(&f, &op).is_err());
    }

    #[test]
    fn test_batch_sees_earlier_results() {
        let f = sample();
        let ops = vec![
            Operation::split_parent(7, 40),
            Operation::split_child("L2", 60),
            Operation::move_across_lines(7, "L2"),
        ];
        let batch = MutationEngine::new().apply_batch(&f, &ops).unwrap();
        assert_eq!(batch.reports.len(), 3);
        let l2 = &batch.factory.lines[1];
        assert_eq!(l2.orders.len(), 2);
        assert_eq!(l2.orders[1].strip_id, StripId(7));
        assert_eq!(l2.orders[1].quantity, 40);
        assert_eq!(l2.total_quantity(), 100);
    }

    #[test]
    fn test_strict_batch_reports_failing_index() {
        let ops = vec![Operation::split_parent(7, 40), Operation::move_along_line(999)];
        let err = strict().apply_batch(&sample(), &ops).unwrap_err();
        assert!(matches!(err, MutationError::Batch { index: 1, .. }));
    }

    #[test]
    fn test_next_temporary_id() {
        assert_eq!(next_temporary_id(&Factory::new()), StripId(-1));
        assert_eq!(next_temporary_id(&sample()), StripId(-1));
        let f = sample().with_line(Line::new("L3", "3").with_strip(Strip::new(-4, 1)));
        assert_eq!(next_temporary_id(&f), StripId(-5));
    }
}
