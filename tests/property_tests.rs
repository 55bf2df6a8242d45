//! Property-Based Tests for u-board
//!
//! These tests verify board invariants over random boards and operation
//! sequences:
//! - Positive strip IDs stay unique
//! - A strip moved across lines has exactly one owner
//! - Restoring a snapshot yields the exact prior board, repeatably
//! - A scenario triggers exactly one render

use proptest::prelude::*;

use u_board::board::{Board, RenderCounter};
use u_board::engine::{MutationEngine, ReferencePolicy};
use u_board::models::{Factory, Line, LineId, MoveOrder, Operation, SplitChild, SplitParent, Strip, StripId};
use u_board::undo::{ActionToken, CardKind};
use u_board::validation::validate_factory;

// =============================================================================
// Strategies
// =============================================================================

const LINE_COUNT: usize = 3;

fn line_id(index: usize) -> LineId {
    LineId::new(format!("L{index}"))
}

/// Boards with up to `LINE_COUNT` lines and unique positive strip IDs.
fn factory_strategy() -> impl Strategy<Value = Factory> {
    prop::collection::vec((0..LINE_COUNT, 1u64..500), 0..12).prop_map(|placements| {
        let mut lines: Vec<Line> = (0..LINE_COUNT)
            .map(|i| Line::new(line_id(i), format!("{:04}", i + 1)))
            .collect();
        for (n, (line, quantity)) in placements.into_iter().enumerate() {
            lines[line].orders.push(Strip::new(n as i64 + 1, quantity));
        }
        lines.into_iter().fold(Factory::new(), Factory::with_line)
    })
}

/// Strip IDs, some of which do not exist on the board.
fn strip_ref() -> impl Strategy<Value = StripId> {
    (1i64..16).prop_map(StripId)
}

/// Line IDs, one of which does not exist.
fn line_ref() -> impl Strategy<Value = LineId> {
    (0..=LINE_COUNT).prop_map(line_id)
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        strip_ref().prop_map(|id| Operation::MoveAlongLine(MoveOrder::new(id))),
        (strip_ref(), line_ref()).prop_map(|(id, line)| Operation::move_across_lines(id, line)),
        (strip_ref(), 0u64..500, prop::option::of(line_ref())).prop_map(|(id, q, line)| {
            Operation::SplitParent(SplitParent {
                strip_id: id,
                quantity_to: Some(q),
                line_id_to: line,
            })
        }),
        (line_ref(), 0u64..500, prop::option::of(strip_ref())).prop_map(|(line, q, parent)| {
            Operation::SplitChild(SplitChild {
                new_line_id: Some(line),
                new_start_date: None,
                new_quantity: q,
                parent_strip_id: parent,
            })
        }),
        Just(Operation::Unrecognized),
    ]
}

fn scenario_strategy() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 0..10)
}

// =============================================================================
// Engine Properties
// =============================================================================

proptest! {
    /// Strip IDs (positive and temporary) stay unique under any sequence
    #[test]
    fn ids_stay_unique(factory in factory_strategy(), ops in scenario_strategy()) {
        let batch = MutationEngine::new().apply_batch(&factory, &ops).unwrap();
        prop_assert!(validate_factory(&batch.factory).is_ok());
    }

    /// Moving across to an existing line leaves the strip only on the destination
    #[test]
    fn move_across_has_single_owner(
        factory in factory_strategy(),
        id in strip_ref(),
        dest in 0..LINE_COUNT,
    ) {
        let applied = MutationEngine::new()
            .apply(&factory, &Operation::move_across_lines(id, line_id(dest)))
            .unwrap();
        if factory.find_strip(id).is_some() {
            prop_assert_eq!(applied.factory.owner_count(id), 1);
            prop_assert_eq!(&applied.factory.owner_of(id).unwrap().line_id, &line_id(dest));
        } else {
            prop_assert_eq!(&applied.factory, &factory);
        }
    }

    /// Moves never change quantities or strip count
    #[test]
    fn moves_conserve_quantity(
        factory in factory_strategy(),
        id in strip_ref(),
        line in line_ref(),
    ) {
        let applied = MutationEngine::new()
            .apply(&factory, &Operation::move_across_lines(id, line))
            .unwrap();
        prop_assert_eq!(applied.factory.total_quantity(), factory.total_quantity());
        prop_assert_eq!(applied.factory.strip_count(), factory.strip_count());
    }

    /// Applying never modifies the input factory
    #[test]
    fn apply_leaves_input_untouched(factory in factory_strategy(), op in operation_strategy()) {
        let before = factory.clone();
        let _ = MutationEngine::new().apply(&factory, &op).unwrap();
        prop_assert_eq!(factory, before);
    }

    /// Strict either applies everything best effort would, or changes nothing
    #[test]
    fn strict_is_all_or_nothing(factory in factory_strategy(), ops in scenario_strategy()) {
        let strict = MutationEngine::new().with_reference_policy(ReferencePolicy::Strict);
        if let Ok(batch) = strict.apply_batch(&factory, &ops) {
            let lenient = MutationEngine::new().apply_batch(&factory, &ops).unwrap();
            prop_assert_eq!(batch.factory, lenient.factory);
            prop_assert!(lenient.reports.iter().all(|r| r.is_complete()));
        }
    }
}

// =============================================================================
// Board / Undo Properties
// =============================================================================

proptest! {
    /// snapshot; apply scenario; restore gives back the exact board
    #[test]
    fn undo_is_exact(factory in factory_strategy(), ops in scenario_strategy()) {
        let mut board = Board::new(factory.clone(), RenderCounter::default());
        let token = ActionToken::generate(CardKind::Scenario);
        board.snapshot(&token);
        board.apply_scenario(&ops).unwrap();
        board.restore(&token).unwrap();
        prop_assert_eq!(board.factory(), &factory);
    }

    /// Restoring twice in a row yields the same board both times
    #[test]
    fn restore_is_idempotent(factory in factory_strategy(), first in scenario_strategy(), second in scenario_strategy()) {
        let mut board = Board::new(factory, RenderCounter::default());
        board.apply_scenario(&first).unwrap();
        let token = ActionToken::generate(CardKind::Proposal);
        board.snapshot(&token);
        board.apply_scenario(&second).unwrap();

        board.restore(&token).unwrap();
        let once = board.factory().clone();
        board.restore(&token).unwrap();
        prop_assert_eq!(board.factory(), &once);
    }

    /// A scenario of any length renders exactly once
    #[test]
    fn scenario_renders_once(factory in factory_strategy(), ops in scenario_strategy()) {
        let mut board = Board::new(factory, RenderCounter::default());
        board.apply_scenario(&ops).unwrap();
        prop_assert_eq!(board.sink().renders, 1);
    }

    /// Single operations without render never notify the presentation layer
    #[test]
    fn silent_operations_do_not_render(factory in factory_strategy(), ops in scenario_strategy()) {
        let mut board = Board::new(factory, RenderCounter::default());
        for op in &ops {
            board.apply_operation(op, false).unwrap();
        }
        prop_assert_eq!(board.sink().renders, 0);
        prop_assert_eq!(board.store().revision(), ops.len() as u64);
    }
}
