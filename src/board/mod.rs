//! Board: store, engine, snapshots and the render boundary wired together.
//!
//! [`Board`] is the only writer of the factory. Forward mutations and
//! undo restores both end in a single [`BoardStore::replace`], so the
//! presentation layer only ever sees a fully updated or fully prior board.
//!
//! # Usage
//!
//! ```
//! use u_board::board::{Board, RenderCounter};
//! use u_board::models::{Factory, Line, Operation, Strip, StripId};
//! use u_board::undo::{ActionToken, CardKind};
//!
//! let factory = Factory::new()
//!     .with_line(Line::new("L1", "0001").with_strip(Strip::new(7, 100)))
//!     .with_line(Line::new("L2", "0002"));
//! let mut board = Board::new(factory.clone(), RenderCounter::default());
//!
//! let token = ActionToken::generate(CardKind::Proposal);
//! board.snapshot(&token);
//! board.apply_operation(&Operation::move_across_lines(7, "L2"), true).unwrap();
//! assert!(board.factory().lines[1].contains(StripId(7)));
//!
//! board.restore(&token).unwrap();
//! assert_eq!(board.factory(), &factory);
//! assert_eq!(board.sink().renders, 2);
//! ```

mod render;
mod store;

pub use render::{NullSink, RenderCounter, RenderSink};
pub use store::BoardStore;

use tracing::{info, warn};

use crate::config::BoardConfig;
use crate::engine::{ApplyReport, MutationEngine, MutationError};
use crate::error::BoardError;
use crate::models::{Factory, Operation};
use crate::undo::{ActionCard, ActionToken, CardAction, CardKind, SnapshotRegistry, UndoError};
use crate::validation::validate_factory;

/// Single-session production board.
#[derive(Debug)]
pub struct Board<S: RenderSink = NullSink> {
    store: BoardStore,
    engine: MutationEngine,
    snapshots: SnapshotRegistry,
    sink: S,
}

impl<S: RenderSink> Board<S> {
    /// Creates a board around a loaded factory.
    ///
    /// Identity problems are logged, not rejected: the engine tolerates
    /// duplicate ids by taking the first match.
    pub fn new(factory: Factory, sink: S) -> Self {
        if let Err(errors) = validate_factory(&factory) {
            for error in &errors {
                warn!(kind = ?error.kind, "{}", error.message);
            }
        }
        Self {
            store: BoardStore::new(factory),
            engine: MutationEngine::new(),
            snapshots: SnapshotRegistry::new(),
            sink,
        }
    }

    /// Creates a board whose engine follows `config`.
    pub fn from_config(factory: Factory, sink: S, config: &BoardConfig) -> Self {
        Self::new(factory, sink).with_engine(config.engine())
    }

    /// Replaces the mutation engine.
    pub fn with_engine(mut self, engine: MutationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// The current factory.
    pub fn factory(&self) -> &Factory {
        self.store.current()
    }

    /// The store holding the current factory and its revision.
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Engine used for every mutation.
    pub fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    /// Undo snapshots taken so far.
    pub fn snapshots(&self) -> &SnapshotRegistry {
        &self.snapshots
    }

    /// Presentation layer notified on change.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the presentation layer.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Applies one operation to the latest factory.
    ///
    /// With `render = false` the presentation layer is not notified, so a
    /// caller can batch several operations behind one redraw.
    pub fn apply_operation(
        &mut self,
        operation: &Operation,
        render: bool,
    ) -> Result<ApplyReport, MutationError> {
        let applied = self.engine.apply(self.store.current(), operation)?;
        self.store.replace(applied.factory);
        if render {
            self.render();
        }
        Ok(applied.report)
    }

    /// Applies a scenario's operations in order, then redraws once.
    ///
    /// The batch runs on a working copy; if the engine rejects any
    /// operation the board is left exactly as it was and nothing is drawn.
    pub fn apply_scenario(
        &mut self,
        operations: &[Operation],
    ) -> Result<Vec<ApplyReport>, MutationError> {
        let batch = self.engine.apply_batch(self.store.current(), operations)?;
        self.store.replace(batch.factory);
        self.render();
        Ok(batch.reports)
    }

    /// Records the current factory under `token`.
    pub fn snapshot(&mut self, token: &ActionToken) {
        self.snapshots.snapshot(token, self.store.current());
    }

    /// Replaces the factory with the snapshot for `token` and redraws.
    pub fn restore(&mut self, token: &ActionToken) -> Result<(), UndoError> {
        let factory = self.snapshots.restore(token)?;
        self.store.replace(factory);
        info!(%token, revision = self.store.revision(), "board restored");
        self.render();
        Ok(())
    }

    /// Applies a card: fresh snapshot, then one operation (proposal) or
    /// the whole batch (scenario).
    pub fn apply_card(&mut self, card: &mut ActionCard) -> Result<Vec<ApplyReport>, BoardError> {
        card.check(CardAction::Apply)?;
        self.snapshot(card.token());

        let result = match card.kind() {
            CardKind::Proposal => card
                .operations()
                .first()
                .map(|op| self.apply_operation(op, true).map(|report| vec![report]))
                .unwrap_or_else(|| Ok(Vec::new())),
            CardKind::Scenario => self.apply_scenario(card.operations()),
        };

        match result {
            Ok(reports) => {
                card.transition(CardAction::Apply)?;
                Ok(reports)
            }
            Err(err) => {
                self.snapshots.discard(card.token());
                Err(err.into())
            }
        }
    }

    /// Undoes an applied card by restoring its snapshot.
    pub fn undo_card(&mut self, card: &mut ActionCard) -> Result<(), BoardError> {
        card.check(CardAction::Undo)?;
        self.restore(card.token())?;
        card.transition(CardAction::Undo)?;
        Ok(())
    }

    /// Dismisses a card that is not currently applied.
    pub fn dismiss_card(&mut self, card: &mut ActionCard) -> Result<(), BoardError> {
        card.transition(CardAction::Dismiss)?;
        self.snapshots.discard(card.token());
        Ok(())
    }

    fn render(&mut self) {
        self.sink.render(self.store.current(), self.store.revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReferencePolicy;
    use crate::models::{Line, Strip, StripId};
    use crate::undo::CardState;

    fn sample() -> Factory {
        Factory::new()
            .with_line(Line::new("L1", "0001").with_strip(Strip::new(7, 100)))
            .with_line(Line::new("L2", "0002"))
    }

    fn board() -> Board<RenderCounter> {
        Board::new(sample(), RenderCounter::default())
    }

    #[test]
    fn test_apply_operation_render_flag() {
        let mut b = board();
        b.apply_operation(&Operation::split_parent(7, 40), false).unwrap();
        assert_eq!(b.sink().renders, 0);
        b.apply_operation(&Operation::move_along_line(7), true).unwrap();
        assert_eq!(b.sink().renders, 1);
        assert_eq!(b.sink().last_revision, Some(2));
    }

    #[test]
    fn test_scenario_renders_once() {
        let mut b = board();
        let ops = vec![
            Operation::split_parent(7, 40),
            Operation::split_child("L2", 60),
            Operation::move_along_line(7),
            Operation::Unrecognized,
        ];
        let reports = b.apply_scenario(&ops).unwrap();
        assert_eq!(reports.len(), 4);
        assert_eq!(b.sink().renders, 1);
        assert_eq!(b.store().revision(), 1);
    }

    #[test]
    fn test_strict_scenario_failure_leaves_board() {
        let mut b = board().with_engine(
            MutationEngine::new().with_reference_policy(ReferencePolicy::Strict),
        );
        let ops = vec![Operation::split_parent(7, 40), Operation::move_along_line(999)];
        assert!(b.apply_scenario(&ops).is_err());
        assert_eq!(b.factory(), &sample());
        assert_eq!(b.sink().renders, 0);
    }

    #[test]
    fn test_restore_unknown_token() {
        let mut b = board();
        let err = b.restore(&ActionToken::from_raw("prop-x")).unwrap_err();
        assert!(matches!(err, UndoError::NotFound(_)));
        assert_eq!(b.sink().renders, 0);
    }

    #[test]
    fn test_card_apply_undo_cycle() {
        let mut b = board();
        let mut card = ActionCard::proposal(Operation::move_across_lines(7, "L2"));

        b.apply_card(&mut card).unwrap();
        assert_eq!(card.state(), CardState::Applied);
        assert!(b.factory().lines[1].contains(StripId(7)));

        b.undo_card(&mut card).unwrap();
        assert_eq!(card.state(), CardState::Undone);
        assert_eq!(b.factory(), &sample());

        b.apply_card(&mut card).unwrap();
        assert_eq!(card.state(), CardState::Applied);
        assert!(b.factory().lines[1].contains(StripId(7)));
    }

    #[test]
    fn test_reapply_takes_fresh_snapshot() {
        let mut b = board();
        let mut card = ActionCard::proposal(Operation::split_parent(7, 40));
        b.apply_card(&mut card).unwrap();
        b.undo_card(&mut card).unwrap();

        // Board changes between undo and re-apply.
        b.apply_operation(&Operation::split_child("L2", 5), true).unwrap();
        let before_reapply = b.factory().clone();

        b.apply_card(&mut card).unwrap();
        b.undo_card(&mut card).unwrap();
        assert_eq!(b.factory(), &before_reapply);
    }

    #[test]
    fn test_scenario_card() {
        let mut b = board();
        let mut card = ActionCard::scenario(vec![
            Operation::split_parent(7, 40),
            Operation::split_child("L2", 60),
        ]);
        let reports = b.apply_card(&mut card).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(b.factory().total_quantity(), 100);
        assert_eq!(b.sink().renders, 1);

        b.undo_card(&mut card).unwrap();
        assert_eq!(b.factory(), &sample());
        assert_eq!(b.sink().renders, 2);
    }

    #[test]
    fn test_undo_requires_applied_card() {
        let mut b = board();
        let mut card = ActionCard::proposal(Operation::split_parent(7, 40));
        assert!(matches!(
            b.undo_card(&mut card),
            Err(BoardError::Transition(_))
        ));
    }

    #[test]
    fn test_failed_apply_keeps_card_state() {
        let mut b = board().with_engine(
            MutationEngine::new().with_reference_policy(ReferencePolicy::Strict),
        );
        let mut card = ActionCard::proposal(Operation::split_parent(999, 1));
        assert!(matches!(
            b.apply_card(&mut card),
            Err(BoardError::Mutation(_))
        ));
        assert_eq!(card.state(), CardState::Proposed);
        assert!(!b.snapshots().contains(card.token()));
    }

    #[test]
    fn test_dismiss_card() {
        let mut b = board();
        let mut card = ActionCard::proposal(Operation::split_parent(7, 40));
        b.dismiss_card(&mut card).unwrap();
        assert_eq!(card.state(), CardState::Dismissed);
        assert!(b.apply_card(&mut card).is_err());
        assert_eq!(b.factory(), &sample());
    }
}
