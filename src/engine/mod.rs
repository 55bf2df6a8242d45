//! Mutation engine for board operations.
//!
//! Interprets an [`Operation`](crate::models::Operation) against a
//! [`Factory`](crate::models::Factory) and derives the next factory.
//! The input is never modified.
//!
//! | actionType | Effect |
//! |------------|--------|
//! | `move_along_line` | New window, offset nudge |
//! | `move_across_lines` | As above, then relocate to `lineIdTo` |
//! | `split_parent` | Quantity := `quantityTo`, width × shrink factor, optional relocation |
//! | `split_child` | Append a temporary-id strip to `newLineId` |
//! | other | No-op |
//!
//! Unresolved references are handled per [`ReferencePolicy`].

mod layout;
mod mutation;
mod report;

pub use layout::{
    FixedLayout, LayoutPolicy, SeededJitter, SPLIT_CHILD_BACKGROUND, SPLIT_CHILD_BORDER,
    SPLIT_CHILD_BUYER, SPLIT_CHILD_END_DATE, SPLIT_CHILD_OFFSET, SPLIT_CHILD_WIDTH,
};
pub use mutation::{
    next_temporary_id, Applied, BatchApplied, MutationEngine, MutationError, ReferencePolicy,
};
pub use report::{ApplyReport, MissingReference};
