//! Production board engine for the U-Engine ecosystem.
//!
//! Holds an in-memory production schedule (lines of order strips), applies
//! structured mutations proposed by external advisory services, and makes
//! every applied change reversible through point-in-time snapshots.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Factory`, `Line`, `Strip`, `Operation`,
//!   `StripId`, `LineId`
//! - **`validation`**: Input integrity checks (duplicate strip and line IDs)
//! - **`engine`**: Mutation engine, reference policy, layout heuristics
//! - **`board`**: Board store, render boundary, the `Board` facade
//! - **`undo`**: Action tokens, snapshot registry, action card lifecycle
//! - **`intake`**: Advisory response decoding and chat presentation data
//! - **`advisory`**: Request payload and the optimizer/simulator client
//! - **`session`**: Chat session tying intake, cards and board together
//! - **`config`**: TOML configuration
//!
//! # Architecture
//!
//! ```text
//! AdvisoryService ──► intake ──► ActionCard ──► Board ──► RenderSink
//!                                                 │
//!                               MutationEngine ◄──┤──► SnapshotRegistry
//!                                                 ▼
//!                                            BoardStore
//! ```
//!
//! The board is single-writer: every change, forward or undo, ends in one
//! `BoardStore::replace`. The engine derives the next factory from the
//! current one and never edits its input.
//!
//! # Example
//!
//! ```
//! use u_board::board::{Board, NullSink};
//! use u_board::models::{Factory, Line, Operation, Strip, StripId};
//! use u_board::undo::ActionCard;
//!
//! let factory = Factory::new()
//!     .with_line(Line::new("L1", "0001").with_strip(Strip::new(7, 100)))
//!     .with_line(Line::new("L2", "0002"));
//! let mut board = Board::new(factory.clone(), NullSink);
//!
//! let mut card = ActionCard::scenario(vec![
//!     Operation::split_parent(7, 40),
//!     Operation::split_child("L2", 60),
//! ]);
//! board.apply_card(&mut card).unwrap();
//! assert_eq!(board.factory().find_strip(StripId(7)).unwrap().quantity, 40);
//!
//! board.undo_card(&mut card).unwrap();
//! assert_eq!(board.factory(), &factory);
//! ```

pub mod advisory;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod models;
pub mod session;
pub mod undo;
pub mod validation;

pub use error::{BoardError, Result};
