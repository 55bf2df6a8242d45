//! Board domain models.
//!
//! Provides the data types for a production-scheduling board and the
//! operations that mutate it. Every type decodes from and encodes to the
//! JSON shape the advisory services exchange, carrying unrecognized
//! fields through unchanged.
//!
//! # Domain Mappings
//!
//! | u-board | Manufacturing | Wire name |
//! |---------|---------------|-----------|
//! | Factory | Production plan | `factoryData` + `gridData` |
//! | Line | Sewing/assembly line | `data[]` |
//! | Strip | Scheduled order | `ordersData[]` |
//! | Operation | Proposed change | `stripJsonData[]`, `operations[]` |

mod factory;
mod ids;
mod line;
mod operation;
mod quantity;
mod strip;

pub use factory::{Factory, Grid, StripLocation};
pub use ids::{LineId, StripId};
pub use line::Line;
pub use operation::{ActionKind, MoveOrder, Operation, SplitChild, SplitParent};
pub use strip::{LegacyQuantities, OrderDetails, Strip, StripLayout};
