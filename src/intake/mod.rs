//! Proposal/Scenario Intake.
//!
//! Decodes advisory service responses into typed values and prepares them
//! for display. Nothing here touches the board: cards produced by
//! [`present`] are applied through [`crate::board::Board`].
//!
//! | Response | Board effect |
//! |----------|--------------|
//! | Proposals | one card each, applied singly with a render |
//! | Scenarios | one card each, applied as a batch with one render |
//! | Drill-down | none, prompts a narrower follow-up query |
//! | Advisory | none |

mod present;
mod prompts;
mod response;
mod scenario;

pub use present::{present, ChatItem};
pub use prompts::{strip_detail_message, strip_detail_query, Endpoint, QuickAction};
pub use response::{
    AdvisoryResponse, DrillDown, DrillDownKind, IntakeError, Proposal, Recommendation, Scenario,
    ScenarioSet, ScenarioStep, FALLBACK_ADVISORY,
};
pub use scenario::{decode_operation, normalize_scenario_operation};
