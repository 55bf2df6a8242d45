//! Canned prompts sent to the advisory services.

use crate::models::{Line, Strip};

/// Which advisory service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Proposals and drill-downs.
    Optimize,
    /// Scenario generation.
    Simulate,
}

/// One-click requests offered next to the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    /// Ask which buyer to optimize for.
    OptimizeBuyers,
    /// Ask which order needs attention.
    OptimizeOrders,
    /// Optimize the whole board.
    OptimizeBoard,
    /// Run the breakdown simulation.
    RunSimulations,
}

impl QuickAction {
    /// Every quick action, in button order.
    pub const ALL: [QuickAction; 4] = [
        Self::OptimizeBuyers,
        Self::OptimizeOrders,
        Self::OptimizeBoard,
        Self::RunSimulations,
    ];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::OptimizeBuyers => "Optimize Buyers",
            Self::OptimizeOrders => "Optimize Orders",
            Self::OptimizeBoard => "Optimize Board",
            Self::RunSimulations => "Run Simulations",
        }
    }

    /// Text echoed as the user's chat message.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::OptimizeBuyers => "Optimize Buyers",
            Self::OptimizeOrders => "optimize orders",
            Self::OptimizeBoard => "optimize board",
            Self::RunSimulations => {
                "Run a simulation: What happens if Line 0001 has a machine breakdown tomorrow for 4 hours?"
            }
        }
    }

    /// `userMessage` sent to the service.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::RunSimulations => "Run simulation",
            other => other.prompt(),
        }
    }

    /// Service the request goes to.
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::RunSimulations => Endpoint::Simulate,
            _ => Endpoint::Optimize,
        }
    }
}

/// User message echoed when a strip is clicked.
pub fn strip_detail_message(strip: &Strip) -> String {
    format!("Tell me details about order #{}", strip.strip_id)
}

/// Query sent when a strip is clicked.
pub fn strip_detail_query(strip: &Strip, line: &Line) -> String {
    format!(
        "Provide detailed analysis for Order #{} on Line {}.",
        strip.strip_id, line.line_code
    )
}
