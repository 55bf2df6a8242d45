//! Turns decoded responses into chat items for the presentation layer.
//!
//! Every actionable item gets its own [`ActionCard`], so each carries a
//! distinct token for the snapshot registry.

use super::response::{AdvisoryResponse, DrillDown, Proposal, Scenario};
use crate::config::CardConfig;
use crate::undo::ActionCard;

/// One entry in the advisory chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatItem {
    /// Plain assistant text.
    Message(String),
    /// A single-operation card.
    ProposalCard {
        /// Lifecycle handle for apply, undo and dismiss.
        card: ActionCard,
        /// What the card proposes.
        proposal: Proposal,
        /// Whether the reasoning starts collapsed.
        collapsed: bool,
    },
    /// A scenario card.
    ScenarioCard {
        /// Lifecycle handle for apply, undo and dismiss.
        card: ActionCard,
        /// Scenario shown on the card.
        scenario: Scenario,
        /// Whether the service recommended this scenario.
        recommended: bool,
    },
    /// Buttons to narrow the next request.
    Options(DrillDown),
}

impl ChatItem {
    /// The card carried by this item, if any.
    pub fn card(&self) -> Option<&ActionCard> {
        match self {
            Self::ProposalCard { card, .. } | Self::ScenarioCard { card, .. } => Some(card),
            Self::Message(_) | Self::Options(_) => None,
        }
    }
}

/// Chat items for a decoded response, in display order.
///
/// Proposal reasoning longer than `cards.reasoning_collapse_chars`
/// characters is marked collapsed.
pub fn present(response: AdvisoryResponse, cards: &CardConfig) -> Vec<ChatItem> {
    match response {
        AdvisoryResponse::Proposals(proposals) => {
            let mut items = Vec::with_capacity(proposals.len() + 1);
            items.push(ChatItem::Message(format!(
                "I found {} optimization opportunities.",
                proposals.len()
            )));
            items.extend(proposals.into_iter().map(|proposal| ChatItem::ProposalCard {
                card: ActionCard::proposal(proposal.operation.clone()),
                collapsed: proposal.is_reasoning_collapsible(cards.reasoning_collapse_chars),
                proposal,
            }));
            items
        }
        AdvisoryResponse::DrillDown(drill) => {
            vec![ChatItem::Message(drill.message.clone()), ChatItem::Options(drill)]
        }
        AdvisoryResponse::Scenarios(set) => {
            let mut items = vec![ChatItem::Message(format!(
                "I've generated {} simulation scenarios based on current data.",
                set.scenarios.len()
            ))];
            if let Some(rec) = &set.recommendation {
                items.push(ChatItem::Message(format!("Recommendation: {}", rec.reasoning)));
            }
            let flags: Vec<bool> = set.scenarios.iter().map(|s| set.is_recommended(s)).collect();
            for (scenario, recommended) in set.scenarios.into_iter().zip(flags) {
                items.push(ChatItem::ScenarioCard {
                    card: ActionCard::scenario(scenario.operations()),
                    scenario,
                    recommended,
                });
            }
            items
        }
        AdvisoryResponse::Advisory(text) => vec![ChatItem::Message(text)],
    }
}
