//! Advisory chat session.
//!
//! Couples a [`Board`] with an [`AdvisoryService`]. Queries go out with the
//! latest factory, responses come back as [`ChatItem`]s, and every card
//! shown is kept here so the user can apply, undo or dismiss it later.
//!
//! A failed call never ends the session: it becomes a chat message.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::advisory::{AdvisoryRequest, AdvisoryService};
use crate::board::{Board, RenderSink};
use crate::config::CardConfig;
use crate::engine::ApplyReport;
use crate::error::{BoardError, Result};
use crate::intake::{present, strip_detail_message, strip_detail_query, ChatItem, DrillDownKind, Endpoint, QuickAction};
use crate::models::StripId;
use crate::undo::{ActionCard, ActionToken, CardState};

/// A user message and what the assistant answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Text echoed as the user's message.
    pub user: String,
    /// Assistant items in display order.
    pub items: Vec<ChatItem>,
}

/// One interactive board session.
#[derive(Debug)]
pub struct Session<A: AdvisoryService, S: RenderSink> {
    board: Board<S>,
    service: A,
    cards: HashMap<ActionToken, ActionCard>,
    card_config: CardConfig,
}

impl<A: AdvisoryService, S: RenderSink> Session<A, S> {
    /// Creates a session over `board`, asking `service` for advice.
    pub fn new(board: Board<S>, service: A) -> Self {
        Self {
            board,
            service,
            cards: HashMap::new(),
            card_config: CardConfig::default(),
        }
    }

    /// Sets how cards are presented.
    pub fn with_card_config(mut self, config: CardConfig) -> Self {
        self.card_config = config;
        self
    }

    /// The board this session edits.
    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    /// Mutable access to the board, e.g. to load a new factory.
    pub fn board_mut(&mut self) -> &mut Board<S> {
        &mut self.board
    }

    /// Free-text query to the optimizer.
    pub fn ask(&mut self, query: &str) -> Exchange {
        let items = self.request(Endpoint::Optimize, query);
        Exchange {
            user: query.to_string(),
            items,
        }
    }

    /// One of the canned quick actions.
    pub fn quick_action(&mut self, action: QuickAction) -> Exchange {
        let items = self.request(action.endpoint(), action.user_message());
        Exchange {
            user: action.prompt().to_string(),
            items,
        }
    }

    /// Follow-up after the user picked a drill-down option.
    pub fn choose_option(&mut self, kind: DrillDownKind, option: &str) -> Exchange {
        let query = kind.follow_up_query(option);
        let items = self.request(Endpoint::Optimize, &query);
        Exchange {
            user: option.to_string(),
            items,
        }
    }

    /// Asks about a strip the user clicked on the board.
    pub fn inspect_strip(&mut self, strip_id: StripId) -> Option<Exchange> {
        let factory = self.board.factory();
        let strip = factory.find_strip(strip_id)?;
        let line = factory.owner_of(strip_id)?;
        let user = strip_detail_message(strip);
        let query = strip_detail_query(strip, line);
        let items = self.request(Endpoint::Optimize, &query);
        Some(Exchange { user, items })
    }

    /// Applies a card shown earlier.
    pub fn apply(&mut self, token: &ActionToken) -> Result<Vec<ApplyReport>> {
        let card = self
            .cards
            .get_mut(token)
            .ok_or_else(|| BoardError::UnknownCard(token.clone()))?;
        let reports = self.board.apply_card(card)?;
        info!(%token, operations = reports.len(), "card applied");
        Ok(reports)
    }

    /// Undoes an applied card.
    pub fn undo(&mut self, token: &ActionToken) -> Result<()> {
        let card = self
            .cards
            .get_mut(token)
            .ok_or_else(|| BoardError::UnknownCard(token.clone()))?;
        self.board.undo_card(card)?;
        info!(%token, "card undone");
        Ok(())
    }

    /// Dismisses a card.
    pub fn dismiss(&mut self, token: &ActionToken) -> Result<()> {
        let card = self
            .cards
            .get_mut(token)
            .ok_or_else(|| BoardError::UnknownCard(token.clone()))?;
        self.board.dismiss_card(card)?;
        Ok(())
    }

    /// Lifecycle state of a card shown earlier.
    pub fn card_state(&self, token: &ActionToken) -> Option<CardState> {
        self.cards.get(token).map(ActionCard::state)
    }

    /// Number of cards tracked by the session.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn request(&mut self, endpoint: Endpoint, user_message: &str) -> Vec<ChatItem> {
        let request = AdvisoryRequest::new(self.board.factory(), user_message);
        match self.service.call(endpoint, &request) {
            Ok(response) => {
                let items = present(response, &self.card_config);
                for card in items.iter().filter_map(ChatItem::card) {
                    self.cards.insert(card.token().clone(), card.clone());
                }
                items
            }
            Err(err) => {
                warn!(error = %err, ?endpoint, "advisory call failed");
                vec![ChatItem::Message(err.user_message(endpoint))]
            }
        }
    }
}
