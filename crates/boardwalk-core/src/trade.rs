//! Peer-to-peer trading.
//!
//! A trade is a pair of offers: what the proposer gives, and what they
//! want back from the recipient. Offers can mix cash, properties, and
//! Get Out of Jail Free cards. The recipient accepts or rejects; the
//! proposer can cancel. Both offers are re-validated against current
//! state at execution time, since holdings may have drifted since the
//! proposal.

use crate::board::{PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// One side of a trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub cash: i64,
    pub properties: BTreeSet<Position>,
    pub jail_cards: u8,
}

impl TradeOffer {
    pub fn is_empty(&self) -> bool {
        self.cash == 0 && self.properties.is_empty() && self.jail_cards == 0
    }

    /// Offer consisting of cash only
    pub fn cash(amount: i64) -> Self {
        Self {
            cash: amount,
            ..Self::default()
        }
    }

    /// Offer consisting of a single property
    pub fn property(position: Position) -> Self {
        Self {
            properties: BTreeSet::from([position]),
            ..Self::default()
        }
    }
}

/// Why an offer cannot be honored by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TradeValidationError {
    #[error("insufficient cash: has {has}, offering {offering}")]
    InsufficientCash { has: i64, offering: i64 },

    #[error("insufficient jail cards: has {has}, offering {offering}")]
    InsufficientJailCards { has: u8, offering: u8 },

    #[error("property at position {0} is not owned by the offering player")]
    NotOwned(Position),

    #[error("property at position {0} cannot be traded: it or its color group has buildings")]
    HasBuildings(Position),
}

/// Lifecycle status of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl TradeStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TradeStatus::Pending)
    }
}

/// A trade proposal between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: u64,
    pub proposer_id: PlayerId,
    pub recipient_id: PlayerId,
    /// What the proposer gives
    pub proposer_offer: TradeOffer,
    /// What the proposer wants back
    pub recipient_offer: TradeOffer,
    pub status: TradeStatus,
    pub proposed_turn: u32,
}

/// Holds active trades and the history of settled ones.
///
/// A trade is unique by id and moves from active to history exactly once,
/// when it reaches a terminal status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeManager {
    next_trade_id: u64,
    active_trades: Vec<Trade>,
    trade_history: Vec<Trade>,
}

impl TradeManager {
    pub fn new() -> Self {
        Self {
            next_trade_id: 1,
            active_trades: Vec::new(),
            trade_history: Vec::new(),
        }
    }

    /// Create a pending trade and return its id.
    pub fn create_trade(
        &mut self,
        proposer_id: PlayerId,
        recipient_id: PlayerId,
        proposer_offer: TradeOffer,
        recipient_offer: TradeOffer,
        proposed_turn: u32,
    ) -> u64 {
        let trade_id = self.next_trade_id;
        self.next_trade_id += 1;
        self.active_trades.push(Trade {
            trade_id,
            proposer_id,
            recipient_id,
            proposer_offer,
            recipient_offer,
            status: TradeStatus::Pending,
            proposed_turn,
        });
        trade_id
    }

    /// Look up a trade by id, active or settled.
    pub fn get(&self, trade_id: u64) -> Option<&Trade> {
        self.active_trades
            .iter()
            .chain(self.trade_history.iter())
            .find(|t| t.trade_id == trade_id)
    }

    /// Active trades involving a player, as proposer or recipient.
    pub fn active_trades_for(&self, player_id: PlayerId) -> Vec<&Trade> {
        self.active_trades
            .iter()
            .filter(|t| t.proposer_id == player_id || t.recipient_id == player_id)
            .collect()
    }

    pub fn active_trades(&self) -> &[Trade] {
        &self.active_trades
    }

    pub fn history(&self) -> &[Trade] {
        &self.trade_history
    }

    /// Move a pending trade to the given terminal status.
    /// Returns the settled trade, or `None` if the id is unknown or the
    /// trade is no longer pending.
    pub fn settle(&mut self, trade_id: u64, status: TradeStatus) -> Option<Trade> {
        debug_assert!(status.is_terminal());
        let index = self
            .active_trades
            .iter()
            .position(|t| t.trade_id == trade_id && t.status == TradeStatus::Pending)?;
        let mut trade = self.active_trades.remove(index);
        trade.status = status;
        self.trade_history.push(trade.clone());
        Some(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_with_property(position: Position) -> TradeOffer {
        TradeOffer::property(position)
    }

    #[test]
    fn test_trade_ids_are_monotonic() {
        let mut manager = TradeManager::new();
        let a = manager.create_trade(0, 1, TradeOffer::cash(100), offer_with_property(1), 1);
        let b = manager.create_trade(1, 0, TradeOffer::cash(50), offer_with_property(3), 1);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn test_settle_moves_to_history_once() {
        let mut manager = TradeManager::new();
        let id = manager.create_trade(0, 1, TradeOffer::cash(100), offer_with_property(1), 1);

        let settled = manager.settle(id, TradeStatus::Accepted).unwrap();
        assert_eq!(settled.status, TradeStatus::Accepted);
        assert!(manager.active_trades().is_empty());
        assert_eq!(manager.history().len(), 1);

        // A settled trade cannot be settled again
        assert!(manager.settle(id, TradeStatus::Rejected).is_none());
        assert_eq!(manager.get(id).unwrap().status, TradeStatus::Accepted);
    }

    #[test]
    fn test_active_trades_for_player() {
        let mut manager = TradeManager::new();
        manager.create_trade(0, 1, TradeOffer::cash(10), TradeOffer::cash(20), 1);
        manager.create_trade(2, 3, TradeOffer::cash(10), TradeOffer::cash(20), 1);

        assert_eq!(manager.active_trades_for(0).len(), 1);
        assert_eq!(manager.active_trades_for(1).len(), 1);
        assert_eq!(manager.active_trades_for(4).len(), 0);
    }

    #[test]
    fn test_empty_offer() {
        assert!(TradeOffer::default().is_empty());
        assert!(!TradeOffer::cash(1).is_empty());
        assert!(!TradeOffer::property(5).is_empty());
    }
}
