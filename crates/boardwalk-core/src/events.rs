//! Game event log.
//!
//! The log is the sole channel for observable history: every state
//! change appends exactly one typed event, in strict causal order, and
//! nothing is ever mutated or removed after append. External mappers
//! translate events into their own schemas; payloads carry every field
//! needed to reconstruct the change without recomputation.

use crate::board::PlayerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of game events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    GameStart,
    TurnStart,
    DiceRoll,
    Move,
    PassGo,
    Land,

    Purchase,
    AuctionStart,
    AuctionBid,
    AuctionPass,
    AuctionEnd,

    RentPayment,
    TaxPayment,

    CardDraw,
    CardEffect,

    BuildHouse,
    BuildHotel,
    SellBuilding,

    Mortgage,
    Unmortgage,

    GoToJail,
    JailAttempt,
    JailRelease,

    Bankruptcy,
    GameEnd,

    TradeProposed,
    TradeAccepted,
    TradeRejected,
    TradeCancelled,
    TradeExecuted,
    TradeFailed,
}

/// A logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub player_id: Option<PlayerId>,
    pub details: Value,
}

/// Append-only ordered record of game events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn log(&mut self, event_type: EventType, player_id: Option<PlayerId>, details: Value) {
        self.events.push(Event {
            event_type,
            player_id,
            details,
        });
    }

    /// All events in causal order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The most recent `count` events
    pub fn recent(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
