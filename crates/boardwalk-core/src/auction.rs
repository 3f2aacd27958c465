//! Auction state machine for declined property purchases.
//!
//! Players bid until all but one have passed. The initiator (the player
//! who declined to buy) automatically opens with a bid of 10% of the
//! list price, so an auction always has a standing bid and all other
//! players passing still sells the property.
//!
//! The auction only decides the winner and price. Settlement (cash and
//! ownership transfer) is the game state's job, applied after
//! `is_complete` is observed.

use crate::board::{PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Bids each player may place before being passed automatically
pub const DEFAULT_MAX_BIDS_PER_PLAYER: u8 = 3;

/// Result of a bid attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidOutcome {
    /// Bid recorded as the new high bid. `exhausted` means this was the
    /// player's last allowed bid and they were passed automatically
    /// (they can still win on the standing high bid).
    Accepted { bid_number: u8, exhausted: bool },
    /// Bid at or below the current high bid; the bidder was passed
    /// automatically rather than left to stall the auction
    TooLow,
    /// Bidder already used every allowed bid; passed automatically
    BudgetExhausted,
    /// Bidder is not active, or the auction is already complete
    Rejected,
}

/// An auction for a single property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub property_position: Position,
    /// Players eligible when the auction was created (all non-bankrupt)
    eligible_player_ids: Vec<PlayerId>,
    /// Players who may still bid; shrinks as players pass
    active_bidders: BTreeSet<PlayerId>,
    current_bid: i64,
    high_bidder: Option<PlayerId>,
    bid_counts: BTreeMap<PlayerId, u8>,
    max_bids_per_player: u8,
    initiator_id: PlayerId,
    starting_bid: i64,
    is_complete: bool,
}

impl Auction {
    /// Create an auction with the initiator's automatic floor bid of
    /// `max(1, price / 10)` already placed.
    pub fn new(
        property_position: Position,
        eligible_player_ids: Vec<PlayerId>,
        initiator_id: PlayerId,
        property_price: i64,
        max_bids_per_player: u8,
    ) -> Self {
        let starting_bid = (property_price / 10).max(1);
        let active_bidders: BTreeSet<PlayerId> = eligible_player_ids.iter().copied().collect();
        let mut bid_counts: BTreeMap<PlayerId, u8> =
            eligible_player_ids.iter().map(|&id| (id, 0)).collect();
        bid_counts.insert(initiator_id, 1);

        let mut auction = Self {
            property_position,
            eligible_player_ids,
            active_bidders,
            current_bid: starting_bid,
            high_bidder: Some(initiator_id),
            bid_counts,
            max_bids_per_player,
            initiator_id,
            starting_bid,
            is_complete: false,
        };
        // A single eligible bidder wins on the floor bid immediately
        auction.check_completion();
        auction
    }

    /// Place a bid. Invalid bids (too low, budget exhausted) pass the
    /// bidder automatically instead of leaving them to stall.
    pub fn place_bid(&mut self, player_id: PlayerId, amount: i64) -> BidOutcome {
        if self.is_complete || !self.active_bidders.contains(&player_id) {
            return BidOutcome::Rejected;
        }

        if amount <= self.current_bid {
            self.pass(player_id);
            return BidOutcome::TooLow;
        }

        if self.bid_counts.get(&player_id).copied().unwrap_or(0) >= self.max_bids_per_player {
            self.pass(player_id);
            return BidOutcome::BudgetExhausted;
        }

        self.current_bid = amount;
        self.high_bidder = Some(player_id);
        let count = self.bid_counts.entry(player_id).or_insert(0);
        *count += 1;
        let bid_number = *count;

        let exhausted = bid_number >= self.max_bids_per_player;
        if exhausted {
            // Out of bids; they keep the high bid but can no longer act
            self.pass(player_id);
        }

        BidOutcome::Accepted {
            bid_number,
            exhausted,
        }
    }

    /// Remove a player from the active bidders.
    /// Returns true if the player was active.
    pub fn pass(&mut self, player_id: PlayerId) -> bool {
        if self.active_bidders.remove(&player_id) {
            self.check_completion();
            true
        } else {
            false
        }
    }

    fn check_completion(&mut self) {
        if self.active_bidders.len() <= 1 {
            self.is_complete = true;
        }
    }

    /// The winning player, or `None` while incomplete or if nobody bid
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_complete {
            return None;
        }
        self.high_bidder
    }

    /// The current (or winning) bid amount
    pub fn winning_bid(&self) -> i64 {
        self.current_bid
    }

    /// Whether a player may still place bids
    pub fn can_player_bid(&self, player_id: PlayerId) -> bool {
        self.active_bidders.contains(&player_id)
            && self.bid_counts.get(&player_id).copied().unwrap_or(0) < self.max_bids_per_player
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn is_active_bidder(&self, player_id: PlayerId) -> bool {
        self.active_bidders.contains(&player_id)
    }

    /// Active bidders in ascending player order
    pub fn active_bidders(&self) -> Vec<PlayerId> {
        self.active_bidders.iter().copied().collect()
    }

    pub fn eligible_player_ids(&self) -> &[PlayerId] {
        &self.eligible_player_ids
    }

    pub fn current_bid(&self) -> i64 {
        self.current_bid
    }

    pub fn high_bidder(&self) -> Option<PlayerId> {
        self.high_bidder
    }

    pub fn initiator_id(&self) -> PlayerId {
        self.initiator_id
    }

    pub fn starting_bid(&self) -> i64 {
        self.starting_bid
    }
}
