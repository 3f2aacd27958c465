//! Player actions.
//!
//! Every move a player can make is one variant of [`Action`]. The rules
//! layer enumerates which are legal right now and applies the chosen
//! one; agents only ever pick from that list.

use crate::board::{PlayerId, Position};
use crate::trade::TradeOffer;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // ==================== Turn Flow ====================
    /// Roll the dice (also the jail doubles attempt)
    RollDice,
    /// End the turn
    EndTurn,

    // ==================== Purchasing ====================
    /// Buy the property just landed on at list price
    BuyProperty { position: Position },
    /// Decline the purchase, sending the property to auction
    DeclinePurchase { position: Position },

    // ==================== Auctions ====================
    /// Bid in the active auction. The legal-action list carries a
    /// placeholder amount; the agent supplies the real bid.
    Bid { amount: i64 },
    /// Pass on the active auction
    PassAuction,

    // ==================== Building & Mortgages ====================
    /// Add a house to a property
    BuildHouse { position: Position },
    /// Upgrade four houses to a hotel
    BuildHotel { position: Position },
    /// Sell one building back to the bank
    SellBuilding { position: Position },
    /// Mortgage a property for its mortgage value
    MortgageProperty { position: Position },
    /// Pay off a mortgage (value plus interest)
    UnmortgageProperty { position: Position },

    // ==================== Jail ====================
    /// Pay the fine and leave jail
    PayJailFine,
    /// Spend a Get Out of Jail Free card
    UseJailCard,

    // ==================== Trading ====================
    /// Offer a trade to another player. The legal-action list carries
    /// empty offers; the agent fills in the terms.
    ProposeTrade {
        recipient_id: PlayerId,
        offer: TradeOffer,
        want: TradeOffer,
    },
    /// Accept a trade offered to you
    AcceptTrade { trade_id: u64 },
    /// Reject a trade offered to you
    RejectTrade { trade_id: u64 },
    /// Withdraw your own pending trade
    CancelTrade { trade_id: u64 },

    // ==================== Terminal ====================
    /// Give up; assets go to the creditor, or the bank if none
    DeclareBankruptcy { creditor_id: Option<PlayerId> },
}
