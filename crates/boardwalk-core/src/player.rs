//! Player state and property ownership records.
//!
//! Ownership lives in a single place: the `Position -> PropertyOwnership`
//! map held by the game state. A player's owned-property set is derived
//! from that map on demand rather than duplicated here, so the two can
//! never drift apart.

use crate::board::{PlayerId, Position};
use serde::{Deserialize, Serialize};

/// A single player's mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_id: PlayerId,
    pub name: String,
    /// May go negative transiently while a payment is pending resolution
    pub cash: i64,
    pub position: Position,
    pub in_jail: bool,
    /// Failed release attempts this jail stay
    pub jail_turns: u8,
    pub get_out_of_jail_cards: u8,
    pub is_bankrupt: bool,
    /// Doubles rolled in a row this turn; three in a row means jail
    pub consecutive_doubles: u8,
}

impl PlayerState {
    pub fn new(player_id: PlayerId, name: String, starting_cash: i64) -> Self {
        Self {
            player_id,
            name,
            cash: starting_cash,
            position: 0,
            in_jail: false,
            jail_turns: 0,
            get_out_of_jail_cards: 0,
            is_bankrupt: false,
            consecutive_doubles: 0,
        }
    }
}

/// Ownership state of one ownable space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOwnership {
    pub owner_id: Option<PlayerId>,
    /// 0-4 houses; 5 encodes a hotel
    pub houses: u8,
    pub is_mortgaged: bool,
}

impl PropertyOwnership {
    pub fn is_owned(&self) -> bool {
        self.owner_id.is_some()
    }

    pub fn has_hotel(&self) -> bool {
        self.houses == 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_starts_at_go() {
        let player = PlayerState::new(0, "Alice".to_string(), 1500);
        assert_eq!(player.cash, 1500);
        assert_eq!(player.position, 0);
        assert!(!player.in_jail);
        assert!(!player.is_bankrupt);
        assert_eq!(player.get_out_of_jail_cards, 0);
    }

    #[test]
    fn test_ownership_defaults_unowned() {
        let ownership = PropertyOwnership::default();
        assert!(!ownership.is_owned());
        assert_eq!(ownership.houses, 0);
        assert!(!ownership.is_mortgaged);
    }

    #[test]
    fn test_hotel_encoding() {
        let ownership = PropertyOwnership {
            owner_id: Some(1),
            houses: 5,
            is_mortgaged: false,
        };
        assert!(ownership.has_hotel());
    }
}
