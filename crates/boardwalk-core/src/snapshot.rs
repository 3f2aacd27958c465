//! Public snapshot of the game state.
//!
//! A read-only projection for servers and UIs: public player state,
//! bank supply, auction summary, and deck counts. Deck *order* is never
//! exposed, so upcoming draws stay unpredictable.

use crate::auction::Auction;
use crate::board::{ColorGroup, PlayerId, Position};
use crate::cards::Deck;
use crate::game::GameState;
use serde::Serialize;

/// One owned property in a player's public listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub position: Position,
    pub name: &'static str,
    pub houses: u8,
    pub mortgaged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_group: Option<ColorGroup>,
}

/// A player's public state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub cash: i64,
    pub position: Position,
    pub in_jail: bool,
    pub jail_turns: u8,
    pub jail_cards: u8,
    pub is_bankrupt: bool,
    pub properties: Vec<PropertySnapshot>,
}

/// Bank supply counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankSnapshot {
    pub houses_available: u32,
    pub hotels_available: u32,
}

/// Summary of the auction in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionSnapshot {
    pub property_position: Position,
    pub property_name: &'static str,
    pub current_bid: i64,
    pub high_bidder: Option<PlayerId>,
    pub active_bidders: Vec<PlayerId>,
    pub is_complete: bool,
}

/// Pool sizes for one deck; order stays hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSnapshot {
    pub cards_remaining: usize,
    pub discard_count: usize,
    pub held_count: usize,
}

/// Both decks' counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecksSnapshot {
    pub chance: DeckSnapshot,
    pub community_chest: DeckSnapshot,
}

/// The full public projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub turn_number: u32,
    pub current_player_id: PlayerId,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub players: Vec<PlayerSnapshot>,
    pub bank: BankSnapshot,
    pub auction: Option<AuctionSnapshot>,
    pub decks: DecksSnapshot,
}

/// Build the public snapshot of a game.
pub fn snapshot(game: &GameState) -> GameSnapshot {
    let players = game
        .players
        .values()
        .map(|player| {
            let properties = game
                .properties_owned_by(player.player_id)
                .into_iter()
                .map(|position| {
                    let space = game.board.space(position);
                    let ownership = &game.property_ownership[&position];
                    PropertySnapshot {
                        position,
                        name: space.name(),
                        houses: ownership.houses,
                        mortgaged: ownership.is_mortgaged,
                        color_group: space.color_group(),
                    }
                })
                .collect();

            PlayerSnapshot {
                player_id: player.player_id,
                name: player.name.clone(),
                cash: player.cash,
                position: player.position,
                in_jail: player.in_jail,
                jail_turns: player.jail_turns,
                jail_cards: player.get_out_of_jail_cards,
                is_bankrupt: player.is_bankrupt,
                properties,
            }
        })
        .collect();

    GameSnapshot {
        turn_number: game.turn_number,
        current_player_id: game.current_player_id(),
        game_over: game.game_over,
        winner: game.winner,
        players,
        bank: BankSnapshot {
            houses_available: game.bank.houses_available,
            hotels_available: game.bank.hotels_available,
        },
        auction: game.active_auction.as_ref().map(|a| auction_snapshot(game, a)),
        decks: DecksSnapshot {
            chance: deck_snapshot(&game.chance_deck),
            community_chest: deck_snapshot(&game.community_chest_deck),
        },
    }
}

fn auction_snapshot(game: &GameState, auction: &Auction) -> AuctionSnapshot {
    AuctionSnapshot {
        property_position: auction.property_position,
        property_name: game.board.space(auction.property_position).name(),
        current_bid: auction.current_bid(),
        high_bidder: auction.high_bidder(),
        active_bidders: auction.active_bidders(),
        is_complete: auction.is_complete(),
    }
}

fn deck_snapshot(deck: &Deck) -> DeckSnapshot {
    DeckSnapshot {
        cards_remaining: deck.remaining(),
        discard_count: deck.discard_count(),
        held_count: deck.held_count(),
    }
}
