//! Chance and Community Chest cards.
//!
//! This module contains:
//! - The eleven card effect variants
//! - The `Deck` with its three pools (draw, discard, held)
//! - The standard Chance and Community Chest card sets
//!
//! A card belongs to exactly one pool at a time. Drawing from an empty
//! draw pile reshuffles the discard pile back in. Get Out of Jail Free
//! cards move to the held pool while a player keeps them and only return
//! to the discard pile when used or forfeited.

use crate::board::Position;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Which deck a card space draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckType {
    Chance,
    CommunityChest,
}

impl DeckType {
    /// Name used in event payloads
    pub fn name(&self) -> &'static str {
        match self {
            DeckType::Chance => "chance",
            DeckType::CommunityChest => "community_chest",
        }
    }
}

/// Target of a "move to nearest" card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearestTarget {
    Railroad,
    Utility,
}

/// The effect a card has when drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardEffect {
    /// Move directly to a position
    MoveTo {
        position: Position,
        collect_go: bool,
    },
    /// Move forward (or backward, negative) by a number of spaces
    MoveSpaces { spaces: i32, collect_go: bool },
    /// Advance to the nearest railroad or utility; the override applies
    /// to the rent owed on that landing only
    MoveToNearest {
        target: NearestTarget,
        rent_multiplier: Option<f64>,
    },
    /// Collect from the bank
    Collect { amount: i64 },
    /// Pay the bank
    Pay { amount: i64 },
    /// Pay per building; a hotel counts as four houses
    PayPerHouse { amount: i64 },
    /// Pay per building with a separate hotel price
    PayPerBuilding { per_house: i64, per_hotel: i64 },
    /// Collect from every other player, capped at what each can pay
    CollectFromPlayers { amount: i64 },
    /// Pay every other player, each transfer capped at remaining cash
    PayToPlayers { amount: i64 },
    /// Go directly to jail
    GoToJail,
    /// Keep this card until used to leave jail
    GetOutOfJail,
}

/// A Chance or Community Chest card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Card {
    pub description: &'static str,
    pub effect: CardEffect,
}

impl Card {
    pub const fn new(description: &'static str, effect: CardEffect) -> Self {
        Self {
            description,
            effect,
        }
    }
}

/// A deck of cards with draw, discard, and held pools.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    discard_pile: Vec<Card>,
    held_cards: Vec<Card>,
}

impl Deck {
    /// Create a deck, shuffled once with the game's RNG.
    pub fn new<R: Rng>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self {
            cards,
            discard_pile: Vec::new(),
            held_cards: Vec::new(),
        }
    }

    /// Draw the top card. Reshuffles the discard pile into the draw pile
    /// when the draw pile is empty. Returns `None` only if both piles are
    /// exhausted (every card is held).
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            if self.discard_pile.is_empty() {
                return None;
            }
            std::mem::swap(&mut self.cards, &mut self.discard_pile);
            self.cards.shuffle(rng);
        }
        Some(self.cards.remove(0))
    }

    /// Return a card to the bottom of the deck (discard pile).
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Mark a card as held by a player (Get Out of Jail Free).
    pub fn hold(&mut self, card: Card) {
        self.held_cards.push(card);
    }

    /// Move one held card back to the discard pile.
    /// Returns false if no card is held.
    pub fn return_held(&mut self) -> bool {
        match self.held_cards.pop() {
            Some(card) => {
                self.discard_pile.push(card);
                true
            }
            None => false,
        }
    }

    /// Cards left in the draw pile
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Cards in the discard pile
    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    /// Cards currently held by players
    pub fn held_count(&self) -> usize {
        self.held_cards.len()
    }
}

/// The standard Chance cards.
pub fn chance_cards() -> Vec<Card> {
    use CardEffect::*;
    vec![
        Card::new(
            "Advance to Go (Collect $200)",
            MoveTo {
                position: 0,
                collect_go: true,
            },
        ),
        Card::new(
            "Advance to Illinois Ave.",
            MoveTo {
                position: 24,
                collect_go: true,
            },
        ),
        Card::new(
            "Advance to St. Charles Place",
            MoveTo {
                position: 11,
                collect_go: true,
            },
        ),
        Card::new(
            "Advance token to nearest Utility. If owned, pay owner 10 times dice roll.",
            MoveToNearest {
                target: NearestTarget::Utility,
                rent_multiplier: Some(10.0),
            },
        ),
        Card::new(
            "Advance token to nearest Railroad. If owned, pay owner twice the rental.",
            MoveToNearest {
                target: NearestTarget::Railroad,
                rent_multiplier: Some(2.0),
            },
        ),
        Card::new(
            "Advance token to nearest Railroad. If owned, pay owner twice the rental.",
            MoveToNearest {
                target: NearestTarget::Railroad,
                rent_multiplier: Some(2.0),
            },
        ),
        Card::new("Bank pays you dividend of $50", Collect { amount: 50 }),
        Card::new("Get Out of Jail Free", GetOutOfJail),
        Card::new(
            "Go Back 3 Spaces",
            MoveSpaces {
                spaces: -3,
                collect_go: false,
            },
        ),
        Card::new("Go to Jail", GoToJail),
        Card::new(
            "Make general repairs on all your property: Pay $25 per house, $100 per hotel",
            PayPerHouse { amount: 25 },
        ),
        Card::new("Pay poor tax of $15", Pay { amount: 15 }),
        Card::new(
            "Take a trip to Reading Railroad",
            MoveTo {
                position: 5,
                collect_go: true,
            },
        ),
        Card::new(
            "Take a walk on the Boardwalk",
            MoveTo {
                position: 39,
                collect_go: true,
            },
        ),
        Card::new(
            "You have been elected Chairman of the Board. Pay each player $50",
            PayToPlayers { amount: 50 },
        ),
        Card::new(
            "Your building loan matures. Collect $150",
            Collect { amount: 150 },
        ),
    ]
}

/// The standard Community Chest cards.
pub fn community_chest_cards() -> Vec<Card> {
    use CardEffect::*;
    vec![
        Card::new(
            "Advance to Go (Collect $200)",
            MoveTo {
                position: 0,
                collect_go: true,
            },
        ),
        Card::new("Bank error in your favor. Collect $200", Collect { amount: 200 }),
        Card::new("Doctor's fees. Pay $50", Pay { amount: 50 }),
        Card::new("From sale of stock you get $50", Collect { amount: 50 }),
        Card::new("Get Out of Jail Free", GetOutOfJail),
        Card::new("Go to Jail", GoToJail),
        Card::new(
            "Grand Opera Night. Collect $50 from every player",
            CollectFromPlayers { amount: 50 },
        ),
        Card::new("Holiday Fund matures. Receive $100", Collect { amount: 100 }),
        Card::new("Income tax refund. Collect $20", Collect { amount: 20 }),
        Card::new(
            "It is your birthday. Collect $10 from every player",
            CollectFromPlayers { amount: 10 },
        ),
        Card::new("Life insurance matures. Collect $100", Collect { amount: 100 }),
        Card::new("Hospital fees. Pay $100", Pay { amount: 100 }),
        Card::new("School fees. Pay $150", Pay { amount: 150 }),
        Card::new("Receive $25 consultancy fee", Collect { amount: 25 }),
        Card::new(
            "You are assessed for street repairs: Pay $40 per house, $115 per hotel",
            PayPerBuilding {
                per_house: 40,
                per_hotel: 115,
            },
        ),
        Card::new(
            "You have won second prize in a beauty contest. Collect $10",
            Collect { amount: 10 },
        ),
        Card::new("You inherit $100", Collect { amount: 100 }),
    ]
}
