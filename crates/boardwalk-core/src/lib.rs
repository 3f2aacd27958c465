//! Boardwalk - a deterministic Monopoly rules engine
//!
//! This crate provides the complete game logic for Monopoly, including:
//! - The 40-space board with color groups, railroads, and utilities
//! - Full rule enforcement: monopolies, the even-build rule, mortgages,
//!   auctions, trading, jail, and bankruptcy settlement
//! - A legal-action generator and action dispatcher for driving games
//! - An append-only event log that makes every game replayable
//!
//! # Architecture
//!
//! The engine is synchronous and single-owner: every mutation is a
//! short in-memory transaction on [`GameState`], and a seeded RNG makes
//! whole games reproducible bit for bit. Waiting for input belongs to
//! the caller's driver loop, which polls [`rules::legal_actions`], asks
//! an [`Agent`] to choose, and calls [`rules::apply_action`].
//!
//! # Modules
//!
//! - [`board`]: static board layout and lookups
//! - [`cards`]: Chance and Community Chest decks
//! - [`game`]: the `GameState` aggregate and its mutation methods
//! - [`rules`]: legal-move detection and action dispatch
//! - [`auction`], [`trade`]: the transient sub-state machines
//! - [`snapshot`]: the public read-only projection
//! - [`agent`]: pluggable strategy objects for simulations

pub mod actions;
pub mod agent;
pub mod auction;
pub mod bank;
pub mod board;
pub mod cards;
pub mod config;
pub mod events;
pub mod game;
pub mod player;
pub mod rules;
pub mod snapshot;
pub mod trade;

// Re-export commonly used types
pub use actions::Action;
pub use agent::{run_game, Agent, GreedyAgent, RandomAgent};
pub use auction::{Auction, BidOutcome};
pub use bank::Bank;
pub use board::{Board, ColorGroup, PlayerId, Position, Space};
pub use cards::{Card, CardEffect, Deck, DeckType};
pub use config::GameConfig;
pub use events::{Event, EventLog, EventType};
pub use game::{CardOutcome, GameError, GameState, JailAttemptOutcome, PendingRent, PendingTax};
pub use player::{PlayerState, PropertyOwnership};
pub use rules::{apply_action, legal_actions, resolve_landing};
pub use snapshot::{snapshot, GameSnapshot};
pub use trade::{Trade, TradeManager, TradeOffer, TradeStatus};
