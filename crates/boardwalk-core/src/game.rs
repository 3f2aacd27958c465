//! Core game state and rule-enforcing mutation methods.
//!
//! `GameState` is the aggregate root: it owns the board, bank, event
//! log, card decks, players, ownership table, the active auction (at
//! most one), and the trade manager. Every public mutation method is a
//! small transaction: validate preconditions, mutate exactly the
//! entities required, append the matching event, and report expected
//! rule violations as `Err`/`false` rather than panicking.
//!
//! Determinism: the single `StdRng` owned here drives dice rolls and
//! deck shuffles. Given the same seed and the same sequence of calls,
//! the event log and final state are reproducible bit for bit.

use crate::auction::{Auction, BidOutcome, DEFAULT_MAX_BIDS_PER_PLAYER};
use crate::bank::Bank;
use crate::board::{
    railroad_rent, utility_rent, Board, ColorGroup, PlayerId, Position, Space, BOARD_SIZE,
    JAIL_POSITION,
};
use crate::cards::{chance_cards, community_chest_cards, Card, CardEffect, Deck, DeckType, NearestTarget};
use crate::config::GameConfig;
use crate::events::{EventLog, EventType};
use crate::player::{PlayerState, PropertyOwnership};
use crate::trade::{Trade, TradeOffer, TradeStatus, TradeManager, TradeValidationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors for expected rule violations.
///
/// These are normal outcomes of probing an illegal move, not crashes;
/// callers that consult [`crate::rules::legal_actions`] first should
/// never see them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Space cannot be purchased")]
    NotPurchasable,

    #[error("Property is already owned")]
    AlreadyOwned,

    #[error("Property is not owned by this player")]
    NotOwner,

    #[error("Cannot afford this")]
    CannotAfford,

    #[error("Building here is not allowed")]
    CannotBuild,

    #[error("Selling from here is not allowed")]
    CannotSell,

    #[error("Property cannot be mortgaged")]
    CannotMortgage,

    #[error("Property is not mortgaged")]
    NotMortgaged,

    #[error("Bank has no buildings left")]
    NoSupply,

    #[error("Player is not in jail")]
    NotInJail,

    #[error("No Get Out of Jail Free card held")]
    NoJailCard,

    #[error("No cards left to draw")]
    EmptyDeck,

    #[error("No auction in progress")]
    NoActiveAuction,

    #[error("An auction is already in progress")]
    AuctionInProgress,

    #[error("No such trade")]
    NoSuchTrade,

    #[error("Invalid trade")]
    InvalidTrade,
}

/// A rent debt the payer could not cover, blocking their turn until
/// resolved by fund-raising or bankruptcy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRent {
    pub payer_id: PlayerId,
    pub owner_id: PlayerId,
    pub amount: i64,
}

/// A tax debt the payer could not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTax {
    pub payer_id: PlayerId,
    pub amount: i64,
}

/// Result of a jail release attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JailAttemptOutcome {
    /// Player left jail and moved by this roll's total
    Released { total: u8 },
    /// Player stays in jail
    StillInJail,
}

/// What a card did, for the caller to finish resolving.
///
/// Movement cards report where the player ended up, plus the rent
/// override that applies to that landing only; the caller threads both
/// into the landing resolution. No override state lives on `GameState`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardOutcome {
    pub moved_to: Option<Position>,
    pub rent_override: Option<f64>,
}

/// The complete state of a Monopoly game.
#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub bank: Bank,
    pub event_log: EventLog,
    pub chance_deck: Deck,
    pub community_chest_deck: Deck,
    pub trade_manager: TradeManager,
    /// All players, including bankrupt ones (never removed)
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Single source of truth for who owns what
    pub property_ownership: BTreeMap<Position, PropertyOwnership>,
    pub current_player_index: usize,
    pub turn_number: u32,
    pub active_auction: Option<Auction>,
    pub pending_rent_payment: Option<PendingRent>,
    pub pending_tax_payment: Option<PendingTax>,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub last_dice_roll: Option<(u8, u8)>,
    pub pending_dice_roll: bool,
    rng: StdRng,
}

impl GameState {
    /// Create a new game. Players are assigned ids 0..n in name order.
    pub fn new(config: GameConfig, player_names: Vec<String>) -> Self {
        assert!(
            !player_names.is_empty() && player_names.len() <= 8,
            "Must have 1-8 players"
        );

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let board = Board::standard();
        let bank = Bank::new(config.house_limit, config.hotel_limit);

        let players: BTreeMap<PlayerId, PlayerState> = player_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let id = i as PlayerId;
                (id, PlayerState::new(id, name.clone(), config.starting_cash))
            })
            .collect();

        let property_ownership: BTreeMap<Position, PropertyOwnership> = board
            .spaces()
            .iter()
            .enumerate()
            .filter(|(_, space)| space.is_ownable())
            .map(|(position, _)| (position, PropertyOwnership::default()))
            .collect();

        let chance_deck = Deck::new(chance_cards(), &mut rng);
        let community_chest_deck = Deck::new(community_chest_cards(), &mut rng);

        let mut event_log = EventLog::new();
        event_log.log(
            EventType::GameStart,
            None,
            json!({
                "players": player_names,
                "starting_cash": config.starting_cash,
                "seed": config.seed,
            }),
        );

        Self {
            config,
            board,
            bank,
            event_log,
            chance_deck,
            community_chest_deck,
            trade_manager: TradeManager::new(),
            players,
            property_ownership,
            current_player_index: 0,
            turn_number: 0,
            active_auction: None,
            pending_rent_payment: None,
            pending_tax_payment: None,
            game_over: false,
            winner: None,
            last_dice_roll: None,
            pending_dice_roll: true,
            rng,
        }
    }

    // ==================== Queries ====================

    /// Get a player by id
    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&player_id)
    }

    /// The id of the player whose turn it is
    pub fn current_player_id(&self) -> PlayerId {
        let ids: Vec<PlayerId> = self.players.keys().copied().collect();
        ids[self.current_player_index % ids.len()]
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> &PlayerState {
        &self.players[&self.current_player_id()]
    }

    /// Ids of all non-bankrupt players, ascending
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| !p.is_bankrupt)
            .map(|p| p.player_id)
            .collect()
    }

    /// Positions owned by a player, derived from the ownership table
    pub fn properties_owned_by(&self, player_id: PlayerId) -> Vec<Position> {
        self.property_ownership
            .iter()
            .filter(|(_, o)| o.owner_id == Some(player_id))
            .map(|(&position, _)| position)
            .collect()
    }

    /// Whether a player owns the whole color group with nothing mortgaged
    pub fn has_monopoly(&self, player_id: PlayerId, color: ColorGroup) -> bool {
        let group = self.board.color_group(color);
        !group.is_empty()
            && group.iter().all(|pos| {
                let ownership = &self.property_ownership[pos];
                ownership.owner_id == Some(player_id) && !ownership.is_mortgaged
            })
    }

    /// Net worth: cash + list prices + building value, minus mortgage
    /// value on mortgaged holdings. Used for timed-game tiebreaks.
    pub fn net_worth(&self, player_id: PlayerId) -> i64 {
        let mut worth = self.players[&player_id].cash;
        for position in self.properties_owned_by(player_id) {
            let space = self.board.space(position);
            let ownership = &self.property_ownership[&position];
            worth += space.price().unwrap_or(0);
            if let Some(house_cost) = space.house_cost() {
                worth += i64::from(ownership.houses) * house_cost;
            }
            if ownership.is_mortgaged {
                worth -= space.mortgage_value().unwrap_or(0);
            }
        }
        worth
    }

    // ==================== Dice & Movement ====================

    /// Roll two dice, record the roll, and log it. Always succeeds.
    pub fn roll_dice(&mut self) -> (u8, u8) {
        let die1 = self.rng.gen_range(1..=6);
        let die2 = self.rng.gen_range(1..=6);
        self.last_dice_roll = Some((die1, die2));
        self.pending_dice_roll = false;

        self.event_log.log(
            EventType::DiceRoll,
            Some(self.current_player_id()),
            json!({
                "die1": die1,
                "die2": die2,
                "total": die1 + die2,
                "doubles": die1 == die2,
            }),
        );

        (die1, die2)
    }

    /// Move a player forward (or backward) by `spaces`, collecting the
    /// GO salary on a forward wrap. Returns the new position.
    pub fn move_player(&mut self, player_id: PlayerId, spaces: i32, collect_go: bool) -> Position {
        let old_position = self.players[&player_id].position;
        let new_position =
            (old_position as i32 + spaces).rem_euclid(BOARD_SIZE as i32) as Position;

        if collect_go && new_position < old_position && spaces > 0 {
            self.collect_go_salary(player_id);
        }

        self.players.get_mut(&player_id).unwrap().position = new_position;

        self.event_log.log(
            EventType::Move,
            Some(player_id),
            json!({
                "from": old_position,
                "to": new_position,
                "spaces": spaces,
            }),
        );

        new_position
    }

    /// Place a player directly on a position. The GO salary is collected
    /// only when the destination index is behind the origin (wrap), and
    /// only if the card allows it.
    pub fn move_player_to(&mut self, player_id: PlayerId, position: Position, collect_go: bool) {
        let old_position = self.players[&player_id].position;

        if collect_go && position < old_position {
            self.collect_go_salary(player_id);
        }

        self.players.get_mut(&player_id).unwrap().position = position;

        self.event_log.log(
            EventType::Move,
            Some(player_id),
            json!({
                "from": old_position,
                "to": position,
                "direct": true,
            }),
        );
    }

    fn collect_go_salary(&mut self, player_id: PlayerId) {
        let player = self.players.get_mut(&player_id).unwrap();
        player.cash += self.config.go_salary;
        let new_balance = player.cash;

        self.event_log.log(
            EventType::PassGo,
            Some(player_id),
            json!({
                "amount": self.config.go_salary,
                "new_balance": new_balance,
            }),
        );
    }

    // ==================== Jail ====================

    /// Send a player to jail. Never pays the GO salary.
    pub fn send_to_jail(&mut self, player_id: PlayerId) {
        let player = self.players.get_mut(&player_id).unwrap();
        player.position = JAIL_POSITION;
        player.in_jail = true;
        player.jail_turns = 0;
        player.consecutive_doubles = 0;

        self.event_log
            .log(EventType::GoToJail, Some(player_id), json!({}));
    }

    /// Roll for doubles to leave jail. Doubles release the player and
    /// move them by the roll (the release movement, not an extra roll).
    /// A third failed attempt forces the fine if affordable, releasing
    /// and moving as well; a broke player stays in jail to raise funds.
    pub fn attempt_jail_release(
        &mut self,
        player_id: PlayerId,
    ) -> Result<JailAttemptOutcome, GameError> {
        if !self.players[&player_id].in_jail {
            return Err(GameError::NotInJail);
        }

        let (die1, die2) = self.roll_dice();
        let is_doubles = die1 == die2;
        let total = die1 + die2;

        let player = self.players.get_mut(&player_id).unwrap();
        player.jail_turns += 1;
        let attempt = player.jail_turns;

        self.event_log.log(
            EventType::JailAttempt,
            Some(player_id),
            json!({
                "attempt": attempt,
                "doubles": is_doubles,
            }),
        );

        if is_doubles {
            self.release_from_jail(player_id);
            self.event_log.log(
                EventType::JailRelease,
                Some(player_id),
                json!({"method": "doubles"}),
            );
            self.move_player(player_id, i32::from(total), true);
            return Ok(JailAttemptOutcome::Released { total });
        }

        if attempt >= self.config.max_jail_turns {
            // Forced release: pay the fine and move by this roll
            if self.players[&player_id].cash >= self.config.jail_fine {
                self.pay_jail_fine(player_id)?;
                self.move_player(player_id, i32::from(total), true);
                return Ok(JailAttemptOutcome::Released { total });
            }
            // Cannot afford the fine; stays until funds are raised
        }

        Ok(JailAttemptOutcome::StillInJail)
    }

    /// Pay the fine to leave jail.
    pub fn pay_jail_fine(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if !self.players[&player_id].in_jail {
            return Err(GameError::NotInJail);
        }
        if self.players[&player_id].cash < self.config.jail_fine {
            return Err(GameError::CannotAfford);
        }

        self.players.get_mut(&player_id).unwrap().cash -= self.config.jail_fine;
        self.release_from_jail(player_id);

        self.event_log.log(
            EventType::JailRelease,
            Some(player_id),
            json!({
                "method": "fine",
                "amount": self.config.jail_fine,
            }),
        );

        Ok(())
    }

    /// Spend a Get Out of Jail Free card. The physical card returns to
    /// the discard pile of the deck holding it.
    pub fn use_jail_card(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if !self.players[&player_id].in_jail {
            return Err(GameError::NotInJail);
        }
        if self.players[&player_id].get_out_of_jail_cards == 0 {
            return Err(GameError::NoJailCard);
        }

        self.players.get_mut(&player_id).unwrap().get_out_of_jail_cards -= 1;
        self.release_from_jail(player_id);
        self.return_held_jail_card();

        self.event_log.log(
            EventType::JailRelease,
            Some(player_id),
            json!({"method": "card"}),
        );

        Ok(())
    }

    fn release_from_jail(&mut self, player_id: PlayerId) {
        let player = self.players.get_mut(&player_id).unwrap();
        player.in_jail = false;
        player.jail_turns = 0;
    }

    /// Put one held Get Out of Jail Free card back into rotation.
    fn return_held_jail_card(&mut self) {
        if !self.chance_deck.return_held() {
            self.community_chest_deck.return_held();
        }
    }

    // ==================== Purchases & Auctions ====================

    /// Buy the property at `position` at list price.
    pub fn buy_property(&mut self, player_id: PlayerId, position: Position) -> Result<(), GameError> {
        let space = self.board.space(position);
        let price = space.price().ok_or(GameError::NotPurchasable)?;
        let name = space.name();

        let ownership = self
            .property_ownership
            .get(&position)
            .ok_or(GameError::NotPurchasable)?;
        if ownership.is_owned() {
            return Err(GameError::AlreadyOwned);
        }

        if self.players[&player_id].cash < price {
            return Err(GameError::CannotAfford);
        }

        let player = self.players.get_mut(&player_id).unwrap();
        player.cash -= price;
        let new_balance = player.cash;
        self.property_ownership.get_mut(&position).unwrap().owner_id = Some(player_id);

        self.event_log.log(
            EventType::Purchase,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "price": price,
                "new_balance": new_balance,
            }),
        );

        Ok(())
    }

    /// Start an auction for a declined property. The initiator is
    /// auto-registered with a floor bid of 10% of list price.
    pub fn start_auction(
        &mut self,
        position: Position,
        initiator_id: PlayerId,
    ) -> Result<(), GameError> {
        if self.active_auction.is_some() {
            return Err(GameError::AuctionInProgress);
        }
        let space = self.board.space(position);
        let price = space.price().ok_or(GameError::NotPurchasable)?;
        let name = space.name();

        let eligible = self.active_players();
        let auction = Auction::new(
            position,
            eligible.clone(),
            initiator_id,
            price,
            DEFAULT_MAX_BIDS_PER_PLAYER,
        );

        self.event_log.log(
            EventType::AuctionStart,
            None,
            json!({
                "property": name,
                "position": position,
                "players": eligible,
                "initiator": initiator_id,
                "starting_bid": auction.starting_bid(),
            }),
        );
        self.event_log.log(
            EventType::AuctionBid,
            Some(initiator_id),
            json!({
                "property": name,
                "amount": auction.starting_bid(),
                "bid_number": 1,
                "automatic": true,
            }),
        );

        let complete = auction.is_complete();
        self.active_auction = Some(auction);
        if complete {
            self.resolve_auction();
        }
        Ok(())
    }

    /// Place a bid in the active auction. A bid at or below the current
    /// high, or past the bid budget, passes the bidder automatically.
    pub fn place_auction_bid(
        &mut self,
        player_id: PlayerId,
        amount: i64,
    ) -> Result<BidOutcome, GameError> {
        let auction = self
            .active_auction
            .as_mut()
            .ok_or(GameError::NoActiveAuction)?;
        let name = self.board.space(auction.property_position).name();

        let outcome = auction.place_bid(player_id, amount);
        match outcome {
            BidOutcome::Accepted {
                bid_number,
                exhausted,
            } => {
                self.event_log.log(
                    EventType::AuctionBid,
                    Some(player_id),
                    json!({
                        "property": name,
                        "amount": amount,
                        "bid_number": bid_number,
                    }),
                );
                if exhausted {
                    let remaining = auction.active_bidders();
                    self.event_log.log(
                        EventType::AuctionPass,
                        Some(player_id),
                        json!({
                            "property": name,
                            "reason": "bid_budget_exhausted",
                            "remaining_bidders": remaining,
                        }),
                    );
                }
            }
            BidOutcome::TooLow | BidOutcome::BudgetExhausted => {
                let remaining = auction.active_bidders();
                self.event_log.log(
                    EventType::AuctionPass,
                    Some(player_id),
                    json!({
                        "property": name,
                        "reason": "invalid_bid",
                        "remaining_bidders": remaining,
                    }),
                );
            }
            BidOutcome::Rejected => {}
        }

        if self
            .active_auction
            .as_ref()
            .is_some_and(|a| a.is_complete())
        {
            self.resolve_auction();
        }
        Ok(outcome)
    }

    /// Pass on the active auction.
    pub fn pass_auction(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let auction = self
            .active_auction
            .as_mut()
            .ok_or(GameError::NoActiveAuction)?;
        let name = self.board.space(auction.property_position).name();

        let was_active = auction.pass(player_id);
        let remaining = auction.active_bidders();
        self.event_log.log(
            EventType::AuctionPass,
            Some(player_id),
            json!({
                "property": name,
                "already_passed": !was_active,
                "remaining_bidders": remaining,
            }),
        );

        if self
            .active_auction
            .as_ref()
            .is_some_and(|a| a.is_complete())
        {
            self.resolve_auction();
        }
        Ok(())
    }

    /// Settle a completed auction: transfer cash and ownership, log the
    /// end event, and clear the auction. This is the only place auction
    /// results touch game state.
    pub fn resolve_auction(&mut self) {
        let auction = match self.active_auction.take() {
            Some(a) if a.is_complete() => a,
            other => {
                self.active_auction = other;
                return;
            }
        };

        let position = auction.property_position;
        let name = self.board.space(position).name();
        let winning_bid = auction.winning_bid();
        let winner = auction.winner();

        let winner_balance = winner.map(|winner_id| {
            self.property_ownership.get_mut(&position).unwrap().owner_id = Some(winner_id);
            let player = self.players.get_mut(&winner_id).unwrap();
            player.cash -= winning_bid;
            player.cash
        });

        self.event_log.log(
            EventType::AuctionEnd,
            winner,
            json!({
                "property": name,
                "position": position,
                "winner": winner,
                "winning_bid": winning_bid,
                "winner_balance": winner_balance,
            }),
        );

        // The purchase decision is settled; no re-roll survives it
        self.pending_dice_roll = false;
    }

    // ==================== Rent & Taxes ====================

    /// Compute rent owed for landing on `position`. Pure read; returns 0
    /// for unowned or mortgaged property. `rent_override` is the
    /// one-landing multiplier set by "advance to nearest" cards.
    pub fn calculate_rent(
        &self,
        position: Position,
        dice_roll: Option<u32>,
        rent_override: Option<f64>,
    ) -> i64 {
        let ownership = match self.property_ownership.get(&position) {
            Some(o) if o.is_owned() && !o.is_mortgaged => o,
            _ => return 0,
        };
        let owner_id = ownership.owner_id.unwrap();

        match self.board.space(position) {
            space @ Space::Property { color_group, .. } => {
                let has_monopoly = self.has_monopoly(owner_id, *color_group);
                space.street_rent(ownership.houses, has_monopoly)
            }
            Space::Railroad { .. } => {
                let owned = self
                    .board
                    .railroads()
                    .iter()
                    .filter(|pos| self.property_ownership[pos].owner_id == Some(owner_id))
                    .count() as u32;
                let rent = railroad_rent(owned);
                match rent_override {
                    Some(multiplier) => (rent as f64 * multiplier) as i64,
                    None => rent,
                }
            }
            Space::Utility { .. } => {
                let dice = dice_roll.unwrap_or_else(|| {
                    self.last_dice_roll
                        .map(|(d1, d2)| u32::from(d1) + u32::from(d2))
                        .unwrap_or(0)
                });
                match rent_override {
                    // Card override replaces the owned-count logic entirely
                    Some(multiplier) => (f64::from(dice) * multiplier) as i64,
                    None => {
                        let owned = self
                            .board
                            .utilities()
                            .iter()
                            .filter(|pos| self.property_ownership[pos].owner_id == Some(owner_id))
                            .count() as u32;
                        utility_rent(dice, owned)
                    }
                }
            }
            _ => 0,
        }
    }

    /// Transfer rent from payer to owner. If the payer cannot cover it,
    /// the debt is recorded as pending and `false` is returned; the
    /// rules layer then restricts the payer to fund-raising actions.
    pub fn pay_rent(&mut self, payer_id: PlayerId, owner_id: PlayerId, amount: i64) -> bool {
        if self.players[&payer_id].cash < amount {
            self.pending_rent_payment = Some(PendingRent {
                payer_id,
                owner_id,
                amount,
            });
            return false;
        }

        self.players.get_mut(&payer_id).unwrap().cash -= amount;
        self.players.get_mut(&owner_id).unwrap().cash += amount;
        self.pending_rent_payment = None;

        self.event_log.log(
            EventType::RentPayment,
            Some(payer_id),
            json!({
                "owner": owner_id,
                "amount": amount,
                "payer_balance": self.players[&payer_id].cash,
                "owner_balance": self.players[&owner_id].cash,
            }),
        );

        true
    }

    /// Pay tax to the bank; same pending-debt behavior as rent.
    pub fn pay_tax(&mut self, player_id: PlayerId, amount: i64) -> bool {
        if self.players[&player_id].cash < amount {
            self.pending_tax_payment = Some(PendingTax { payer_id: player_id, amount });
            return false;
        }

        self.players.get_mut(&player_id).unwrap().cash -= amount;
        self.pending_tax_payment = None;

        self.event_log.log(
            EventType::TaxPayment,
            Some(player_id),
            json!({
                "amount": amount,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        true
    }

    // ==================== Building ====================

    /// Whether a house can be built here: ownership, no mortgage in the
    /// group, full monopoly, under 4 houses, the even-build rule, bank
    /// supply, and affordability.
    pub fn can_build_house(&self, player_id: PlayerId, position: Position) -> bool {
        let Some(ownership) = self.property_ownership.get(&position) else {
            return false;
        };
        if ownership.owner_id != Some(player_id) || ownership.is_mortgaged || ownership.houses >= 4
        {
            return false;
        }

        let space = self.board.space(position);
        let (Some(color_group), Some(house_cost)) = (space.color_group(), space.house_cost())
        else {
            return false;
        };

        // Monopoly check also rejects any mortgage in the group
        if !self.has_monopoly(player_id, color_group) {
            return false;
        }
        if !self.can_build_evenly(position, color_group) {
            return false;
        }
        if !self.bank.can_take_houses(1) {
            return false;
        }
        self.players[&player_id].cash >= house_cost
    }

    /// Whether a hotel can be built here: as for a house, plus exactly 4
    /// houses on every property in the group and a hotel in the bank.
    pub fn can_build_hotel(&self, player_id: PlayerId, position: Position) -> bool {
        let Some(ownership) = self.property_ownership.get(&position) else {
            return false;
        };
        if ownership.owner_id != Some(player_id) || ownership.is_mortgaged || ownership.houses != 4
        {
            return false;
        }

        let space = self.board.space(position);
        let (Some(color_group), Some(house_cost)) = (space.color_group(), space.house_cost())
        else {
            return false;
        };

        if !self.has_monopoly(player_id, color_group) {
            return false;
        }
        if self
            .board
            .color_group(color_group)
            .iter()
            .any(|pos| self.property_ownership[pos].houses != 4)
        {
            return false;
        }
        if !self.bank.can_take_hotel() {
            return false;
        }
        self.players[&player_id].cash >= house_cost
    }

    /// Even-build rule: a house may be added only if no sibling in the
    /// group has strictly fewer houses than this property already has.
    fn can_build_evenly(&self, position: Position, color: ColorGroup) -> bool {
        let houses = self.property_ownership[&position].houses;
        self.board
            .color_group(color)
            .iter()
            .filter(|&&pos| pos != position)
            .all(|pos| houses <= self.property_ownership[pos].houses)
    }

    /// Even-sell rule: may only sell from a property that has at least
    /// as many houses as every sibling.
    pub(crate) fn can_sell_evenly(&self, position: Position, color: ColorGroup) -> bool {
        let houses = self.property_ownership[&position].houses;
        self.board
            .color_group(color)
            .iter()
            .filter(|&&pos| pos != position)
            .all(|pos| houses >= self.property_ownership[pos].houses)
    }

    /// Build one house.
    pub fn build_house(&mut self, player_id: PlayerId, position: Position) -> Result<(), GameError> {
        if !self.can_build_house(player_id, position) {
            return Err(GameError::CannotBuild);
        }

        let space = self.board.space(position);
        let house_cost = space.house_cost().unwrap();
        let name = space.name();

        self.players.get_mut(&player_id).unwrap().cash -= house_cost;
        self.bank.take_houses(1);
        let ownership = self.property_ownership.get_mut(&position).unwrap();
        ownership.houses += 1;
        let houses = ownership.houses;

        self.event_log.log(
            EventType::BuildHouse,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "cost": house_cost,
                "houses": houses,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    /// Build a hotel on four houses; the houses go back to the bank.
    pub fn build_hotel(&mut self, player_id: PlayerId, position: Position) -> Result<(), GameError> {
        if !self.can_build_hotel(player_id, position) {
            return Err(GameError::CannotBuild);
        }

        let space = self.board.space(position);
        let house_cost = space.house_cost().unwrap();
        let name = space.name();

        self.players.get_mut(&player_id).unwrap().cash -= house_cost;
        self.bank.take_hotel();
        self.bank.return_houses(4);
        self.property_ownership.get_mut(&position).unwrap().houses = 5;

        self.event_log.log(
            EventType::BuildHotel,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "cost": house_cost,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    /// Sell one building back to the bank for half the house cost.
    /// Selling a hotel is the downgrade exchange and needs 4 bank houses.
    pub fn sell_building(&mut self, player_id: PlayerId, position: Position) -> Result<(), GameError> {
        let ownership = self
            .property_ownership
            .get(&position)
            .ok_or(GameError::NotOwner)?;
        if ownership.owner_id != Some(player_id) {
            return Err(GameError::NotOwner);
        }
        if ownership.houses == 0 {
            return Err(GameError::CannotSell);
        }

        let space = self.board.space(position);
        let color_group = space.color_group().ok_or(GameError::CannotSell)?;
        if !self.can_sell_evenly(position, color_group) {
            return Err(GameError::CannotSell);
        }

        if self.property_ownership[&position].houses == 5 {
            return self.downgrade_hotel(player_id, position);
        }

        let house_cost = space.house_cost().unwrap();
        let name = space.name();
        let sale_price = house_cost / 2;

        self.bank.return_houses(1);
        let ownership = self.property_ownership.get_mut(&position).unwrap();
        ownership.houses -= 1;
        let houses = ownership.houses;
        self.players.get_mut(&player_id).unwrap().cash += sale_price;

        self.event_log.log(
            EventType::SellBuilding,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "type": "house",
                "sale_price": sale_price,
                "houses": houses,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    /// Exchange a hotel for four houses plus half the house cost in
    /// cash. Fails if the bank cannot supply the houses.
    pub fn downgrade_hotel(
        &mut self,
        player_id: PlayerId,
        position: Position,
    ) -> Result<(), GameError> {
        let ownership = self
            .property_ownership
            .get(&position)
            .ok_or(GameError::NotOwner)?;
        if ownership.owner_id != Some(player_id) {
            return Err(GameError::NotOwner);
        }
        if ownership.houses != 5 {
            return Err(GameError::CannotSell);
        }
        if !self.bank.can_take_houses(4) {
            return Err(GameError::NoSupply);
        }

        let space = self.board.space(position);
        let house_cost = space.house_cost().ok_or(GameError::CannotSell)?;
        let name = space.name();
        let sale_price = house_cost / 2;

        self.bank.return_hotel();
        self.bank.take_houses(4);
        self.property_ownership.get_mut(&position).unwrap().houses = 4;
        self.players.get_mut(&player_id).unwrap().cash += sale_price;

        self.event_log.log(
            EventType::SellBuilding,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "type": "hotel_downgrade",
                "sale_price": sale_price,
                "houses": 4,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    // ==================== Mortgages ====================

    /// Mortgage a property for its fixed mortgage value. Buildings must
    /// be sold first.
    pub fn mortgage_property(
        &mut self,
        player_id: PlayerId,
        position: Position,
    ) -> Result<(), GameError> {
        let ownership = self
            .property_ownership
            .get(&position)
            .ok_or(GameError::NotOwner)?;
        if ownership.owner_id != Some(player_id) {
            return Err(GameError::NotOwner);
        }
        if ownership.is_mortgaged || ownership.houses > 0 {
            return Err(GameError::CannotMortgage);
        }

        let space = self.board.space(position);
        let value = space.mortgage_value().ok_or(GameError::CannotMortgage)?;
        let name = space.name();

        self.players.get_mut(&player_id).unwrap().cash += value;
        self.property_ownership.get_mut(&position).unwrap().is_mortgaged = true;

        self.event_log.log(
            EventType::Mortgage,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "value": value,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    /// Lift a mortgage for the mortgage value plus interest, truncated.
    pub fn unmortgage_property(
        &mut self,
        player_id: PlayerId,
        position: Position,
    ) -> Result<(), GameError> {
        let ownership = self
            .property_ownership
            .get(&position)
            .ok_or(GameError::NotOwner)?;
        if ownership.owner_id != Some(player_id) {
            return Err(GameError::NotOwner);
        }
        if !ownership.is_mortgaged {
            return Err(GameError::NotMortgaged);
        }

        let space = self.board.space(position);
        let value = space.mortgage_value().ok_or(GameError::NotMortgaged)?;
        let name = space.name();
        let cost = (value as f64 * (1.0 + self.config.mortgage_interest_rate)) as i64;

        if self.players[&player_id].cash < cost {
            return Err(GameError::CannotAfford);
        }

        self.players.get_mut(&player_id).unwrap().cash -= cost;
        self.property_ownership.get_mut(&position).unwrap().is_mortgaged = false;

        self.event_log.log(
            EventType::Unmortgage,
            Some(player_id),
            json!({
                "property": name,
                "position": position,
                "cost": cost,
                "new_balance": self.players[&player_id].cash,
            }),
        );

        Ok(())
    }

    /// Cost to lift a mortgage at this position, if it is mortgageable.
    pub fn unmortgage_cost(&self, position: Position) -> Option<i64> {
        let value = self.board.space(position).mortgage_value()?;
        Some((value as f64 * (1.0 + self.config.mortgage_interest_rate)) as i64)
    }

    // ==================== Cards ====================

    /// Draw from a deck, log the draw, and execute the card immediately.
    /// Cards are never queued.
    pub fn draw_card(&mut self, deck_type: DeckType) -> Result<CardOutcome, GameError> {
        let player_id = self.current_player_id();
        let card = match deck_type {
            DeckType::Chance => self.chance_deck.draw(&mut self.rng),
            DeckType::CommunityChest => self.community_chest_deck.draw(&mut self.rng),
        }
        .ok_or(GameError::EmptyDeck)?;

        self.event_log.log(
            EventType::CardDraw,
            Some(player_id),
            json!({
                "deck": deck_type.name(),
                "card": card.description,
            }),
        );

        Ok(self.execute_card(card, player_id, deck_type))
    }

    /// Apply a card's effect to a player. Movement is applied here; the
    /// returned outcome tells the caller where the player landed and
    /// what rent override (if any) applies to that landing.
    pub fn execute_card(
        &mut self,
        card: Card,
        player_id: PlayerId,
        deck_type: DeckType,
    ) -> CardOutcome {
        self.event_log.log(
            EventType::CardEffect,
            Some(player_id),
            json!({
                "card": card.description,
                "effect": serde_json::to_value(card.effect).unwrap_or_default(),
            }),
        );

        let mut outcome = CardOutcome::default();

        match card.effect {
            CardEffect::MoveTo {
                position,
                collect_go,
            } => {
                self.move_player_to(player_id, position, collect_go);
                outcome.moved_to = Some(position);
            }

            CardEffect::MoveSpaces { spaces, collect_go } => {
                let landed = self.move_player(player_id, spaces, collect_go);
                outcome.moved_to = Some(landed);
            }

            CardEffect::MoveToNearest {
                target,
                rent_multiplier,
            } => {
                let from = self.players[&player_id].position;
                let destination = match target {
                    NearestTarget::Railroad => self.board.nearest_railroad(from),
                    NearestTarget::Utility => self.board.nearest_utility(from),
                };
                self.move_player_to(player_id, destination, true);
                outcome.moved_to = Some(destination);
                outcome.rent_override = rent_multiplier;
            }

            CardEffect::Collect { amount } => {
                self.players.get_mut(&player_id).unwrap().cash += amount;
            }

            CardEffect::Pay { amount } => {
                // Negative cash is tolerated transiently here
                self.players.get_mut(&player_id).unwrap().cash -= amount;
            }

            CardEffect::PayPerHouse { amount } => {
                let total: i64 = self
                    .properties_owned_by(player_id)
                    .into_iter()
                    .map(|pos| {
                        let houses = self.property_ownership[&pos].houses;
                        if houses == 5 {
                            amount * 4
                        } else {
                            amount * i64::from(houses)
                        }
                    })
                    .sum();
                self.players.get_mut(&player_id).unwrap().cash -= total;
            }

            CardEffect::PayPerBuilding {
                per_house,
                per_hotel,
            } => {
                let total: i64 = self
                    .properties_owned_by(player_id)
                    .into_iter()
                    .map(|pos| {
                        let houses = self.property_ownership[&pos].houses;
                        if houses == 5 {
                            per_hotel
                        } else {
                            per_house * i64::from(houses)
                        }
                    })
                    .sum();
                self.players.get_mut(&player_id).unwrap().cash -= total;
            }

            CardEffect::CollectFromPlayers { amount } => {
                let others: Vec<PlayerId> = self
                    .active_players()
                    .into_iter()
                    .filter(|&id| id != player_id)
                    .collect();
                for other_id in others {
                    // Capped at what the payer actually has
                    let transfer = amount.min(self.players[&other_id].cash);
                    self.players.get_mut(&other_id).unwrap().cash -= transfer;
                    self.players.get_mut(&player_id).unwrap().cash += transfer;
                }
            }

            CardEffect::PayToPlayers { amount } => {
                let others: Vec<PlayerId> = self
                    .active_players()
                    .into_iter()
                    .filter(|&id| id != player_id)
                    .collect();
                for other_id in others {
                    let transfer = amount.min(self.players[&player_id].cash);
                    self.players.get_mut(&player_id).unwrap().cash -= transfer;
                    self.players.get_mut(&other_id).unwrap().cash += transfer;
                }
            }

            CardEffect::GoToJail => {
                self.send_to_jail(player_id);
            }

            CardEffect::GetOutOfJail => {
                self.players.get_mut(&player_id).unwrap().get_out_of_jail_cards += 1;
                self.deck_mut(deck_type).hold(card);
                // The held card stays out of the discard rotation
                return outcome;
            }
        }

        self.deck_mut(deck_type).discard(card);
        outcome
    }

    fn deck_mut(&mut self, deck_type: DeckType) -> &mut Deck {
        match deck_type {
            DeckType::Chance => &mut self.chance_deck,
            DeckType::CommunityChest => &mut self.community_chest_deck,
        }
    }

    // ==================== Bankruptcy & Turns ====================

    /// Declare bankruptcy. Buildings are sold to the bank at half cost
    /// (credited first), then everything transfers to the creditor, or
    /// reverts to the bank when there is none. A creditor pays a 10%
    /// fee per mortgaged property received.
    pub fn declare_bankruptcy(&mut self, player_id: PlayerId, creditor_id: Option<PlayerId>) {
        self.players.get_mut(&player_id).unwrap().is_bankrupt = true;

        let properties = self.properties_owned_by(player_id);

        // Sell all buildings to the bank at half cost
        let mut building_cash = 0;
        for &position in &properties {
            let houses = self.property_ownership[&position].houses;
            if houses == 0 {
                continue;
            }
            let house_cost = self.board.space(position).house_cost().unwrap_or(0);
            if houses == 5 {
                building_cash += house_cost / 2;
                self.bank.return_hotel();
            } else {
                building_cash += (i64::from(houses) * house_cost) / 2;
                self.bank.return_houses(u32::from(houses));
            }
            self.property_ownership.get_mut(&position).unwrap().houses = 0;
        }
        self.players.get_mut(&player_id).unwrap().cash += building_cash;

        // Transfer or release properties
        let mut mortgage_transfer_fee = 0;
        for &position in &properties {
            let ownership = self.property_ownership.get_mut(&position).unwrap();
            match creditor_id {
                Some(creditor) => {
                    ownership.owner_id = Some(creditor);
                    if ownership.is_mortgaged {
                        let value = self.board.space(position).mortgage_value().unwrap_or(0);
                        mortgage_transfer_fee += value / 10;
                    }
                }
                None => {
                    // Back to the bank, clean, available for auction
                    *ownership = PropertyOwnership::default();
                }
            }
        }

        // Residual cash moves to the creditor, minus the mortgage fees
        let residual_cash = self.players[&player_id].cash;
        if let Some(creditor) = creditor_id {
            let creditor_state = self.players.get_mut(&creditor).unwrap();
            creditor_state.cash += residual_cash;
            creditor_state.cash -= mortgage_transfer_fee;
        }

        // Get Out of Jail cards follow the assets
        let jail_cards = self.players[&player_id].get_out_of_jail_cards;
        match creditor_id {
            Some(creditor) => {
                self.players.get_mut(&creditor).unwrap().get_out_of_jail_cards += jail_cards;
            }
            None => {
                for _ in 0..jail_cards {
                    self.return_held_jail_card();
                }
            }
        }

        let player = self.players.get_mut(&player_id).unwrap();
        player.cash = 0;
        player.get_out_of_jail_cards = 0;

        self.event_log.log(
            EventType::Bankruptcy,
            Some(player_id),
            json!({
                "creditor": creditor_id,
                "properties": properties,
                "building_cash": building_cash,
                "mortgage_transfer_fee": mortgage_transfer_fee,
            }),
        );

        // Last player standing wins
        let active = self.active_players();
        if active.len() == 1 {
            let winner_id = active[0];
            self.game_over = true;
            self.winner = Some(winner_id);
            self.event_log.log(
                EventType::GameEnd,
                Some(winner_id),
                json!({
                    "reason": "bankruptcy",
                    "winner": self.players[&winner_id].name,
                }),
            );
        }
    }

    /// End the turn: reset dice/doubles state, advance to the next
    /// non-bankrupt player, and enforce the turn limit if configured.
    pub fn end_turn(&mut self) {
        let current_id = self.current_player_id();
        self.players.get_mut(&current_id).unwrap().consecutive_doubles = 0;
        self.pending_dice_roll = true;
        self.last_dice_roll = None;

        let player_count = self.players.len();
        for _ in 0..player_count {
            self.current_player_index = (self.current_player_index + 1) % player_count;
            if !self.current_player().is_bankrupt {
                break;
            }
        }

        self.turn_number += 1;

        if let Some(limit) = self.config.time_limit_turns {
            if self.turn_number >= limit && !self.game_over {
                self.end_game_by_time_limit();
            }
        }

        if !self.game_over {
            self.event_log.log(
                EventType::TurnStart,
                Some(self.current_player_id()),
                json!({"turn": self.turn_number}),
            );
        }
    }

    /// Turn limit reached: highest net worth wins.
    fn end_game_by_time_limit(&mut self) {
        let mut best_worth = i64::MIN;
        let mut winner_id = None;
        for player_id in self.active_players() {
            let worth = self.net_worth(player_id);
            if worth > best_worth {
                best_worth = worth;
                winner_id = Some(player_id);
            }
        }

        self.game_over = true;
        self.winner = winner_id;
        self.event_log.log(
            EventType::GameEnd,
            winner_id,
            json!({
                "reason": "time_limit",
                "net_worth": best_worth,
            }),
        );
    }

    // ==================== Trading ====================

    /// A property can only change hands if it carries no buildings and
    /// nothing else in its color group does either.
    pub fn can_trade_property(&self, player_id: PlayerId, position: Position) -> bool {
        let Some(ownership) = self.property_ownership.get(&position) else {
            return false;
        };
        if ownership.owner_id != Some(player_id) || ownership.houses > 0 {
            return false;
        }

        if let Some(color_group) = self.board.space(position).color_group() {
            if self
                .board
                .color_group(color_group)
                .iter()
                .any(|pos| self.property_ownership[pos].houses > 0)
            {
                return false;
            }
        }

        true
    }

    /// Check a player can honor an offer right now.
    pub fn validate_trade_offer(
        &self,
        player_id: PlayerId,
        offer: &TradeOffer,
    ) -> Result<(), TradeValidationError> {
        let player = &self.players[&player_id];

        if offer.cash > player.cash {
            return Err(TradeValidationError::InsufficientCash {
                has: player.cash,
                offering: offer.cash,
            });
        }
        if offer.jail_cards > player.get_out_of_jail_cards {
            return Err(TradeValidationError::InsufficientJailCards {
                has: player.get_out_of_jail_cards,
                offering: offer.jail_cards,
            });
        }
        for &position in &offer.properties {
            let owned = self
                .property_ownership
                .get(&position)
                .is_some_and(|o| o.owner_id == Some(player_id));
            if !owned {
                return Err(TradeValidationError::NotOwned(position));
            }
            if !self.can_trade_property(player_id, position) {
                return Err(TradeValidationError::HasBuildings(position));
            }
        }

        Ok(())
    }

    /// Propose a trade. Both offers are validated up front; an invalid
    /// proposal logs a failure event and creates nothing.
    pub fn propose_trade(
        &mut self,
        proposer_id: PlayerId,
        recipient_id: PlayerId,
        proposer_offer: TradeOffer,
        recipient_offer: TradeOffer,
    ) -> Result<u64, GameError> {
        let valid_recipient = self
            .players
            .get(&recipient_id)
            .is_some_and(|p| !p.is_bankrupt);
        if !valid_recipient || recipient_id == proposer_id {
            return Err(GameError::InvalidTrade);
        }

        let validation = self
            .validate_trade_offer(proposer_id, &proposer_offer)
            .and_then(|()| self.validate_trade_offer(recipient_id, &recipient_offer));
        if let Err(error) = validation {
            self.event_log.log(
                EventType::TradeFailed,
                Some(proposer_id),
                json!({
                    "recipient": recipient_id,
                    "reason": error.to_string(),
                }),
            );
            return Err(GameError::InvalidTrade);
        }

        let trade_id = self.trade_manager.create_trade(
            proposer_id,
            recipient_id,
            proposer_offer.clone(),
            recipient_offer.clone(),
            self.turn_number,
        );

        self.event_log.log(
            EventType::TradeProposed,
            Some(proposer_id),
            json!({
                "trade_id": trade_id,
                "proposer": proposer_id,
                "recipient": recipient_id,
                "proposer_offer": serde_json::to_value(&proposer_offer).unwrap_or_default(),
                "recipient_offer": serde_json::to_value(&recipient_offer).unwrap_or_default(),
            }),
        );

        Ok(trade_id)
    }

    /// Accept a pending trade addressed to this player, then execute it.
    pub fn accept_trade(&mut self, recipient_id: PlayerId, trade_id: u64) -> Result<(), GameError> {
        let trade = self.trade_manager.get(trade_id).ok_or(GameError::NoSuchTrade)?;
        if trade.status != TradeStatus::Pending {
            return Err(GameError::NoSuchTrade);
        }
        if trade.recipient_id != recipient_id {
            return Err(GameError::NotYourTurn);
        }

        let trade = self
            .trade_manager
            .settle(trade_id, TradeStatus::Accepted)
            .ok_or(GameError::NoSuchTrade)?;

        self.event_log.log(
            EventType::TradeAccepted,
            Some(recipient_id),
            json!({"trade_id": trade_id}),
        );

        self.execute_trade(&trade)
    }

    /// Reject a pending trade addressed to this player.
    pub fn reject_trade(&mut self, recipient_id: PlayerId, trade_id: u64) -> Result<(), GameError> {
        let trade = self.trade_manager.get(trade_id).ok_or(GameError::NoSuchTrade)?;
        if trade.status != TradeStatus::Pending || trade.recipient_id != recipient_id {
            return Err(GameError::NoSuchTrade);
        }

        self.trade_manager
            .settle(trade_id, TradeStatus::Rejected)
            .ok_or(GameError::NoSuchTrade)?;
        self.event_log.log(
            EventType::TradeRejected,
            Some(recipient_id),
            json!({"trade_id": trade_id}),
        );
        Ok(())
    }

    /// Cancel one's own pending trade.
    pub fn cancel_trade(&mut self, proposer_id: PlayerId, trade_id: u64) -> Result<(), GameError> {
        let trade = self.trade_manager.get(trade_id).ok_or(GameError::NoSuchTrade)?;
        if trade.status != TradeStatus::Pending || trade.proposer_id != proposer_id {
            return Err(GameError::NoSuchTrade);
        }

        self.trade_manager
            .settle(trade_id, TradeStatus::Cancelled)
            .ok_or(GameError::NoSuchTrade)?;
        self.event_log.log(
            EventType::TradeCancelled,
            Some(proposer_id),
            json!({"trade_id": trade_id}),
        );
        Ok(())
    }

    /// Apply an accepted trade. Both offers are re-validated against
    /// current state before anything moves; a failure aborts with a
    /// logged failure event and zero state change.
    pub fn execute_trade(&mut self, trade: &Trade) -> Result<(), GameError> {
        if trade.status != TradeStatus::Accepted {
            return Err(GameError::InvalidTrade);
        }

        // Validate both sides completely before touching anything
        let validation = self
            .validate_trade_offer(trade.proposer_id, &trade.proposer_offer)
            .map_err(|e| ("proposer", e))
            .and_then(|()| {
                self.validate_trade_offer(trade.recipient_id, &trade.recipient_offer)
                    .map_err(|e| ("recipient", e))
            });
        if let Err((side, error)) = validation {
            self.event_log.log(
                EventType::TradeExecuted,
                None,
                json!({
                    "trade_id": trade.trade_id,
                    "success": false,
                    "error": format!("{side} validation failed: {error}"),
                }),
            );
            return Err(GameError::InvalidTrade);
        }

        let proposer_fee = self.transfer_offer(trade.proposer_id, trade.recipient_id, &trade.proposer_offer);
        let recipient_fee = self.transfer_offer(trade.recipient_id, trade.proposer_id, &trade.recipient_offer);

        // Each side pays 10% per mortgaged property it received
        self.players.get_mut(&trade.recipient_id).unwrap().cash -= proposer_fee;
        self.players.get_mut(&trade.proposer_id).unwrap().cash -= recipient_fee;

        self.event_log.log(
            EventType::TradeExecuted,
            None,
            json!({
                "trade_id": trade.trade_id,
                "success": true,
                "proposer": trade.proposer_id,
                "recipient": trade.recipient_id,
                "proposer_gave": serde_json::to_value(&trade.proposer_offer).unwrap_or_default(),
                "recipient_gave": serde_json::to_value(&trade.recipient_offer).unwrap_or_default(),
                "proposer_mortgage_fee": recipient_fee,
                "recipient_mortgage_fee": proposer_fee,
            }),
        );

        Ok(())
    }

    /// Move one offer from giver to receiver. Returns the mortgage fee
    /// the receiver owes for mortgaged properties taken on.
    fn transfer_offer(&mut self, from: PlayerId, to: PlayerId, offer: &TradeOffer) -> i64 {
        self.players.get_mut(&from).unwrap().cash -= offer.cash;
        self.players.get_mut(&to).unwrap().cash += offer.cash;

        let mut mortgage_fee = 0;
        for &position in &offer.properties {
            let ownership = self.property_ownership.get_mut(&position).unwrap();
            ownership.owner_id = Some(to);
            if ownership.is_mortgaged {
                let value = self.board.space(position).mortgage_value().unwrap_or(0);
                mortgage_fee += value / 10;
            }
        }

        self.players.get_mut(&from).unwrap().get_out_of_jail_cards -= offer.jail_cards;
        self.players.get_mut(&to).unwrap().get_out_of_jail_cards += offer.jail_cards;

        mortgage_fee
    }
}
