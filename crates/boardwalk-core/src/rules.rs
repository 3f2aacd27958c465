//! High-level rules API: legal-move detection and action dispatch.
//!
//! `legal_actions` is a pure function of the game state, re-derived on
//! every call. Its precedence ladder, top to bottom, first match wins:
//! game over, active auction, turn ownership, jail, pending payments,
//! mandatory purchase decision, pre-roll, then the normal post-roll
//! surface. `apply_action` mirrors that surface and handles the
//! cross-cutting concerns: doubles and jail interplay, landing
//! resolution, auction settlement, and pending-payment retries.

use crate::actions::Action;
use crate::board::{PlayerId, Position, Space};
use crate::cards::DeckType;
use crate::events::EventType;
use crate::game::{GameError, GameState, JailAttemptOutcome};
use crate::trade::{TradeOffer, TradeStatus};
use serde_json::json;

/// Get all legal actions available to a player.
///
/// This is the interface agents and controllers use to determine valid
/// moves; any action outside this list is a caller bug.
pub fn legal_actions(game: &GameState, player_id: PlayerId) -> Vec<Action> {
    let mut actions = Vec::new();

    if game.game_over {
        return actions;
    }
    let Some(player) = game.player(player_id) else {
        return actions;
    };

    // Auctions outrank turn order: any active bidder may act, everyone
    // else waits for completion
    if let Some(auction) = &game.active_auction {
        if auction.is_active_bidder(player_id) {
            if auction.can_player_bid(player_id) {
                // Placeholder amount; the agent supplies the real bid
                actions.push(Action::Bid { amount: 0 });
            }
            actions.push(Action::PassAuction);
        }
        return actions;
    }

    // Outside auctions, only the current player acts
    if game.current_player_id() != player_id {
        return actions;
    }

    // Jail constrains the turn to release attempts
    if player.in_jail {
        if player.jail_turns < game.config.max_jail_turns {
            actions.push(Action::RollDice);
        }
        if player.cash >= game.config.jail_fine {
            actions.push(Action::PayJailFine);
        }
        if player.get_out_of_jail_cards > 0 {
            actions.push(Action::UseJailCard);
        }
        // Broke with attempts exhausted: nothing left but giving up
        if actions.is_empty() {
            actions.push(Action::DeclareBankruptcy { creditor_id: None });
        }
        return actions;
    }

    // An unpaid debt suppresses the normal turn until it clears
    if let Some(pending) = game.pending_rent_payment {
        if pending.payer_id == player_id {
            actions.extend(property_management_actions(game, player_id));
            actions.push(Action::DeclareBankruptcy {
                creditor_id: Some(pending.owner_id),
            });
            return actions;
        }
    }
    if let Some(pending) = game.pending_tax_payment {
        if pending.payer_id == player_id {
            actions.extend(property_management_actions(game, player_id));
            actions.push(Action::DeclareBankruptcy { creditor_id: None });
            return actions;
        }
    }

    // Standing on an unowned purchasable space: the buy-or-decline
    // decision is mandatory before anything else, doubles included
    let position = player.position;
    let space = game.board.space(position);
    if space.is_ownable() {
        let unowned = game
            .property_ownership
            .get(&position)
            .is_some_and(|o| !o.is_owned());
        if unowned {
            if player.cash >= space.price().unwrap_or(0) {
                actions.push(Action::BuyProperty { position });
            }
            actions.push(Action::DeclinePurchase { position });
            return actions;
        }
    }

    // Pre-roll: the roll is owed, but building and mortgaging are open
    if game.pending_dice_roll {
        actions.push(Action::RollDice);
        actions.extend(property_management_actions(game, player_id));
        return actions;
    }

    // Post-roll surface
    actions.push(Action::EndTurn);
    actions.extend(trade_actions(game, player_id));
    if player.cash < 0 {
        actions.push(Action::DeclareBankruptcy { creditor_id: None });
    }

    actions
}

/// Building, selling, and mortgage moves currently available.
fn property_management_actions(game: &GameState, player_id: PlayerId) -> Vec<Action> {
    let mut actions = Vec::new();
    let player = &game.players[&player_id];

    for position in game.properties_owned_by(player_id) {
        if game.can_build_house(player_id, position) {
            actions.push(Action::BuildHouse { position });
        }
        if game.can_build_hotel(player_id, position) {
            actions.push(Action::BuildHotel { position });
        }

        let ownership = &game.property_ownership[&position];
        if ownership.houses > 0 {
            if let Some(color) = game.board.space(position).color_group() {
                // A hotel sale is a downgrade and needs 4 bank houses
                let exchangeable = ownership.houses != 5 || game.bank.can_take_houses(4);
                if exchangeable && game.can_sell_evenly(position, color) {
                    actions.push(Action::SellBuilding { position });
                }
            }
        }

        if ownership.houses == 0 && !ownership.is_mortgaged {
            actions.push(Action::MortgageProperty { position });
        }
        if ownership.is_mortgaged {
            if let Some(cost) = game.unmortgage_cost(position) {
                if player.cash >= cost {
                    actions.push(Action::UnmortgageProperty { position });
                }
            }
        }
    }

    actions
}

/// Trade moves: respond to offers addressed to this player, withdraw
/// their own, and open proposals to every other live player.
fn trade_actions(game: &GameState, player_id: PlayerId) -> Vec<Action> {
    let mut actions = Vec::new();
    if game.players[&player_id].is_bankrupt {
        return actions;
    }

    for trade in game.trade_manager.active_trades_for(player_id) {
        if trade.status != TradeStatus::Pending {
            continue;
        }
        if trade.recipient_id == player_id {
            actions.push(Action::AcceptTrade {
                trade_id: trade.trade_id,
            });
            actions.push(Action::RejectTrade {
                trade_id: trade.trade_id,
            });
        } else if trade.proposer_id == player_id {
            actions.push(Action::CancelTrade {
                trade_id: trade.trade_id,
            });
        }
    }

    for other_id in game.active_players() {
        if other_id != player_id {
            // Empty offers; the agent fills in the actual terms
            actions.push(Action::ProposeTrade {
                recipient_id: other_id,
                offer: TradeOffer::default(),
                want: TradeOffer::default(),
            });
        }
    }

    actions
}

/// Apply an action for a player.
///
/// Expected rule violations come back as `Err`; callers that stick to
/// `legal_actions` should never see one.
pub fn apply_action(
    game: &mut GameState,
    player_id: PlayerId,
    action: Action,
) -> Result<(), GameError> {
    if game.game_over {
        return Err(GameError::GameOver);
    }

    // Auction moves are open to any active bidder; everything else
    // belongs to the current player
    match action {
        Action::Bid { .. } | Action::PassAuction => {}
        _ => {
            if game.current_player_id() != player_id {
                return Err(GameError::NotYourTurn);
            }
        }
    }

    match action {
        Action::RollDice => {
            if game.players[&player_id].in_jail {
                match game.attempt_jail_release(player_id)? {
                    JailAttemptOutcome::Released { .. } => {
                        let landed = game.players[&player_id].position;
                        resolve_landing(game, player_id, landed, None);
                        game.pending_dice_roll = false;
                    }
                    JailAttemptOutcome::StillInJail => {
                        game.end_turn();
                    }
                }
                return Ok(());
            }

            let (die1, die2) = game.roll_dice();
            let is_doubles = die1 == die2;

            if is_doubles {
                let player = game.players.get_mut(&player_id).unwrap();
                player.consecutive_doubles += 1;
                if player.consecutive_doubles >= 3 {
                    // Speeding: straight to jail, turn over
                    game.send_to_jail(player_id);
                    game.end_turn();
                    return Ok(());
                }
                // Another roll is owed after this one resolves
                game.pending_dice_roll = true;
            } else {
                game.players.get_mut(&player_id).unwrap().consecutive_doubles = 0;
            }

            let landed = game.move_player(player_id, i32::from(die1 + die2), true);
            resolve_landing(game, player_id, landed, None);
            Ok(())
        }

        Action::BuyProperty { position } => game.buy_property(player_id, position),

        Action::DeclinePurchase { position } => game.start_auction(position, player_id),

        Action::Bid { amount } => game.place_auction_bid(player_id, amount).map(|_| ()),

        Action::PassAuction => game.pass_auction(player_id),

        Action::BuildHouse { position } => game.build_house(player_id, position),

        Action::BuildHotel { position } => game.build_hotel(player_id, position),

        Action::SellBuilding { position } => {
            let result = game.sell_building(player_id, position);
            try_resolve_pending_payment(game);
            result
        }

        Action::MortgageProperty { position } => {
            let result = game.mortgage_property(player_id, position);
            try_resolve_pending_payment(game);
            result
        }

        Action::UnmortgageProperty { position } => game.unmortgage_property(player_id, position),

        Action::PayJailFine => game.pay_jail_fine(player_id),

        Action::UseJailCard => {
            game.use_jail_card(player_id)?;
            game.pending_dice_roll = true;
            Ok(())
        }

        Action::EndTurn => {
            game.end_turn();
            Ok(())
        }

        Action::ProposeTrade {
            recipient_id,
            offer,
            want,
        } => game
            .propose_trade(player_id, recipient_id, offer, want)
            .map(|_| ()),

        Action::AcceptTrade { trade_id } => game.accept_trade(player_id, trade_id),

        Action::RejectTrade { trade_id } => game.reject_trade(player_id, trade_id),

        Action::CancelTrade { trade_id } => game.cancel_trade(player_id, trade_id),

        Action::DeclareBankruptcy { creditor_id } => {
            game.declare_bankruptcy(player_id, creditor_id);
            game.pending_rent_payment = None;
            game.pending_tax_payment = None;
            if !game.game_over {
                game.end_turn();
            }
            Ok(())
        }
    }
}

/// Resolve the side effect of landing on a space: rent, tax, cards,
/// jail. `rent_override` is the one-landing multiplier from "advance to
/// nearest" cards, threaded through rather than stored.
pub fn resolve_landing(
    game: &mut GameState,
    player_id: PlayerId,
    position: Position,
    rent_override: Option<f64>,
) {
    let space = game.board.space(position).clone();

    game.event_log.log(
        EventType::Land,
        Some(player_id),
        json!({
            "position": position,
            "space": space.name(),
        }),
    );

    match space {
        Space::Property { .. } | Space::Railroad { .. } | Space::Utility { .. } => {
            let owner = game.property_ownership[&position].owner_id;
            if let Some(owner_id) = owner {
                if owner_id != player_id {
                    let rent = game.calculate_rent(position, None, rent_override);
                    game.pay_rent(player_id, owner_id, rent);
                }
            }
        }

        Space::Tax { amount, .. } => {
            game.pay_tax(player_id, amount);
        }

        Space::Chance => draw_and_resolve(game, player_id, DeckType::Chance),
        Space::CommunityChest => draw_and_resolve(game, player_id, DeckType::CommunityChest),

        Space::GoToJail => game.send_to_jail(player_id),

        // Just visiting, or nothing happens
        Space::Go | Space::Jail | Space::FreeParking => {}
    }
}

/// Draw and execute a card, then resolve any landing it caused with the
/// override it carries. Card chains ("Go Back 3 Spaces" onto another
/// card space) resolve recursively.
fn draw_and_resolve(game: &mut GameState, player_id: PlayerId, deck_type: DeckType) {
    if let Ok(outcome) = game.draw_card(deck_type) {
        if let Some(landed) = outcome.moved_to {
            resolve_landing(game, player_id, landed, outcome.rent_override);
        }
    }
}

/// Retry an outstanding rent or tax debt after fund-raising.
/// Returns true if a payment cleared.
pub fn try_resolve_pending_payment(game: &mut GameState) -> bool {
    if let Some(pending) = game.pending_rent_payment {
        if game.players[&pending.payer_id].cash >= pending.amount {
            return game.pay_rent(pending.payer_id, pending.owner_id, pending.amount);
        }
    }
    if let Some(pending) = game.pending_tax_payment {
        if game.players[&pending.payer_id].cash >= pending.amount {
            return game.pay_tax(pending.payer_id, pending.amount);
        }
    }
    false
}
