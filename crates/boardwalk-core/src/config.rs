//! Game configuration.
//!
//! All values are fixed for the lifetime of one game.

use serde::{Deserialize, Serialize};

/// Configuration for a Monopoly game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cash each player starts with
    pub starting_cash: i64,
    /// Salary collected for passing GO
    pub go_salary: i64,
    /// Fine to leave jail early
    pub jail_fine: i64,
    /// Interest rate charged when unmortgaging (fraction of mortgage value)
    pub mortgage_interest_rate: f64,
    /// Total houses the bank holds
    pub house_limit: u32,
    /// Total hotels the bank holds
    pub hotel_limit: u32,
    /// Failed jail rolls before release is forced
    pub max_jail_turns: u8,
    /// End the game after this many turns, winner by net worth
    pub time_limit_turns: Option<u32>,
    /// RNG seed for deterministic replays
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: 1500,
            go_salary: 200,
            jail_fine: 50,
            mortgage_interest_rate: 0.10,
            house_limit: 32,
            hotel_limit: 12,
            max_jail_turns: 3,
            time_limit_turns: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Standard rules with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
