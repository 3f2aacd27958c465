//! Game board representation.
//!
//! This module contains:
//! - The ten space variants that make up the board
//! - Color groups for street properties
//! - The standard 40-space board layout
//! - Lookup helpers (color groups, railroads, utilities, nearest-forward search)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Player identifier (0-7 for an 8-player game)
pub type PlayerId = u8;

/// Board position (0-39)
pub type Position = usize;

/// Number of spaces on the board
pub const BOARD_SIZE: usize = 40;

/// Position of the Jail / Just Visiting space
pub const JAIL_POSITION: Position = 10;

/// Color groups for street properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl ColorGroup {
    /// All color groups in board order
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Brown,
        ColorGroup::LightBlue,
        ColorGroup::Pink,
        ColorGroup::Orange,
        ColorGroup::Red,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::DarkBlue,
    ];
}

/// A single space on the board.
///
/// The complete variant set is fixed, so rule dispatch is an exhaustive
/// `match` rather than dynamic typing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Space {
    /// The GO space
    Go,
    /// A street property that can be owned, built upon, and mortgaged
    Property {
        name: &'static str,
        price: i64,
        color_group: ColorGroup,
        /// Rent by improvement level: base, 1-4 houses, hotel
        rent: [i64; 6],
        house_cost: i64,
        mortgage_value: i64,
    },
    /// A railroad
    Railroad {
        name: &'static str,
        price: i64,
        mortgage_value: i64,
    },
    /// A utility (Electric Company or Water Works)
    Utility {
        name: &'static str,
        price: i64,
        mortgage_value: i64,
    },
    /// A tax space
    Tax {
        name: &'static str,
        amount: i64,
        has_choice: bool,
    },
    /// Draw a Chance card
    Chance,
    /// Draw a Community Chest card
    CommunityChest,
    /// Jail / Just Visiting
    Jail,
    /// Go directly to jail
    GoToJail,
    /// Free Parking (no effect under standard rules)
    FreeParking,
}

impl Space {
    /// Display name of this space
    pub fn name(&self) -> &'static str {
        match self {
            Space::Go => "GO",
            Space::Property { name, .. }
            | Space::Railroad { name, .. }
            | Space::Utility { name, .. }
            | Space::Tax { name, .. } => name,
            Space::Chance => "Chance",
            Space::CommunityChest => "Community Chest",
            Space::Jail => "Jail",
            Space::GoToJail => "Go To Jail",
            Space::FreeParking => "Free Parking",
        }
    }

    /// Whether this space can be bought and owned
    pub fn is_ownable(&self) -> bool {
        matches!(
            self,
            Space::Property { .. } | Space::Railroad { .. } | Space::Utility { .. }
        )
    }

    /// Purchase price, if this space can be bought
    pub fn price(&self) -> Option<i64> {
        match self {
            Space::Property { price, .. }
            | Space::Railroad { price, .. }
            | Space::Utility { price, .. } => Some(*price),
            _ => None,
        }
    }

    /// Mortgage value, if this space can be mortgaged
    pub fn mortgage_value(&self) -> Option<i64> {
        match self {
            Space::Property { mortgage_value, .. }
            | Space::Railroad { mortgage_value, .. }
            | Space::Utility { mortgage_value, .. } => Some(*mortgage_value),
            _ => None,
        }
    }

    /// Color group, for street properties only
    pub fn color_group(&self) -> Option<ColorGroup> {
        match self {
            Space::Property { color_group, .. } => Some(*color_group),
            _ => None,
        }
    }

    /// House cost, for street properties only
    pub fn house_cost(&self) -> Option<i64> {
        match self {
            Space::Property { house_cost, .. } => Some(*house_cost),
            _ => None,
        }
    }

    /// Rent for a street property at the given improvement level.
    ///
    /// `houses` is 0-4, or 5 for a hotel. An unimproved property in a
    /// complete, unmortgaged color group earns double base rent.
    pub fn street_rent(&self, houses: u8, has_monopoly: bool) -> i64 {
        match self {
            Space::Property { rent, .. } => {
                if houses == 0 {
                    if has_monopoly {
                        rent[0] * 2
                    } else {
                        rent[0]
                    }
                } else {
                    rent[houses.min(5) as usize]
                }
            }
            _ => 0,
        }
    }
}

/// Rent for a railroad given how many the owner holds: 25, 50, 100, 200.
pub fn railroad_rent(railroads_owned: u32) -> i64 {
    25 * 2i64.pow(railroads_owned.saturating_sub(1))
}

/// Rent for a utility given the dice roll and how many the owner holds.
pub fn utility_rent(dice_roll: u32, utilities_owned: u32) -> i64 {
    let multiplier = if utilities_owned == 1 { 4 } else { 10 };
    i64::from(dice_roll) * multiplier
}

/// The Monopoly game board with 40 spaces.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    spaces: Vec<Space>,
    color_groups: HashMap<ColorGroup, Vec<Position>>,
    railroads: Vec<Position>,
    utilities: Vec<Position>,
}

impl Board {
    /// Create the standard US board layout.
    pub fn standard() -> Self {
        let spaces = standard_spaces();
        debug_assert_eq!(spaces.len(), BOARD_SIZE);

        // Derive the lookup indexes once; they never change afterwards.
        let mut color_groups: HashMap<ColorGroup, Vec<Position>> = HashMap::new();
        let mut railroads = Vec::new();
        let mut utilities = Vec::new();

        for (position, space) in spaces.iter().enumerate() {
            match space {
                Space::Property { color_group, .. } => {
                    color_groups.entry(*color_group).or_default().push(position);
                }
                Space::Railroad { .. } => railroads.push(position),
                Space::Utility { .. } => utilities.push(position),
                _ => {}
            }
        }

        Self {
            spaces,
            color_groups,
            railroads,
            utilities,
        }
    }

    /// Get the space at the given position (wraps past 39)
    pub fn space(&self, position: Position) -> &Space {
        &self.spaces[position % BOARD_SIZE]
    }

    /// All spaces in board order
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// Positions of every street property in a color group
    pub fn color_group(&self, color: ColorGroup) -> &[Position] {
        self.color_groups
            .get(&color)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions of all railroads
    pub fn railroads(&self) -> &[Position] {
        &self.railroads
    }

    /// Positions of all utilities
    pub fn utilities(&self) -> &[Position] {
        &self.utilities
    }

    /// Nearest railroad moving forward from the given position
    pub fn nearest_railroad(&self, from: Position) -> Position {
        self.nearest_of(from, &self.railroads)
    }

    /// Nearest utility moving forward from the given position
    pub fn nearest_utility(&self, from: Position) -> Position {
        self.nearest_of(from, &self.utilities)
    }

    fn nearest_of(&self, from: Position, targets: &[Position]) -> Position {
        for offset in 1..=BOARD_SIZE {
            let position = (from + offset) % BOARD_SIZE;
            if targets.contains(&position) {
                return position;
            }
        }
        targets[0]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Shorthand for a street property entry in the board table.
fn street(
    name: &'static str,
    price: i64,
    color_group: ColorGroup,
    rent: [i64; 6],
    house_cost: i64,
    mortgage_value: i64,
) -> Space {
    Space::Property {
        name,
        price,
        color_group,
        rent,
        house_cost,
        mortgage_value,
    }
}

fn railroad(name: &'static str) -> Space {
    Space::Railroad {
        name,
        price: 200,
        mortgage_value: 100,
    }
}

fn utility(name: &'static str) -> Space {
    Space::Utility {
        name,
        price: 150,
        mortgage_value: 75,
    }
}

fn standard_spaces() -> Vec<Space> {
    use ColorGroup::*;
    vec![
        // Bottom row (0-10)
        Space::Go,
        street("Mediterranean Avenue", 60, Brown, [2, 10, 30, 90, 160, 250], 50, 30),
        Space::CommunityChest,
        street("Baltic Avenue", 60, Brown, [4, 20, 60, 180, 320, 450], 50, 30),
        Space::Tax {
            name: "Income Tax",
            amount: 200,
            has_choice: false,
        },
        railroad("Reading Railroad"),
        street("Oriental Avenue", 100, LightBlue, [6, 30, 90, 270, 400, 550], 50, 50),
        Space::Chance,
        street("Vermont Avenue", 100, LightBlue, [6, 30, 90, 270, 400, 550], 50, 50),
        street("Connecticut Avenue", 120, LightBlue, [8, 40, 100, 300, 450, 600], 50, 60),
        Space::Jail,
        // Left side (11-20)
        street("St. Charles Place", 140, Pink, [10, 50, 150, 450, 625, 750], 100, 70),
        utility("Electric Company"),
        street("States Avenue", 140, Pink, [10, 50, 150, 450, 625, 750], 100, 70),
        street("Virginia Avenue", 160, Pink, [12, 60, 180, 500, 700, 900], 100, 80),
        railroad("Pennsylvania Railroad"),
        street("St. James Place", 180, Orange, [14, 70, 200, 550, 750, 950], 100, 90),
        Space::CommunityChest,
        street("Tennessee Avenue", 180, Orange, [14, 70, 200, 550, 750, 950], 100, 90),
        street("New York Avenue", 200, Orange, [16, 80, 220, 600, 800, 1000], 100, 100),
        Space::FreeParking,
        // Top row (21-30)
        street("Kentucky Avenue", 220, Red, [18, 90, 250, 700, 875, 1050], 150, 110),
        Space::Chance,
        street("Indiana Avenue", 220, Red, [18, 90, 250, 700, 875, 1050], 150, 110),
        street("Illinois Avenue", 240, Red, [20, 100, 300, 750, 925, 1100], 150, 120),
        railroad("B. & O. Railroad"),
        street("Atlantic Avenue", 260, Yellow, [22, 110, 330, 800, 975, 1150], 150, 130),
        street("Ventnor Avenue", 260, Yellow, [22, 110, 330, 800, 975, 1150], 150, 130),
        utility("Water Works"),
        street("Marvin Gardens", 280, Yellow, [24, 120, 360, 850, 1025, 1200], 150, 140),
        Space::GoToJail,
        // Right side (31-39)
        street("Pacific Avenue", 300, Green, [26, 130, 390, 900, 1100, 1275], 200, 150),
        street("North Carolina Avenue", 300, Green, [26, 130, 390, 900, 1100, 1275], 200, 150),
        Space::CommunityChest,
        street("Pennsylvania Avenue", 320, Green, [28, 150, 450, 1000, 1200, 1400], 200, 160),
        railroad("Short Line"),
        Space::Chance,
        street("Park Place", 350, DarkBlue, [35, 175, 500, 1100, 1300, 1500], 200, 175),
        Space::Tax {
            name: "Luxury Tax",
            amount: 100,
            has_choice: false,
        },
        street("Boardwalk", 400, DarkBlue, [50, 200, 600, 1400, 1700, 2000], 200, 200),
    ]
}
