use alloc::vec::Vec;
use core::time::Duration;

use crate::ai::{Personality, TargetingMode};
use crate::common::GameError;
use crate::ship::ShipType;

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Total number of ship segments in the classic roster.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Pause before the automated side fires its salvo.
pub const DEFAULT_OPPONENT_DELAY: Duration = Duration::from_millis(500);

/// How many shots a side may fire before control passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPolicy {
    /// One shot per turn.
    SingleShot,
    /// One shot per surviving ship of the firing side.
    #[default]
    Salvo,
}

/// Settings fixed at match start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    pub grid_size: usize,
    pub roster: Vec<ShipType>,
    pub targeting: TargetingMode,
    pub personality: Personality,
    pub turn_policy: TurnPolicy,
    pub opponent_delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            roster: SHIPS.to_vec(),
            targeting: TargetingMode::default(),
            personality: Personality::default(),
            turn_policy: TurnPolicy::default(),
            opponent_delay: DEFAULT_OPPONENT_DELAY,
        }
    }
}

impl MatchConfig {
    /// Check that a fleet built from `roster` can exist on the grid.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.roster.is_empty() {
            return Err(GameError::InvalidConfig("roster is empty"));
        }
        if self.roster.iter().any(|s| s.length() == 0) {
            return Err(GameError::InvalidConfig("ship length must be positive"));
        }
        let longest = self.roster.iter().map(ShipType::length).max().unwrap_or(0);
        if self.grid_size < longest {
            return Err(GameError::InvalidConfig(
                "grid is smaller than the longest ship",
            ));
        }
        let area = self
            .grid_size
            .checked_mul(self.grid_size)
            .ok_or(GameError::InvalidConfig("grid is too large"))?;
        let cells = self
            .roster
            .iter()
            .try_fold(0usize, |acc, s| acc.checked_add(s.length()))
            .ok_or(GameError::InvalidConfig("roster does not fit on the grid"))?;
        if cells > area {
            return Err(GameError::InvalidConfig("roster does not fit on the grid"));
        }
        Ok(())
    }

    /// Sum of all roster ship lengths.
    pub fn total_ship_cells(&self) -> usize {
        self.roster.iter().map(ShipType::length).sum()
    }
}
