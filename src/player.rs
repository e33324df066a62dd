//! Player trait and the automated implementation.

use rand::rngs::SmallRng;

use crate::ai::{Personality, TargetingMode, Targeter};
use crate::common::{Coord, GameError, ShotOutcome};
use crate::fleet::{random_fleet, Fleet};
use crate::grid::Grid;
use crate::ship::ShipType;

/// Interface implemented by sides that act without user input.
///
/// A Player is responsible for:
/// - Placing its fleet
/// - Selecting targets to attack
/// - Handling feedback from its shots
pub trait Player {
    /// Build a complete fleet for a grid of side `size`.
    fn place_fleet(
        &mut self,
        rng: &mut SmallRng,
        size: usize,
        roster: &[ShipType],
    ) -> Result<(Grid, Fleet), GameError>;

    /// Choose the next target on `view`, a fog-of-war copy of the enemy grid.
    fn select_target(&mut self, rng: &mut SmallRng, view: &Grid) -> Option<Coord>;

    /// Inform the player of the result of its last shot.
    fn handle_shot_result(&mut self, _coord: Coord, _outcome: &ShotOutcome) {}

    /// Drop any memory carried over from a previous match.
    fn reset(&mut self) {}
}

/// Automated side driven by a `Targeter`.
#[derive(Debug, Clone)]
pub struct AiPlayer {
    targeter: Targeter,
}

impl AiPlayer {
    pub fn new(mode: TargetingMode, personality: Personality) -> Self {
        Self {
            targeter: Targeter::new(mode, personality),
        }
    }

    pub fn targeter(&self) -> &Targeter {
        &self.targeter
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new(TargetingMode::default(), Personality::default())
    }
}

impl Player for AiPlayer {
    fn place_fleet(
        &mut self,
        rng: &mut SmallRng,
        size: usize,
        roster: &[ShipType],
    ) -> Result<(Grid, Fleet), GameError> {
        random_fleet(size, roster, rng)
    }

    fn select_target(&mut self, rng: &mut SmallRng, view: &Grid) -> Option<Coord> {
        self.targeter.select_target(view, rng)
    }

    fn handle_shot_result(&mut self, coord: Coord, outcome: &ShotOutcome) {
        self.targeter.record(coord, outcome);
    }

    fn reset(&mut self) {
        self.targeter.reset();
    }
}
