//! Common types for the engine: coordinates, sides, shot outcomes and errors.

use alloc::string::String;
use core::fmt;

/// A cell position on a square grid, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbour shifted by `(dr, dc)`, or `None` when it would
    /// leave a grid of side `size`.
    pub fn offset(self, dr: isize, dc: isize, size: usize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        if row < size && col < size {
            Some(Coord { row, col })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two fleets in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The human (or externally driven) side.
    Player,
    /// The automated side.
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Result of a shot that was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// Shot landed on open water.
    Miss,
    /// Shot hit a ship segment that is still afloat.
    Hit,
    /// Shot hit the last intact segment, carrying the fleet index and name
    /// of the ship that went down.
    Sunk { ship: usize, name: String },
}

impl ShotOutcome {
    /// `true` for both `Hit` and `Sunk`.
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }
}

/// Errors returned by engine operations. Every variant leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate lies outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// Ship would overlap another ship or leave the grid.
    InvalidPlacement,
    /// Target cell was already resolved as a hit or miss.
    AlreadyAttacked,
    /// Action attempted outside the acting side's turn or outside play.
    NotYourTurn,
    /// Random placement ran out of attempts.
    PlacementExhausted,
    /// Match started before every roster ship was placed.
    FleetIncomplete,
    /// Manual placement attempted after the whole roster was placed.
    FleetComplete,
    /// Grid marks a ship cell that no ship in the fleet owns.
    UnknownShip,
    /// Match configuration was rejected.
    InvalidConfig(&'static str),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds { row, col } => {
                write!(f, "coordinate ({}, {}) is out of bounds", row, col)
            }
            GameError::InvalidPlacement => write!(f, "ship placement overlaps or leaves the grid"),
            GameError::AlreadyAttacked => write!(f, "cell was already attacked"),
            GameError::NotYourTurn => write!(f, "not your turn"),
            GameError::PlacementExhausted => write!(f, "unable to find a free slot for the ship"),
            GameError::FleetIncomplete => write!(f, "fleet is not fully placed"),
            GameError::FleetComplete => write!(f, "every ship is already placed"),
            GameError::UnknownShip => write!(f, "no ship occupies the targeted cell"),
            GameError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
