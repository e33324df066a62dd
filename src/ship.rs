//! Ship definitions and the per-ship hit record.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{Coord, GameError};

/// Orientation of a ship on the grid. Horizontal ships extend to the right
/// of their origin, vertical ships extend downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipType {
    name: Cow<'static, str>,
    length: usize,
}

impl ShipType {
    /// Create a ship type with a static name, usable in constants.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            length,
        }
    }

    /// Create a ship type with a name chosen at runtime.
    pub fn named(name: impl Into<Cow<'static, str>>, length: usize) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Cells covered by a ship of `length` at `origin`, or `None` if any of them
/// falls outside a grid of side `size`. There is no wraparound.
pub fn footprint(
    origin: Coord,
    orientation: Orientation,
    length: usize,
    size: usize,
) -> Option<Vec<Coord>> {
    let (dr, dc) = orientation.step();
    let end_row = origin.row.checked_add(dr * length.saturating_sub(1))?;
    let end_col = origin.col.checked_add(dc * length.saturating_sub(1))?;
    if length == 0 || end_row >= size || end_col >= size {
        return None;
    }
    Some(
        (0..length)
            .map(|i| Coord::new(origin.row + dr * i, origin.col + dc * i))
            .collect(),
    )
}

/// A ship placed in a fleet.
///
/// `hit_count` only grows; once it reaches the ship length the ship is sunk
/// for the rest of the match.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    ship_type: ShipType,
    orientation: Orientation,
    coords: Vec<Coord>,
    hit_count: usize,
}

impl Ship {
    /// Build a ship at `origin`. Fails with `InvalidPlacement` when the ship
    /// does not fit inside a grid of side `size`.
    pub fn new(
        ship_type: ShipType,
        origin: Coord,
        orientation: Orientation,
        size: usize,
    ) -> Result<Self, GameError> {
        let coords = footprint(origin, orientation, ship_type.length(), size)
            .ok_or(GameError::InvalidPlacement)?;
        Ok(Ship {
            ship_type,
            orientation,
            coords,
            hit_count: 0,
        })
    }

    pub fn ship_type(&self) -> &ShipType {
        &self.ship_type
    }

    pub fn name(&self) -> &str {
        self.ship_type.name()
    }

    pub fn size(&self) -> usize {
        self.ship_type.length()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// First cell of the ship.
    pub fn origin(&self) -> Coord {
        self.coords[0]
    }

    /// Occupied cells, ordered from the origin outwards.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn is_sunk(&self) -> bool {
        self.hit_count >= self.size()
    }

    /// Count one more hit. Returns `true` if this hit sank the ship.
    pub(crate) fn register_hit(&mut self) -> bool {
        if self.is_sunk() {
            return false;
        }
        self.hit_count += 1;
        self.is_sunk()
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: {}, orientation: {:?}, hits: {}/{} }}",
            self.name(),
            self.origin(),
            self.orientation,
            self.hit_count,
            self.size(),
        )
    }
}
