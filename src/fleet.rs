//! Fleet records and ship placement, manual or random.

use alloc::vec::Vec;
use rand::Rng;

use crate::common::{Coord, GameError};
use crate::grid::{CellStatus, Grid};
use crate::ship::{footprint, Orientation, Ship, ShipType};

/// Attempts per ship before random placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Ships belonging to one side, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    ships: Vec<Ship>,
}

impl Fleet {
    pub fn new() -> Self {
        Self { ships: Vec::new() }
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Index of the ship occupying `coord`, if any.
    pub fn ship_at(&self, coord: Coord) -> Option<usize> {
        self.ships.iter().position(|s| s.contains(coord))
    }

    /// Number of ships still afloat.
    pub fn surviving(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    /// `true` once a non-empty fleet has every ship sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    pub(crate) fn ship_mut(&mut self, index: usize) -> Option<&mut Ship> {
        self.ships.get_mut(index)
    }

    fn push(&mut self, ship: Ship) -> usize {
        self.ships.push(ship);
        self.ships.len() - 1
    }
}

/// Returns `true` iff all `length` cells from `origin` are in bounds and empty.
pub fn can_place(grid: &Grid, origin: Coord, length: usize, orientation: Orientation) -> bool {
    match footprint(origin, orientation, length, grid.size()) {
        Some(cells) => cells
            .iter()
            .all(|&c| matches!(grid.get(c), Ok(CellStatus::Empty))),
        None => false,
    }
}

/// Mark the ship's cells on `grid` and append it to `fleet`, returning its
/// fleet index. Nothing changes when the slot is not free.
pub fn place_ship(
    grid: &mut Grid,
    fleet: &mut Fleet,
    ship_type: &ShipType,
    origin: Coord,
    orientation: Orientation,
) -> Result<usize, GameError> {
    if !can_place(grid, origin, ship_type.length(), orientation) {
        return Err(GameError::InvalidPlacement);
    }
    let ship = Ship::new(ship_type.clone(), origin, orientation, grid.size())?;
    for &c in ship.coords() {
        grid.set_status(c, CellStatus::Ship)?;
    }
    Ok(fleet.push(ship))
}

/// Returns a random free `(origin, orientation)` for a ship of `length`.
pub fn random_placement<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    length: usize,
) -> Result<(Coord, Orientation), GameError> {
    let size = grid.size();
    if length == 0 || length > size {
        return Err(GameError::PlacementExhausted);
    }
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let (max_r, max_c) = match orient {
            Orientation::Horizontal => (size - 1, size - length),
            Orientation::Vertical => (size - length, size - 1),
        };
        let origin = Coord::new(rng.random_range(0..=max_r), rng.random_range(0..=max_c));
        if can_place(grid, origin, length, orient) {
            return Ok((origin, orient));
        }
    }
    Err(GameError::PlacementExhausted)
}

/// Build a fresh grid and fleet with every roster ship placed at random.
/// Either the whole roster is placed or an error is returned.
pub fn random_fleet<R: Rng + ?Sized>(
    size: usize,
    roster: &[ShipType],
    rng: &mut R,
) -> Result<(Grid, Fleet), GameError> {
    let mut grid = Grid::new(size);
    let mut fleet = Fleet::new();
    for ship_type in roster {
        let (origin, orient) = random_placement(&grid, rng, ship_type.length())?;
        place_ship(&mut grid, &mut fleet, ship_type, origin, orient)?;
    }
    Ok((grid, fleet))
}

/// Progress through manual placement: which roster ship comes next and the
/// orientation it will be placed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementCursor {
    next: usize,
    orientation: Orientation,
}

impl PlacementCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster index of the next ship to place.
    pub fn next_index(&self) -> usize {
        self.next
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.orientation
    }

    pub fn is_complete(&self, roster: &[ShipType]) -> bool {
        self.next >= roster.len()
    }

    /// Place the next roster ship at `origin` and advance on success.
    pub fn place_next(
        &mut self,
        grid: &mut Grid,
        fleet: &mut Fleet,
        roster: &[ShipType],
        origin: Coord,
    ) -> Result<usize, GameError> {
        let ship_type = roster.get(self.next).ok_or(GameError::FleetComplete)?;
        let index = place_ship(grid, fleet, ship_type, origin, self.orientation)?;
        self.next += 1;
        Ok(index)
    }

    /// Mark the roster as fully placed, keeping the orientation toggle.
    pub(crate) fn finish(&mut self, roster: &[ShipType]) {
        self.next = roster.len();
    }
}
