//! Shot resolution against one side's grid and fleet.

use alloc::string::ToString;

use crate::common::{Coord, GameError, ShotOutcome};
use crate::fleet::Fleet;
use crate::grid::{CellStatus, Grid};

/// Apply a shot at `coord`.
///
/// Mutates exactly one cell and at most one ship. A cell already marked
/// `Hit` or `Miss` is rejected with `AlreadyAttacked` and nothing changes.
pub fn resolve_shot(
    grid: &mut Grid,
    fleet: &mut Fleet,
    coord: Coord,
) -> Result<ShotOutcome, GameError> {
    match grid.get(coord)? {
        CellStatus::Hit | CellStatus::Miss => Err(GameError::AlreadyAttacked),
        CellStatus::Empty => {
            grid.set_status(coord, CellStatus::Miss)?;
            log::debug!("shot at {} missed", coord);
            Ok(ShotOutcome::Miss)
        }
        CellStatus::Ship => {
            let index = fleet.ship_at(coord).ok_or(GameError::UnknownShip)?;
            let ship = fleet.ship_mut(index).ok_or(GameError::UnknownShip)?;
            grid.set_status(coord, CellStatus::Hit)?;
            if ship.register_hit() {
                log::debug!("shot at {} sank {}", coord, ship.name());
                Ok(ShotOutcome::Sunk {
                    ship: index,
                    name: ship.name().to_string(),
                })
            } else {
                log::debug!("shot at {} hit {}", coord, ship.name());
                Ok(ShotOutcome::Hit)
            }
        }
    }
}
