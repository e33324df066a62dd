//! Square grid of cell states, one per fleet side.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{Coord, GameError};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellStatus {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
}

impl CellStatus {
    /// `Hit` and `Miss` are terminal: the cell has been fired upon.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellStatus::Hit | CellStatus::Miss)
    }

    fn symbol(self) -> char {
        match self {
            CellStatus::Empty => '.',
            CellStatus::Ship => 'S',
            CellStatus::Hit => 'X',
            CellStatus::Miss => 'o',
        }
    }
}

/// `size`×`size` matrix of cells stored in row-major order.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    size: usize,
    cells: Vec<CellStatus>,
}

impl Grid {
    /// A grid with every cell empty.
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![CellStatus::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn index(&self, coord: Coord) -> Result<usize, GameError> {
        if self.in_bounds(coord) {
            Ok(coord.row * self.size + coord.col)
        } else {
            Err(GameError::OutOfBounds {
                row: coord.row,
                col: coord.col,
            })
        }
    }

    pub fn get(&self, coord: Coord) -> Result<CellStatus, GameError> {
        Ok(self.cells[self.index(coord)?])
    }

    /// Overwrite the status of one cell.
    pub fn set_status(&mut self, coord: Coord, status: CellStatus) -> Result<(), GameError> {
        let idx = self.index(coord)?;
        self.cells[idx] = status;
        Ok(())
    }

    /// `true` if the cell is in bounds and has not been fired upon.
    pub fn is_untried(&self, coord: Coord) -> bool {
        self.get(coord).map(|s| !s.is_resolved()).unwrap_or(false)
    }

    /// Every cell with its coordinate, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellStatus)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &s)| (Coord::new(i / size, i % size), s))
    }

    /// Untried cells in row-major order.
    pub fn untried(&self) -> Vec<Coord> {
        self.iter()
            .filter(|(_, s)| !s.is_resolved())
            .map(|(c, _)| c)
            .collect()
    }

    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|&&s| s == status).count()
    }

    /// Copy of the grid with intact ship cells shown as empty water.
    pub fn fogged(&self) -> Grid {
        Grid {
            size: self.size,
            cells: self
                .cells
                .iter()
                .map(|&s| match s {
                    CellStatus::Ship => CellStatus::Empty,
                    other => other,
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} {{", self.size, self.size)?;
        for row in self.cells.chunks(self.size.max(1)) {
            write!(f, "  ")?;
            for s in row {
                write!(f, "{}", s.symbol())?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
