//! Structured match events and the sinks that receive them.
//!
//! The engine never formats text for the user. It reports cell changes and
//! tagged events to an [`Observer`], and the collaborator decides how to
//! render or log them.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::common::{Coord, ShotOutcome, Side};
use crate::grid::CellStatus;

/// Medal earned during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Achievement {
    /// The player side landed a hit.
    DirectHit,
    /// The player side won without losing a ship.
    FlawlessVictory,
}

/// Events emitted by a match. `side` is always the side that acted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// `side` received the turn with a budget of `shots`.
    TurnStarted { side: Side, shots: usize },
    /// A shot fired by `side` was resolved.
    ShotResolved {
        side: Side,
        coord: Coord,
        outcome: ShotOutcome,
    },
    /// A shot fired by `side` sank `ship`.
    ShipSunk {
        side: Side,
        coord: Coord,
        ship: String,
    },
    /// The match is over.
    MatchEnded { winner: Side },
    AchievementEarned {
        side: Side,
        achievement: Achievement,
    },
}

/// Receives display updates and events from a match.
pub trait Observer {
    /// A cell on `side`'s grid changed to `status`.
    fn on_cell_updated(&mut self, _side: Side, _coord: Coord, _status: CellStatus) {}

    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<GameEvent>,
    cells: Vec<(Side, Coord, CellStatus)>,
}

/// Recording observer. Clones share the same log, so one handle can be given
/// to the match while another is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    inner: Rc<RefCell<Recorded>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn cell_updates(&self) -> Vec<(Side, Coord, CellStatus)> {
        self.inner.borrow().cells.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.events.clear();
        inner.cells.clear();
    }
}

impl Observer for EventLog {
    fn on_cell_updated(&mut self, side: Side, coord: Coord, status: CellStatus) {
        self.inner.borrow_mut().cells.push((side, coord, status));
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.inner.borrow_mut().events.push(event.clone());
    }
}
