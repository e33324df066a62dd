// Target selection for the automated side.

use alloc::vec::Vec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::common::{Coord, ShotOutcome};
use crate::grid::Grid;

/// Neighbour check order around the most recent hit: down, right, up, left.
pub const HUNT_ORDER: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// How the automated side searches for ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingMode {
    /// Uniform choice among untried cells.
    Random,
    /// Probe the neighbours of recent hits before searching at random.
    #[default]
    Hunt,
}

/// Flavour applied when picking from the untried candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Personality {
    /// Uniform random choice.
    #[default]
    Standard,
    /// Shuffle the candidates and take the first.
    Aggressive,
    /// Always the last candidate in row-major order.
    Evasive,
    /// Prefer cells on the main diagonal, else the first candidate.
    Calculated,
}

/// Recent hits, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuntMemory {
    hits: Vec<Coord>,
}

impl HuntMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self, coord: Coord) {
        self.hits.insert(0, coord);
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }

    pub fn most_recent(&self) -> Option<Coord> {
        self.hits.first().copied()
    }

    pub fn hits(&self) -> &[Coord] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// First untried in-bounds neighbour of the most recent hit, checked in
/// `HUNT_ORDER`.
pub fn hunt_target(grid: &Grid, memory: &HuntMemory) -> Option<Coord> {
    let last = memory.most_recent()?;
    HUNT_ORDER
        .iter()
        .filter_map(|&(dr, dc)| last.offset(dr, dc, grid.size()))
        .find(|&c| grid.is_untried(c))
}

/// Pick one of `candidates` according to `personality`.
pub fn pick_candidate<R: Rng + ?Sized>(
    candidates: &[Coord],
    personality: Personality,
    rng: &mut R,
) -> Option<Coord> {
    if candidates.is_empty() {
        return None;
    }
    match personality {
        Personality::Standard => Some(candidates[rng.random_range(0..candidates.len())]),
        Personality::Aggressive => {
            let mut shuffled = candidates.to_vec();
            shuffled.shuffle(rng);
            shuffled.first().copied()
        }
        Personality::Evasive => candidates.last().copied(),
        Personality::Calculated => candidates
            .iter()
            .find(|c| c.row == c.col)
            .or_else(|| candidates.first())
            .copied(),
    }
}

/// Stateful targeting for one automated side.
#[derive(Debug, Clone)]
pub struct Targeter {
    mode: TargetingMode,
    personality: Personality,
    memory: HuntMemory,
}

impl Targeter {
    pub fn new(mode: TargetingMode, personality: Personality) -> Self {
        Self {
            mode,
            personality,
            memory: HuntMemory::new(),
        }
    }

    pub fn mode(&self) -> TargetingMode {
        self.mode
    }

    pub fn memory(&self) -> &HuntMemory {
        &self.memory
    }

    /// Next coordinate to fire at on `grid`, or `None` when every cell has
    /// already been tried.
    pub fn select_target<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Option<Coord> {
        if self.mode == TargetingMode::Hunt {
            if let Some(target) = hunt_target(grid, &self.memory) {
                return Some(target);
            }
        }
        pick_candidate(&grid.untried(), self.personality, rng)
    }

    /// Feed back the outcome of a resolved shot.
    pub fn record(&mut self, coord: Coord, outcome: &ShotOutcome) {
        match outcome {
            ShotOutcome::Hit => self.memory.record_hit(coord),
            ShotOutcome::Sunk { .. } => self.memory.clear(),
            ShotOutcome::Miss => {}
        }
    }

    /// Forget every recorded hit.
    pub fn reset(&mut self) {
        self.memory.clear();
    }
}
