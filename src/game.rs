//! Match lifecycle: placement, turn and salvo sequencing, outcome.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;
use rand::rngs::SmallRng;

use crate::attack::resolve_shot;
use crate::common::{Coord, GameError, ShotOutcome, Side};
use crate::config::{MatchConfig, TurnPolicy};
use crate::events::{Achievement, GameEvent, NullObserver, Observer};
use crate::fleet::{random_fleet, Fleet, PlacementCursor};
use crate::grid::{CellStatus, Grid};
use crate::player::{AiPlayer, Player};
use crate::scheduler::{DeferredAction, Scheduler};
use crate::ship::{Orientation, ShipType};
use crate::stats::{team_key, MatchResult, MemoryStatsStore, Stats, StatsStore};

/// Lifecycle phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Placement,
    Active,
    Finished,
}

/// Everything that changes while a match is played.
#[derive(Debug, Clone)]
pub struct MatchState {
    player_grid: Grid,
    player_fleet: Fleet,
    opponent_grid: Grid,
    opponent_fleet: Fleet,
    phase: Phase,
    current_turn: Side,
    shot_budget: usize,
    shots_remaining: usize,
    winner: Option<Side>,
    cursor: PlacementCursor,
    player_shots: usize,
    opponent_shots: usize,
    turns: usize,
}

impl MatchState {
    fn new(size: usize, opponent_grid: Grid, opponent_fleet: Fleet) -> Self {
        Self {
            player_grid: Grid::new(size),
            player_fleet: Fleet::new(),
            opponent_grid,
            opponent_fleet,
            phase: Phase::Placement,
            current_turn: Side::Player,
            shot_budget: 0,
            shots_remaining: 0,
            winner: None,
            cursor: PlacementCursor::new(),
            player_shots: 0,
            opponent_shots: 0,
            turns: 0,
        }
    }

    pub fn grid(&self, side: Side) -> &Grid {
        match side {
            Side::Player => &self.player_grid,
            Side::Opponent => &self.opponent_grid,
        }
    }

    pub fn fleet(&self, side: Side) -> &Fleet {
        match side {
            Side::Player => &self.player_fleet,
            Side::Opponent => &self.opponent_fleet,
        }
    }

    fn board_mut(&mut self, side: Side) -> (&mut Grid, &mut Fleet) {
        match side {
            Side::Player => (&mut self.player_grid, &mut self.player_fleet),
            Side::Opponent => (&mut self.opponent_grid, &mut self.opponent_fleet),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// Shots granted at the start of the current turn.
    pub fn shot_budget(&self) -> usize {
        self.shot_budget
    }

    pub fn shots_remaining(&self) -> usize {
        self.shots_remaining
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Shots `side` has had accepted so far.
    pub fn shots_fired(&self, side: Side) -> usize {
        match side {
            Side::Player => self.player_shots,
            Side::Opponent => self.opponent_shots,
        }
    }

    /// Turns started so far, counting both sides.
    pub fn turns(&self) -> usize {
        self.turns
    }
}

/// Collaborators a match reports to. Kept across replays.
pub struct MatchContext {
    observer: Box<dyn Observer>,
    stats: Box<dyn StatsStore>,
    stats_key: String,
}

impl MatchContext {
    pub fn new(
        observer: Box<dyn Observer>,
        stats: Box<dyn StatsStore>,
        stats_key: impl Into<String>,
    ) -> Self {
        Self {
            observer,
            stats,
            stats_key: stats_key.into(),
        }
    }

    pub fn stats_key(&self) -> &str {
        &self.stats_key
    }

    pub fn stats_store(&self) -> &dyn StatsStore {
        self.stats.as_ref()
    }
}

impl Default for MatchContext {
    fn default() -> Self {
        Self::new(
            Box::new(NullObserver),
            Box::new(MemoryStatsStore::new()),
            team_key("player", "opponent"),
        )
    }
}

/// A match between the player side and an automated opponent.
pub struct Match {
    config: MatchConfig,
    state: MatchState,
    context: MatchContext,
    rng: SmallRng,
    opponent: Box<dyn Player>,
    scheduler: Scheduler,
    stats: Option<Stats>,
}

impl Match {
    /// New match in the placement phase against an `AiPlayer` configured
    /// from `config`. The opponent fleet is placed immediately.
    pub fn new(config: MatchConfig, rng: SmallRng, context: MatchContext) -> Result<Self, GameError> {
        let opponent = AiPlayer::new(config.targeting, config.personality);
        Self::with_opponent(config, rng, context, Box::new(opponent))
    }

    /// New match against a caller-supplied automated side.
    pub fn with_opponent(
        config: MatchConfig,
        mut rng: SmallRng,
        context: MatchContext,
        mut opponent: Box<dyn Player>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let (grid, fleet) = opponent.place_fleet(&mut rng, config.grid_size, &config.roster)?;
        if grid.size() != config.grid_size || fleet.len() != config.roster.len() {
            return Err(GameError::InvalidPlacement);
        }
        let state = MatchState::new(config.grid_size, grid, fleet);
        Ok(Self {
            config,
            state,
            context,
            rng,
            opponent,
            scheduler: Scheduler::new(),
            stats: None,
        })
    }

    /// Consume the match and build a fresh one with the same configuration
    /// and collaborators. Grids, fleets and hunt memory start over.
    pub fn replay(self) -> Result<Self, GameError> {
        let Match {
            config,
            context,
            rng,
            mut opponent,
            ..
        } = self;
        opponent.reset();
        Self::with_opponent(config, rng, context, opponent)
    }

    /// Hand back the collaborators, ending the match.
    pub fn into_context(self) -> MatchContext {
        self.context
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_turn(&self) -> Side {
        self.state.current_turn
    }

    pub fn shots_remaining(&self) -> usize {
        self.state.shots_remaining
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn grid(&self, side: Side) -> &Grid {
        self.state.grid(side)
    }

    pub fn fleet(&self, side: Side) -> &Fleet {
        self.state.fleet(side)
    }

    /// The opponent grid as the player may see it.
    pub fn opponent_view(&self) -> Grid {
        self.state.opponent_grid.fogged()
    }

    /// Statistics loaded at start, updated when the match ends.
    pub fn stats(&self) -> Option<Stats> {
        self.stats
    }

    // ---- placement ----

    /// Roster entry the next manual placement will use.
    pub fn next_ship(&self) -> Option<&ShipType> {
        self.config.roster.get(self.state.cursor.next_index())
    }

    pub fn orientation(&self) -> Orientation {
        self.state.cursor.orientation()
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        self.state.cursor.toggle_orientation()
    }

    pub fn is_fleet_complete(&self) -> bool {
        self.state.cursor.is_complete(&self.config.roster)
    }

    /// Place the next roster ship for the player side at `origin` using the
    /// current orientation.
    pub fn place_next(&mut self, origin: Coord) -> Result<usize, GameError> {
        if self.state.phase != Phase::Placement {
            return Err(GameError::NotYourTurn);
        }
        let state = &mut self.state;
        let index = state.cursor.place_next(
            &mut state.player_grid,
            &mut state.player_fleet,
            &self.config.roster,
            origin,
        )?;
        let coords = state.player_fleet.ships()[index].coords().to_vec();
        for c in coords {
            self.context
                .observer
                .on_cell_updated(Side::Player, c, CellStatus::Ship);
        }
        Ok(index)
    }

    /// Replace the player fleet with a randomly placed complete roster.
    pub fn randomize_fleet(&mut self) -> Result<(), GameError> {
        if self.state.phase != Phase::Placement {
            return Err(GameError::NotYourTurn);
        }
        let (grid, fleet) = random_fleet(self.config.grid_size, &self.config.roster, &mut self.rng)?;
        for (c, status) in grid.iter() {
            if status != self.state.player_grid.get(c)? {
                self.context.observer.on_cell_updated(Side::Player, c, status);
            }
        }
        self.state.player_grid = grid;
        self.state.player_fleet = fleet;
        self.state.cursor.finish(&self.config.roster);
        Ok(())
    }

    // ---- play ----

    /// Leave placement and give the player side the first turn.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.state.phase != Phase::Placement {
            return Err(GameError::NotYourTurn);
        }
        if !self.is_fleet_complete() {
            return Err(GameError::FleetIncomplete);
        }
        self.stats = match self.context.stats.load_stats(&self.context.stats_key) {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::warn!("failed to load stats for {}: {}", self.context.stats_key, e);
                None
            }
        };
        self.state.phase = Phase::Active;
        log::info!("match started on a {0}x{0} grid", self.config.grid_size);
        self.begin_turn(Side::Player);
        Ok(())
    }

    /// Fire one shot from the player side.
    ///
    /// A shot at an already resolved cell is rejected without consuming the
    /// budget. When the budget runs out the turn passes to the opponent and
    /// its salvo is scheduled.
    pub fn fire(&mut self, coord: Coord) -> Result<ShotOutcome, GameError> {
        if self.state.phase != Phase::Active
            || self.state.current_turn != Side::Player
            || self.state.shots_remaining == 0
        {
            return Err(GameError::NotYourTurn);
        }
        let outcome = self.shoot(Side::Player, coord)?;
        if self.state.phase == Phase::Active {
            self.state.shots_remaining -= 1;
            if self.state.shots_remaining == 0 {
                self.begin_turn(Side::Opponent);
            }
        }
        Ok(outcome)
    }

    /// Delay of the next deferred action, if one is pending.
    pub fn next_deferred(&self) -> Option<Duration> {
        self.scheduler.peek().map(|d| d.delay)
    }

    /// Run the next deferred action to completion. Returns the shots it
    /// fired, or `None` when nothing was pending.
    pub fn run_deferred(&mut self) -> Option<Vec<(Coord, ShotOutcome)>> {
        let deferred = self.scheduler.pop()?;
        match deferred.action {
            DeferredAction::OpponentSalvo => Some(self.opponent_salvo()),
        }
    }

    /// Run every pending deferred action without waiting.
    pub fn settle(&mut self) -> Vec<(Coord, ShotOutcome)> {
        let mut shots = Vec::new();
        while let Some(fired) = self.run_deferred() {
            shots.extend(fired);
        }
        shots
    }

    fn budget_for(&self, side: Side) -> usize {
        match self.config.turn_policy {
            TurnPolicy::SingleShot => 1,
            TurnPolicy::Salvo => self.state.fleet(side).surviving(),
        }
    }

    fn begin_turn(&mut self, side: Side) {
        let budget = self.budget_for(side);
        self.state.current_turn = side;
        self.state.shot_budget = budget;
        self.state.shots_remaining = budget;
        self.state.turns += 1;
        log::info!("{} turn with {} shot(s)", side, budget);
        self.emit(GameEvent::TurnStarted { side, shots: budget });
        if side == Side::Opponent {
            self.scheduler
                .schedule(DeferredAction::OpponentSalvo, self.config.opponent_delay);
        }
    }

    fn opponent_salvo(&mut self) -> Vec<(Coord, ShotOutcome)> {
        let mut fired = Vec::new();
        if self.state.phase != Phase::Active || self.state.current_turn != Side::Opponent {
            return fired;
        }
        let max_rejections = self.config.grid_size * self.config.grid_size;
        let mut rejections = 0;
        while self.state.shots_remaining > 0 && self.state.phase == Phase::Active {
            let view = self.state.player_grid.fogged();
            let Some(coord) = self.opponent.select_target(&mut self.rng, &view) else {
                break;
            };
            match self.shoot(Side::Opponent, coord) {
                Ok(outcome) => {
                    self.opponent.handle_shot_result(coord, &outcome);
                    self.state.shots_remaining -= 1;
                    fired.push((coord, outcome));
                }
                Err(e) => {
                    log::warn!("opponent shot at {} rejected: {}", coord, e);
                    rejections += 1;
                    if rejections >= max_rejections {
                        break;
                    }
                }
            }
        }
        if self.state.phase == Phase::Active {
            self.begin_turn(Side::Player);
        }
        fired
    }

    /// Resolve a shot by `side` against the other side, then report it and
    /// check whether the target fleet is destroyed.
    fn shoot(&mut self, side: Side, coord: Coord) -> Result<ShotOutcome, GameError> {
        let target = side.other();
        let (grid, fleet) = self.state.board_mut(target);
        let outcome = resolve_shot(grid, fleet, coord)?;
        let status = grid.get(coord)?;
        let destroyed = fleet.all_sunk();

        match side {
            Side::Player => self.state.player_shots += 1,
            Side::Opponent => self.state.opponent_shots += 1,
        }
        self.context.observer.on_cell_updated(target, coord, status);
        self.emit(GameEvent::ShotResolved {
            side,
            coord,
            outcome: outcome.clone(),
        });
        if let ShotOutcome::Sunk { name, .. } = &outcome {
            log::info!("{} sank the {} {}", side, target, name);
            self.emit(GameEvent::ShipSunk {
                side,
                coord,
                ship: name.clone(),
            });
        }
        if side == Side::Player && outcome.is_hit() {
            self.emit(GameEvent::AchievementEarned {
                side,
                achievement: Achievement::DirectHit,
            });
        }
        if destroyed {
            self.finish(side);
        }
        Ok(outcome)
    }

    fn finish(&mut self, winner: Side) {
        let loser = winner.other();
        self.state.phase = Phase::Finished;
        self.state.winner = Some(winner);
        self.state.shots_remaining = 0;
        self.scheduler.clear();

        let (grid, fleet) = self.state.board_mut(loser);
        let mut revealed = Vec::new();
        for ship in fleet.ships() {
            for &c in ship.coords() {
                if grid.get(c) != Ok(CellStatus::Hit) && grid.set_status(c, CellStatus::Hit).is_ok() {
                    revealed.push(c);
                }
            }
        }
        for c in revealed {
            self.context.observer.on_cell_updated(loser, c, CellStatus::Hit);
        }

        log::info!("match over, {} wins", winner);
        self.emit(GameEvent::MatchEnded { winner });
        if winner == Side::Player && self.state.player_fleet.surviving() == self.state.player_fleet.len() {
            self.emit(GameEvent::AchievementEarned {
                side: winner,
                achievement: Achievement::FlawlessVictory,
            });
        }

        let result = if winner == Side::Player {
            MatchResult::Win
        } else {
            MatchResult::Loss
        };
        match self.context.stats.save_stats(&self.context.stats_key, result) {
            Ok(()) => {
                if let Some(stats) = self.stats.as_mut() {
                    stats.record(result);
                }
            }
            Err(e) => log::warn!("failed to save stats for {}: {}", self.context.stats_key, e),
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.context.observer.on_event(&event);
    }
}
