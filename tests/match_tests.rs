use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use battleship_salvo::{
    place_ship, Achievement, CellStatus, Coord, EventLog, Fleet, GameError, GameEvent, Grid,
    Match, MatchConfig, MatchContext, MemoryStatsStore, Orientation, Personality, Phase, Player,
    ShipType, ShotOutcome, Side, Stats, TargetingMode, TurnPolicy,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Opponent with a fixed layout that fires at a scripted list of cells.
struct ScriptedPlayer {
    targets: VecDeque<Coord>,
}

impl ScriptedPlayer {
    fn new(targets: &[(usize, usize)]) -> Self {
        Self {
            targets: targets.iter().map(|&(r, c)| Coord::new(r, c)).collect(),
        }
    }
}

/// Cruiser at A1-C1, Destroyer at A3-B3, Dinghy at E5.
const LAYOUT: [(usize, usize, Orientation); 3] = [
    (0, 0, Orientation::Horizontal),
    (2, 0, Orientation::Horizontal),
    (4, 4, Orientation::Horizontal),
];

impl Player for ScriptedPlayer {
    fn place_fleet(
        &mut self,
        _rng: &mut SmallRng,
        size: usize,
        roster: &[ShipType],
    ) -> Result<(Grid, Fleet), GameError> {
        let mut grid = Grid::new(size);
        let mut fleet = Fleet::new();
        for (ship, &(r, c, o)) in roster.iter().zip(LAYOUT.iter()) {
            place_ship(&mut grid, &mut fleet, ship, Coord::new(r, c), o)?;
        }
        Ok((grid, fleet))
    }

    fn select_target(&mut self, _rng: &mut SmallRng, _view: &Grid) -> Option<Coord> {
        self.targets.pop_front()
    }
}

fn small_config() -> MatchConfig {
    MatchConfig {
        grid_size: 6,
        roster: vec![
            ShipType::new("Cruiser", 3),
            ShipType::new("Destroyer", 2),
            ShipType::new("Dinghy", 1),
        ],
        opponent_delay: Duration::ZERO,
        ..MatchConfig::default()
    }
}

fn scripted_match(config: MatchConfig, targets: &[(usize, usize)]) -> (Match, EventLog) {
    let log = EventLog::new();
    let context = MatchContext::new(
        Box::new(log.clone()),
        Box::new(MemoryStatsStore::new()),
        "alice_bob",
    );
    let mut game = Match::with_opponent(
        config,
        SmallRng::seed_from_u64(1),
        context,
        Box::new(ScriptedPlayer::new(targets)),
    )
    .unwrap();
    for &(r, c, o) in LAYOUT.iter() {
        if game.orientation() != o {
            game.toggle_orientation();
        }
        game.place_next(Coord::new(r, c)).unwrap();
    }
    (game, log)
}

fn fire_all(game: &mut Match, cells: &[(usize, usize)]) {
    for &(r, c) in cells {
        game.fire(Coord::new(r, c)).unwrap();
    }
}

#[test]
fn salvo_budget_follows_surviving_ships() {
    let (mut game, _) = scripted_match(small_config(), &[(5, 5), (5, 4), (5, 3)]);
    game.start().unwrap();
    assert_eq!(game.phase(), Phase::Active);
    assert_eq!(game.current_turn(), Side::Player);
    assert_eq!(game.shots_remaining(), 3);

    fire_all(&mut game, &[(5, 0), (5, 1), (5, 2)]);
    assert_eq!(game.fire(Coord::new(5, 3)), Err(GameError::NotYourTurn));
    assert_eq!(game.current_turn(), Side::Opponent);
    assert_eq!(game.next_deferred(), Some(Duration::ZERO));

    let salvo = game.run_deferred().unwrap();
    assert_eq!(salvo.len(), 3);
    assert!(salvo.iter().all(|(_, o)| *o == ShotOutcome::Miss));
    assert_eq!(game.current_turn(), Side::Player);
    assert_eq!(game.shots_remaining(), 3);
    assert_eq!(game.next_deferred(), None);
}

#[test]
fn repeated_target_does_not_consume_budget() {
    let (mut game, log) = scripted_match(small_config(), &[]);
    game.start().unwrap();
    game.fire(Coord::new(5, 0)).unwrap();
    let events_before = log.events().len();

    assert_eq!(game.fire(Coord::new(5, 0)), Err(GameError::AlreadyAttacked));
    assert_eq!(game.shots_remaining(), 2);
    assert_eq!(game.current_turn(), Side::Player);
    assert_eq!(log.events().len(), events_before);
}

#[test]
fn losing_a_ship_shrinks_the_next_salvo() {
    let (mut game, _) = scripted_match(small_config(), &[(4, 4), (5, 5), (5, 4)]);
    game.start().unwrap();
    fire_all(&mut game, &[(5, 0), (5, 1), (5, 2)]);
    let salvo = game.settle();
    assert_eq!(
        salvo[0].1,
        ShotOutcome::Sunk {
            ship: 2,
            name: "Dinghy".to_string()
        }
    );
    assert_eq!(game.fleet(Side::Player).surviving(), 2);
    assert_eq!(game.current_turn(), Side::Player);
    assert_eq!(game.shots_remaining(), 2);
}

#[test]
fn single_shot_policy_alternates_every_shot() {
    let config = MatchConfig {
        turn_policy: TurnPolicy::SingleShot,
        ..small_config()
    };
    let (mut game, _) = scripted_match(config, &[(5, 5), (5, 4)]);
    game.start().unwrap();
    assert_eq!(game.shots_remaining(), 1);
    game.fire(Coord::new(5, 0)).unwrap();
    assert_eq!(game.current_turn(), Side::Opponent);
    assert_eq!(game.settle().len(), 1);
    assert_eq!(game.current_turn(), Side::Player);
    assert_eq!(game.shots_remaining(), 1);
}

#[test]
fn player_destroys_fleet_and_wins() {
    let (mut game, log) = scripted_match(small_config(), &[(5, 5), (5, 4), (5, 3)]);
    game.start().unwrap();
    assert_eq!(game.stats(), Some(Stats::default()));

    fire_all(&mut game, &[(0, 0), (0, 1), (0, 2)]);
    game.settle();
    fire_all(&mut game, &[(2, 0), (2, 1)]);
    assert_eq!(
        game.fire(Coord::new(4, 4)).unwrap(),
        ShotOutcome::Sunk {
            ship: 2,
            name: "Dinghy".to_string()
        }
    );

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner(), Some(Side::Player));
    assert_eq!(game.next_deferred(), None);
    assert!(game.fleet(Side::Opponent).all_sunk());

    let events = log.events();
    assert!(events.contains(&GameEvent::MatchEnded {
        winner: Side::Player
    }));
    assert!(events.contains(&GameEvent::AchievementEarned {
        side: Side::Player,
        achievement: Achievement::FlawlessVictory,
    }));
    let sunk = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ShipSunk { side: Side::Player, .. }))
        .count();
    assert_eq!(sunk, 3);

    assert_eq!(game.stats(), Some(Stats { wins: 1, losses: 0 }));
    let stored = game.context().stats_store().load_stats("alice_bob").unwrap();
    assert_eq!(stored, Stats { wins: 1, losses: 0 });
}

#[test]
fn finished_match_accepts_no_shots() {
    let (mut game, _) = scripted_match(small_config(), &[(5, 5), (5, 4), (5, 3)]);
    game.start().unwrap();
    fire_all(&mut game, &[(0, 0), (0, 1), (0, 2)]);
    game.settle();
    fire_all(&mut game, &[(2, 0), (2, 1), (4, 4)]);

    let opponent_grid = game.grid(Side::Opponent).clone();
    let player_grid = game.grid(Side::Player).clone();
    assert_eq!(game.fire(Coord::new(3, 3)), Err(GameError::NotYourTurn));
    assert_eq!(game.run_deferred(), None);
    assert_eq!(game.grid(Side::Opponent), &opponent_grid);
    assert_eq!(game.grid(Side::Player), &player_grid);
}

#[test]
fn opponent_destroys_fleet_and_wins() {
    let targets = [(0, 0), (0, 1), (0, 2), (2, 0), (2, 1), (4, 4)];
    let (mut game, log) = scripted_match(small_config(), &targets);
    game.start().unwrap();

    fire_all(&mut game, &[(5, 0), (5, 1), (5, 2)]);
    game.settle();
    assert_eq!(game.shots_remaining(), 2);
    fire_all(&mut game, &[(5, 3), (5, 4)]);
    game.settle();

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner(), Some(Side::Opponent));
    assert_eq!(game.grid(Side::Player).count(CellStatus::Hit), 6);
    assert_eq!(game.grid(Side::Player).count(CellStatus::Ship), 0);
    assert_eq!(game.stats(), Some(Stats { wins: 0, losses: 1 }));

    let events = log.events();
    assert!(events.contains(&GameEvent::MatchEnded {
        winner: Side::Opponent
    }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::AchievementEarned { achievement: Achievement::FlawlessVictory, .. })));
}

#[test]
fn placement_phase_rules() {
    let log = EventLog::new();
    let context = MatchContext::new(Box::new(log.clone()), Box::new(MemoryStatsStore::new()), "k");
    let mut game = Match::with_opponent(
        small_config(),
        SmallRng::seed_from_u64(1),
        context,
        Box::new(ScriptedPlayer::new(&[])),
    )
    .unwrap();

    assert_eq!(game.phase(), Phase::Placement);
    assert_eq!(game.fire(Coord::new(0, 0)), Err(GameError::NotYourTurn));
    assert_eq!(game.start(), Err(GameError::FleetIncomplete));
    assert_eq!(game.next_ship().map(|s| s.name()), Some("Cruiser"));

    game.place_next(Coord::new(0, 0)).unwrap();
    assert_eq!(game.place_next(Coord::new(0, 2)), Err(GameError::InvalidPlacement));
    assert_eq!(game.next_ship().map(|s| s.name()), Some("Destroyer"));
    assert_eq!(game.toggle_orientation(), Orientation::Vertical);
    game.place_next(Coord::new(1, 0)).unwrap();
    game.place_next(Coord::new(5, 5)).unwrap();
    assert!(game.is_fleet_complete());
    assert_eq!(game.place_next(Coord::new(3, 3)), Err(GameError::FleetComplete));

    let ship_updates = log
        .cell_updates()
        .iter()
        .filter(|(side, _, status)| *side == Side::Player && *status == CellStatus::Ship)
        .count();
    assert_eq!(ship_updates, 6);

    game.start().unwrap();
    assert_eq!(game.start(), Err(GameError::NotYourTurn));
    assert_eq!(game.randomize_fleet(), Err(GameError::NotYourTurn));
}

#[test]
fn display_updates_follow_shots() {
    let (mut game, log) = scripted_match(small_config(), &[]);
    game.start().unwrap();
    log.clear();
    game.fire(Coord::new(0, 0)).unwrap();
    game.fire(Coord::new(3, 3)).unwrap();
    assert_eq!(
        log.cell_updates(),
        vec![
            (Side::Opponent, Coord::new(0, 0), CellStatus::Hit),
            (Side::Opponent, Coord::new(3, 3), CellStatus::Miss),
        ]
    );
    assert!(log.events().contains(&GameEvent::AchievementEarned {
        side: Side::Player,
        achievement: Achievement::DirectHit,
    }));
}

#[test]
fn opponent_view_hides_ships() {
    let (mut game, _) = scripted_match(small_config(), &[]);
    game.start().unwrap();
    game.fire(Coord::new(0, 0)).unwrap();
    let view = game.opponent_view();
    assert_eq!(view.count(CellStatus::Ship), 0);
    assert_eq!(view.get(Coord::new(0, 0)).unwrap(), CellStatus::Hit);
    assert_eq!(game.grid(Side::Opponent).count(CellStatus::Ship), 5);
}

#[test]
fn replay_starts_over_with_same_context() {
    let (mut game, _) = scripted_match(small_config(), &[(5, 5), (5, 4), (5, 3)]);
    game.start().unwrap();
    fire_all(&mut game, &[(0, 0), (0, 1), (0, 2)]);
    game.settle();
    fire_all(&mut game, &[(2, 0), (2, 1), (4, 4)]);
    assert_eq!(game.phase(), Phase::Finished);

    let mut game = game.replay().unwrap();
    assert_eq!(game.phase(), Phase::Placement);
    assert_eq!(game.winner(), None);
    assert_eq!(game.grid(Side::Player).count(CellStatus::Empty), 36);
    assert_eq!(game.grid(Side::Opponent).count(CellStatus::Ship), 6);
    assert!(game.fleet(Side::Player).is_empty());

    game.randomize_fleet().unwrap();
    game.start().unwrap();
    assert_eq!(game.stats(), Some(Stats { wins: 1, losses: 0 }));
}

#[test]
fn invalid_config_is_rejected() {
    let config = MatchConfig {
        grid_size: 4,
        ..MatchConfig::default()
    };
    let result = Match::new(config, SmallRng::seed_from_u64(1), MatchContext::default());
    assert!(matches!(result, Err(GameError::InvalidConfig(_))));

    let config = MatchConfig {
        roster: Vec::new(),
        ..MatchConfig::default()
    };
    assert!(config.validate().is_err());

    let config = MatchConfig {
        grid_size: usize::MAX / 2,
        ..MatchConfig::default()
    };
    assert_eq!(config.validate(), Err(GameError::InvalidConfig("grid is too large")));
    let result = Match::new(config, SmallRng::seed_from_u64(1), MatchContext::default());
    assert!(matches!(result, Err(GameError::InvalidConfig(_))));
}

#[test]
fn default_match_runs_to_completion() {
    for seed in 0..5u64 {
        let mut game = Match::new(
            MatchConfig::default(),
            SmallRng::seed_from_u64(seed),
            MatchContext::default(),
        )
        .unwrap();
        game.randomize_fleet().unwrap();
        game.start().unwrap();

        let mut rng = SmallRng::seed_from_u64(seed + 100);
        let mut steps = 0;
        while game.phase() == Phase::Active {
            steps += 1;
            assert!(steps < 1_000, "match took too many steps");
            if game.current_turn() == Side::Player {
                let untried = game.opponent_view().untried();
                let coord = untried[rng.random_range(0..untried.len())];
                game.fire(coord).unwrap();
            } else {
                game.settle();
            }
        }

        let winner = game.winner().unwrap();
        assert!(game.fleet(winner.other()).all_sunk());
        assert!(!game.fleet(winner).all_sunk());
        assert_eq!(game.stats().map(|s| s.played()), Some(1));
    }
}

#[test]
fn hunting_salvo_sees_its_own_earlier_shots() {
    let config = MatchConfig {
        grid_size: 10,
        roster: vec![
            ShipType::new("Destroyer", 2),
            ShipType::new("Dinghy", 1),
            ShipType::new("Skiff", 1),
        ],
        targeting: TargetingMode::Hunt,
        personality: Personality::Evasive,
        opponent_delay: Duration::ZERO,
        ..MatchConfig::default()
    };
    let mut game = Match::new(config, SmallRng::seed_from_u64(3), MatchContext::default()).unwrap();
    game.toggle_orientation();
    game.place_next(Coord::new(8, 9)).unwrap();
    game.place_next(Coord::new(0, 0)).unwrap();
    game.place_next(Coord::new(0, 2)).unwrap();
    game.start().unwrap();

    let empty = game.grid(Side::Opponent).untried();
    let misses: Vec<Coord> = empty
        .into_iter()
        .filter(|&c| game.grid(Side::Opponent).get(c) == Ok(CellStatus::Empty))
        .take(3)
        .collect();
    for coord in misses {
        assert_eq!(game.fire(coord).unwrap(), ShotOutcome::Miss);
    }

    let salvo = game.settle();
    assert_eq!(
        salvo,
        vec![
            (Coord::new(9, 9), ShotOutcome::Hit),
            (
                Coord::new(8, 9),
                ShotOutcome::Sunk {
                    ship: 0,
                    name: "Destroyer".to_string()
                }
            ),
            (Coord::new(9, 8), ShotOutcome::Miss),
        ]
    );
}

/// Scripted opponent that records when it is told to forget the last match.
struct ForgetfulPlayer {
    inner: ScriptedPlayer,
    was_reset: Rc<Cell<bool>>,
}

impl Player for ForgetfulPlayer {
    fn place_fleet(
        &mut self,
        rng: &mut SmallRng,
        size: usize,
        roster: &[ShipType],
    ) -> Result<(Grid, Fleet), GameError> {
        self.inner.place_fleet(rng, size, roster)
    }

    fn select_target(&mut self, rng: &mut SmallRng, view: &Grid) -> Option<Coord> {
        self.inner.select_target(rng, view)
    }

    fn reset(&mut self) {
        self.was_reset.set(true);
    }
}

#[test]
fn replay_resets_the_automated_side() {
    let was_reset = Rc::new(Cell::new(false));
    let opponent = ForgetfulPlayer {
        inner: ScriptedPlayer::new(&[]),
        was_reset: Rc::clone(&was_reset),
    };
    let game = Match::with_opponent(
        small_config(),
        SmallRng::seed_from_u64(1),
        MatchContext::default(),
        Box::new(opponent),
    )
    .unwrap();
    assert!(!was_reset.get());

    let game = game.replay().unwrap();
    assert!(was_reset.get());
    assert_eq!(game.phase(), Phase::Placement);
}
