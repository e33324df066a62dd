use battleship_salvo::{
    init_logging, AiPlayer, EventLog, GameEvent, Match, MatchConfig, MatchContext,
    MemoryStatsStore, Phase, Player, Side,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Automated match: a second `AiPlayer` drives the player side through the
/// fogged opponent view, with every deferred salvo resolved immediately.
fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut player_rng = SmallRng::seed_from_u64(seed1);
    let log = EventLog::new();
    let context = MatchContext::new(
        Box::new(log.clone()),
        Box::new(MemoryStatsStore::new()),
        "sim",
    );
    let mut game = Match::new(MatchConfig::default(), SmallRng::seed_from_u64(seed2), context)?;
    let mut driver = AiPlayer::default();

    game.randomize_fleet()?;
    game.start()?;
    while game.phase() == Phase::Active {
        if game.current_turn() == Side::Player {
            let view = game.opponent_view();
            let coord = driver
                .select_target(&mut player_rng, &view)
                .ok_or_else(|| anyhow::anyhow!("no untried cells left"))?;
            let outcome = game.fire(coord)?;
            driver.handle_shot_result(coord, &outcome);
        } else if game.run_deferred().is_none() {
            anyhow::bail!("opponent turn with no salvo scheduled");
        }
    }

    let sunk = |side: Side| {
        log.events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ShipSunk { side: s, .. } if *s == side))
            .count()
    };
    let state = game.state();
    let winner = match game.winner() {
        Some(Side::Player) => Some("player1"),
        Some(Side::Opponent) => Some("player2"),
        None => None,
    };
    let result = json!({
        "player1": {"shots": state.shots_fired(Side::Player), "ships_sunk": sunk(Side::Player)},
        "player2": {"shots": state.shots_fired(Side::Opponent), "ships_sunk": sunk(Side::Opponent)},
        "turns": state.turns(),
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
