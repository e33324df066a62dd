use std::path::PathBuf;

use battleship_salvo::cli::{
    coord_to_string, parse_coord, prompt, render_player_view, TerminalObserver, MAX_CLI_GRID,
};
use battleship_salvo::{
    init_logging, team_key, FileStatsStore, GameError, Match, MatchConfig, MatchContext,
    MemoryStatsStore, Orientation, Personality, Phase, Side, StatsStore, TargetingMode,
    TurnPolicy, DEFAULT_GRID_SIZE,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Targeting {
    Random,
    Hunt,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Flavor {
    Standard,
    Aggressive,
    Evasive,
    Calculated,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Policy {
    Single,
    Salvo,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer on this terminal.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid_size: usize,
        #[arg(long, value_enum, default_value_t = Targeting::Hunt)]
        targeting: Targeting,
        #[arg(long, value_enum, default_value_t = Flavor::Standard)]
        personality: Flavor,
        #[arg(long, value_enum, default_value_t = Policy::Salvo)]
        policy: Policy,
        #[arg(long, default_value_t = 500, help = "Pause before the enemy salvo, in milliseconds")]
        delay_ms: u64,
        #[arg(long, help = "Place your fleet at random instead of by hand")]
        random_fleet: bool,
        #[arg(long, help = "Persist win/loss statistics to this file")]
        stats_file: Option<PathBuf>,
        #[arg(long, default_value = "player")]
        name: String,
        #[arg(long, default_value = "ai")]
        opponent_name: String,
    },
    /// Show stored statistics.
    Stats {
        #[arg(long)]
        stats_file: PathBuf,
        #[arg(long, default_value = "player")]
        name: String,
        #[arg(long, default_value = "ai")]
        opponent_name: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            grid_size,
            targeting,
            personality,
            policy,
            delay_ms,
            random_fleet,
            stats_file,
            name,
            opponent_name,
        } => {
            if grid_size > MAX_CLI_GRID {
                anyhow::bail!("grid size {} exceeds the terminal limit of {}", grid_size, MAX_CLI_GRID);
            }
            let config = MatchConfig {
                grid_size,
                targeting: match targeting {
                    Targeting::Random => TargetingMode::Random,
                    Targeting::Hunt => TargetingMode::Hunt,
                },
                personality: match personality {
                    Flavor::Standard => Personality::Standard,
                    Flavor::Aggressive => Personality::Aggressive,
                    Flavor::Evasive => Personality::Evasive,
                    Flavor::Calculated => Personality::Calculated,
                },
                turn_policy: match policy {
                    Policy::Single => TurnPolicy::SingleShot,
                    Policy::Salvo => TurnPolicy::Salvo,
                },
                opponent_delay: std::time::Duration::from_millis(delay_ms),
                ..MatchConfig::default()
            };
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => {
                    let mut seed_rng = rand::rng();
                    SmallRng::from_rng(&mut seed_rng)
                }
            };
            let stats: Box<dyn StatsStore> = match stats_file {
                Some(path) => Box::new(FileStatsStore::new(path)),
                None => Box::new(MemoryStatsStore::new()),
            };
            let context = MatchContext::new(
                Box::new(TerminalObserver),
                stats,
                team_key(&name, &opponent_name),
            );
            let mut game = Match::new(config, rng, context)?;
            loop {
                if random_fleet {
                    game.randomize_fleet()?;
                } else if !place_fleet(&mut game)? {
                    return Ok(());
                }
                game.start()?;
                if let Some(stats) = game.stats() {
                    println!("Record so far: {} win(s), {} loss(es)", stats.wins, stats.losses);
                }
                if !battle(&mut game).await? {
                    return Ok(());
                }
                println!("{}", render_player_view(&game));
                if let Some(stats) = game.stats() {
                    println!("Record: {} win(s), {} loss(es)", stats.wins, stats.losses);
                }
                match prompt("Play again? [y/N]: ")? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => game = game.replay()?,
                    _ => break,
                }
            }
        }
        Commands::Stats {
            stats_file,
            name,
            opponent_name,
        } => {
            let key = team_key(&name, &opponent_name);
            let stats = FileStatsStore::new(stats_file).load_stats(&key)?;
            println!(
                "{}: {} played, {} win(s), {} loss(es)",
                key,
                stats.played(),
                stats.wins,
                stats.losses
            );
        }
    }
    Ok(())
}

/// Manual placement loop. Returns `false` if input ended.
fn place_fleet(game: &mut Match) -> anyhow::Result<bool> {
    println!("Place your fleet. Enter a cell like A5, 'r' to rotate, 'random' to auto-place.");
    while !game.is_fleet_complete() {
        println!("{}", render_player_view(game));
        let (name, length) = match game.next_ship() {
            Some(ship) => (ship.name().to_string(), ship.length()),
            None => break,
        };
        let orient = match game.orientation() {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        };
        let Some(line) = prompt(&format!("{} (length {}, {}): ", name, length, orient))? else {
            return Ok(false);
        };
        if line.eq_ignore_ascii_case("r") {
            game.toggle_orientation();
            continue;
        }
        if line.eq_ignore_ascii_case("random") {
            game.randomize_fleet()?;
            break;
        }
        let coord = match parse_coord(&line, game.config().grid_size) {
            Ok(c) => c,
            Err(e) => {
                println!("✗ {}", e);
                continue;
            }
        };
        match game.place_next(coord) {
            Ok(_) => println!("✓ {} placed at {}", name, coord_to_string(coord)),
            Err(GameError::InvalidPlacement) => {
                println!("✗ {} does not fit there or overlaps another ship", name)
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Alternate turns until the match ends. Returns `false` if input ended.
async fn battle(game: &mut Match) -> anyhow::Result<bool> {
    while game.phase() == Phase::Active {
        if game.current_turn() == Side::Player {
            println!("{}", render_player_view(game));
            let message = format!("Fire ({} shot(s) left): ", game.shots_remaining());
            let Some(line) = prompt(&message)? else {
                return Ok(false);
            };
            let coord = match parse_coord(&line, game.config().grid_size) {
                Ok(c) => c,
                Err(e) => {
                    println!("✗ {}", e);
                    continue;
                }
            };
            match game.fire(coord) {
                Ok(_) => {}
                Err(GameError::AlreadyAttacked) => {
                    println!("✗ {} was already attacked, pick another target", coord_to_string(coord))
                }
                Err(e) => return Err(e.into()),
            }
        } else if let Some(delay) = game.next_deferred() {
            tokio::time::sleep(delay).await;
            game.run_deferred();
        } else {
            break;
        }
    }
    Ok(true)
}
