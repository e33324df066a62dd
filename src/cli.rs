//! Terminal collaborator: coordinate parsing, board rendering and an
//! observer that prints the battle log.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use crate::common::{Coord, ShotOutcome, Side};
use crate::events::{Achievement, GameEvent, Observer};
use crate::game::Match;
use crate::grid::{CellStatus, Grid};

/// Largest grid the letter-based column labels can address.
pub const MAX_CLI_GRID: usize = 26;

/// Format a coordinate as column letter plus one-based row, e.g. `A5`.
pub fn coord_to_string(coord: Coord) -> String {
    let col = (b'A' + coord.col as u8) as char;
    format!("{}{}", col, coord.row + 1)
}

/// Parse `A5`-style input for a grid of side `size`.
pub fn parse_coord(input: &str, size: usize) -> Result<Coord, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    let last_col = (b'A' + size.min(MAX_CLI_GRID).saturating_sub(1) as u8) as char;
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let col = (col_ch as u8).wrapping_sub(b'A') as usize;
    if col >= size {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, size))?;
    if row == 0 || row > size {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, size));
    }
    Ok(Coord::new(row - 1, col))
}

/// Render a grid with column letters and row numbers. Ship cells are only
/// drawn when `reveal` is set.
pub fn render_grid(grid: &Grid, reveal: bool) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for c in 0..grid.size() {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
    for r in 0..grid.size() {
        let _ = write!(out, " {:2} ", r + 1);
        for c in 0..grid.size() {
            let ch = match grid.get(Coord::new(r, c)) {
                Ok(CellStatus::Hit) => 'X',
                Ok(CellStatus::Miss) => 'o',
                Ok(CellStatus::Ship) if reveal => 'S',
                _ => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// Opponent board (fogged) above the player's own board.
pub fn render_player_view(game: &Match) -> String {
    let mut out = String::from("Opponent waters:\n");
    out.push_str(&render_grid(&game.opponent_view(), false));
    out.push_str("\nYour fleet:\n");
    out.push_str(&render_grid(game.grid(Side::Player), true));
    out.push_str("    Legend: S=Ship  X=Hit  o=Miss  .=Water\n");
    out
}

/// One battle-log line for an event.
pub fn describe_event(event: &GameEvent) -> String {
    match event {
        GameEvent::TurnStarted { side: Side::Player, shots } => {
            format!("Your turn: {} shot(s) this salvo.", shots)
        }
        GameEvent::TurnStarted { side: Side::Opponent, shots } => {
            format!("Enemy turn: {} shot(s) incoming.", shots)
        }
        GameEvent::ShotResolved { side, coord, outcome } => {
            let at = coord_to_string(*coord);
            match (side, outcome) {
                (Side::Player, ShotOutcome::Miss) => format!("Your shot at {} hit only water.", at),
                (Side::Player, _) => format!("HIT! Your shot at {} struck an enemy ship!", at),
                (Side::Opponent, ShotOutcome::Miss) => format!("Enemy missed at {}.", at),
                (Side::Opponent, _) => format!("ENEMY HIT! They struck your ship at {}.", at),
            }
        }
        GameEvent::ShipSunk { side: Side::Player, ship, .. } => {
            format!("SUNK! You destroyed the enemy's {}!", ship)
        }
        GameEvent::ShipSunk { side: Side::Opponent, coord, ship } => {
            format!("SHIP LOST! Enemy destroyed your {} at {}.", ship, coord_to_string(*coord))
        }
        GameEvent::MatchEnded { winner: Side::Player } => {
            "Mission accomplished! The enemy fleet is destroyed.".to_string()
        }
        GameEvent::MatchEnded { winner: Side::Opponent } => {
            "Your fleet has been destroyed. Mission failed.".to_string()
        }
        GameEvent::AchievementEarned { achievement, .. } => match achievement {
            Achievement::DirectHit => "★ Direct Hit!".to_string(),
            Achievement::FlawlessVictory => "★ Flawless Victory".to_string(),
        },
    }
}

/// Observer printing each event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalObserver;

impl Observer for TerminalObserver {
    fn on_event(&mut self, event: &GameEvent) {
        println!("  {}", describe_event(event));
    }
}

/// Print `message` and read one trimmed line. `None` on end of input.
pub fn prompt(message: &str) -> anyhow::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
