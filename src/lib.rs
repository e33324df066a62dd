#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ai;
mod attack;
mod common;
mod config;
pub mod events;
mod fleet;
mod game;
mod grid;
mod player;
pub mod scheduler;
mod ship;
pub mod stats;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;

pub use ai::*;
pub use attack::resolve_shot;
pub use common::*;
pub use config::*;
pub use events::{Achievement, EventLog, GameEvent, NullObserver, Observer};
pub use fleet::*;
pub use game::*;
pub use grid::*;
pub use player::*;
pub use ship::*;
pub use stats::{team_key, MatchResult, MemoryStatsStore, Stats, StatsStore};
#[cfg(feature = "std")]
pub use stats::FileStatsStore;
#[cfg(feature = "std")]
pub use logging::init_logging;
