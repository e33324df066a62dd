//! Win/loss statistics and the stores that keep them.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

/// Outcome of a finished match from the player side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchResult {
    Win,
    Loss,
}

/// Accumulated results for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
}

impl Stats {
    pub fn record(&mut self, result: MatchResult) {
        match result {
            MatchResult::Win => self.wins = self.wins.saturating_add(1),
            MatchResult::Loss => self.losses = self.losses.saturating_add(1),
        }
    }

    pub fn played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

/// Key for a pair of players sharing one record.
pub fn team_key(first: &str, second: &str) -> String {
    format!("{}_{}", first, second)
}

/// Opaque key-value store for statistics. Unknown keys load as zero.
pub trait StatsStore {
    fn load_stats(&self, key: &str) -> anyhow::Result<Stats>;
    fn save_stats(&mut self, key: &str, result: MatchResult) -> anyhow::Result<()>;
}

/// Store kept only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    entries: BTreeMap<String, Stats>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load_stats(&self, key: &str) -> anyhow::Result<Stats> {
        Ok(self.entries.get(key).copied().unwrap_or_default())
    }

    fn save_stats(&mut self, key: &str, result: MatchResult) -> anyhow::Result<()> {
        self.entries.entry(key.to_string()).or_default().record(result);
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use file::FileStatsStore;

#[cfg(feature = "std")]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use anyhow::Context;

    use super::{MatchResult, Stats, StatsStore};

    /// Store persisting every key in one bincode file. The file is re-read
    /// on each call so several processes can share it between matches.
    #[derive(Debug, Clone)]
    pub struct FileStatsStore {
        path: PathBuf,
    }

    impl FileStatsStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> anyhow::Result<BTreeMap<String, Stats>> {
            match fs::read(&self.path) {
                Ok(bytes) => bincode::deserialize(&bytes)
                    .with_context(|| format!("corrupt stats file {}", self.path.display())),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e)
                    .with_context(|| format!("failed to read {}", self.path.display())),
            }
        }
    }

    impl StatsStore for FileStatsStore {
        fn load_stats(&self, key: &str) -> anyhow::Result<Stats> {
            Ok(self.read_all()?.get(key).copied().unwrap_or_default())
        }

        fn save_stats(&mut self, key: &str, result: MatchResult) -> anyhow::Result<()> {
            let mut all = self.read_all()?;
            all.entry(key.to_string()).or_default().record(result);
            let bytes = bincode::serialize(&all)?;
            let mut tmp = self.path.clone().into_os_string();
            tmp.push(".tmp");
            let tmp = PathBuf::from(tmp);
            fs::write(&tmp, bytes)
                .with_context(|| format!("failed to write {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .with_context(|| format!("failed to replace {}", self.path.display()))?;
            Ok(())
        }
    }
}
