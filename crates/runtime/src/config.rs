//! Runtime configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use combat_core::LevelRange;

/// Runtime configuration shared by the engine builder and the tick loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Wall-clock interval between combat ticks.
    pub tick_interval: Duration,
    /// Seed for a reproducible RNG stream; entropy-seeded when unset.
    pub seed: Option<u64>,
    /// TOML file overriding the embedded combat tables.
    pub tables_path: Option<PathBuf>,
    /// Largest level gap allowed between player opponents.
    pub pvp_range: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(2_000),
            seed: None,
            tables_path: None,
            pvp_range: LevelRange::default().max_gap,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_TICK_MS` - Tick interval in milliseconds (default: 2000, minimum 10)
    /// - `COMBAT_SEED` - RNG seed
    /// - `COMBAT_TABLES` - Path to a combat tables TOML file
    /// - `COMBAT_PVP_RANGE` - Maximum player-vs-player level gap (default: 5)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("COMBAT_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(10));
        }
        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.seed = Some(seed);
        }
        if let Some(path) = env::var_os("COMBAT_TABLES").filter(|p| !p.is_empty()) {
            config.tables_path = Some(PathBuf::from(path));
        }
        if let Some(range) = read_env::<u32>("COMBAT_PVP_RANGE") {
            config.pvp_range = range;
        }

        config
    }

    pub fn pvp_policy(&self) -> LevelRange {
        LevelRange::new(self.pvp_range)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
