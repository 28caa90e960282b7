//! TOML settings for the headless harness.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use masacre_core::Heuristic;
use masacre_system_congestion as congestion;
use masacre_system_navigator as navigator;
use masacre_system_spawning as spawning;
use masacre_world::MapConfig;
use serde::Deserialize;

/// Every section of a settings file. Missing sections and keys fall back to
/// the defaults of the corresponding system.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Grid construction parameters.
    pub map: MapSettings,
    /// Agent steering parameters.
    pub navigator: navigator::Config,
    /// Pairwise yielding thresholds.
    pub congestion: congestion::Config,
    /// Spawn cadence and placement seed.
    pub spawning: SpawningSettings,
    /// Tick loop parameters.
    pub simulation: SimulationSettings,
}

impl Settings {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }
}

/// `[map]` section.
///
/// The cell pitch may be left out, in which case the level decides it: text
/// masks measure one world unit per character, bitmaps one per pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapSettings {
    /// World units per grid cell.
    pub cell_pitch: Option<f32>,
    /// Distance estimate for path queries.
    pub heuristic: Heuristic,
}

impl MapSettings {
    /// Resolves the section against the pitch a level falls back to.
    #[must_use]
    pub fn to_config(&self, level_pitch: f32) -> MapConfig {
        MapConfig::new(self.cell_pitch.unwrap_or(level_pitch), self.heuristic)
    }
}

/// `[spawning]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawningSettings {
    /// Milliseconds between two spawns.
    pub interval_ms: u64,
    /// Upper bound on live agents.
    pub max_agents: usize,
    /// Seed of the placement random number generator.
    pub rng_seed: u64,
}

impl SpawningSettings {
    /// Converts the section into the spawning system configuration.
    #[must_use]
    pub fn to_config(&self) -> spawning::Config {
        spawning::Config::new(
            Duration::from_millis(self.interval_ms),
            self.max_agents,
            self.rng_seed,
        )
    }
}

impl Default for SpawningSettings {
    fn default() -> Self {
        let config = spawning::Config::default();
        Self {
            interval_ms: u64::try_from(config.spawn_interval().as_millis()).unwrap_or(u64::MAX),
            max_agents: config.max_agents(),
            rng_seed: config.rng_seed(),
        }
    }
}

/// `[simulation]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Level file, either a PNG bitmap or a `.txt` mask.
    pub level: Option<PathBuf>,
    /// Number of ticks to simulate.
    pub ticks: u32,
    /// Simulated frame time in milliseconds.
    pub frame_ms: u64,
    /// Number of pickups placed when the level starts.
    pub pickups: usize,
}

impl SimulationSettings {
    /// Simulated frame time.
    #[must_use]
    pub const fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            level: None,
            ticks: 600,
            frame_ms: 16,
            pickups: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse("").expect("empty settings parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.spawning.to_config(), spawning::Config::default());
    }

    #[test]
    fn sections_override_individual_keys() {
        let settings = Settings::parse(
            r#"
            [map]
            cell_pitch = 16.0
            heuristic = "taxicab"

            [navigator]
            speed = 120.0

            [spawning]
            interval_ms = 250
            rng_seed = 9

            [simulation]
            level = "levels/arena.txt"
            ticks = 30
            "#,
        )
        .expect("settings parse");

        assert_eq!(
            settings.map.to_config(1.0),
            MapConfig::new(16.0, Heuristic::Taxicab)
        );
        assert_eq!(settings.navigator.speed(), 120.0);
        assert_eq!(
            settings.navigator.min_chase_distance(),
            navigator::DEFAULT_MIN_CHASE_DISTANCE
        );
        assert_eq!(settings.spawning.interval_ms, 250);
        assert_eq!(settings.spawning.rng_seed, 9);
        assert_eq!(
            settings.simulation.level,
            Some(PathBuf::from("levels/arena.txt"))
        );
        assert_eq!(settings.simulation.ticks, 30);
        assert_eq!(settings.simulation.frame(), Duration::from_millis(16));
    }

    #[test]
    fn missing_cell_pitch_defers_to_the_level() {
        let settings = Settings::parse("[map]\nheuristic = \"taxicab\"").expect("settings parse");

        assert_eq!(settings.map.cell_pitch, None);
        assert_eq!(
            settings.map.to_config(1.0),
            MapConfig::new(1.0, Heuristic::Taxicab)
        );
        assert_eq!(
            Settings::default().map.to_config(1.0),
            MapConfig::new(1.0, Heuristic::Euclidean)
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("[congestion]\ntoo_close = 3.0").is_err());
        assert!(Settings::parse("[weather]\nrain = true").is_err());
    }
}
