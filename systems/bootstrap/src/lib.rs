#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Masacre level.

use std::fmt;

use glam::Vec2;
use masacre_core::{GridCoord, WalkabilitySource};
use masacre_world::{Map, MapConfig, MapError};

/// Diagnostic counts describing a freshly loaded level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// Number of grid columns.
    pub columns: i32,
    /// Number of grid rows.
    pub rows: i32,
    /// Cells not classified as walls.
    pub accessible: usize,
    /// Cells reachable from the canonical start.
    pub discoverable: usize,
    /// Seed cell of the reachability flood fill.
    pub canonical_start: GridCoord,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid, {} accessible, {} discoverable, start ({}, {})",
            self.columns,
            self.rows,
            self.accessible,
            self.discoverable,
            self.canonical_start.x(),
            self.canonical_start.y()
        )
    }
}

/// Produces the data required to start playing a level.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Builds the grid and reachability index for a level.
    pub fn load_level<S>(&self, source: &S, config: MapConfig) -> Result<Map, MapError>
    where
        S: WalkabilitySource + ?Sized,
    {
        let map = Map::build(source, config)?;
        let summary = self.summary(&map);
        tracing::info!(
            columns = summary.columns,
            rows = summary.rows,
            accessible = summary.accessible,
            discoverable = summary.discoverable,
            start_x = summary.canonical_start.x(),
            start_y = summary.canonical_start.y(),
            "level loaded"
        );
        Ok(map)
    }

    /// Exposes the position where the player enters the level.
    #[must_use]
    pub fn player_spawn(&self, map: &Map) -> Vec2 {
        map.player_spawn()
    }

    /// Collects grid statistics for diagnostics.
    #[must_use]
    pub fn summary(&self, map: &Map) -> LevelSummary {
        let grid = map.grid();
        LevelSummary {
            columns: grid.columns(),
            rows: grid.rows(),
            accessible: grid.accessible_count(),
            discoverable: grid.discoverable_count(),
            canonical_start: map.path_finder().canonical_start(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masacre_core::Heuristic;
    use masacre_world::AsciiMask;

    #[test]
    fn load_level_reports_reachability() {
        let mask = AsciiMask::parse(
            "
            .......
            ####...
            #.##...
            ####...
            .......
            ",
        )
        .expect("mask parses");
        let bootstrap = Bootstrap;
        let map = bootstrap
            .load_level(&mask, MapConfig::new(1.0, Heuristic::Euclidean))
            .expect("level loads");

        let summary = bootstrap.summary(&map);
        assert_eq!(summary.columns, 7);
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.accessible, 24);
        assert_eq!(summary.discoverable, 23);
        assert_eq!(summary.canonical_start, GridCoord::new(3, 4));
        assert_eq!(bootstrap.player_spawn(&map), Vec2::new(3.0, 4.0));
        assert_eq!(
            summary.to_string(),
            "7x5 grid, 24 accessible, 23 discoverable, start (3, 4)"
        );
    }

    #[test]
    fn load_level_rejects_walled_maps() {
        let mask = AsciiMask::parse("###\n###").expect("mask parses");
        let error = Bootstrap
            .load_level(&mask, MapConfig::new(1.0, Heuristic::Euclidean))
            .expect_err("no open floor");
        assert_eq!(error, MapError::NoCanonicalStart);
    }
}
