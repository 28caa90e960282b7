#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Walkability grid, reachability index and path search for Masacre levels.
//!
//! A [`Map`] is built once per level from a [`WalkabilitySource`]. Building
//! samples the source into a [`Grid`], picks the canonical start cell, and
//! flood fills the cells reachable from it. Afterwards the map is read-only and
//! can be shared by reference between every agent that needs path queries.

use glam::Vec2;
use masacre_core::{GridCoord, Heuristic, WalkabilitySource, DEFAULT_CELL_PITCH};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

mod grid;
mod mask;
mod path_finder;
mod quantizer;
mod reachability;

pub use grid::{CellState, Grid};
pub use mask::{AsciiMask, MaskError};
pub use path_finder::{Path, PathFinder, SearchStats, RANDOM_SPOT_MAX_ATTEMPTS};
pub use quantizer::Unreachable;

/// Configuration-fatal problems detected while preparing a level.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MapError {
    /// The cell pitch is not a positive finite number.
    #[error("cell pitch must be positive and finite, got {cell_pitch}")]
    InvalidCellPitch {
        /// Rejected pitch.
        cell_pitch: f32,
    },
    /// The source is smaller than a single cell.
    #[error("walkability source does not cover a single cell")]
    EmptyGrid,
    /// The grid would exceed the fixed cell capacity.
    #[error("map too large: {columns}x{rows} cells exceeds the limit of {max}")]
    GridTooLarge {
        /// Requested column count.
        columns: u64,
        /// Requested row count.
        rows: u64,
        /// Maximum number of cells.
        max: usize,
    },
    /// No accessible cell could seed the reachability flood fill.
    #[error("no accessible canonical start cell")]
    NoCanonicalStart,
    /// Random placement exhausted its attempt budget.
    #[error("no discoverable random spot found after {attempts} attempts")]
    NoDiscoverableSpot {
        /// Number of cells sampled.
        attempts: usize,
    },
}

/// Parameters that shape the grid built for a level.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// World-space size of one grid cell.
    pub cell_pitch: f32,
    /// Distance estimate used by every search on the map.
    pub heuristic: Heuristic,
}

impl MapConfig {
    /// Creates a configuration with the provided pitch and heuristic.
    #[must_use]
    pub const fn new(cell_pitch: f32, heuristic: Heuristic) -> Self {
        Self {
            cell_pitch,
            heuristic,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_PITCH, Heuristic::Euclidean)
    }
}

/// Level host owning the walkability grid and its path search engine.
#[derive(Clone, Debug)]
pub struct Map {
    path_finder: PathFinder,
    cell_pitch: f32,
    extent: (u32, u32),
}

impl Map {
    /// Builds the grid, picks the canonical start and computes reachability.
    pub fn build<S>(source: &S, config: MapConfig) -> Result<Self, MapError>
    where
        S: WalkabilitySource + ?Sized,
    {
        let grid = Grid::build(source, config.cell_pitch)?;
        let start = grid.canonical_start()?;
        Self::from_grid(grid, source.extent(), config, start)
    }

    /// Builds the grid and seeds reachability from an explicit start cell.
    pub fn build_with_start<S>(
        source: &S,
        config: MapConfig,
        start: GridCoord,
    ) -> Result<Self, MapError>
    where
        S: WalkabilitySource + ?Sized,
    {
        let grid = Grid::build(source, config.cell_pitch)?;
        Self::from_grid(grid, source.extent(), config, start)
    }

    fn from_grid(
        mut grid: Grid,
        extent: (u32, u32),
        config: MapConfig,
        start: GridCoord,
    ) -> Result<Self, MapError> {
        if !grid.is_accessible(start) {
            return Err(MapError::NoCanonicalStart);
        }

        let discovered = reachability::flood_fill(&mut grid, start);
        tracing::debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            discovered,
            start_x = start.x(),
            start_y = start.y(),
            "reachability computed"
        );

        Ok(Self {
            path_finder: PathFinder::new(grid, config.heuristic, start),
            cell_pitch: config.cell_pitch,
            extent,
        })
    }

    /// Path search engine bound to this map.
    #[must_use]
    pub fn path_finder(&self) -> &PathFinder {
        &self.path_finder
    }

    /// Walkability grid of the level.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.path_finder.grid()
    }

    /// World-space size of one grid cell.
    #[must_use]
    pub const fn cell_pitch(&self) -> f32 {
        self.cell_pitch
    }

    /// Width and height of the source the map was sampled from, in world units.
    #[must_use]
    pub const fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// World-space position of a cell.
    #[must_use]
    pub fn cell_to_world(&self, cell: GridCoord) -> Vec2 {
        cell.to_world(self.cell_pitch)
    }

    /// World-space position where the player enters the level.
    #[must_use]
    pub fn player_spawn(&self) -> Vec2 {
        self.cell_to_world(self.path_finder.canonical_start())
    }

    /// Snaps a world-space point to the closest discoverable cell around it.
    pub fn nearest_reachable_cell(&self, point: Vec2) -> Result<GridCoord, Unreachable> {
        quantizer::nearest_reachable_cell(self.grid(), point, self.cell_pitch)
    }

    /// Shortest path between two world-space points, goal first.
    ///
    /// Both endpoints are snapped with [`Map::nearest_reachable_cell`]; a point
    /// without a discoverable cell nearby rejects the query.
    #[must_use]
    pub fn find_path(&self, start: Vec2, end: Vec2) -> Path {
        let (Ok(start_cell), Ok(end_cell)) = (
            self.nearest_reachable_cell(start),
            self.nearest_reachable_cell(end),
        ) else {
            return Path::empty();
        };
        self.path_finder.find_path(start_cell, end_cell)
    }

    /// Shortest path between two cells, goal first.
    #[must_use]
    pub fn find_cell_path(&self, start: GridCoord, end: GridCoord) -> Path {
        self.path_finder.find_path(start, end)
    }

    /// World-space waypoints of a path in start to goal order.
    #[must_use]
    pub fn waypoints(&self, path: &Path) -> Vec<Vec2> {
        path.iter_from_start()
            .map(|cell| self.cell_to_world(cell))
            .collect()
    }

    /// World-space position of a random discoverable cell.
    pub fn discoverable_random_spot<R: Rng>(&self, rng: &mut R) -> Result<Vec2, MapError> {
        self.path_finder
            .discoverable_random_spot(rng)
            .map(|cell| self.cell_to_world(cell))
    }
}
