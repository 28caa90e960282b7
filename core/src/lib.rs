#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Masacre path-finding engine.
//!
//! This crate defines the vocabulary that connects the map host, the pure
//! systems that steer agents, and the adapters that feed them. The map crate
//! owns the walkability grid and answers path queries in [`GridCoord`] space,
//! while the systems mutate [`Agent`] values in continuous world space. The two
//! spaces are related by a fixed cell pitch: `world = grid * pitch` and
//! `grid = round(world / pitch)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default world-space size of one grid cell.
pub const DEFAULT_CELL_PITCH: f32 = 32.0;

/// Upper bound on the number of cells a walkability grid may hold.
///
/// Search cost is bounded by the cell count, so level loading refuses maps
/// that would exceed it instead of letting per-tick query time grow.
pub const MAX_GRID_CELLS: usize = 10_000;

/// Location of a single grid cell expressed as signed column and row indices.
///
/// Coordinates are signed so that quantizing points left of or above the map
/// origin yields an out-of-bounds cell instead of wrapping around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the straight-line distance between two cell coordinates.
    #[must_use]
    pub fn euclidean_distance(self, other: GridCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx.hypot(dy)
    }

    /// Reports whether `other` is one of the eight cells surrounding `self`.
    #[must_use]
    pub fn is_adjacent(self, other: GridCoord) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }

    /// World-space position of the cell origin for the given cell pitch.
    #[must_use]
    pub fn to_world(self, cell_pitch: f32) -> Vec2 {
        Vec2::new(self.x as f32 * cell_pitch, self.y as f32 * cell_pitch)
    }

    /// Rounds a world-space point to the cell it lies closest to.
    #[must_use]
    pub fn from_world(point: Vec2, cell_pitch: f32) -> Self {
        Self::new(
            (point.x / cell_pitch).round() as i32,
            (point.y / cell_pitch).round() as i32,
        )
    }
}

/// Distance estimate used to order the search frontier.
///
/// A single strategy is selected per map; searches never mix the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Straight-line distance. Admissible and tighter for 8-connected movement.
    #[default]
    Euclidean,
    /// Taxicab distance. Admissible only for 4-connected movement.
    Taxicab,
}

impl Heuristic {
    /// Estimates the travel cost between two cells.
    #[must_use]
    pub fn distance(self, from: GridCoord, to: GridCoord) -> f32 {
        match self {
            Self::Euclidean => from.euclidean_distance(to),
            Self::Taxicab => from.manhattan_distance(to) as f32,
        }
    }
}

/// Rasterised source of wall information consulted once while building a grid.
pub trait WalkabilitySource {
    /// Width and height of the source measured in world units.
    fn extent(&self) -> (u32, u32);

    /// Reports whether the world-space point lies on a wall.
    fn is_blocked(&self, point: Vec2) -> bool;
}

impl<T: WalkabilitySource + ?Sized> WalkabilitySource for &T {
    fn extent(&self) -> (u32, u32) {
        (**self).extent()
    }

    fn is_blocked(&self, point: Vec2) -> bool {
        (**self).is_blocked(point)
    }
}

/// Unique identifier assigned to an agent, allocated in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Autonomous pursuer steered by the navigator and throttled by congestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Identifier used for deterministic tie-breaking.
    pub id: AgentId,
    /// Current world-space position.
    pub position: Vec2,
    /// Waypoint the agent is currently walking toward.
    pub move_target: Vec2,
    /// Multiplicative speed factor recomputed every frame.
    pub slowdown: f32,
    /// Facing in degrees, derived from the last displacement.
    pub angle: f32,
    alive: bool,
}

impl Agent {
    /// Creates a live agent standing on its own waypoint.
    #[must_use]
    pub fn new(id: AgentId, position: Vec2) -> Self {
        Self {
            id,
            position,
            move_target: position,
            slowdown: 1.0,
            angle: 0.0,
            alive: true,
        }
    }

    /// Reports whether the agent still participates in the simulation.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the agent as dead so systems skip it until it is reaped.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}
