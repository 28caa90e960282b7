//! Informed best-first search over the walkability grid.

use std::{cmp::Ordering, collections::BinaryHeap};

use masacre_core::{GridCoord, Heuristic};
use rand::Rng;

use crate::{
    grid::{Grid, NEIGHBOR_OFFSETS},
    MapError,
};

/// Number of cells sampled before random placement gives up.
pub const RANDOM_SPOT_MAX_ATTEMPTS: usize = 32;

/// Ordered cells of a search result, stored from goal back to start.
///
/// An empty path signals a rejected query or an unreachable goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<GridCoord>,
}

impl Path {
    /// Path that carries no cells.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Whether the query produced no path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Cells in goal to start order.
    #[must_use]
    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    /// Cell the search was asked to reach.
    #[must_use]
    pub fn goal(&self) -> Option<GridCoord> {
        self.cells.first().copied()
    }

    /// Cell the search started from.
    #[must_use]
    pub fn start(&self) -> Option<GridCoord> {
        self.cells.last().copied()
    }

    /// First cell to walk to when leaving the start, if the path has one.
    #[must_use]
    pub fn next_step(&self) -> Option<GridCoord> {
        let len = self.cells.len();
        if len > 1 {
            Some(self.cells[len - 2])
        } else {
            None
        }
    }

    /// Cells in start to goal order.
    pub fn iter_from_start(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().rev().copied()
    }

    /// Sum of the per-step heuristic costs along the path.
    #[must_use]
    pub fn cost(&self, heuristic: Heuristic) -> f32 {
        self.cells
            .windows(2)
            .map(|pair| heuristic.distance(pair[0], pair[1]))
            .sum()
    }
}

/// Counters collected while a single search runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier and expanded.
    pub expanded: usize,
    /// Nodes pushed onto the frontier, including the start.
    pub pushed: usize,
}

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cost_so_far: f32,
    estimate: f32,
    coord: GridCoord,
}

impl SearchNode {
    fn total(&self) -> f32 {
        self.cost_so_far + self.estimate
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    // Reversed so the max-heap pops the lowest total first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total()
            .total_cmp(&self.total())
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

/// Per-search bookkeeping: whether a cell was reached and through which offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Start,
    ReachedVia(u8),
}

/// Path search engine bound to an immutable grid.
#[derive(Clone, Debug)]
pub struct PathFinder {
    grid: Grid,
    heuristic: Heuristic,
    canonical_start: GridCoord,
}

impl PathFinder {
    pub(crate) fn new(grid: Grid, heuristic: Heuristic, canonical_start: GridCoord) -> Self {
        Self {
            grid,
            heuristic,
            canonical_start,
        }
    }

    /// Grid the engine searches over.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Distance estimate used to order the frontier.
    #[must_use]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Seed cell of the reachability flood fill.
    #[must_use]
    pub fn canonical_start(&self) -> GridCoord {
        self.canonical_start
    }

    /// Shortest path between two cells, goal first. Empty when rejected.
    #[must_use]
    pub fn find_path(&self, start: GridCoord, end: GridCoord) -> Path {
        self.find_path_with_stats(start, end).0
    }

    /// Same as [`PathFinder::find_path`], also reporting search counters.
    #[must_use]
    pub fn find_path_with_stats(&self, start: GridCoord, end: GridCoord) -> (Path, SearchStats) {
        let mut stats = SearchStats::default();
        if !self.accepts_endpoint("start", start) || !self.accepts_endpoint("end", end) {
            return (Path::empty(), stats);
        }

        let mut marks = vec![Mark::Unvisited; self.grid.cell_count()];
        let mut queue = BinaryHeap::new();
        queue.push(SearchNode {
            cost_so_far: 0.0,
            estimate: self.heuristic.distance(start, end),
            coord: start,
        });
        stats.pushed += 1;
        self.set_mark(&mut marks, start, Mark::Start);

        while let Some(current) = queue.pop() {
            stats.expanded += 1;
            tracing::trace!(
                x = current.coord.x(),
                y = current.coord.y(),
                g = current.cost_so_far,
                h = current.estimate,
                "expanding cell"
            );

            if current.coord == end {
                return (self.backtrack(&marks, start, end), stats);
            }

            for (direction, neighbor) in self.grid.accessible_neighbors(current.coord) {
                if self.mark(&marks, neighbor) != Mark::Unvisited {
                    continue;
                }

                queue.push(SearchNode {
                    cost_so_far: current.cost_so_far
                        + self.heuristic.distance(current.coord, neighbor),
                    estimate: self.heuristic.distance(neighbor, end),
                    coord: neighbor,
                });
                stats.pushed += 1;
                self.set_mark(&mut marks, neighbor, Mark::ReachedVia(direction));
            }
        }

        tracing::warn!(
            start_x = start.x(),
            start_y = start.y(),
            end_x = end.x(),
            end_y = end.y(),
            "open set exhausted without reaching goal"
        );
        (Path::empty(), stats)
    }

    /// Samples random cells until one is discoverable.
    pub fn discoverable_random_spot<R: Rng>(&self, rng: &mut R) -> Result<GridCoord, MapError> {
        for _ in 0..RANDOM_SPOT_MAX_ATTEMPTS {
            let candidate = GridCoord::new(
                rng.gen_range(0..self.grid.columns()),
                rng.gen_range(0..self.grid.rows()),
            );
            if self.grid.is_discoverable(candidate) {
                return Ok(candidate);
            }
        }

        tracing::error!(
            attempts = RANDOM_SPOT_MAX_ATTEMPTS,
            "no discoverable random spot found"
        );
        Err(MapError::NoDiscoverableSpot {
            attempts: RANDOM_SPOT_MAX_ATTEMPTS,
        })
    }

    fn accepts_endpoint(&self, role: &'static str, cell: GridCoord) -> bool {
        let rejection = if !self.grid.contains(cell) {
            "out of bounds"
        } else if !self.grid.is_accessible(cell) {
            "not accessible"
        } else if !self.grid.is_discoverable(cell) {
            "not discoverable"
        } else {
            return true;
        };

        tracing::warn!(role, x = cell.x(), y = cell.y(), rejection, "path query rejected");
        false
    }

    fn mark(&self, marks: &[Mark], cell: GridCoord) -> Mark {
        self.grid
            .index(cell)
            .map_or(Mark::Unvisited, |index| marks[index])
    }

    fn set_mark(&self, marks: &mut [Mark], cell: GridCoord, mark: Mark) {
        if let Some(index) = self.grid.index(cell) {
            marks[index] = mark;
        }
    }

    fn backtrack(&self, marks: &[Mark], start: GridCoord, end: GridCoord) -> Path {
        let mut cells = vec![end];
        let mut current = end;

        while current != start {
            let Mark::ReachedVia(direction) = self.mark(marks, current) else {
                tracing::error!(x = current.x(), y = current.y(), "broken parent chain");
                return Path::empty();
            };
            let (dx, dy) = NEIGHBOR_OFFSETS[usize::from(direction)];
            current = current.offset(-dx, -dy);
            cells.push(current);

            if cells.len() > self.grid.cell_count() {
                tracing::error!("parent chain longer than the grid");
                return Path::empty();
            }
        }

        Path { cells }
    }
}
