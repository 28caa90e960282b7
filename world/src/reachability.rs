//! One-time flood fill marking the cells reachable from the canonical start.

use std::collections::VecDeque;

use masacre_core::GridCoord;

use crate::grid::{Grid, NEIGHBOR_OFFSETS};

/// Breadth-first flood fill over the 8-connected neighbourhood.
///
/// Every accessible cell connected to `start` receives the discoverable bit.
/// Returns the number of cells marked; an inaccessible seed marks nothing.
pub(crate) fn flood_fill(grid: &mut Grid, start: GridCoord) -> usize {
    if !grid.is_accessible(start) {
        return 0;
    }

    let mut queue = VecDeque::new();
    grid.mark_discoverable(start);
    queue.push_back(start);
    let mut marked = 1;
    let mut frontier = Vec::with_capacity(NEIGHBOR_OFFSETS.len());

    while let Some(cell) = queue.pop_front() {
        frontier.clear();
        frontier.extend(
            grid.accessible_neighbors(cell)
                .map(|(_, neighbor)| neighbor)
                .filter(|neighbor| !grid.is_discoverable(*neighbor)),
        );

        for &neighbor in &frontier {
            grid.mark_discoverable(neighbor);
            marked += 1;
            queue.push_back(neighbor);
        }
    }

    marked
}
