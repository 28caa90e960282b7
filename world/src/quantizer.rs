//! Snaps continuous world coordinates onto nearby grid cells.

use glam::Vec2;
use masacre_core::GridCoord;
use thiserror::Error;

use crate::grid::Grid;

/// No candidate cell around the point was discoverable.
///
/// Carries the closest candidate so callers can still report it; queries
/// built on top of it must be treated as failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no discoverable cell near the query point; closest candidate is {nearest:?}")]
pub struct Unreachable {
    /// Closest candidate cell, which is out of bounds or not discoverable.
    pub nearest: GridCoord,
}

/// The two cell indices bracketing a coordinate, nearest first.
fn axis_candidates(value: f32, cell_pitch: f32) -> (i32, i32) {
    let scaled = value / cell_pitch;
    let lower = scaled.floor();
    let upper = scaled.ceil();
    if scaled - lower <= 0.5 {
        (lower as i32, upper as i32)
    } else {
        (upper as i32, lower as i32)
    }
}

/// Up to four cells surrounding `point`, ordered closest to farthest.
pub(crate) fn candidate_cells(point: Vec2, cell_pitch: f32) -> [GridCoord; 4] {
    let (near_x, far_x) = axis_candidates(point.x, cell_pitch);
    let (near_y, far_y) = axis_candidates(point.y, cell_pitch);
    [
        GridCoord::new(near_x, near_y),
        GridCoord::new(near_x, far_y),
        GridCoord::new(far_x, near_y),
        GridCoord::new(far_x, far_y),
    ]
}

/// Returns the first candidate around `point` that is discoverable.
pub(crate) fn nearest_reachable_cell(
    grid: &Grid,
    point: Vec2,
    cell_pitch: f32,
) -> Result<GridCoord, Unreachable> {
    let candidates = candidate_cells(point, cell_pitch);
    candidates
        .iter()
        .copied()
        .find(|cell| grid.is_discoverable(*cell))
        .ok_or_else(|| {
            tracing::warn!(
                x = point.x,
                y = point.y,
                ?candidates,
                "no discoverable cell near point"
            );
            Unreachable {
                nearest: candidates[0],
            }
        })
}
