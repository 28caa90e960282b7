//! Static walkability grid sampled once from a rasterised map.

use masacre_core::{GridCoord, WalkabilitySource, MAX_GRID_CELLS};

use crate::MapError;

/// Offsets of the eight neighbours surrounding a cell.
///
/// The index into this table is what the search records as a parent link, so
/// the order is fixed.
pub(crate) const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Per-cell state bits computed while the level loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellState(u8);

impl CellState {
    /// The cell is not a wall.
    pub const ACCESSIBLE: u8 = 0b01;
    /// The cell is reachable from the canonical start cell.
    pub const DISCOVERABLE: u8 = 0b10;

    /// Whether the cell is not a wall.
    #[must_use]
    pub const fn is_accessible(self) -> bool {
        self.0 & Self::ACCESSIBLE != 0
    }

    /// Whether the cell was reached by the flood fill.
    #[must_use]
    pub const fn is_discoverable(self) -> bool {
        self.0 & Self::DISCOVERABLE != 0
    }
}

/// Dense row-major walkability grid.
///
/// Dimensions are validated against [`MAX_GRID_CELLS`] at construction and the
/// state bits never change once the level finished loading.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: i32,
    rows: i32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Samples the source at every cell origin and marks open cells accessible.
    pub fn build<S>(source: &S, cell_pitch: f32) -> Result<Self, MapError>
    where
        S: WalkabilitySource + ?Sized,
    {
        if !cell_pitch.is_finite() || cell_pitch <= 0.0 {
            return Err(MapError::InvalidCellPitch { cell_pitch });
        }

        let (width, height) = source.extent();
        let columns = (width as f32 / cell_pitch).floor() as i64;
        let rows = (height as f32 / cell_pitch).floor() as i64;
        let mut grid = Self::with_dimensions(columns, rows)?;

        for y in 0..grid.rows {
            for x in 0..grid.columns {
                let coord = GridCoord::new(x, y);
                if source.is_blocked(coord.to_world(cell_pitch)) {
                    continue;
                }
                if let Some(index) = grid.index(coord) {
                    grid.cells[index] = CellState(CellState::ACCESSIBLE);
                }
            }
        }

        Ok(grid)
    }

    fn with_dimensions(columns: i64, rows: i64) -> Result<Self, MapError> {
        if columns <= 0 || rows <= 0 {
            return Err(MapError::EmptyGrid);
        }

        let too_large = || MapError::GridTooLarge {
            columns: columns.max(0) as u64,
            rows: rows.max(0) as u64,
            max: MAX_GRID_CELLS,
        };

        let cell_count = usize::try_from(columns.saturating_mul(rows)).map_err(|_| too_large())?;
        if cell_count > MAX_GRID_CELLS {
            return Err(too_large());
        }

        Ok(Self {
            columns: i32::try_from(columns).map_err(|_| too_large())?,
            rows: i32::try_from(rows).map_err(|_| too_large())?,
            cells: vec![CellState::default(); cell_count],
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x() >= 0 && coord.y() >= 0 && coord.x() < self.columns && coord.y() < self.rows
    }

    /// State bits of the cell, if it lies inside the grid.
    #[must_use]
    pub fn state(&self, coord: GridCoord) -> Option<CellState> {
        self.index(coord).map(|index| self.cells[index])
    }

    /// Whether the cell is inside the grid and not a wall.
    #[must_use]
    pub fn is_accessible(&self, coord: GridCoord) -> bool {
        self.state(coord).is_some_and(CellState::is_accessible)
    }

    /// Whether the cell is inside the grid and reachable from the canonical start.
    #[must_use]
    pub fn is_discoverable(&self, coord: GridCoord) -> bool {
        self.state(coord).is_some_and(CellState::is_discoverable)
    }

    /// Number of cells that are not walls.
    #[must_use]
    pub fn accessible_count(&self) -> usize {
        self.cells.iter().filter(|state| state.is_accessible()).count()
    }

    /// Number of cells reachable from the canonical start.
    #[must_use]
    pub fn discoverable_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| state.is_discoverable())
            .count()
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let column = usize::try_from(coord.x()).ok()?;
        let row = usize::try_from(coord.y()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Picks the flood-fill seed: the accessible cell of the centre column
    /// nearest to the centre row.
    pub fn canonical_start(&self) -> Result<GridCoord, MapError> {
        let x = self.columns / 2;
        let centre = self.rows / 2;

        for distance in 0..=self.rows {
            let below = GridCoord::new(x, centre + distance);
            if self.is_accessible(below) {
                return Ok(below);
            }
            let above = GridCoord::new(x, centre - distance);
            if self.is_accessible(above) {
                return Ok(above);
            }
        }

        Err(MapError::NoCanonicalStart)
    }

    pub(crate) fn mark_discoverable(&mut self, coord: GridCoord) {
        if let Some(index) = self.index(coord) {
            let state = &mut self.cells[index];
            if state.is_accessible() {
                state.0 |= CellState::DISCOVERABLE;
            }
        }
    }

    /// Accessible cells among the eight neighbours of `coord`, paired with the
    /// index of the offset that leads to them.
    pub(crate) fn accessible_neighbors(
        &self,
        coord: GridCoord,
    ) -> impl Iterator<Item = (u8, GridCoord)> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .zip(0u8..)
            .map(move |(&(dx, dy), index)| (index, coord.offset(dx, dy)))
            .filter(|&(_, neighbor)| self.is_accessible(neighbor))
    }
}
