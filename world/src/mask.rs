//! Text-based walkability source used for hand-authored levels and fixtures.

use glam::Vec2;
use masacre_core::WalkabilitySource;
use thiserror::Error;

const WALL: char = '#';
const FLOOR: char = '.';

/// Errors raised while parsing a text mask.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MaskError {
    /// The layout contained no rows.
    #[error("mask layout is empty")]
    Empty,
    /// A row's width differs from the first row.
    #[error("mask row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character other than `#` or `.` appeared in the layout.
    #[error("unexpected character {character:?} at row {row}, column {column}")]
    UnexpectedCharacter {
        /// Character that could not be interpreted.
        character: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
}

/// Walkability mask where every character covers one world unit.
///
/// `#` marks a wall and `.` marks open floor. Points outside the mask are
/// reported as blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiMask {
    width: usize,
    height: usize,
    walls: Vec<bool>,
}

impl AsciiMask {
    /// Parses a newline-separated layout. Blank lines and surrounding
    /// whitespace are ignored.
    pub fn parse(layout: &str) -> Result<Self, MaskError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(MaskError::Empty);
        };
        let width = first.chars().count();
        let mut walls = Vec::with_capacity(width * rows.len());

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MaskError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, character) in line.chars().enumerate() {
                match character {
                    WALL => walls.push(true),
                    FLOOR => walls.push(false),
                    _ => {
                        return Err(MaskError::UnexpectedCharacter {
                            character,
                            row,
                            column,
                        })
                    }
                }
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            walls,
        })
    }

    /// Mask of the given size without any walls.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        let width = width as usize;
        let height = height as usize;
        Self {
            width,
            height,
            walls: vec![false; width * height],
        }
    }

    /// Renders the mask back into its text form.
    #[must_use]
    pub fn render(&self) -> String {
        self.walls
            .chunks(self.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|&wall| if wall { WALL } else { FLOOR })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl WalkabilitySource for AsciiMask {
    fn extent(&self) -> (u32, u32) {
        (
            u32::try_from(self.width).unwrap_or(u32::MAX),
            u32::try_from(self.height).unwrap_or(u32::MAX),
        )
    }

    fn is_blocked(&self, point: Vec2) -> bool {
        if point.x < 0.0 || point.y < 0.0 {
            return true;
        }
        let column = point.x.floor() as usize;
        let row = point.y.floor() as usize;
        if column >= self.width || row >= self.height {
            return true;
        }
        self.walls[row * self.width + column]
    }
}
