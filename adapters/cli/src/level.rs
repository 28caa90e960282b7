//! Walkability sources loaded from disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use glam::Vec2;
use image::RgbaImage;
use masacre_core::{WalkabilitySource, DEFAULT_CELL_PITCH};
use masacre_world::AsciiMask;

/// Pixels with a red channel below this value are walls.
pub const WALL_RED_THRESHOLD: u8 = 255;

/// Walkability mask sampled from a bitmap, one pixel per world unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapMask {
    width: u32,
    height: u32,
    walls: Vec<bool>,
}

impl BitmapMask {
    /// Classifies every pixel of the image.
    #[must_use]
    pub fn from_image(image: &RgbaImage) -> Self {
        let walls = image
            .pixels()
            .map(|pixel| pixel.0[0] < WALL_RED_THRESHOLD)
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            walls,
        }
    }

    /// Decodes an image file and classifies its pixels.
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode level bitmap {}", path.display()))?
            .to_rgba8();
        Ok(Self::from_image(&image))
    }
}

impl WalkabilitySource for BitmapMask {
    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_blocked(&self, point: Vec2) -> bool {
        if point.x < 0.0 || point.y < 0.0 {
            return true;
        }
        let column = point.x.floor() as u32;
        let row = point.y.floor() as u32;
        if column >= self.width || row >= self.height {
            return true;
        }
        let index = row as usize * self.width as usize + column as usize;
        self.walls.get(index).copied().unwrap_or(true)
    }
}

/// Level source chosen by file extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// PNG or any other bitmap the `image` crate decodes.
    Bitmap(BitmapMask),
    /// `.txt` mask with `#` walls and `.` floor.
    Ascii(AsciiMask),
}

impl Level {
    /// Loads a level file.
    pub fn load(path: &Path) -> Result<Self> {
        let is_text = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("txt"));
        if is_text {
            let layout = fs::read_to_string(path)
                .with_context(|| format!("failed to read level mask {}", path.display()))?;
            let mask = AsciiMask::parse(&layout)
                .with_context(|| format!("invalid level mask {}", path.display()))?;
            Ok(Self::Ascii(mask))
        } else {
            BitmapMask::open(path).map(Self::Bitmap)
        }
    }

    /// Cell pitch used when the settings leave it out.
    ///
    /// A text mask has one character per cell, so its pitch is one world unit.
    #[must_use]
    pub const fn default_cell_pitch(&self) -> f32 {
        match self {
            Self::Bitmap(_) => DEFAULT_CELL_PITCH,
            Self::Ascii(_) => 1.0,
        }
    }
}

impl WalkabilitySource for Level {
    fn extent(&self) -> (u32, u32) {
        match self {
            Self::Bitmap(mask) => mask.extent(),
            Self::Ascii(mask) => mask.extent(),
        }
    }

    fn is_blocked(&self, point: Vec2) -> bool {
        match self {
            Self::Bitmap(mask) => mask.is_blocked(point),
            Self::Ascii(mask) => mask.is_blocked(point),
        }
    }
}
