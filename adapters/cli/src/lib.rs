#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless harness that loads a level and drives the Masacre systems.

use glam::Vec2;

pub mod config;
pub mod level;
pub mod simulation;

/// Parses a comma-separated `x,y` world-space point.
pub fn parse_point(value: &str) -> Result<Vec2, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y] = parts.as_slice() else {
        return Err(format!(
            "point must have 2 components, got {}",
            parts.len()
        ));
    };

    let x = x.parse::<f32>().map_err(|error| error.to_string())?;
    let y = y.parse::<f32>().map_err(|error| error.to_string())?;
    Ok(Vec2::new(x, y))
}
