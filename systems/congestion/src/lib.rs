#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pairwise yielding pass that keeps agents sharing a corridor from piling up.
//!
//! Every tick the pass resets each live agent's slowdown and then inspects all
//! unordered pairs. The agent nearer to the tracked goal gets right of way, and
//! the identifier breaks ties when two agents overlap exactly.
//!
//! Slowdown updates are applied immediately while pairs are visited in index
//! order. When three or more agents crowd together the result depends on that
//! order; this is accepted as an approximation of traffic yielding.
//!
//! The pass mutates the agents' `slowdown` in place and emits nothing. The
//! navigator reads the new value in the same tick, so no command queue sits
//! between the two.

use glam::Vec2;
use masacre_core::Agent;
use serde::Deserialize;

/// Default distance below which the farther agent stops.
pub const DEFAULT_TOO_CLOSE_DISTANCE: f32 = 20.0;

/// Default distance below which the farther agent slows down.
pub const DEFAULT_CLOSE_DISTANCE: f32 = 40.0;

/// Default factor applied to the farther agent of a close pair.
pub const DEFAULT_SOFT_SLOWDOWN: f32 = 0.9;

/// Configuration parameters required to construct the congestion pass.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    too_close_distance: f32,
    close_distance: f32,
    soft_slowdown: f32,
}

impl Config {
    /// Creates a new configuration using the provided thresholds.
    #[must_use]
    pub const fn new(too_close_distance: f32, close_distance: f32, soft_slowdown: f32) -> Self {
        Self {
            too_close_distance,
            close_distance,
            soft_slowdown,
        }
    }

    /// Distance below which the farther agent of a pair stops.
    #[must_use]
    pub const fn too_close_distance(&self) -> f32 {
        self.too_close_distance
    }

    /// Distance below which the farther agent of a pair slows down.
    #[must_use]
    pub const fn close_distance(&self) -> f32 {
        self.close_distance
    }

    /// Factor applied to the farther agent of a close pair.
    #[must_use]
    pub const fn soft_slowdown(&self) -> f32 {
        self.soft_slowdown
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOO_CLOSE_DISTANCE,
            DEFAULT_CLOSE_DISTANCE,
            DEFAULT_SOFT_SLOWDOWN,
        )
    }
}

/// Pure system that throttles agents crowding each other.
#[derive(Clone, Debug, Default)]
pub struct Congestion {
    config: Config,
}

impl Congestion {
    /// Creates a new congestion pass using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the pass was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Recomputes the slowdown of every live agent for this tick.
    pub fn run(&self, agents: &mut [Agent], goal: Vec2) {
        for agent in agents.iter_mut() {
            agent.slowdown = 1.0;
        }

        for first in 0..agents.len() {
            if !agents[first].is_alive() {
                continue;
            }
            for second in first + 1..agents.len() {
                if !agents[second].is_alive() {
                    continue;
                }
                self.resolve_pair(agents, first, second, goal);
            }
        }
    }

    fn resolve_pair(&self, agents: &mut [Agent], first: usize, second: usize, goal: Vec2) {
        let a = &agents[first];
        let b = &agents[second];

        if a.position == b.position {
            let yielding = if a.id < b.id { first } else { second };
            agents[yielding].slowdown = 0.0;
            return;
        }

        let distance = a.position.distance(b.position);
        if distance >= self.config.close_distance {
            return;
        }

        let yielding = farther_from_goal(a, first, b, second, goal);
        if distance < self.config.too_close_distance {
            agents[yielding].slowdown = 0.0;
        } else {
            agents[yielding].slowdown *= self.config.soft_slowdown;
        }
    }
}

/// Index of the agent that gives way; equal distances yield the lower id.
fn farther_from_goal(a: &Agent, first: usize, b: &Agent, second: usize, goal: Vec2) -> usize {
    let a_distance = a.position.distance_squared(goal);
    let b_distance = b.position.distance_squared(goal);
    if a_distance > b_distance || (a_distance == b_distance && a.id < b.id) {
        first
    } else {
        second
    }
}
