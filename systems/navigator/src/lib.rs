#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint-driven navigation that steers agents toward a tracked goal.
//!
//! Full path searches are only issued when an agent reaches its current
//! waypoint. Between searches the agent walks in a straight line toward the
//! waypoint, so the per-tick cost stays proportional to the number of agents
//! that actually need a new one.
//!
//! Unlike the spawning system, which hands back the identifiers it created,
//! [`Navigator::update`] writes position, facing and waypoint straight into
//! the [`Agent`] it is given and only reports what it did as a [`Step`].
//! Callers that need an event stream build it from those steps.

use std::time::Duration;

use glam::Vec2;
use masacre_core::Agent;
use masacre_world::Map;
use serde::Deserialize;

/// Default walking speed in world units per second.
pub const DEFAULT_SPEED: f32 = 200.0;

/// Default distance at which a waypoint counts as reached.
pub const DEFAULT_REACH_THRESHOLD: f32 = 1.0;

/// Default distance to the goal below which agents stop closing in.
pub const DEFAULT_MIN_CHASE_DISTANCE: f32 = 16.0;

/// Configuration parameters required to construct the navigator.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    speed: f32,
    reach_threshold: f32,
    min_chase_distance: f32,
}

impl Config {
    /// Creates a new configuration using the provided speed and distances.
    #[must_use]
    pub const fn new(speed: f32, reach_threshold: f32, min_chase_distance: f32) -> Self {
        Self {
            speed,
            reach_threshold,
            min_chase_distance,
        }
    }

    /// Walking speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance at which a waypoint counts as reached.
    #[must_use]
    pub const fn reach_threshold(&self) -> f32 {
        self.reach_threshold
    }

    /// Distance to the goal below which agents hold their position.
    #[must_use]
    pub const fn min_chase_distance(&self) -> f32 {
        self.min_chase_distance
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPEED,
            DEFAULT_REACH_THRESHOLD,
            DEFAULT_MIN_CHASE_DISTANCE,
        )
    }
}

/// What a single update did to an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The agent is dead and was left untouched.
    Dead,
    /// The agent is already close enough to the goal.
    Holding,
    /// A new waypoint was derived from a fresh path search.
    Retargeted,
    /// The path search failed; the previous waypoint is kept.
    NoPath,
    /// The agent walked toward its waypoint.
    Moved {
        /// Distance covered this tick.
        distance: f32,
    },
    /// The agent is throttled to a standstill or has nowhere to go.
    Stalled,
}

/// Pure system that advances agents along short-range waypoints.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    config: Config,
}

impl Navigator {
    /// Creates a new navigator using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the navigator was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Advances one agent by one tick toward `goal`.
    pub fn update(&self, agent: &mut Agent, goal: Vec2, map: &Map, dt: Duration) -> Step {
        if !agent.is_alive() {
            return Step::Dead;
        }

        if agent.position.distance(goal) <= self.config.min_chase_distance {
            return Step::Holding;
        }

        if agent.position.distance(agent.move_target) <= self.config.reach_threshold {
            return self.retarget(agent, goal, map);
        }

        self.advance(agent, dt)
    }

    fn retarget(&self, agent: &mut Agent, goal: Vec2, map: &Map) -> Step {
        let path = map.find_path(agent.position, goal);
        if path.is_empty() {
            tracing::debug!(
                agent = agent.id.get(),
                x = agent.position.x,
                y = agent.position.y,
                "no path to goal, keeping waypoint"
            );
            return Step::NoPath;
        }

        // Goal and agent share a cell: walk straight at the goal.
        agent.move_target = path
            .next_step()
            .map_or(goal, |cell| map.cell_to_world(cell));
        Step::Retargeted
    }

    fn advance(&self, agent: &mut Agent, dt: Duration) -> Step {
        let offset = agent.move_target - agent.position;
        let remaining = offset.length();
        let reach = self.config.speed * agent.slowdown * dt.as_secs_f32();
        if reach <= 0.0 || remaining <= 0.0 {
            return Step::Stalled;
        }

        let displacement = if reach >= remaining {
            agent.position = agent.move_target;
            offset
        } else {
            let displacement = offset * (reach / remaining);
            agent.position += displacement;
            displacement
        };
        agent.angle = displacement.y.atan2(displacement.x).to_degrees();

        Step::Moved {
            distance: displacement.length(),
        }
    }
}
