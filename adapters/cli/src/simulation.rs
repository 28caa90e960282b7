//! Headless tick loop wiring the systems together.

use std::time::Duration;

use glam::Vec2;
use masacre_system_congestion::Congestion;
use masacre_system_navigator::{Navigator, Step};
use masacre_system_spawning::{Horde, Spawning};
use masacre_world::{Map, MapError};

use crate::config::Settings;

/// What happened to the agents during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Agents added this tick.
    pub spawned: usize,
    /// Agents that walked toward their waypoint.
    pub moved: usize,
    /// Agents that planned a new waypoint.
    pub retargeted: usize,
    /// Agents within chase distance of the player.
    pub holding: usize,
    /// Agents whose path query failed.
    pub no_path: usize,
    /// Agents throttled to a standstill.
    pub stalled: usize,
    /// Dead agents removed at the end of the tick.
    pub reaped: usize,
}

impl TickReport {
    fn record(&mut self, step: Step) {
        match step {
            Step::Dead => {}
            Step::Holding => self.holding += 1,
            Step::Retargeted => self.retargeted += 1,
            Step::NoPath => self.no_path += 1,
            Step::Moved { .. } => self.moved += 1,
            Step::Stalled => self.stalled += 1,
        }
    }
}

/// Totals accumulated over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Ticks simulated.
    pub ticks: u32,
    /// Agents spawned over the run.
    pub spawned: usize,
    /// Agents alive after the last tick.
    pub live_agents: usize,
    /// Agents within chase distance of the player after the last tick.
    pub holding: usize,
    /// Failed path queries over the run.
    pub no_path: usize,
}

/// One level with its agents and the systems steering them.
#[derive(Debug)]
pub struct Simulation {
    map: Map,
    navigator: Navigator,
    congestion: Congestion,
    spawning: Spawning,
    horde: Horde,
    player: Vec2,
    pickups: Vec<Vec2>,
    frame: Duration,
}

impl Simulation {
    /// Prepares a simulation on `map`; the player stands on the spawn point.
    pub fn new(map: Map, settings: &Settings) -> Result<Self, MapError> {
        let mut spawning = Spawning::new(settings.spawning.to_config());
        let pickups = (0..settings.simulation.pickups)
            .map(|_| spawning.pickup_spot(&map))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            player: map.player_spawn(),
            map,
            navigator: Navigator::new(settings.navigator),
            congestion: Congestion::new(settings.congestion),
            spawning,
            horde: Horde::new(),
            pickups,
            frame: settings.simulation.frame(),
        })
    }

    /// Level the agents walk on.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Agents currently in play.
    #[must_use]
    pub fn horde(&self) -> &Horde {
        &self.horde
    }

    /// Tracked goal every agent pursues.
    #[must_use]
    pub const fn player(&self) -> Vec2 {
        self.player
    }

    /// Moves the tracked goal.
    pub fn set_player(&mut self, position: Vec2) {
        self.player = position;
    }

    /// Collectible positions placed when the simulation started.
    #[must_use]
    pub fn pickups(&self) -> &[Vec2] {
        &self.pickups
    }

    /// Advances the simulation by one frame.
    ///
    /// Spawning runs first, then congestion so this frame's slowdowns apply to
    /// this frame's steps, then navigation.
    pub fn tick(&mut self) -> Result<TickReport, MapError> {
        let mut report = TickReport {
            spawned: self
                .spawning
                .handle(self.frame, &self.map, &mut self.horde)?
                .len(),
            ..TickReport::default()
        };

        self.congestion.run(self.horde.agents_mut(), self.player);
        for agent in self.horde.agents_mut() {
            let step = self
                .navigator
                .update(agent, self.player, &self.map, self.frame);
            report.record(step);
        }

        report.reaped = self.horde.reap();
        Ok(report)
    }

    /// Runs `ticks` frames and returns the accumulated totals.
    pub fn run(&mut self, ticks: u32) -> Result<Summary, MapError> {
        let mut summary = Summary::default();
        for _ in 0..ticks {
            let report = self.tick()?;
            summary.ticks += 1;
            summary.spawned += report.spawned;
            summary.no_path += report.no_path;
            summary.holding = report.holding;
        }
        summary.live_agents = self.horde.live_count();

        tracing::info!(
            ticks = summary.ticks,
            spawned = summary.spawned,
            live = summary.live_agents,
            holding = summary.holding,
            "simulation finished"
        );
        Ok(summary)
    }
}
