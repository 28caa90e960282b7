#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that places agents on discoverable cells.

use std::time::Duration;

use glam::Vec2;
use masacre_core::{Agent, AgentId};
use masacre_world::{Map, MapError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
    max_agents: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, cap and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, max_agents: usize, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            max_agents,
            rng_seed,
        }
    }

    /// Time between two consecutive spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Upper bound on live agents; spawns beyond it are dropped.
    #[must_use]
    pub const fn max_agents(&self) -> usize {
        self.max_agents
    }

    /// Seed of the placement random number generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 32, 0x6d61_7361_6372_6521)
    }
}

/// Owned collection of agents with monotonically allocated identifiers.
#[derive(Clone, Debug, Default)]
pub struct Horde {
    agents: Vec<Agent>,
    next_id: u32,
}

impl Horde {
    /// Creates an empty horde.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a live agent at `position` and returns its identifier.
    pub fn spawn(&mut self, position: Vec2) -> AgentId {
        let id = AgentId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.agents.push(Agent::new(id, position));
        id
    }

    /// Removes dead agents, returning how many were dropped.
    pub fn reap(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(Agent::is_alive);
        before - self.agents.len()
    }

    /// Number of agents still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Number of agents held, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the horde holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Looks up an agent by identifier.
    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    /// Agents in spawn order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agents in spawn order, mutable.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}

/// Pure system that spawns agents at random discoverable spots on a fixed cadence.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    max_agents: usize,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            max_agents: config.max_agents,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Advances the spawn clock by `dt` and spawns every agent that is due.
    ///
    /// Returns the identifiers of the new agents. Running out of placement
    /// attempts means the level has too little open space and is reported as
    /// a map error.
    pub fn handle(
        &mut self,
        dt: Duration,
        map: &Map,
        horde: &mut Horde,
    ) -> Result<Vec<AgentId>, MapError> {
        if self.spawn_interval.is_zero() || dt.is_zero() {
            return Ok(Vec::new());
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let spawn_attempts = self.resolve_spawn_attempts();

        let mut spawned = Vec::new();
        for _ in 0..spawn_attempts {
            if horde.live_count() >= self.max_agents {
                tracing::trace!(max_agents = self.max_agents, "spawn skipped at capacity");
                continue;
            }

            let position = map.discoverable_random_spot(&mut self.rng)?;
            let id = horde.spawn(position);
            tracing::debug!(agent = id.get(), x = position.x, y = position.y, "agent spawned");
            spawned.push(id);
        }
        Ok(spawned)
    }

    /// World-space position for a collectible, drawn from the same stream as agents.
    pub fn pickup_spot(&mut self, map: &Map) -> Result<Vec2, MapError> {
        map.discoverable_random_spot(&mut self.rng)
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }
}
