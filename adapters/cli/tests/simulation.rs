use std::path::Path;

use masacre_cli::{config::Settings, level::Level, simulation::Simulation};
use masacre_core::GridCoord;
use masacre_system_bootstrap::Bootstrap;
use masacre_world::Map;

fn arena() -> (Map, Settings) {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let settings = Settings::load(&root.join("masacre.toml")).expect("sample settings load");
    let level = Level::load(&root.join("levels/arena.txt")).expect("sample level loads");
    let map = Bootstrap
        .load_level(&level, settings.map.to_config(level.default_cell_pitch()))
        .expect("sample level prepares");
    (map, settings)
}

#[test]
fn spawns_on_schedule_and_keeps_agents_on_the_reachable_area() {
    let (map, settings) = arena();
    let mut simulation = Simulation::new(map, &settings).expect("pickups placed");

    // 300 frames of 16ms cover 4.8s, which holds nine 500ms intervals.
    let summary = simulation.run(300).expect("spawning succeeds");

    assert_eq!(summary.ticks, 300);
    assert_eq!(summary.spawned, 9);
    assert_eq!(summary.live_agents, 9);
    for agent in simulation.horde().agents() {
        assert!(
            simulation.map().nearest_reachable_cell(agent.position).is_ok(),
            "agent {} left the reachable area at {:?}",
            agent.id.get(),
            agent.position
        );
    }
}

#[test]
fn pickups_land_on_discoverable_cells() {
    let (map, settings) = arena();
    let simulation = Simulation::new(map, &settings).expect("pickups placed");

    assert_eq!(simulation.pickups().len(), 3);
    for pickup in simulation.pickups() {
        let cell = GridCoord::from_world(*pickup, simulation.map().cell_pitch());
        assert!(simulation.map().grid().is_discoverable(cell));
    }
}

#[test]
fn agents_close_in_on_the_player() {
    let (map, settings) = arena();
    let mut simulation = Simulation::new(map, &settings).expect("pickups placed");

    let summary = simulation.run(2_000).expect("spawning succeeds");

    assert_eq!(summary.live_agents, 12);
    assert!(summary.holding >= 1, "no agent reached the player");
    let player = simulation.player();
    let closest = simulation
        .horde()
        .agents()
        .iter()
        .map(|agent| agent.position.distance(player))
        .fold(f32::INFINITY, f32::min);
    assert!(closest <= settings.navigator.min_chase_distance());
}

#[test]
fn agents_follow_the_player_after_it_moves() {
    let (map, settings) = arena();
    let mut simulation = Simulation::new(map, &settings).expect("pickups placed");
    let _ = simulation.run(600).expect("spawning succeeds");

    let spawn = simulation.player();
    let grid = simulation.map().grid();
    let destination = (0..grid.rows())
        .flat_map(|y| (0..grid.columns()).map(move |x| GridCoord::new(x, y)))
        .filter(|cell| grid.is_discoverable(*cell))
        .map(|cell| simulation.map().cell_to_world(cell))
        .max_by(|a, b| a.distance(spawn).total_cmp(&b.distance(spawn)))
        .expect("arena has discoverable cells");
    simulation.set_player(destination);
    assert_eq!(simulation.player(), destination);

    let summary = simulation.run(2_000).expect("spawning succeeds");

    assert!(summary.holding >= 1, "no agent caught up with the player");
    let closest = simulation
        .horde()
        .agents()
        .iter()
        .map(|agent| agent.position.distance(destination))
        .fold(f32::INFINITY, f32::min);
    assert!(closest <= settings.navigator.min_chase_distance());
}

#[test]
fn identical_settings_replay_identically() {
    let positions = || {
        let (map, settings) = arena();
        let mut simulation = Simulation::new(map, &settings).expect("pickups placed");
        let _ = simulation.run(500).expect("spawning succeeds");
        simulation
            .horde()
            .agents()
            .iter()
            .map(|agent| (agent.id, agent.position.x.to_bits(), agent.position.y.to_bits()))
            .collect::<Vec<_>>()
    };

    assert_eq!(positions(), positions());
}
