use std::time::Duration;

use glam::Vec2;
use masacre_core::{Agent, AgentId, GridCoord, Heuristic};
use masacre_system_navigator::{Config, Navigator, Step};
use masacre_world::{AsciiMask, Map, MapConfig};

const TICK: Duration = Duration::from_millis(250);

fn unit_map(layout: &str) -> Map {
    let mask = AsciiMask::parse(layout).expect("mask parses");
    Map::build_with_start(
        &mask,
        MapConfig::new(1.0, Heuristic::Euclidean),
        GridCoord::new(0, 0),
    )
    .expect("map builds")
}

fn open_corridor() -> Map {
    unit_map(
        "
        ..........
        ..........
        ..........
        ",
    )
}

fn navigator() -> Navigator {
    Navigator::new(Config::new(2.0, 0.1, 0.5))
}

#[test]
fn agent_on_waypoint_retargets_to_next_path_cell() {
    let map = open_corridor();
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(0.0, 1.0));

    let step = navigator().update(&mut agent, Vec2::new(6.0, 1.0), &map, TICK);

    assert_eq!(step, Step::Retargeted);
    assert_eq!(agent.move_target, Vec2::new(1.0, 1.0));
    assert_eq!(agent.position, Vec2::new(0.0, 1.0));
}

#[test]
fn agent_walks_to_waypoint_then_plans_again() {
    let map = open_corridor();
    let navigator = navigator();
    let goal = Vec2::new(6.0, 1.0);
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(0.0, 1.0));

    assert_eq!(navigator.update(&mut agent, goal, &map, TICK), Step::Retargeted);

    // 2 units/s over a quarter second.
    assert_eq!(
        navigator.update(&mut agent, goal, &map, TICK),
        Step::Moved { distance: 0.5 }
    );
    assert_eq!(agent.position, Vec2::new(0.5, 1.0));
    assert_eq!(agent.angle, 0.0);

    let step = navigator.update(&mut agent, goal, &map, Duration::from_secs(1));
    assert_eq!(step, Step::Moved { distance: 0.5 });
    assert_eq!(agent.position, Vec2::new(1.0, 1.0));

    assert_eq!(navigator.update(&mut agent, goal, &map, TICK), Step::Retargeted);
    assert_eq!(agent.move_target, Vec2::new(2.0, 1.0));
}

#[test]
fn facing_follows_the_displacement() {
    let map = open_corridor();
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(3.0, 0.0));
    agent.move_target = Vec2::new(3.0, 2.0);

    let _ = navigator().update(&mut agent, Vec2::new(9.0, 2.0), &map, TICK);

    assert!((agent.angle - 90.0).abs() < 1e-4);
    assert_eq!(agent.position, Vec2::new(3.0, 0.5));
}

#[test]
fn agent_within_chase_distance_holds_position() {
    let map = open_corridor();
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(4.0, 1.0));
    agent.move_target = Vec2::new(7.0, 1.0);

    let step = navigator().update(&mut agent, Vec2::new(4.3, 1.0), &map, TICK);

    assert_eq!(step, Step::Holding);
    assert_eq!(agent.position, Vec2::new(4.0, 1.0));
    assert_eq!(agent.move_target, Vec2::new(7.0, 1.0));
}

#[test]
fn goal_in_same_cell_becomes_the_waypoint() {
    let map = open_corridor();
    let navigator = Navigator::new(Config::new(2.0, 0.1, 0.0));
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(2.0, 1.0));
    let goal = Vec2::new(2.3, 1.1);

    assert_eq!(navigator.update(&mut agent, goal, &map, TICK), Step::Retargeted);
    assert_eq!(agent.move_target, goal);
}

#[test]
fn adjacent_goal_cell_is_the_next_waypoint() {
    let map = open_corridor();
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(2.0, 1.0));

    let step = navigator().update(&mut agent, Vec2::new(3.0, 2.0), &map, TICK);

    assert_eq!(step, Step::Retargeted);
    assert_eq!(agent.move_target, Vec2::new(3.0, 2.0));
}

#[test]
fn unreachable_goal_keeps_previous_waypoint() {
    let map = unit_map(
        "
        ......
        .####.
        .#..#.
        .#..#.
        .####.
        ......
        ",
    );
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(0.0, 0.0));

    let step = navigator().update(&mut agent, Vec2::new(2.5, 2.5), &map, TICK);

    assert_eq!(step, Step::NoPath);
    assert_eq!(agent.move_target, Vec2::new(0.0, 0.0));
    assert_eq!(agent.position, Vec2::new(0.0, 0.0));
}

#[test]
fn dead_agents_are_left_alone() {
    let map = open_corridor();
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(0.0, 1.0));
    agent.kill();
    let before = agent.clone();

    let step = navigator().update(&mut agent, Vec2::new(6.0, 1.0), &map, TICK);

    assert_eq!(step, Step::Dead);
    assert_eq!(agent, before);
}

#[test]
fn agents_eventually_reach_chase_distance_through_a_maze() {
    let map = unit_map(
        "
        ........
        .######.
        ......#.
        .####.#.
        ........
        ",
    );
    let navigator = Navigator::new(Config::new(4.0, 0.05, 0.5));
    let goal = Vec2::new(0.0, 2.0);
    let mut agent = Agent::new(AgentId::new(1), Vec2::new(7.0, 4.0));

    let mut holding = false;
    for _ in 0..400 {
        if navigator.update(&mut agent, goal, &map, TICK) == Step::Holding {
            holding = true;
            break;
        }
        let cell = GridCoord::from_world(agent.position, map.cell_pitch());
        assert!(
            map.grid().is_accessible(cell),
            "agent cut through a wall at {cell:?}"
        );
    }

    assert!(holding, "agent never closed in on the goal");
    assert!(agent.position.distance(goal) <= 0.5);
}
