use glam::Vec2;
use masacre_core::{Agent, AgentId};
use masacre_system_congestion::{Config, Congestion};

fn agent(id: u32, x: f32, y: f32) -> Agent {
    Agent::new(AgentId::new(id), Vec2::new(x, y))
}

fn slowdowns(agents: &[Agent]) -> Vec<f32> {
    agents.iter().map(|agent| agent.slowdown).collect()
}

#[test]
fn coincident_agents_stop_the_lower_id() {
    let congestion = Congestion::default();
    let mut agents = vec![agent(7, 10.0, 10.0), agent(5, 10.0, 10.0)];

    congestion.run(&mut agents, Vec2::new(300.0, 300.0));

    assert_eq!(agents[0].slowdown, 1.0, "agent 7 keeps walking");
    assert_eq!(agents[1].slowdown, 0.0, "agent 5 yields");
}

#[test]
fn too_close_pair_stops_the_agent_farther_from_goal() {
    let congestion = Congestion::new(Config::new(20.0, 40.0, 0.9));
    let mut agents = vec![agent(1, 0.0, 0.0), agent(2, 10.0, 0.0)];

    congestion.run(&mut agents, Vec2::new(100.0, 0.0));

    assert_eq!(slowdowns(&agents), vec![0.0, 1.0]);
}

#[test]
fn close_pair_softly_slows_the_agent_farther_from_goal() {
    let congestion = Congestion::new(Config::new(20.0, 40.0, 0.9));
    let mut agents = vec![agent(1, 130.0, 0.0), agent(2, 100.0, 0.0)];

    congestion.run(&mut agents, Vec2::ZERO);

    assert_eq!(slowdowns(&agents), vec![0.9, 1.0]);
}

#[test]
fn distant_agents_are_unaffected() {
    let congestion = Congestion::default();
    let mut agents = vec![agent(1, 0.0, 0.0), agent(2, 40.0, 0.0)];

    congestion.run(&mut agents, Vec2::new(500.0, 0.0));

    assert_eq!(slowdowns(&agents), vec![1.0, 1.0]);
}

#[test]
fn soft_slowdowns_compound_across_pairs() {
    let congestion = Congestion::new(Config::new(20.0, 40.0, 0.9));
    // The trailing agent is within the close band of two leaders that are far apart.
    let mut agents = vec![
        agent(1, 0.0, 0.0),
        agent(2, 25.0, 25.0),
        agent(3, 25.0, -25.0),
    ];

    congestion.run(&mut agents, Vec2::new(1000.0, 0.0));

    assert!((agents[0].slowdown - 0.81).abs() < 1e-6);
    assert_eq!(agents[1].slowdown, 1.0);
    assert_eq!(agents[2].slowdown, 1.0);
}

#[test]
fn dead_agents_neither_yield_nor_block() {
    let congestion = Congestion::default();
    let mut agents = vec![agent(1, 0.0, 0.0), agent(2, 0.0, 0.0)];
    agents[1].kill();

    congestion.run(&mut agents, Vec2::new(100.0, 0.0));

    assert_eq!(slowdowns(&agents), vec![1.0, 1.0]);
}

#[test]
fn pair_order_is_part_of_the_outcome() {
    let congestion = Congestion::new(Config::new(20.0, 40.0, 0.9));
    let goal = Vec2::new(1000.0, 0.0);
    let mut agents = vec![agent(1, 0.0, 0.0), agent(2, 10.0, 0.0), agent(3, 25.0, 0.0)];

    congestion.run(&mut agents, goal);

    // Agent 1 stops behind agent 2, and a later close pair cannot revive it.
    assert_eq!(agents[0].slowdown, 0.0);
    // Agent 2 is too close to agent 3 and stops as well.
    assert_eq!(agents[1].slowdown, 0.0);
    assert_eq!(agents[2].slowdown, 1.0);
}
