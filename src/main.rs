//! Headless demo driver
//!
//! Runs the simulation for a fixed number of ticks with a scripted probe
//! orbit and spawn schedule, logging broad/narrow-phase statistics. Useful
//! for eyeballing tree behavior without a renderer:
//!
//! ```text
//! quad-bounce [seed] [ticks] [config.json]
//! ```

use std::f32::consts::TAU;

use glam::Vec2;

use quad_bounce::SimConfig;
use quad_bounce::consts::*;
use quad_bounce::sim::{Probe, SimState, TickInput, tick};
use quad_bounce::spatial::Rect;

/// Particle population the demo spawns up to.
const DEMO_PARTICLES: usize = 400;
/// Probe orbit radius around the world center.
const ORBIT_RADIUS: f32 = 220.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .map(|s| s.parse().expect("seed must be an integer"))
        .unwrap_or(42);
    let ticks: u64 = args
        .next()
        .map(|s| s.parse().expect("tick count must be an integer"))
        .unwrap_or(600);
    let config = match args.next() {
        Some(path) => load_config(&path),
        None => SimConfig::default(),
    };
    config.validate().expect("simulation config is invalid");

    log::info!("quad-bounce starting (seed {seed}, {ticks} ticks)");

    let bounds = Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT);
    let mut state = SimState::new(seed, bounds).expect("world bounds are valid");
    state.probe = Some(Probe::new(bounds.center(), 50.0).expect("probe radius is positive"));

    let center = bounds.center();
    let mut total_collisions = 0usize;
    for i in 0..ticks {
        let angle = i as f32 * SIM_DT * 0.4 * TAU;
        let spawn = (state.particles.len() < DEMO_PARTICLES && i % 3 == 0).then(|| {
            // Golden-angle scatter keeps spawns spread without extra RNG.
            let theta = i as f32 * 2.399_963;
            center + Vec2::from_angle(theta) * (120.0 + (i % 7) as f32 * 40.0)
        });
        let input = TickInput {
            probe_target: Some(center + Vec2::from_angle(angle) * ORBIT_RADIUS),
            spawn_at: spawn,
        };

        match tick(&mut state, &input, &config, SIM_DT) {
            Ok(stats) => {
                total_collisions += stats.collisions;
                if i % 120 == 0 {
                    log::info!(
                        "tick {i}: {} particles, {} tree nodes, {} candidates, {} collisions",
                        state.particles.len(),
                        stats.tree_nodes,
                        stats.broad_candidates,
                        stats.collisions,
                    );
                }
            }
            Err(e) => {
                log::error!("tick {i} failed: {e}");
                return;
            }
        }
    }

    log::info!(
        "done: {} particles, {} collisions resolved over {ticks} ticks",
        state.particles.len(),
        total_collisions,
    );
}

fn load_config(path: &str) -> SimConfig {
    let json = std::fs::read_to_string(path).expect("config file is readable");
    serde_json::from_str(&json).expect("config file parses as SimConfig")
}
