//! Fixed timestep simulation tick
//!
//! Per tick: spawn, integrate, bounce off world edges, rebuild the
//! quadtree from current positions, then resolve collisions around the
//! probe. The tree is local to this function; it never outlives the tick
//! that built it.

use glam::Vec2;

use super::collision::{self, Body};
use super::state::SimState;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::spatial::{QuadTree, Rect};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the probe should be this tick (mouse/touch position)
    pub probe_target: Option<Vec2>,
    /// Spawn one particle here (held mouse button)
    pub spawn_at: Option<Vec2>,
}

/// Counters for logging and HUD display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Candidates the broad phase reported around the probe
    pub broad_candidates: usize,
    /// Candidates that actually overlapped and were resolved
    pub collisions: usize,
    /// Arena size of this tick's tree
    pub tree_nodes: usize,
}

/// Advance the state by one fixed timestep.
pub fn tick(
    state: &mut SimState,
    input: &TickInput,
    cfg: &SimConfig,
    dt: f32,
) -> Result<TickStats, SimError> {
    state.time_ticks += 1;
    let mut rng = state.rng_state.next_rng();
    let mut stats = TickStats::default();

    if let Some(pos) = input.spawn_at {
        let _id = state.spawn_particle(pos, cfg, &mut rng);
    }

    // The probe follows external input; its velocity is the observed
    // movement, which feeds the collision response.
    if let Some(target) = input.probe_target {
        if let Some(probe) = state.probe.as_mut() {
            probe.vel = (target - probe.pos) / dt;
            probe.pos = target;
        }
    }

    // Integrate, then reflect off the world edges.
    let bounds = state.bounds;
    for p in &mut state.particles {
        p.pos += p.vel * dt;

        let min_x = bounds.x + p.radius;
        let max_x = bounds.right() - p.radius;
        if p.pos.x < min_x {
            p.pos.x = min_x;
            p.vel.x = -p.vel.x;
        } else if p.pos.x > max_x {
            p.pos.x = max_x;
            p.vel.x = -p.vel.x;
        }

        let min_y = bounds.y + p.radius;
        let max_y = bounds.bottom() - p.radius;
        if p.pos.y < min_y {
            p.pos.y = min_y;
            p.vel.y = -p.vel.y;
        } else if p.pos.y > max_y {
            p.pos.y = max_y;
            p.vel.y = -p.vel.y;
        }
    }

    // Broad phase: a fresh index over this tick's positions.
    let mut tree = QuadTree::new(bounds, cfg.quad_capacity, cfg.max_tree_depth)?;
    for p in &state.particles {
        tree.insert(p.id, p.pos);
    }
    stats.tree_nodes = tree.node_count();

    // Narrow phase around the probe. The query window is the probe's
    // bounding square (side 2 x radius); candidate ids can repeat via
    // boundary ties, which just re-applies the identical resolution.
    if let Some(probe) = state.probe {
        let window = Rect::from_center_extents(probe.pos, Vec2::splat(probe.radius));
        let candidates = tree.query(&window);
        stats.broad_candidates = candidates.len();

        let probe_body = Body {
            pos: probe.pos,
            vel: probe.vel,
            radius: probe.radius,
        };
        for candidate in &candidates {
            let Some(particle) = state.particle_mut(candidate.id) else {
                continue;
            };
            let body = Body {
                pos: particle.pos,
                vel: particle.vel,
                radius: particle.radius,
            };
            if let Some(res) = collision::resolve(&probe_body, &body, cfg, &mut rng)? {
                particle.pos = res.pos;
                particle.vel = res.vel;
                stats.collisions += 1;
            }
        }
    }

    Ok(stats)
}
