//! Particle store and simulation state
//!
//! Everything needed to replay a run deterministically lives here. The
//! spatial index never appears in this state: it is rebuilt from these
//! positions every tick and dropped again.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::spatial::Rect;

/// A point-like body tracked by the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// The externally driven body that collision checks run against (the
/// player body, a mouse tracker, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Probe {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Probe {
    pub fn new(pos: Vec2, radius: f32) -> Result<Self, SimError> {
        if radius <= 0.0 {
            return Err(SimError::InvalidRadius(radius));
        }
        Ok(Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        })
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the current tick. Advances the stream so the next
    /// tick draws from an independent sequence.
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// World region; the quadtree root is sized to this every tick
    pub bounds: Rect,
    /// Live particles (sorted by id for determinism)
    pub particles: Vec<Particle>,
    /// Externally driven collision probe, when one is active
    pub probe: Option<Probe>,
    /// Next entity ID
    next_id: u32,
}

impl SimState {
    /// Create an empty world. Negative extents fail fast, matching the
    /// index's own construction rule.
    pub fn new(seed: u64, bounds: Rect) -> Result<Self, SimError> {
        if bounds.width < 0.0 || bounds.height < 0.0 {
            return Err(SimError::InvalidRegion {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self {
            seed,
            rng_state: RngState::new(seed),
            time_ticks: 0,
            bounds,
            particles: Vec::new(),
            probe: None,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a particle at `pos` with a random velocity in the configured
    /// range, returning its id.
    pub fn spawn_particle(&mut self, pos: Vec2, cfg: &SimConfig, rng: &mut impl Rng) -> u32 {
        let id = self.next_entity_id();
        let vel = Vec2::new(
            rng.random_range(-cfg.spawn_speed..=cfg.spawn_speed),
            rng.random_range(-cfg.spawn_speed..=cfg.spawn_speed),
        );
        self.particles.push(Particle {
            id,
            pos,
            vel,
            radius: cfg.particle_radius,
        });
        id
    }

    /// Fetch one entity's full state by the id a query reported.
    pub fn particle(&self, id: u32) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    /// Mutable fetch, for writing a resolution back.
    pub fn particle_mut(&mut self, id: u32) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }
}
