//! Deterministic simulation module
//!
//! All particle logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Body, Resolution, circles_overlap, reflect_velocity, resolve};
pub use state::{Particle, Probe, RngState, SimState};
pub use tick::{TickInput, TickStats, tick};
