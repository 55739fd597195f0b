//! Simulation tuning
//!
//! Every tunable lives in one explicit value handed to the index and the
//! resolver; nothing reads process-wide state. The demo driver can load a
//! config as JSON, which is also how presets are stored.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Tuning for the spatial index and collision response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Points a quadtree leaf holds before subdividing
    pub quad_capacity: usize,
    /// Subdivision ceiling; leaves at this depth accept excess points
    pub max_tree_depth: u32,
    /// Velocity scale applied after a collision response (must be below 1)
    pub damping: f32,
    /// Post-collision speed floor; slower responses are rescaled up to it
    pub min_speed: f32,
    /// Random rotation bound for resolved velocities (radians)
    pub max_jitter: f32,
    /// Radius of spawned particles
    pub particle_radius: f32,
    /// Largest initial velocity component for spawned particles
    pub spawn_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quad_capacity: QUAD_CAPACITY,
            max_tree_depth: MAX_TREE_DEPTH,
            damping: DAMPING,
            min_speed: MIN_SPEED,
            max_jitter: MAX_JITTER,
            particle_radius: PARTICLE_RADIUS,
            spawn_speed: SPAWN_SPEED,
        }
    }
}

impl SimConfig {
    /// Reject out-of-range tuning before any simulation state is built.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.quad_capacity < 1 {
            return Err(SimError::InvalidCapacity(self.quad_capacity));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(SimError::InvalidDamping(self.damping));
        }
        if !(self.min_speed >= 0.0) {
            return Err(SimError::InvalidMinSpeed(self.min_speed));
        }
        if !(self.max_jitter >= 0.0) {
            return Err(SimError::InvalidJitter(self.max_jitter));
        }
        if self.particle_radius <= 0.0 {
            return Err(SimError::InvalidRadius(self.particle_radius));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let cfg = SimConfig {
            quad_capacity: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimError::InvalidCapacity(0)));
    }

    #[test]
    fn test_damping_must_slow_things_down() {
        let cfg = SimConfig {
            damping: 1.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(SimError::InvalidDamping(1.0)));

        let cfg = SimConfig {
            damping: f32::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SimError::InvalidDamping(_))));
    }

    #[test]
    fn test_config_parses_from_json() {
        let json = r#"{
            "quad_capacity": 4,
            "max_tree_depth": 6,
            "damping": 0.9,
            "min_speed": 5.0,
            "max_jitter": 0.05,
            "particle_radius": 3.0,
            "spawn_speed": 20.0
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.quad_capacity, 4);
        assert_eq!(cfg.validate(), Ok(()));
    }
}
