//! Typed failure modes
//!
//! Configuration and invalid-input problems fail fast at construction or at
//! the resolver boundary. Out-of-bounds insertions and boundary-tie
//! duplicates are documented policy, not errors.

use thiserror::Error;

/// Errors from index construction, configuration, and resolver input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("quadtree capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    #[error("region extents must be non-negative, got {width}x{height}")]
    InvalidRegion { width: f32, height: f32 },

    #[error("body radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("damping must be in (0, 1), got {0}")]
    InvalidDamping(f32),

    #[error("minimum speed must be non-negative, got {0}")]
    InvalidMinSpeed(f32),

    #[error("jitter bound must be non-negative, got {0}")]
    InvalidJitter(f32),
}
