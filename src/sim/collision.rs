//! Narrow-phase circle collision and response
//!
//! Consumes the broad-phase candidate list from a quadtree query and
//! computes the velocity/position response for each pair that actually
//! overlaps. Penetration is resolved by direct placement rather than
//! impulses: the candidate is pushed out to exact tangency along the
//! center-to-center normal.

use glam::Vec2;
use rand::Rng;

use crate::config::SimConfig;
use crate::error::SimError;

/// A circle body: the probe or a fetched candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// New placement for a resolved candidate, written back through the
/// external entity store by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Exact overlap test: center distance below the radius sum.
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let sum = a_radius + b_radius;
    a.distance_squared(b) < sum * sum
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve one probe/candidate pair.
///
/// Broad-phase candidates are a superset, so `Ok(None)` means the circles
/// don't actually overlap. On overlap the candidate is placed exactly
/// `r_probe + r_candidate` from the probe along the normal, its velocity
/// (combined with the probe's) is reflected across the normal, damped,
/// rescaled up to the floor speed if it fell below it, and finally rotated
/// by a bounded random angle so repeated bounces don't retrace each other.
///
/// Zero or negative radii are a precondition violation and are rejected
/// here, before any of the math runs.
pub fn resolve(
    probe: &Body,
    candidate: &Body,
    cfg: &SimConfig,
    rng: &mut impl Rng,
) -> Result<Option<Resolution>, SimError> {
    if probe.radius <= 0.0 {
        return Err(SimError::InvalidRadius(probe.radius));
    }
    if candidate.radius <= 0.0 {
        return Err(SimError::InvalidRadius(candidate.radius));
    }
    if !circles_overlap(probe.pos, probe.radius, candidate.pos, candidate.radius) {
        return Ok(None);
    }

    // Coincident centers leave the normal undefined; push along +X instead
    // of propagating NaN.
    let normal = (candidate.pos - probe.pos).normalize_or_zero();
    let normal = if normal == Vec2::ZERO { Vec2::X } else { normal };

    let separation = probe.radius + candidate.radius;
    let pos = probe.pos + normal * separation;

    let combined = candidate.vel + probe.vel;
    let mut vel = reflect_velocity(combined, normal) * cfg.damping;

    // Floor keeps particles lively after repeated damped bounces. A zero
    // vector has no direction to preserve, so it leaves along the normal.
    let speed = vel.length();
    if speed < cfg.min_speed {
        vel = if speed > 0.0 {
            vel / speed * cfg.min_speed
        } else {
            normal * cfg.min_speed
        };
    }

    // Cosmetic, non-physical: a bounded uniform rotation per call.
    let jitter = rng.random_range(-cfg.max_jitter..=cfg.max_jitter);
    vel = Vec2::from_angle(jitter).rotate(vel);

    Ok(Some(Resolution { pos, vel }))
}
