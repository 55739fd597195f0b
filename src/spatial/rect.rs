//! Axis-aligned rectangles for tree regions and queries
//!
//! Origin is the top-left corner (screen coordinates, y grows downward);
//! extents are non-negative by construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region spanning `half` on each side of `center`.
    pub fn from_center_extents(center: Vec2, half: Vec2) -> Self {
        Self {
            x: center.x - half.x,
            y: center.y - half.y,
            width: half.x * 2.0,
            height: half.y * 2.0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point containment, closed on all four edges.
    ///
    /// A point on a boundary shared by neighboring regions is inside both of
    /// them; quadtree boundary ties depend on this.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// AABB overlap test, closed edges.
    ///
    /// Touching counts as intersecting: a query rect that only grazes a leaf
    /// edge must still visit that leaf, or points sitting exactly on the
    /// edge would be missed.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_closed_on_edges() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(100.0, 50.0)));
        assert!(r.contains(Vec2::new(50.0, 0.0)));
        assert!(!r.contains(Vec2::new(100.1, 25.0)));
        assert!(!r.contains(Vec2::new(-0.1, 25.0)));
    }

    #[test]
    fn test_shared_boundary_is_in_both_neighbors() {
        let left = Rect::new(0.0, 0.0, 50.0, 100.0);
        let right = Rect::new(50.0, 0.0, 50.0, 100.0);
        let p = Vec2::new(50.0, 30.0);
        assert!(left.contains(p));
        assert!(right.contains(p));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(a.intersects(&Rect::new(25.0, 25.0, 50.0, 50.0)));
        assert!(a.intersects(&Rect::new(50.0, 0.0, 50.0, 50.0))); // touching edge
        assert!(!a.intersects(&Rect::new(51.0, 0.0, 50.0, 50.0)));
        assert!(!a.intersects(&Rect::new(0.0, 70.0, 10.0, 10.0)));
    }

    #[test]
    fn test_from_center_extents() {
        let r = Rect::from_center_extents(Vec2::new(50.0, 50.0), Vec2::splat(10.0));
        assert_eq!(r, Rect::new(40.0, 40.0, 20.0, 20.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
    }
}
