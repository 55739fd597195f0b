//! Broad-phase spatial index
//!
//! A quadtree over point snapshots, rebuilt from scratch every simulation
//! tick and dropped at the end of it. Queries return candidate supersets;
//! the narrow phase in `sim::collision` does the exact tests.

pub mod quadtree;
pub mod rect;

pub use quadtree::{PointRef, QuadTree};
pub use rect::Rect;

/// Capability for exposing debug geometry as rectangles.
///
/// Rendering collaborators consume this without knowing anything about the
/// tree layout; the index only exposes its own traversal.
pub trait DrawRegions {
    /// Visit every region depth-first, with its depth in the tree.
    fn draw(&self, visitor: &mut dyn FnMut(&Rect, u32));
}
