//! Quadtree over point snapshots
//!
//! The tree lives for one simulation tick: sized to the world bounds,
//! filled with every entity's current position, queried around the bodies
//! that need collision checks, then dropped. Nodes sit in a flat arena
//! addressed by `NodeId` instead of owning boxed children, which keeps
//! every walk an iterative worklist and makes the depth ceiling cheap to
//! enforce.
//!
//! Two deliberate quirks, both part of the contract rather than bugs:
//! - A point exactly on a split line is routed to every child whose region
//!   contains it, so it can be stored (and reported) more than once.
//! - A query reports whole leaves without per-point filtering; the result
//!   is a superset of the points truly inside the query region and callers
//!   must narrow-phase it.

use glam::Vec2;

use super::rect::Rect;
use super::DrawRegions;
use crate::error::SimError;

/// Snapshot of one entity's position at insert time. The index never owns
/// entity state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRef {
    pub id: u32,
    pub pos: Vec2,
}

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    const fn get(self) -> usize {
        self.0 as usize
    }
}

/// One region of the tree: a leaf holding points, or an internal node
/// holding exactly four children and no points of its own.
#[derive(Debug, Clone)]
struct Node {
    bounds: Rect,
    depth: u32,
    /// `Some` once split; the node never holds points again after that.
    children: Option<[NodeId; 4]>,
    points: Vec<PointRef>,
}

impl Node {
    fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            children: None,
            points: Vec::new(),
        }
    }
}

/// Broad-phase spatial index for point entities.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    capacity: usize,
    max_depth: u32,
}

impl QuadTree {
    /// A leaf root covering `bounds`.
    ///
    /// Fails fast on a capacity below 1 or negative extents; a rejected
    /// tree never exists, so no partial state can be inserted into.
    pub fn new(bounds: Rect, capacity: usize, max_depth: u32) -> Result<Self, SimError> {
        if capacity < 1 {
            return Err(SimError::InvalidCapacity(capacity));
        }
        if bounds.width < 0.0 || bounds.height < 0.0 {
            return Err(SimError::InvalidRegion {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self {
            nodes: vec![Node::leaf(bounds, 0)],
            capacity,
            max_depth,
        })
    }

    /// Insert one point snapshot.
    ///
    /// Positions outside the root region are dropped silently. A leaf at
    /// capacity splits and the insertion retries against its children; a
    /// leaf at the depth ceiling accepts excess points instead, so fully
    /// coincident clusters can't subdivide forever.
    pub fn insert(&mut self, id: u32, pos: Vec2) {
        let mut pending = vec![NodeId::ROOT];
        while let Some(nid) = pending.pop() {
            let node = &self.nodes[nid.get()];
            if !node.bounds.contains(pos) {
                continue;
            }
            if let Some(children) = node.children {
                // Routed to every containing child; exactly one except for
                // points sitting on a split line.
                pending.extend(children);
                continue;
            }
            if node.points.len() < self.capacity || node.depth >= self.max_depth {
                self.nodes[nid.get()].points.push(PointRef { id, pos });
            } else {
                self.split(nid);
                pending.push(nid);
            }
        }
    }

    /// Leaf -> internal transition: four equal quadrants, held points
    /// re-routed into them. Only ever invoked on a leaf at capacity.
    fn split(&mut self, nid: NodeId) {
        debug_assert!(
            self.nodes[nid.get()].children.is_none(),
            "split called on an internal node"
        );
        let bounds = self.nodes[nid.get()].bounds;
        let child_depth = self.nodes[nid.get()].depth + 1;
        let (hw, hh) = (bounds.width / 2.0, bounds.height / 2.0);

        let quadrants = [
            Rect::new(bounds.x, bounds.y, hw, hh),
            Rect::new(bounds.x + hw, bounds.y, hw, hh),
            Rect::new(bounds.x, bounds.y + hh, hw, hh),
            Rect::new(bounds.x + hw, bounds.y + hh, hw, hh),
        ];
        let base = self.nodes.len() as u32;
        let children = [
            NodeId(base),
            NodeId(base + 1),
            NodeId(base + 2),
            NodeId(base + 3),
        ];
        for quadrant in quadrants {
            self.nodes.push(Node::leaf(quadrant, child_depth));
        }

        let drained = std::mem::take(&mut self.nodes[nid.get()].points);
        self.nodes[nid.get()].children = Some(children);
        for point in drained {
            for child in children {
                if self.nodes[child.get()].bounds.contains(point.pos) {
                    self.nodes[child.get()].points.push(point);
                }
            }
        }
    }

    /// Broad-phase candidates for `region`.
    ///
    /// Subtrees whose region doesn't intersect are pruned entirely; every
    /// point of an intersecting leaf is reported without checking it
    /// against `region`. No false negatives, false positives allowed.
    pub fn query(&self, region: &Rect) -> Vec<PointRef> {
        let mut out = Vec::new();
        self.query_into(region, &mut out);
        out
    }

    /// `query` into a caller-owned buffer, for reuse across ticks.
    pub fn query_into(&self, region: &Rect, out: &mut Vec<PointRef>) {
        let mut pending = vec![NodeId::ROOT];
        while let Some(nid) = pending.pop() {
            let node = &self.nodes[nid.get()];
            if !node.bounds.intersects(region) {
                continue;
            }
            match node.children {
                Some(children) => pending.extend(children),
                None => out.extend_from_slice(&node.points),
            }
        }
    }

    /// Total stored points. Boundary ties count once per leaf holding them.
    pub fn point_count(&self) -> usize {
        self.nodes.iter().map(|n| n.points.len()).sum()
    }

    /// Arena size: 1 for a never-split tree, then +4 per split.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl DrawRegions for QuadTree {
    fn draw(&self, visitor: &mut dyn FnMut(&Rect, u32)) {
        let mut pending = vec![NodeId::ROOT];
        while let Some(nid) = pending.pop() {
            let node = &self.nodes[nid.get()];
            visitor(&node.bounds, node.depth);
            if let Some(children) = node.children {
                // Reversed so the walk visits children in creation order.
                for child in children.iter().rev() {
                    pending.push(*child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    /// 11 distinct points spread over all four quadrants, none on a split
    /// boundary of the 100x100 world.
    fn spread_points() -> Vec<Vec2> {
        [
            (10.0, 10.0),
            (20.0, 15.0),
            (30.0, 80.0),
            (80.0, 20.0),
            (70.0, 70.0),
            (15.0, 60.0),
            (60.0, 15.0),
            (85.0, 85.0),
            (40.0, 40.0),
            (60.0, 60.0),
            (25.0, 75.0),
        ]
        .iter()
        .map(|&(x, y)| Vec2::new(x, y))
        .collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            QuadTree::new(world(), 0, 8).unwrap_err(),
            SimError::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_negative_extents_rejected() {
        let err = QuadTree::new(Rect::new(0.0, 0.0, -10.0, 50.0), 4, 8).unwrap_err();
        assert!(matches!(err, SimError::InvalidRegion { .. }));
    }

    #[test]
    fn test_capacity_plus_one_triggers_exactly_one_split() {
        let mut tree = QuadTree::new(world(), 10, 8).unwrap();
        let points = spread_points();

        for (i, p) in points.iter().take(10).enumerate() {
            tree.insert(i as u32, *p);
        }
        assert_eq!(tree.node_count(), 1, "no split while at capacity");

        tree.insert(10, points[10]);
        assert_eq!(tree.node_count(), 5, "one split adds four children");

        let ids: HashSet<u32> = tree.query(&world()).iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn test_out_of_bounds_insert_is_invisible() {
        let mut tree = QuadTree::new(world(), 10, 8).unwrap();
        tree.insert(7, Vec2::new(150.0, 150.0));
        assert_eq!(tree.point_count(), 0);
        assert!(tree.query(&world()).is_empty());
    }

    #[test]
    fn test_boundary_point_lands_in_every_touching_child() {
        let mut tree = QuadTree::new(world(), 2, 8).unwrap();
        tree.insert(0, Vec2::new(10.0, 10.0));
        tree.insert(1, Vec2::new(90.0, 90.0));
        // Third insert splits the root; (50,50) is the shared corner of all
        // four quadrants.
        tree.insert(2, Vec2::new(50.0, 50.0));

        let copies = tree
            .query(&world())
            .iter()
            .filter(|p| p.id == 2)
            .count();
        assert_eq!(copies, 4);
        assert_eq!(tree.point_count(), 6);
    }

    #[test]
    fn test_depth_ceiling_stops_coincident_recursion() {
        let mut tree = QuadTree::new(world(), 1, 2).unwrap();
        for i in 0..5 {
            tree.insert(i, Vec2::new(10.0, 10.0));
        }
        // Capacity is relaxed at the ceiling instead of subdividing forever.
        assert!(tree.node_count() <= 1 + 4 + 16);
        assert_eq!(tree.query(&world()).len(), 5);
    }

    #[test]
    fn test_query_prunes_disjoint_subtrees() {
        let mut tree = QuadTree::new(world(), 1, 8).unwrap();
        tree.insert(0, Vec2::new(10.0, 10.0));
        tree.insert(1, Vec2::new(90.0, 90.0));

        let hits = tree.query(&Rect::new(80.0, 80.0, 15.0, 15.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_query_reports_whole_leaves() {
        // Never-split root: a tiny query that intersects it reports every
        // held point, including ones far outside the query region.
        let mut tree = QuadTree::new(world(), 10, 8).unwrap();
        tree.insert(0, Vec2::new(10.0, 10.0));
        tree.insert(1, Vec2::new(90.0, 90.0));

        let hits = tree.query(&Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_draw_walks_every_region() {
        let mut tree = QuadTree::new(world(), 2, 8).unwrap();
        for (i, p) in spread_points().iter().enumerate() {
            tree.insert(i as u32, *p);
        }

        let mut regions = Vec::new();
        tree.draw(&mut |bounds, depth| regions.push((*bounds, depth)));
        assert_eq!(regions.len(), tree.node_count());
        assert_eq!(regions[0], (world(), 0), "walk starts at the root");
    }

    /// Points at quarter-offsets are exactly representable and never land on
    /// a split boundary down to depth 3 (boundaries are multiples of 12.5).
    fn off_boundary_coord() -> impl Strategy<Value = f32> {
        (0u32..200).prop_map(|k| k as f32 * 0.5 + 0.25)
    }

    proptest! {
        #[test]
        fn query_never_misses_contained_points(
            points in prop::collection::vec((0.0f32..100.0, 0.0f32..100.0), 0..64),
            qx in 0.0f32..100.0,
            qy in 0.0f32..100.0,
            qw in 0.0f32..60.0,
            qh in 0.0f32..60.0,
        ) {
            let mut tree = QuadTree::new(world(), 4, 8).unwrap();
            for (i, &(x, y)) in points.iter().enumerate() {
                tree.insert(i as u32, Vec2::new(x, y));
            }

            let region = Rect::new(qx, qy, qw, qh);
            let hits: HashSet<u32> = tree.query(&region).iter().map(|p| p.id).collect();
            for (i, &(x, y)) in points.iter().enumerate() {
                if region.contains(Vec2::new(x, y)) {
                    prop_assert!(hits.contains(&(i as u32)), "lost point {i} at ({x},{y})");
                }
            }
        }

        #[test]
        fn off_boundary_points_are_stored_exactly_once(
            points in prop::collection::vec((off_boundary_coord(), off_boundary_coord()), 0..64),
        ) {
            let mut tree = QuadTree::new(world(), 4, 3).unwrap();
            for (i, &(x, y)) in points.iter().enumerate() {
                tree.insert(i as u32, Vec2::new(x, y));
            }

            let hits = tree.query(&world());
            prop_assert_eq!(hits.len(), points.len());
            let ids: HashSet<u32> = hits.iter().map(|p| p.id).collect();
            prop_assert_eq!(ids.len(), points.len());
        }

        #[test]
        fn rebuild_with_same_sequence_matches(
            points in prop::collection::vec((0.0f32..100.0, 0.0f32..100.0), 0..48),
            qx in 0.0f32..100.0,
            qy in 0.0f32..100.0,
        ) {
            let mut a = QuadTree::new(world(), 4, 8).unwrap();
            let mut b = QuadTree::new(world(), 4, 8).unwrap();
            for (i, &(x, y)) in points.iter().enumerate() {
                a.insert(i as u32, Vec2::new(x, y));
                b.insert(i as u32, Vec2::new(x, y));
            }

            let region = Rect::new(qx, qy, 30.0, 30.0);
            let mut hits_a: Vec<u32> = a.query(&region).iter().map(|p| p.id).collect();
            let mut hits_b: Vec<u32> = b.query(&region).iter().map(|p| p.id).collect();
            hits_a.sort_unstable();
            hits_b.sort_unstable();
            prop_assert_eq!(hits_a, hits_b);
        }
    }
}
