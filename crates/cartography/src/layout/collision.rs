//! Overlap correction after coordinate assignment.

use log::{debug, warn};

use cartography_core::geometry::Point;

use crate::layout::NodeLayout;

/// Minimum gap kept between node boxes.
const DEFAULT_MARGIN: f32 = 10.0;

/// Push distance as a fraction of the moved node's width.
const PUSH_FACTOR: f32 = 0.2;

/// Upper bound on relaxation passes.
const DEFAULT_MAX_PASSES: usize = 100;

/// Separates overlapping node boxes.
///
/// Every pass checks all pairs in graph order and pushes the second node of an
/// overlapping pair away from the first along the line between their centers.
/// Passes repeat until one finds no overlap or the pass bound is reached. Any
/// node still overlapping after the last pass is moved past the right edge of
/// the diagram, so the result always honours the margin. Before that step,
/// coordinates are shifted so that no node lies at negative x or y.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver {
    margin: f32,
    max_passes: usize,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Set the minimum gap between nodes
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the maximum number of relaxation passes
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Resolves overlaps in place. Returns the number of passes that moved nodes.
    pub fn resolve(&self, nodes: &mut [NodeLayout]) -> usize {
        let mut passes = 0;
        while passes < self.max_passes && self.relax(nodes) {
            passes += 1;
        }

        Self::normalize(nodes);
        let relocated = self.relocate_remaining(nodes);
        if relocated > 0 {
            warn!(relocated, passes; "Overlaps left after relaxation, relocating nodes");
        }

        debug!(passes, relocated; "Collisions resolved");
        passes
    }

    /// Runs one pass over all pairs. Returns true if any node moved.
    fn relax(&self, nodes: &mut [NodeLayout]) -> bool {
        let mut moved = false;
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                if !nodes[i]
                    .bounds()
                    .overlaps_with_margin(&nodes[j].bounds(), self.margin)
                {
                    continue;
                }

                let delta = nodes[j].center().sub_point(nodes[i].center());
                let distance = delta.hypot();
                let direction = if distance < 1.0 {
                    // Coincident centers: push along x.
                    Point::new(1.0, 0.0)
                } else {
                    delta.scale(1.0 / distance)
                };
                let push = nodes[j].size().width() * PUSH_FACTOR;
                let position = nodes[j].position().add_point(direction.scale(push));
                nodes[j].set_position(position);
                moved = true;
            }
        }
        moved
    }

    /// Moves every node that still overlaps an earlier one past the right edge
    /// of all nodes. Returns the number of relocated nodes.
    fn relocate_remaining(&self, nodes: &mut [NodeLayout]) -> usize {
        let mut relocated = 0;
        for j in 1..nodes.len() {
            let overlapping = (0..j).any(|i| {
                nodes[i]
                    .bounds()
                    .overlaps_with_margin(&nodes[j].bounds(), self.margin)
            });
            if !overlapping {
                continue;
            }
            let right_edge = nodes
                .iter()
                .map(|node| node.bounds().max_x())
                .fold(f32::MIN, f32::max);
            let position = nodes[j].position().with_x(right_edge + self.margin);
            nodes[j].set_position(position);
            relocated += 1;
        }
        relocated
    }

    /// Shifts all nodes so that the smallest coordinates are not negative.
    fn normalize(nodes: &mut [NodeLayout]) {
        let (min_x, min_y) = nodes.iter().fold((0.0f32, 0.0f32), |(x, y), node| {
            (x.min(node.position().x()), y.min(node.position().y()))
        });
        if min_x >= 0.0 && min_y >= 0.0 {
            return;
        }
        let shift = Point::new(-min_x, -min_y);
        for node in nodes {
            let position = node.position().add_point(shift);
            node.set_position(position);
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cartography_core::geometry::Size;

    use super::*;

    fn node(x: f32, y: f32) -> NodeLayout {
        NodeLayout::new(0, Point::new(x, y), Size::new(100.0, 50.0))
    }

    fn assert_separated(nodes: &[NodeLayout], margin: f32) {
        for i in 0..nodes.len() {
            for j in i + 1..nodes.len() {
                assert!(
                    !nodes[i]
                        .bounds()
                        .overlaps_with_margin(&nodes[j].bounds(), margin),
                    "nodes {i} and {j} overlap: {:?} {:?}",
                    nodes[i],
                    nodes[j]
                );
            }
        }
    }

    #[test]
    fn test_separated_nodes_untouched() {
        let mut nodes = vec![node(0.0, 0.0), node(200.0, 0.0)];
        let before = nodes.clone();

        let passes = CollisionResolver::new().resolve(&mut nodes);

        assert_eq!(passes, 0);
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_overlap_pushes_second_node() {
        let mut nodes = vec![node(0.0, 0.0), node(50.0, 0.0)];

        CollisionResolver::new().resolve(&mut nodes);

        assert_eq!(nodes[0].position(), Point::new(0.0, 0.0));
        assert!(nodes[1].position().x() >= 110.0);
        assert_eq!(nodes[1].position().y(), 0.0);
        assert_separated(&nodes, 10.0);
    }

    #[test]
    fn test_coincident_nodes() {
        let mut nodes = vec![node(0.0, 0.0), node(0.0, 0.0), node(0.0, 0.0)];

        CollisionResolver::new().resolve(&mut nodes);

        assert_separated(&nodes, 10.0);
    }

    #[test]
    fn test_fallback_relocation_with_single_pass() {
        let mut nodes = vec![node(0.0, 0.0), node(5.0, 5.0), node(10.0, 0.0)];

        CollisionResolver::new()
            .with_max_passes(1)
            .resolve(&mut nodes);

        assert_separated(&nodes, 10.0);
    }

    #[test]
    fn test_negative_coordinates_normalized() {
        let mut nodes = vec![node(-30.0, -20.0), node(200.0, 0.0)];

        CollisionResolver::new().resolve(&mut nodes);

        assert_eq!(nodes[0].position(), Point::new(0.0, 0.0));
        assert_eq!(nodes[1].position(), Point::new(230.0, 20.0));
    }
}
