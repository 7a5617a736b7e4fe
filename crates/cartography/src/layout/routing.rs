//! Edge path geometry.
//!
//! Every edge gets a start anchor on the source boundary and an end point a
//! fixed clearance away from the target boundary, leaving room for the
//! arrowhead. Edges arriving on the same side of a node have their end anchors
//! spread symmetrically about the side's center. The path shape is chosen in
//! this order:
//!
//! 1. endpoints in the same layer: an orthogonal path through a channel beyond
//!    the layer;
//! 2. the straight line crosses another node: a detour through a side
//!    waypoint, drawn as two Bezier curves;
//! 3. endpoints closer than [`STRAIGHT_THRESHOLD`]: a straight line;
//! 4. otherwise a single Bezier curve bent along the main axis.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use cartography_core::geometry::{Bounds, Point, sample_cubic_bezier};

use crate::{
    layout::{EdgeLayout, LayoutOptions, NodeLayout, PathShape},
    structure::Graph,
};

/// Gap between an edge's end point and the target boundary.
pub const ARROW_CLEARANCE: f32 = 10.0;

/// Endpoints closer than this are joined by a straight line.
pub const STRAIGHT_THRESHOLD: f32 = 50.0;

/// Maximum distance between neighbouring end anchors on one side.
const MAX_ANCHOR_SPACING: f32 = 30.0;

/// Fraction of a side's length available for spreading anchors.
const ANCHOR_SPREAD: f32 = 0.8;

/// Margin around third nodes when testing for obstruction.
const OBSTACLE_MARGIN: f32 = 20.0;

/// Bezier control offset as a fraction of the main-axis delta.
const CURVE_FACTOR: f32 = 0.4;

/// Upper bound of the Bezier control offset.
const MAX_CURVE_OFFSET: f32 = 100.0;

/// Number of Bezier sampling intervals.
const CURVE_STEPS: usize = 25;

/// Side of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Unit vector pointing away from the box.
    fn outward(self) -> Point {
        match self {
            Side::Top => Point::new(0.0, -1.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
            Side::Right => Point::new(1.0, 0.0),
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    fn length(self, bounds: Bounds) -> f32 {
        if self.is_horizontal() {
            bounds.width()
        } else {
            bounds.height()
        }
    }

    /// Point on this side, `offset` away from the side's midpoint.
    fn anchor(self, bounds: Bounds, offset: f32) -> Point {
        let center = bounds.center();
        match self {
            Side::Top => Point::new(center.x() + offset, bounds.min_y()),
            Side::Bottom => Point::new(center.x() + offset, bounds.max_y()),
            Side::Left => Point::new(bounds.min_x(), center.y() + offset),
            Side::Right => Point::new(bounds.max_x(), center.y() + offset),
        }
    }

    /// Coordinate of `point` along this side.
    fn along(self, point: Point) -> f32 {
        if self.is_horizontal() {
            point.x()
        } else {
            point.y()
        }
    }
}

/// An edge whose endpoints both have a layout.
struct Plan<'a> {
    from: &'a str,
    to: &'a str,
    source: NodeLayout,
    target: NodeLayout,
    source_side: Side,
    target_side: Side,
}

impl Plan<'_> {
    fn same_layer(&self) -> bool {
        self.source.layer() == self.target.layer()
    }
}

/// Computes point paths for the edges of a graph.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRouter {
    options: LayoutOptions,
}

impl EdgeRouter {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Routes every edge of `graph` whose endpoints appear in `nodes`.
    ///
    /// Output follows the edge order of the graph and is fully determined by
    /// its inputs.
    pub fn route(&self, graph: &Graph, nodes: &IndexMap<String, NodeLayout>) -> Vec<EdgeLayout> {
        let plans: Vec<Plan<'_>> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = *nodes.get(edge.from())?;
                let target = *nodes.get(edge.to())?;
                let target_side = self.target_side(&source, &target);
                let source_side = if source.layer() == target.layer() {
                    target_side
                } else {
                    target_side.opposite()
                };
                Some(Plan {
                    from: edge.from(),
                    to: edge.to(),
                    source,
                    target,
                    source_side,
                    target_side,
                })
            })
            .collect();

        let offsets = Self::anchor_offsets(&plans);
        let channels = self.layer_channels(nodes);

        let routed: Vec<EdgeLayout> = plans
            .iter()
            .zip(offsets)
            .map(|(plan, offset)| self.route_one(plan, offset, nodes, &channels))
            .collect();

        debug!(
            edges = routed.len(),
            detours = routed.iter().filter(|e| e.shape() == PathShape::Detour).count();
            "Edges routed"
        );
        routed
    }

    /// Picks the side of `target` that faces `source`.
    fn target_side(&self, source: &NodeLayout, target: &NodeLayout) -> Side {
        let (s, t) = (source.bounds(), target.bounds());
        if source.layer() == target.layer() {
            return if self.options.direction.is_vertical() {
                Side::Bottom
            } else {
                Side::Right
            };
        }

        if self.options.direction.is_vertical() {
            if t.min_y() >= s.max_y() {
                Side::Top
            } else if t.max_y() <= s.min_y() {
                Side::Bottom
            } else if t.center().x() >= s.center().x() {
                Side::Left
            } else {
                Side::Right
            }
        } else if t.min_x() >= s.max_x() {
            Side::Left
        } else if t.max_x() <= s.min_x() {
            Side::Right
        } else if t.center().y() >= s.center().y() {
            Side::Top
        } else {
            Side::Bottom
        }
    }

    /// Returns the end-anchor offset of every plan.
    ///
    /// Plans sharing a target side are ordered by the position of their source
    /// along that side and spread symmetrically about its midpoint.
    fn anchor_offsets(plans: &[Plan<'_>]) -> Vec<f32> {
        let mut groups: HashMap<(&str, Side), Vec<usize>> = HashMap::new();
        for (index, plan) in plans.iter().enumerate() {
            groups
                .entry((plan.to, plan.target_side))
                .or_default()
                .push(index);
        }

        let mut offsets = vec![0.0; plans.len()];
        for ((_, side), mut members) in groups {
            let count = members.len();
            if count < 2 {
                continue;
            }
            members.sort_by(|&a, &b| {
                let pa = side.along(plans[a].source.center());
                let pb = side.along(plans[b].source.center());
                pa.total_cmp(&pb).then_with(|| a.cmp(&b))
            });

            let length = side.length(plans[members[0]].target.bounds());
            let spacing =
                MAX_ANCHOR_SPACING.min(length * ANCHOR_SPREAD / (count - 1) as f32);
            let span = (count - 1) as f32 * spacing;
            for (slot, index) in members.into_iter().enumerate() {
                offsets[index] = slot as f32 * spacing - span / 2.0;
            }
        }
        offsets
    }

    /// Main-axis coordinate of the routing channel beyond each layer.
    fn layer_channels(&self, nodes: &IndexMap<String, NodeLayout>) -> HashMap<usize, f32> {
        let vertical = self.options.direction.is_vertical();
        let gap = (self.options.main_spacing() / 2.0).max(2.0 * ARROW_CLEARANCE);

        let mut channels: HashMap<usize, f32> = HashMap::new();
        for node in nodes.values() {
            let bounds = node.bounds();
            let far = if vertical {
                bounds.max_y()
            } else {
                bounds.max_x()
            };
            let channel = channels.entry(node.layer()).or_insert(f32::MIN);
            *channel = channel.max(far + gap);
        }
        channels
    }

    fn route_one(
        &self,
        plan: &Plan<'_>,
        offset: f32,
        nodes: &IndexMap<String, NodeLayout>,
        channels: &HashMap<usize, f32>,
    ) -> EdgeLayout {
        let start = plan.source_side.anchor(plan.source.bounds(), 0.0);
        let end = plan
            .target_side
            .anchor(plan.target.bounds(), offset)
            .add_point(plan.target_side.outward().scale(ARROW_CLEARANCE));

        let (points, shape) = if plan.same_layer() {
            let channel = channels
                .get(&plan.source.layer())
                .copied()
                .unwrap_or_default();
            (self.orthogonal(start, end, channel), PathShape::Orthogonal)
        } else if let Some(obstacles) = Self::obstacles(plan, start, end, nodes) {
            (self.detour(start, end, obstacles), PathShape::Detour)
        } else if start.distance(end) < STRAIGHT_THRESHOLD {
            (vec![start, end], PathShape::Straight)
        } else {
            (self.curve(start, end), PathShape::Curved)
        };

        trace!(from = plan.from, to = plan.to, shape:? = shape; "Edge routed");
        EdgeLayout::new(plan.from, plan.to, points, shape)
    }

    /// Three-segment path leaving and re-entering through the layer channel.
    fn orthogonal(&self, start: Point, end: Point, channel: f32) -> Vec<Point> {
        if self.options.direction.is_vertical() {
            vec![start, start.with_y(channel), end.with_y(channel), end]
        } else {
            vec![start, start.with_x(channel), end.with_x(channel), end]
        }
    }

    /// Returns the union of the expanded bounds of every third node that the
    /// straight segment crosses, or `None` if the segment is clear.
    fn obstacles(
        plan: &Plan<'_>,
        start: Point,
        end: Point,
        nodes: &IndexMap<String, NodeLayout>,
    ) -> Option<Bounds> {
        nodes
            .iter()
            .filter(|(id, _)| id.as_str() != plan.from && id.as_str() != plan.to)
            .map(|(_, node)| node.bounds().expand(OBSTACLE_MARGIN))
            .filter(|bounds| bounds.intersects_segment(start, end))
            .reduce(|union, bounds| union.merge(&bounds))
    }

    /// Two curves joined at a waypoint beside the obstacles.
    ///
    /// The waypoint sits at the midpoint along the main axis and on the side of
    /// the obstacles nearest to the midpoint across it. A tie goes to the side
    /// the edge is heading towards. The low side is never used when it lies
    /// below zero, so paths stay inside the layout.
    fn detour(&self, start: Point, end: Point, obstacles: Bounds) -> Vec<Point> {
        let mid = start.midpoint(end);
        let waypoint = if self.options.direction.is_vertical() {
            let x = Self::pick_side(
                mid.x(),
                obstacles.min_x(),
                obstacles.max_x(),
                start.x() <= end.x(),
            );
            mid.with_x(x)
        } else {
            let y = Self::pick_side(
                mid.y(),
                obstacles.min_y(),
                obstacles.max_y(),
                start.y() <= end.y(),
            );
            mid.with_y(y)
        };

        let mut points = self.curve(start, waypoint);
        points.extend(self.curve(waypoint, end).into_iter().skip(1));
        points
    }

    fn pick_side(mid: f32, low: f32, high: f32, prefer_high: bool) -> f32 {
        if low < 0.0 {
            return high;
        }
        let (to_low, to_high) = ((mid - low).abs(), (high - mid).abs());
        if to_low < to_high || (to_low == to_high && !prefer_high) {
            low
        } else {
            high
        }
    }

    /// Samples a cubic Bezier from `start` to `end` whose control points are
    /// pulled along the main axis.
    fn curve(&self, start: Point, end: Point) -> Vec<Point> {
        let delta = end.sub_point(start);
        let main = if self.options.direction.is_vertical() {
            delta.y()
        } else {
            delta.x()
        };
        let pull = (main.abs() * CURVE_FACTOR).min(MAX_CURVE_OFFSET) * main.signum();
        let pull = if self.options.direction.is_vertical() {
            Point::new(0.0, pull)
        } else {
            Point::new(pull, 0.0)
        };

        sample_cubic_bezier(
            start,
            start.add_point(pull),
            end.sub_point(pull),
            end,
            CURVE_STEPS,
        )
    }
}
