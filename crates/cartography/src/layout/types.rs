use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use cartography_core::geometry::{Bounds, Point, Size};

use crate::error::CartographyError;

/// Flow direction of the layer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopToBottom,
    #[serde(rename = "BT", alias = "bt")]
    BottomToTop,
    #[serde(rename = "LR", alias = "lr")]
    LeftToRight,
    #[serde(rename = "RL", alias = "rl")]
    RightToLeft,
}

impl Direction {
    /// Returns true if layers stack along the y axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom | Direction::BottomToTop)
    }

    /// Returns true if layer 0 sits at the far end of the main axis.
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::BottomToTop | Direction::RightToLeft)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::LeftToRight => "LR",
            Direction::RightToLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CartographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(Direction::TopToBottom),
            "BT" => Ok(Direction::BottomToTop),
            "LR" => Ok(Direction::LeftToRight),
            "RL" => Ok(Direction::RightToLeft),
            _ => Err(CartographyError::InvalidDirection(s.to_string())),
        }
    }
}

/// Geometry parameters shared by the layout phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub node_size: Size,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl LayoutOptions {
    /// Spacing between consecutive layers.
    pub fn main_spacing(&self) -> f32 {
        if self.direction.is_vertical() {
            self.vertical_spacing
        } else {
            self.horizontal_spacing
        }
    }

    /// Spacing between neighbours within a layer.
    pub fn cross_spacing(&self) -> f32 {
        if self.direction.is_vertical() {
            self.horizontal_spacing
        } else {
            self.vertical_spacing
        }
    }

    /// Node extent along the layer axis.
    pub fn main_extent(&self) -> f32 {
        if self.direction.is_vertical() {
            self.node_size.height()
        } else {
            self.node_size.width()
        }
    }

    /// Node extent across the layer axis.
    pub fn cross_extent(&self) -> f32 {
        if self.direction.is_vertical() {
            self.node_size.width()
        } else {
            self.node_size.height()
        }
    }

    /// Returns a copy with both spacings multiplied by `factor`.
    pub fn scaled_spacing(self, factor: f32) -> Self {
        Self {
            horizontal_spacing: self.horizontal_spacing * factor,
            vertical_spacing: self.vertical_spacing * factor,
            ..self
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            node_size: Size::new(220.0, 160.0),
            horizontal_spacing: 140.0,
            vertical_spacing: 120.0,
        }
    }
}

/// Placement of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeLayout {
    layer: usize,
    /// Top-left corner.
    position: Point,
    size: Size,
}

impl NodeLayout {
    pub fn new(layer: usize, position: Point, size: Size) -> Self {
        Self {
            layer,
            position,
            size,
        }
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Returns the top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// How an edge path was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathShape {
    /// Two points.
    Straight,
    /// Axis-aligned polyline.
    Orthogonal,
    /// A sampled cubic Bezier curve.
    Curved,
    /// Two sampled Bezier curves joined at a side waypoint.
    Detour,
}

/// Routed geometry of a single edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    from: String,
    to: String,
    points: Vec<Point>,
    shape: PathShape,
}

impl EdgeLayout {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        points: Vec<Point>,
        shape: PathShape,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            points,
            shape,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Returns the path points, starting at the source anchor.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn shape(&self) -> PathShape {
        self.shape
    }

    /// Returns the first point of the path.
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Returns the last point of the path, where the arrowhead goes.
    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Computed diagram layout.
///
/// Node entries follow the node order of the originating graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    nodes: IndexMap<String, NodeLayout>,
    edges: Vec<EdgeLayout>,
    width: f32,
    height: f32,
    direction: Direction,
}

impl Layout {
    /// Creates a layout whose size covers every node plus one spacing unit.
    pub fn new(
        nodes: IndexMap<String, NodeLayout>,
        edges: Vec<EdgeLayout>,
        options: &LayoutOptions,
    ) -> Self {
        let (width, height) = content_size(&nodes, options);
        Self {
            nodes,
            edges,
            width,
            height,
            direction: options.direction,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &IndexMap<String, NodeLayout> {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeLayout] {
        &self.edges
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of distinct layers.
    pub fn layer_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| node.layer() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Returns `(width, height)`: the far edge of the furthest node plus one
/// spacing unit on each axis.
fn content_size(nodes: &IndexMap<String, NodeLayout>, options: &LayoutOptions) -> (f32, f32) {
    let (max_x, max_y) = nodes.values().fold((0.0f32, 0.0f32), |(x, y), node| {
        let bounds = node.bounds();
        (x.max(bounds.max_x()), y.max(bounds.max_y()))
    });
    (
        max_x + options.horizontal_spacing,
        max_y + options.vertical_spacing,
    )
}
