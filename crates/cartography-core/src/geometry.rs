//! Basic geometric types used by the layout engine.
//!
//! Positions in a diagram are expressed in a y-down coordinate space, the same
//! one SVG uses. [`Bounds`] is the axis-aligned box type that collision
//! detection and edge routing operate on.

use serde::Serialize;

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns a copy with the x-coordinate replaced
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    /// Returns a copy with the y-coordinate replaced
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns true when the gap between the two boxes is smaller than `margin`
    /// on both axes.
    ///
    /// Boxes are considered separated as soon as one axis has a gap of at least
    /// `margin`, so a margin of zero lets boxes touch without overlapping.
    pub fn overlaps_with_margin(&self, other: &Self, margin: f32) -> bool {
        !(self.max_x + margin <= other.min_x
            || other.max_x + margin <= self.min_x
            || self.max_y + margin <= other.min_y
            || other.max_y + margin <= self.min_y)
    }

    /// Returns true if the point lies inside or on the border of the bounds.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Tests whether the segment `a`-`b` crosses or touches the bounds.
    ///
    /// Uses parametric clipping of the segment against both slabs.
    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        let delta = b.sub_point(a);
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;

        for (start, d, lo, hi) in [
            (a.x, delta.x, self.min_x, self.max_x),
            (a.y, delta.y, self.min_y, self.max_y),
        ] {
            if d == 0.0 {
                if start < lo || start > hi {
                    return false;
                }
                continue;
            }
            let t1 = (lo - start) / d;
            let t2 = (hi - start) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

/// Evaluates a cubic Bezier curve at parameter `t` in `[0, 1]`.
pub fn cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    Point {
        x: mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
        y: mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
    }
}

/// Samples a cubic Bezier curve into `steps + 1` points.
///
/// The first and last points are exactly `p0` and `p3`.
pub fn sample_cubic_bezier(p0: Point, p1: Point, p2: Point, p3: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity(steps + 1);
    points.push(p0);
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        points.push(cubic_bezier(p0, p1, p2, p3, t));
    }
    points.push(p3);
    points
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_midpoint() {
        let midpoint = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(midpoint, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::new(1.0, 1.0).distance(Point::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_point_with_coordinates() {
        let point = Point::new(1.0, 2.0);
        assert_eq!(point.with_x(9.0), Point::new(9.0, 2.0));
        assert_eq!(point.with_y(9.0), Point::new(1.0, 9.0));
        assert_eq!(point.scale(2.0), Point::new(2.0, 4.0));
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(6.0, 8.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 16.0);
        assert_eq!(bounds.max_y(), 28.0);
        assert_eq!(bounds.width(), 6.0);
        assert_eq!(bounds.height(), 8.0);
        assert_eq!(bounds.center(), Point::new(13.0, 24.0));
        assert_eq!(bounds.min_point(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_bounds_merge_and_expand() {
        let a = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let b = Bounds::new_from_top_left(Point::new(3.0, 0.0), Size::new(5.0, 4.0));

        let merged = a.merge(&b);
        assert_eq!(merged.min_x(), 1.0);
        assert_eq!(merged.min_y(), 0.0);
        assert_eq!(merged.max_x(), 8.0);
        assert_eq!(merged.max_y(), 6.0);

        let expanded = a.expand(1.0);
        assert_eq!(expanded.min_x(), 0.0);
        assert_eq!(expanded.max_y(), 7.0);
    }

    #[test]
    fn test_bounds_overlap_with_margin() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let touching = Bounds::new_from_top_left(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
        let near = Bounds::new_from_top_left(Point::new(15.0, 0.0), Size::new(10.0, 10.0));
        let far = Bounds::new_from_top_left(Point::new(20.0, 0.0), Size::new(10.0, 10.0));

        assert!(!a.overlaps_with_margin(&touching, 0.0));
        assert!(a.overlaps_with_margin(&touching, 1.0));
        assert!(a.overlaps_with_margin(&near, 10.0));
        assert!(!a.overlaps_with_margin(&far, 10.0));
        assert!(!far.overlaps_with_margin(&a, 10.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(5.0, 5.0)));
        assert!(bounds.contains(Point::new(10.0, 0.0)));
        assert!(!bounds.contains(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_segment_crossing_bounds() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(10.0, 10.0));

        // Passes straight through
        assert!(bounds.intersects_segment(Point::new(0.0, 15.0), Point::new(30.0, 15.0)));
        // Vertical segment through the box
        assert!(bounds.intersects_segment(Point::new(15.0, 0.0), Point::new(15.0, 30.0)));
        // Vertical segment beside the box
        assert!(!bounds.intersects_segment(Point::new(25.0, 0.0), Point::new(25.0, 30.0)));
        // Diagonal that misses the corner
        assert!(!bounds.intersects_segment(Point::new(0.0, 8.0), Point::new(8.0, 0.0)));
        // Stops short of the box
        assert!(!bounds.intersects_segment(Point::new(0.0, 15.0), Point::new(5.0, 15.0)));
        // Degenerate segment inside
        assert!(bounds.intersects_segment(Point::new(12.0, 12.0), Point::new(12.0, 12.0)));
    }

    #[test]
    fn test_cubic_bezier_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(0.0, 40.0);
        let p2 = Point::new(100.0, 60.0);
        let p3 = Point::new(100.0, 100.0);

        assert_eq!(cubic_bezier(p0, p1, p2, p3, 0.0), p0);
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 1.0), p3);

        let mid = cubic_bezier(p0, p1, p2, p3, 0.5);
        assert_approx_eq!(f32, mid.x(), 50.0);
        assert_approx_eq!(f32, mid.y(), 50.0);
    }

    #[test]
    fn test_sample_cubic_bezier() {
        let p0 = Point::new(0.0, 0.0);
        let p3 = Point::new(0.0, 100.0);
        let points = sample_cubic_bezier(p0, p0, p3, p3, 25);

        assert_eq!(points.len(), 26);
        assert_eq!(points[0], p0);
        assert_eq!(points[25], p3);
        // Monotonic along a straight vertical curve
        assert!(points.windows(2).all(|w| w[0].y() <= w[1].y()));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), 1.0f32..500.0, 1.0f32..500.0)
            .prop_map(|(p, w, h)| Bounds::new_from_top_left(p, Size::new(w, h)))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A segment with an endpoint inside the bounds always intersects it.
    fn check_segment_with_inner_endpoint_intersects(
        bounds: Bounds,
        outside: Point,
    ) -> Result<(), TestCaseError> {
        let inner = bounds.center();
        prop_assert!(bounds.intersects_segment(inner, outside));
        prop_assert!(bounds.intersects_segment(outside, inner));
        Ok(())
    }

    /// Overlap is symmetric.
    fn check_overlap_is_symmetric(a: Bounds, b: Bounds, margin: f32) -> Result<(), TestCaseError> {
        prop_assert_eq!(
            a.overlaps_with_margin(&b, margin),
            b.overlaps_with_margin(&a, margin)
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn segment_with_inner_endpoint_intersects(bounds in bounds_strategy(), outside in point_strategy()) {
            check_segment_with_inner_endpoint_intersects(bounds, outside)?;
        }

        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy(), margin in 0.0f32..50.0) {
            check_overlap_is_symmetric(a, b, margin)?;
        }
    }
}
