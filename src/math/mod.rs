pub mod intersect_2d;
pub mod polygon_2d;
pub mod roots;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Numeric tunables of the simplification pipeline.
///
/// The defaults are the values the pipeline was calibrated with; they are
/// grouped here so a caller with unusually scaled input can adjust them
/// in one place.
#[derive(Debug, Clone, Copy)]
pub struct Epsilons {
    /// Vertices closer than this are fused into one.
    pub vertex: f64,
    /// Overlap parameter ranges shorter than this are ignored, and overlap
    /// endpoints this close to 0 or 1 are snapped to the exact endpoint.
    pub overlap_param: f64,
    /// Intersections where both parameters are this close to an endpoint
    /// count as a touch and do not split.
    pub endpoint_param: f64,
    /// Ray hits closer than this to the ray origin are discarded.
    pub ray_back_clip: f64,
    /// Line tangents within this of each other count as collinear when
    /// merging adjacent edges of the result graph.
    pub collinear_tangent: f64,
    /// Direction of the boundary-classification ray, chosen off-axis so
    /// axis-aligned input does not produce tangent hits.
    pub extreme_ray_angle: f64,
}

impl Epsilons {
    pub const DEFAULT: Self = Self {
        vertex: 1e-5,
        overlap_param: 1e-5,
        endpoint_param: 1e-5,
        ray_back_clip: 1e-8,
        collinear_tangent: 1e-6,
        extreme_ray_angle: 1.572_965_7,
    };
}

impl Default for Epsilons {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb {
    /// Creates a box spanning a single point.
    #[must_use]
    pub fn from_point(p: &Point2) -> Self {
        Self { min: *p, max: *p }
    }

    /// Creates the smallest box containing all given points.
    ///
    /// Returns a point box at the origin for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::from_point(&Point2::origin());
        };
        let mut aabb = Self::from_point(first);
        for p in rest {
            aabb.include(p);
        }
        aabb
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Union of two boxes.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Checks if two boxes overlap, with a symmetric tolerance.
    #[must_use]
    pub fn overlaps(&self, other: &Self, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && self.max.x >= other.min.x - tolerance
            && self.min.y <= other.max.y + tolerance
            && self.max.y >= other.min.y - tolerance
    }

    /// Longest side of the box.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        (self.max.x - self.min.x).max(self.max.y - self.min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_sign() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert!((cross_2d(&x, &y) - 1.0).abs() < TOLERANCE);
        assert!((cross_2d(&y, &x) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn aabb_from_points_and_overlap() {
        let a = Aabb::from_points(&[Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)]);
        let b = Aabb::from_points(&[Point2::new(1.0, 0.5), Point2::new(3.0, 2.0)]);
        let c = Aabb::from_points(&[Point2::new(5.0, 5.0), Point2::new(6.0, 6.0)]);
        assert!(a.overlaps(&b, 0.0));
        assert!(!a.overlaps(&c, 0.0));
        assert!((a.max_extent() - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn aabb_merge() {
        let a = Aabb::from_point(&Point2::new(1.0, 1.0));
        let b = Aabb::from_point(&Point2::new(-1.0, 2.0));
        let m = a.merged(&b);
        assert!((m.min.x + 1.0).abs() < TOLERANCE);
        assert!((m.max.y - 2.0).abs() < TOLERANCE);
    }
}
