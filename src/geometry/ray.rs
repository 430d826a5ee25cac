use crate::math::{Point2, Vector2};

/// A half-infinite ray used for winding queries and boundary classification.
///
/// The direction is kept unit length so hit distances are Euclidean.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point2,
    pub direction: Vector2,
}

impl Ray {
    /// Creates a ray; the direction is normalized.
    #[must_use]
    pub fn new(origin: Point2, direction: Vector2) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a ray pointing along the given angle (radians, CCW from +x).
    #[must_use]
    pub fn from_angle(origin: Point2, angle: f64) -> Self {
        Self {
            origin,
            direction: Vector2::new(angle.cos(), angle.sin()),
        }
    }

    /// Point at the given distance along the ray.
    #[must_use]
    pub fn position_at(&self, distance: f64) -> Point2 {
        self.origin + self.direction * distance
    }
}

/// One intersection of a ray with a segment.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Euclidean distance from the ray origin.
    pub distance: f64,
    /// The hit point.
    pub point: Point2,
    /// Unit left-normal of the segment at the hit.
    pub normal: Vector2,
    /// +1 when the segment's tangent points to the left of the ray
    /// direction, -1 otherwise. Summing `wind` over all hits of a ray from
    /// a query point yields the winding number of that point.
    pub wind: i32,
}
