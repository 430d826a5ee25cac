use crate::math::{cross_2d, Aabb, Point2, Vector2, TOLERANCE};

use super::SegmentOverlap;

/// A straight line segment from `start` to `end`, parametrized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    /// Creates a new line segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// The chord vector from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point2 {
        self.start + self.delta() * t
    }

    /// Derivative with respect to `t` (constant for a line).
    #[must_use]
    pub fn tangent_at(&self, _t: f64) -> Vector2 {
        self.delta()
    }

    /// Splits at parameter `t` into two sub-lines.
    #[must_use]
    pub fn subdivided(&self, t: f64) -> (Self, Self) {
        let mid = self.position_at(t);
        (Self::new(self.start, mid), Self::new(mid, self.end))
    }

    /// The same segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Axis-aligned bounding box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.start, self.end])
    }

    /// Contribution of this segment to the signed area integral
    /// `(1/2) * integral of (x dy - y dx)`.
    #[must_use]
    pub fn signed_area_fragment(&self) -> f64 {
        (self.start.x * self.end.y - self.end.x * self.start.y) * 0.5
    }

    /// Parameters where the segment passes through `p`, within `eps`.
    #[must_use]
    pub fn parameters_at_point(&self, p: &Point2, eps: f64) -> Vec<f64> {
        let d = self.delta();
        let len_sq = d.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return Vec::new();
        }
        let t = (p - self.start).dot(&d) / len_sq;
        if !(-eps..=1.0 + eps).contains(&t) {
            return Vec::new();
        }
        let t = t.clamp(0.0, 1.0);
        if (self.position_at(t) - p).norm() < eps {
            vec![t]
        } else {
            Vec::new()
        }
    }

    /// Detects a collinear overlap between two line segments.
    ///
    /// Returns at most one overlap record with the parameter range on each
    /// segment; empty when the segments are not collinear or share at most
    /// a point.
    #[must_use]
    pub fn get_overlaps(&self, other: &Self, eps: f64) -> Vec<SegmentOverlap> {
        let d = self.delta();
        let len = d.norm();
        if len < TOLERANCE {
            return Vec::new();
        }
        // Perpendicular distance of both endpoints of `other` from this line.
        let dist0 = cross_2d(&d, &(other.start - self.start)).abs() / len;
        let dist1 = cross_2d(&d, &(other.end - self.start)).abs() / len;
        if dist0 > eps || dist1 > eps {
            return Vec::new();
        }

        let len_sq = len * len;
        let tb0 = (other.start - self.start).dot(&d) / len_sq;
        let tb1 = (other.end - self.start).dot(&d) / len_sq;
        if (tb1 - tb0).abs() < TOLERANCE {
            return Vec::new();
        }

        let lo = tb0.min(tb1).max(0.0);
        let hi = tb0.max(tb1).min(1.0);
        if hi <= lo {
            return Vec::new();
        }

        // Map the clipped range on `self` back to parameters on `other`.
        let inverse = |t: f64| (t - tb0) / (tb1 - tb0);
        vec![SegmentOverlap {
            t0: lo,
            t1: hi,
            qt0: inverse(lo),
            qt1: inverse(hi),
            aligned: tb1 > tb0,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_and_subdivide() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0));
        let mid = line.position_at(0.5);
        assert!((mid.x - 2.0).abs() < TOLERANCE);
        assert!((mid.y - 1.0).abs() < TOLERANCE);
        let (a, b) = line.subdivided(0.25);
        assert!((a.end.x - 1.0).abs() < TOLERANCE);
        assert!((b.start.x - 1.0).abs() < TOLERANCE);
        assert!((b.end.x - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn overlap_partial_aligned() {
        let a = Line::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        let b = Line::new(Point2::new(1.0, 0.0), Point2::new(3.0, 0.0));
        let overlaps = a.get_overlaps(&b, 1e-5);
        assert_eq!(overlaps.len(), 1);
        let ov = &overlaps[0];
        assert!(ov.aligned);
        assert!((ov.t0 - 0.5).abs() < 1e-9);
        assert!((ov.t1 - 1.0).abs() < 1e-9);
        assert!((ov.qt0 - 0.0).abs() < 1e-9);
        assert!((ov.qt1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn overlap_reversed_direction() {
        let a = Line::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        let b = Line::new(Point2::new(3.0, 0.0), Point2::new(1.0, 0.0));
        let overlaps = a.get_overlaps(&b, 1e-5);
        assert_eq!(overlaps.len(), 1);
        let ov = &overlaps[0];
        assert!(!ov.aligned);
        assert!((ov.t0 - 0.5).abs() < 1e-9);
        assert!((ov.t1 - 1.0).abs() < 1e-9);
        assert!((ov.qt0 - 1.0).abs() < 1e-9);
        assert!((ov.qt1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn overlap_rejects_parallel_offset() {
        let a = Line::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        let b = Line::new(Point2::new(0.0, 1.0), Point2::new(2.0, 1.0));
        assert!(a.get_overlaps(&b, 1e-5).is_empty());
    }

    #[test]
    fn overlap_rejects_point_touch() {
        let a = Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = Line::new(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0));
        assert!(a.get_overlaps(&b, 1e-5).is_empty());
    }

    #[test]
    fn parameters_at_point_on_and_off() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
        let on = line.parameters_at_point(&Point2::new(1.0, 1.0), 1e-6);
        assert_eq!(on.len(), 1);
        assert!((on[0] - 0.5).abs() < 1e-9);
        assert!(line
            .parameters_at_point(&Point2::new(1.0, 0.0), 1e-6)
            .is_empty());
    }

    #[test]
    fn area_fragment_of_ccw_triangle() {
        // Three sides of the unit right triangle, CCW.
        let sides = [
            Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            Line::new(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)),
            Line::new(Point2::new(0.0, 1.0), Point2::new(0.0, 0.0)),
        ];
        let area: f64 = sides.iter().map(Line::signed_area_fragment).sum();
        assert!((area - 0.5).abs() < TOLERANCE);
    }
}
