use crate::math::{cross_2d, roots, Aabb, Point2, Vector2, TOLERANCE};

use super::{power_area_fragment, SegmentOverlap};

/// A quadratic Bezier curve, parametrized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub start: Point2,
    pub control: Point2,
    pub end: Point2,
}

impl Quadratic {
    /// Creates a new quadratic Bezier.
    #[must_use]
    pub fn new(start: Point2, control: Point2, end: Point2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Power-basis coefficients per axis, highest degree first:
    /// `x(t) = c[0]*t^2 + c[1]*t + c[2]`.
    #[must_use]
    pub fn power_coefficients(&self) -> ([f64; 3], [f64; 3]) {
        let (s, c, e) = (self.start, self.control, self.end);
        (
            [s.x - 2.0 * c.x + e.x, 2.0 * (c.x - s.x), s.x],
            [s.y - 2.0 * c.y + e.y, 2.0 * (c.y - s.y), s.y],
        )
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point2 {
        let u = 1.0 - t;
        let w0 = u * u;
        let w1 = 2.0 * u * t;
        let w2 = t * t;
        Point2::new(
            w0 * self.start.x + w1 * self.control.x + w2 * self.end.x,
            w0 * self.start.y + w1 * self.control.y + w2 * self.end.y,
        )
    }

    /// Derivative with respect to `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let u = 1.0 - t;
        (self.control - self.start) * (2.0 * u) + (self.end - self.control) * (2.0 * t)
    }

    /// Signed curvature at parameter `t` (positive when curving left).
    #[must_use]
    pub fn curvature_at(&self, t: f64) -> f64 {
        let d1 = self.tangent_at(t);
        let d2 = (self.end - self.control - (self.control - self.start)) * 2.0;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return 0.0;
        }
        cross_2d(&d1, &d2) / (speed * speed * speed)
    }

    /// De Casteljau split at parameter `t`.
    #[must_use]
    pub fn subdivided(&self, t: f64) -> (Self, Self) {
        let q0 = self.start.coords.lerp(&self.control.coords, t);
        let q1 = self.control.coords.lerp(&self.end.coords, t);
        let mid = q0.lerp(&q1, t);
        (
            Self::new(self.start, Point2::from(q0), Point2::from(mid)),
            Self::new(Point2::from(mid), Point2::from(q1), self.end),
        )
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.control, self.start)
    }

    /// Axis-aligned bounding box, tight over the curve.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_points(&[self.start, self.end]);
        let (xs, ys) = self.power_coefficients();
        // Interior extrema where the derivative component vanishes.
        for c in [xs, ys] {
            let denom = 2.0 * c[0];
            if denom.abs() > TOLERANCE {
                let t = -c[1] / denom;
                if t > 0.0 && t < 1.0 {
                    aabb.include(&self.position_at(t));
                }
            }
        }
        aabb
    }

    /// Contribution of this curve to the signed area integral.
    #[must_use]
    pub fn signed_area_fragment(&self) -> f64 {
        let (xs, ys) = self.power_coefficients();
        power_area_fragment(
            &[0.0, xs[0], xs[1], xs[2]],
            &[0.0, ys[0], ys[1], ys[2]],
        )
    }

    /// Parameters where the curve passes through `p`, within `eps`.
    #[must_use]
    pub fn parameters_at_point(&self, p: &Point2, eps: f64) -> Vec<f64> {
        let (xs, ys) = self.power_coefficients();
        let mut candidates = roots::unit_roots(
            roots::quadratic_roots(xs[0], xs[1], xs[2] - p.x),
            eps,
        );
        candidates.extend(roots::unit_roots(
            roots::quadratic_roots(ys[0], ys[1], ys[2] - p.y),
            eps,
        ));
        candidates.retain(|t| (self.position_at(*t) - p).norm() < eps);
        candidates.sort_by(f64::total_cmp);
        candidates.dedup_by(|a, b| (*a - *b).abs() < eps);
        candidates
    }

    /// Detects an overlap between two quadratics that trace the same curve
    /// over some parameter range.
    #[must_use]
    pub fn get_overlaps(&self, other: &Self, eps: f64) -> Vec<SegmentOverlap> {
        super::bezier_overlap(&super::Segment::Quadratic(*self), &super::Segment::Quadratic(*other), eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Quadratic {
        Quadratic::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        )
    }

    #[test]
    fn endpoints_and_apex() {
        let q = sample();
        assert!((q.position_at(0.0) - q.start).norm() < TOLERANCE);
        assert!((q.position_at(1.0) - q.end).norm() < TOLERANCE);
        let apex = q.position_at(0.5);
        assert!((apex.x - 1.0).abs() < TOLERANCE);
        assert!((apex.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn subdivide_matches_positions() {
        let q = sample();
        let (left, right) = q.subdivided(0.3);
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let via_left = left.position_at(t);
            let direct = q.position_at(0.3 * t);
            assert!((via_left - direct).norm() < 1e-12);
            let via_right = right.position_at(t);
            let direct = q.position_at(0.3 + 0.7 * t);
            assert!((via_right - direct).norm() < 1e-12);
        }
    }

    #[test]
    fn bounds_include_apex() {
        let q = sample();
        let b = q.bounds();
        assert!((b.max.y - 1.0).abs() < 1e-12, "max.y={}", b.max.y);
        assert!(b.min.y.abs() < 1e-12);
        assert!((b.max.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn overlap_of_subdivided_pieces() {
        // Split one quadratic at 0.7 and 0.3: the pieces overlap on [0.3, 0.7].
        let q = sample();
        let (left, _) = q.subdivided(0.7);
        let (_, right) = q.subdivided(0.3);
        let overlaps = left.get_overlaps(&right, 1e-5);
        assert_eq!(overlaps.len(), 1, "overlaps={overlaps:?}");
        let ov = &overlaps[0];
        assert!(ov.aligned);
        assert!((ov.t0 - 3.0 / 7.0).abs() < 1e-6, "t0={}", ov.t0);
        assert!((ov.t1 - 1.0).abs() < 1e-6);
        assert!((ov.qt0 - 0.0).abs() < 1e-6);
        assert!((ov.qt1 - 4.0 / 7.0).abs() < 1e-6, "qt1={}", ov.qt1);
    }

    #[test]
    fn no_overlap_between_distinct_curves() {
        let a = sample();
        let b = Quadratic::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, -2.0),
            Point2::new(2.0, 0.0),
        );
        assert!(a.get_overlaps(&b, 1e-5).is_empty());
    }

    #[test]
    fn curvature_sign_follows_bend() {
        let q = sample();
        // Curve bends to the right (clockwise) when traversed left to right.
        assert!(q.curvature_at(0.5) < 0.0);
        assert!(q.reversed().curvature_at(0.5) < 0.0);
    }
}
