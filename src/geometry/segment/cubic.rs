use crate::math::{cross_2d, roots, Aabb, Point2, Vector2, TOLERANCE};

use super::{power_area_fragment, SegmentIntersection, SegmentOverlap};

/// A cubic Bezier curve, parametrized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    pub start: Point2,
    pub control1: Point2,
    pub control2: Point2,
    pub end: Point2,
}

impl Cubic {
    /// Creates a new cubic Bezier.
    #[must_use]
    pub fn new(start: Point2, control1: Point2, control2: Point2, end: Point2) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    /// Power-basis coefficients per axis, highest degree first:
    /// `x(t) = c[0]*t^3 + c[1]*t^2 + c[2]*t + c[3]`.
    #[must_use]
    pub fn power_coefficients(&self) -> ([f64; 4], [f64; 4]) {
        let (s, c1, c2, e) = (self.start, self.control1, self.control2, self.end);
        (
            [
                -s.x + 3.0 * c1.x - 3.0 * c2.x + e.x,
                3.0 * s.x - 6.0 * c1.x + 3.0 * c2.x,
                -3.0 * s.x + 3.0 * c1.x,
                s.x,
            ],
            [
                -s.y + 3.0 * c1.y - 3.0 * c2.y + e.y,
                3.0 * s.y - 6.0 * c1.y + 3.0 * c2.y,
                -3.0 * s.y + 3.0 * c1.y,
                s.y,
            ],
        )
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point2 {
        let u = 1.0 - t;
        let w0 = u * u * u;
        let w1 = 3.0 * u * u * t;
        let w2 = 3.0 * u * t * t;
        let w3 = t * t * t;
        Point2::new(
            w0 * self.start.x + w1 * self.control1.x + w2 * self.control2.x + w3 * self.end.x,
            w0 * self.start.y + w1 * self.control1.y + w2 * self.control2.y + w3 * self.end.y,
        )
    }

    /// Derivative with respect to `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let u = 1.0 - t;
        (self.control1 - self.start) * (3.0 * u * u)
            + (self.control2 - self.control1) * (6.0 * u * t)
            + (self.end - self.control2) * (3.0 * t * t)
    }

    /// Signed curvature at parameter `t` (positive when curving left).
    #[must_use]
    pub fn curvature_at(&self, t: f64) -> f64 {
        let d1 = self.tangent_at(t);
        let u = 1.0 - t;
        let a = self.control2.coords - 2.0 * self.control1.coords + self.start.coords;
        let b = self.end.coords - 2.0 * self.control2.coords + self.control1.coords;
        let d2 = (a * u + b * t) * 6.0;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return 0.0;
        }
        cross_2d(&d1, &d2) / (speed * speed * speed)
    }

    /// De Casteljau split at parameter `t`.
    #[must_use]
    pub fn subdivided(&self, t: f64) -> (Self, Self) {
        let p01 = self.start.coords.lerp(&self.control1.coords, t);
        let p12 = self.control1.coords.lerp(&self.control2.coords, t);
        let p23 = self.control2.coords.lerp(&self.end.coords, t);
        let p012 = p01.lerp(&p12, t);
        let p123 = p12.lerp(&p23, t);
        let mid = p012.lerp(&p123, t);
        (
            Self::new(
                self.start,
                Point2::from(p01),
                Point2::from(p012),
                Point2::from(mid),
            ),
            Self::new(
                Point2::from(mid),
                Point2::from(p123),
                Point2::from(p23),
                self.end,
            ),
        )
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.control2, self.control1, self.start)
    }

    /// Axis-aligned bounding box, tight over the curve.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_points(&[self.start, self.end]);
        let (xs, ys) = self.power_coefficients();
        for c in [xs, ys] {
            // Roots of the derivative component 3c0 t^2 + 2c1 t + c2.
            for t in roots::quadratic_roots(3.0 * c[0], 2.0 * c[1], c[2]) {
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
        power_area_fragment(&xs, &ys)
    }

    /// Parameters where the curve passes through `p`, within `eps`.
    #[must_use]
    pub fn parameters_at_point(&self, p: &Point2, eps: f64) -> Vec<f64> {
        let (xs, ys) = self.power_coefficients();
        let mut candidates = roots::unit_roots(
            roots::cubic_roots(xs[0], xs[1], xs[2], xs[3] - p.x),
            eps,
        );
        candidates.extend(roots::unit_roots(
            roots::cubic_roots(ys[0], ys[1], ys[2], ys[3] - p.y),
            eps,
        ));
        candidates.retain(|t| (self.position_at(*t) - p).norm() < eps);
        candidates.sort_by(f64::total_cmp);
        candidates.dedup_by(|a, b| (*a - *b).abs() < eps);
        candidates
    }

    /// Detects an overlap between two cubics that trace the same curve over
    /// some parameter range.
    #[must_use]
    pub fn get_overlaps(&self, other: &Self, eps: f64) -> Vec<SegmentOverlap> {
        super::bezier_overlap(
            &super::Segment::Cubic(*self),
            &super::Segment::Cubic(*other),
            eps,
        )
    }

    /// Finds the self-intersection of the cubic, if any.
    ///
    /// Returns parameters `a_t < b_t`, both strictly inside `(0, 1)`, where
    /// the curve crosses itself. Cusps and loops that close through an
    /// endpoint are not reported.
    #[must_use]
    pub fn get_self_intersection(&self) -> Option<SegmentIntersection> {
        let (xs, ys) = self.power_coefficients();
        // Two distinct parameters t1, t2 map to the same point iff
        //   a*(s^2 - q) + b*s + c = 0   (per axis)
        // with s = t1 + t2, q = t1*t2, and (a, b, c) the cubic, quadratic,
        // and linear power coefficients. Solve the 2x2 linear system for
        // u = s^2 - q and s, then recover t1, t2 as roots of
        // z^2 - s*z + q = 0.
        let det = xs[0] * ys[1] - ys[0] * xs[1];
        if det.abs() < TOLERANCE {
            return None;
        }
        let u = (-xs[2] * ys[1] + ys[2] * xs[1]) / det;
        let s = (xs[2] * ys[0] - ys[2] * xs[0]) / det;
        let q = s * s - u;

        let disc = s * s - 4.0 * q;
        if disc <= TOLERANCE {
            return None;
        }
        let sq = disc.sqrt();
        let t1 = (s - sq) * 0.5;
        let t2 = (s + sq) * 0.5;
        let eps = TOLERANCE.sqrt();
        if t1 <= eps || t2 >= 1.0 - eps {
            return None;
        }
        Some(SegmentIntersection {
            a_t: t1,
            b_t: t2,
            point: self.position_at(t1),
        })
    }
}
