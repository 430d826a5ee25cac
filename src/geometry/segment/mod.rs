mod arc;
mod cubic;
mod intersect;
mod line;
mod quadratic;

pub use arc::Arc;
pub use cubic::Cubic;
pub use line::Line;
pub use quadratic::Quadratic;

use crate::geometry::ray::{Ray, RayHit};
use crate::math::{roots, Aabb, Point2, Vector2, TOLERANCE};

/// One intersection between two segments (or between a segment and itself).
#[derive(Debug, Clone, Copy)]
pub struct SegmentIntersection {
    /// Parameter on the first segment.
    pub a_t: f64,
    /// Parameter on the second segment.
    pub b_t: f64,
    /// The intersection point.
    pub point: Point2,
}

/// A range over which two like-typed segments trace the same curve.
///
/// `t0 < t1` are parameters on the first segment; `qt0`/`qt1` are the
/// corresponding parameters on the second. When `aligned` is false the
/// second segment runs the range backwards (`qt0 > qt1`).
#[derive(Debug, Clone, Copy)]
pub struct SegmentOverlap {
    pub t0: f64,
    pub t1: f64,
    pub qt0: f64,
    pub qt1: f64,
    pub aligned: bool,
}

/// A parametric curve segment over `t` in `[0, 1]`.
///
/// The uniform capability set of the planar subdivision pipeline; the
/// concrete geometry lives on the variant structs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Quadratic(Quadratic),
    Cubic(Cubic),
    Arc(Arc),
}

impl Segment {
    /// Convenience constructor for a line segment.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line(Line::new(start, end))
    }

    /// Start point (`t = 0`).
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Line(s) => s.start,
            Self::Quadratic(s) => s.start,
            Self::Cubic(s) => s.start,
            Self::Arc(s) => s.position_at(0.0),
        }
    }

    /// End point (`t = 1`).
    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Line(s) => s.end,
            Self::Quadratic(s) => s.end,
            Self::Cubic(s) => s.end,
            Self::Arc(s) => s.position_at(1.0),
        }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(s) => s.position_at(t),
            Self::Quadratic(s) => s.position_at(t),
            Self::Cubic(s) => s.position_at(t),
            Self::Arc(s) => s.position_at(t),
        }
    }

    /// Derivative with respect to `t` (not normalized).
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(s) => s.tangent_at(t),
            Self::Quadratic(s) => s.tangent_at(t),
            Self::Cubic(s) => s.tangent_at(t),
            Self::Arc(s) => s.tangent_at(t),
        }
    }

    /// Tangent direction at the start, robust against a vanishing derivative
    /// (a Bezier whose first control point coincides with an endpoint).
    #[must_use]
    pub fn start_tangent(&self) -> Vector2 {
        let d = self.tangent_at(0.0);
        if d.norm() > TOLERANCE {
            return d;
        }
        self.position_at(1e-6) - self.start()
    }

    /// Tangent direction at the end, robust like [`Self::start_tangent`].
    #[must_use]
    pub fn end_tangent(&self) -> Vector2 {
        let d = self.tangent_at(1.0);
        if d.norm() > TOLERANCE {
            return d;
        }
        self.end() - self.position_at(1.0 - 1e-6)
    }

    /// Signed curvature at parameter `t` (zero for lines).
    #[must_use]
    pub fn curvature_at(&self, t: f64) -> f64 {
        match self {
            Self::Line(_) => 0.0,
            Self::Quadratic(s) => s.curvature_at(t),
            Self::Cubic(s) => s.curvature_at(t),
            Self::Arc(s) => s.curvature_at(t),
        }
    }

    /// Splits at parameter `t` into two segments of the same type.
    #[must_use]
    pub fn subdivided(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Line(s) => {
                let (a, b) = s.subdivided(t);
                (Self::Line(a), Self::Line(b))
            }
            Self::Quadratic(s) => {
                let (a, b) = s.subdivided(t);
                (Self::Quadratic(a), Self::Quadratic(b))
            }
            Self::Cubic(s) => {
                let (a, b) = s.subdivided(t);
                (Self::Cubic(a), Self::Cubic(b))
            }
            Self::Arc(s) => {
                let (a, b) = s.subdivided(t);
                (Self::Arc(a), Self::Arc(b))
            }
        }
    }

    /// The sub-segment between parameters `t0 <= t1`.
    #[must_use]
    pub fn sub_range(&self, t0: f64, t1: f64) -> Self {
        if let Self::Arc(s) = self {
            return Self::Arc(s.sub_range(t0, t1));
        }
        let rest = if t0 > 0.0 {
            self.subdivided(t0).1
        } else {
            *self
        };
        if t1 >= 1.0 || 1.0 - t0 < TOLERANCE {
            return rest;
        }
        rest.subdivided((t1 - t0) / (1.0 - t0)).0
    }

    /// The same segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(s) => Self::Line(s.reversed()),
            Self::Quadratic(s) => Self::Quadratic(s.reversed()),
            Self::Cubic(s) => Self::Cubic(s.reversed()),
            Self::Arc(s) => Self::Arc(s.reversed()),
        }
    }

    /// Axis-aligned bounding box, tight over the curve.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Line(s) => s.bounds(),
            Self::Quadratic(s) => s.bounds(),
            Self::Cubic(s) => s.bounds(),
            Self::Arc(s) => s.bounds(),
        }
    }

    /// Whether every defining coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        let finite = |p: &Point2| p.x.is_finite() && p.y.is_finite();
        match self {
            Self::Line(s) => finite(&s.start) && finite(&s.end),
            Self::Quadratic(s) => finite(&s.start) && finite(&s.control) && finite(&s.end),
            Self::Cubic(s) => {
                finite(&s.start) && finite(&s.control1) && finite(&s.control2) && finite(&s.end)
            }
            Self::Arc(s) => {
                finite(&s.center)
                    && s.radius.is_finite()
                    && s.start_angle.is_finite()
                    && s.sweep.is_finite()
            }
        }
    }

    /// The first non-finite coordinate pair, if any.
    #[must_use]
    pub fn non_finite_coordinate(&self) -> Option<(f64, f64)> {
        if self.is_finite() {
            None
        } else {
            let p = self.start();
            Some((p.x, p.y))
        }
    }

    /// Contribution of this segment to the signed area integral
    /// `(1/2) * integral of (x dy - y dx)` along its direction.
    #[must_use]
    pub fn signed_area_fragment(&self) -> f64 {
        match self {
            Self::Line(s) => s.signed_area_fragment(),
            Self::Quadratic(s) => s.signed_area_fragment(),
            Self::Cubic(s) => s.signed_area_fragment(),
            Self::Arc(s) => s.signed_area_fragment(),
        }
    }

    /// Parameters where the segment passes through `p`, within `eps`.
    #[must_use]
    pub fn parameters_at_point(&self, p: &Point2, eps: f64) -> Vec<f64> {
        match self {
            Self::Line(s) => s.parameters_at_point(p, eps),
            Self::Quadratic(s) => s.parameters_at_point(p, eps),
            Self::Cubic(s) => s.parameters_at_point(p, eps),
            Self::Arc(s) => s.parameters_at_point(p, eps),
        }
    }

    /// The point of the segment with the largest projection onto `direction`.
    #[must_use]
    pub fn extreme_point(&self, direction: &Vector2) -> Point2 {
        let mut candidates = vec![self.start(), self.end()];
        match self {
            Self::Line(_) => {}
            Self::Quadratic(s) => {
                let (xs, ys) = s.power_coefficients();
                let a = 2.0 * (xs[0] * direction.x + ys[0] * direction.y);
                let b = xs[1] * direction.x + ys[1] * direction.y;
                if a.abs() > TOLERANCE {
                    let t = -b / a;
                    if t > 0.0 && t < 1.0 {
                        candidates.push(s.position_at(t));
                    }
                }
            }
            Self::Cubic(s) => {
                let (xs, ys) = s.power_coefficients();
                let proj = |k: usize| xs[k] * direction.x + ys[k] * direction.y;
                for t in roots::quadratic_roots(3.0 * proj(0), 2.0 * proj(1), proj(2)) {
                    if t > 0.0 && t < 1.0 {
                        candidates.push(s.position_at(t));
                    }
                }
            }
            Self::Arc(s) => {
                let radial = direction.y.atan2(direction.x);
                for angle in [radial, radial + std::f64::consts::PI] {
                    if let Some(t) =
                        crate::math::intersect_2d::angle_to_arc_param(angle, s.start_angle, s.sweep)
                    {
                        candidates.push(s.position_at(t));
                    }
                }
            }
        }
        let mut best = candidates[0];
        let mut best_proj = best.coords.dot(direction);
        for c in &candidates[1..] {
            let proj = c.coords.dot(direction);
            if proj > best_proj {
                best = *c;
                best_proj = proj;
            }
        }
        best
    }

    /// All intersections with another segment, parameters in `[0, 1]` on both.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Vec<SegmentIntersection> {
        intersect::segment_segment(self, other)
    }

    /// Intersections with an outgoing ray, nearest first.
    ///
    /// Hits closer than `back_clip` to the ray origin are discarded.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray, back_clip: f64) -> Vec<RayHit> {
        intersect::segment_ray(self, ray, back_clip)
    }

    /// Overlap ranges with a segment of the same type; empty for unlike
    /// types or when the traces differ.
    #[must_use]
    pub fn get_overlaps(&self, other: &Self, eps: f64) -> Vec<SegmentOverlap> {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a.get_overlaps(b, eps),
            (Self::Quadratic(a), Self::Quadratic(b)) => a.get_overlaps(b, eps),
            (Self::Cubic(a), Self::Cubic(b)) => a.get_overlaps(b, eps),
            _ => Vec::new(),
        }
    }

    /// Self-intersection parameters; only cubics can have one.
    #[must_use]
    pub fn get_self_intersection(&self) -> Option<SegmentIntersection> {
        match self {
            Self::Cubic(s) => s.get_self_intersection(),
            _ => None,
        }
    }

    /// Appends this segment as SVG path-data drawing commands.
    ///
    /// The caller is expected to have emitted the `M` command for the
    /// segment's start point.
    pub fn write_path_data(&self, out: &mut String) {
        use std::fmt::Write;
        match self {
            Self::Line(s) => {
                let _ = write!(out, "L {:.6} {:.6}", s.end.x, s.end.y);
            }
            Self::Quadratic(s) => {
                let _ = write!(
                    out,
                    "Q {:.6} {:.6} {:.6} {:.6}",
                    s.control.x, s.control.y, s.end.x, s.end.y
                );
            }
            Self::Cubic(s) => {
                let _ = write!(
                    out,
                    "C {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
                    s.control1.x, s.control1.y, s.control2.x, s.control2.y, s.end.x, s.end.y
                );
            }
            Self::Arc(s) => {
                let e = s.position_at(1.0);
                let large = u8::from(s.sweep.abs() > std::f64::consts::PI);
                let sweep_flag = u8::from(s.sweep > 0.0);
                let _ = write!(
                    out,
                    "A {:.6} {:.6} 0 {} {} {:.6} {:.6}",
                    s.radius, s.radius, large, sweep_flag, e.x, e.y
                );
            }
        }
    }
}

/// Exact integral `(1/2) * integral of (x y' - y x') dt` over `[0, 1]` for
/// power-basis coordinate polynomials (degree 3, highest first).
pub(crate) fn power_area_fragment(xs: &[f64; 4], ys: &[f64; 4]) -> f64 {
    let dx = [3.0 * xs[0], 2.0 * xs[1], xs[2]];
    let dy = [3.0 * ys[0], 2.0 * ys[1], ys[2]];
    // Product polynomial has degree 5; index k holds the degree-(5-k) term.
    let mut poly = [0.0; 6];
    for i in 0..4 {
        for j in 0..3 {
            poly[i + j] += xs[i] * dy[j] - ys[i] * dx[j];
        }
    }
    let mut sum = 0.0;
    for (k, c) in poly.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let degree_plus_one = (6 - k) as f64;
        sum += c / degree_plus_one;
    }
    sum * 0.5
}

/// Overlap detection shared by the quadratic and cubic like-pairs.
///
/// Endpoint projections give candidate parameter correspondences; the
/// candidate range is then verified by comparing the control points of the
/// two sub-curves.
pub(crate) fn bezier_overlap(a: &Segment, b: &Segment, eps: f64) -> Vec<SegmentOverlap> {
    let mut corr: Vec<(f64, f64)> = Vec::new();
    for (p, qt) in [(b.start(), 0.0), (b.end(), 1.0)] {
        for t in a.parameters_at_point(&p, eps) {
            corr.push((t, qt));
        }
    }
    for (p, t) in [(a.start(), 0.0), (a.end(), 1.0)] {
        for qt in b.parameters_at_point(&p, eps) {
            corr.push((t, qt));
        }
    }
    corr.sort_by(|x, y| x.0.total_cmp(&y.0));
    corr.dedup_by(|x, y| (x.0 - y.0).abs() < eps && (x.1 - y.1).abs() < eps);
    if corr.len() < 2 {
        return Vec::new();
    }

    let (t0, qt0) = corr[0];
    let (t1, qt1) = corr[corr.len() - 1];
    if t1 - t0 < eps || (qt1 - qt0).abs() < eps {
        return Vec::new();
    }

    let sub_a = a.sub_range(t0, t1);
    let aligned = qt1 > qt0;
    let mut sub_b = b.sub_range(qt0.min(qt1), qt0.max(qt1));
    if !aligned {
        sub_b = sub_b.reversed();
    }
    // Sub-curves of a common parent match control point for control point;
    // a generous tolerance absorbs reparameterization drift.
    if !control_points_close(&sub_a, &sub_b, (eps * 10.0).max(1e-6)) {
        return Vec::new();
    }

    vec![SegmentOverlap {
        t0,
        t1,
        qt0,
        qt1,
        aligned,
    }]
}

fn control_points_close(a: &Segment, b: &Segment, tol: f64) -> bool {
    let close = |p: &Point2, q: &Point2| (p - q).norm() <= tol;
    match (a, b) {
        (Segment::Quadratic(a), Segment::Quadratic(b)) => {
            close(&a.start, &b.start) && close(&a.control, &b.control) && close(&a.end, &b.end)
        }
        (Segment::Cubic(a), Segment::Cubic(b)) => {
            close(&a.start, &b.start)
                && close(&a.control1, &b.control1)
                && close(&a.control2, &b.control2)
                && close(&a.end, &b.end)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_range_matches_positions() {
        let seg = Segment::Cubic(Cubic::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 3.0),
            Point2::new(2.0, -1.0),
            Point2::new(3.0, 1.0),
        ));
        let sub = seg.sub_range(0.2, 0.8);
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let direct = seg.position_at(0.2 + 0.6 * t);
            assert!((sub.position_at(t) - direct).norm() < 1e-12);
        }
    }

    #[test]
    fn extreme_point_of_arc() {
        let seg = Segment::Arc(Arc::new(Point2::new(0.0, 0.0), 2.0, 0.0, std::f64::consts::PI));
        let p = seg.extreme_point(&Vector2::new(0.0, 1.0));
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_point_of_cubic() {
        let seg = Segment::Cubic(Cubic::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 0.0),
        ));
        let p = seg.extreme_point(&Vector2::new(0.0, 1.0));
        assert!((p.y - 1.5).abs() < 1e-9, "apex y={}", p.y);
    }

    #[test]
    fn non_finite_detection() {
        let seg = Segment::line(Point2::new(f64::NAN, 0.0), Point2::new(1.0, 0.0));
        assert!(!seg.is_finite());
        assert!(seg.non_finite_coordinate().is_some());
        let ok = Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(ok.is_finite());
    }

    #[test]
    fn path_data_commands() {
        let mut out = String::new();
        Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 2.0)).write_path_data(&mut out);
        assert!(out.starts_with('L'));
        out.clear();
        Segment::Arc(Arc::new(Point2::new(0.0, 0.0), 1.0, 0.0, 1.0)).write_path_data(&mut out);
        assert!(out.starts_with('A'));
    }

    #[test]
    fn area_fragments_close_a_circleish_region() {
        // Upper unit semicircle plus the diameter line back: area pi/2.
        let arc = Segment::Arc(Arc::new(Point2::new(0.0, 0.0), 1.0, 0.0, std::f64::consts::PI));
        let base = Segment::line(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0));
        let area = arc.signed_area_fragment() + base.signed_area_fragment();
        assert!((area - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
