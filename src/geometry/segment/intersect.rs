//! Pairwise segment intersection and ray casting.
//!
//! Line/line, line/arc, and arc/arc pairs are solved analytically; pairs
//! involving a Bezier curve fall back to either a polynomial solve (against
//! a line) or recursive bounding-box subdivision (curve against curve).

use crate::geometry::ray::{Ray, RayHit};
use crate::math::intersect_2d::{
    angle_to_arc_param, line_circle_intersect_2d, line_line_intersect_2d,
};
use crate::math::{cross_2d, roots, Point2, Vector2, TOLERANCE};

use super::{Arc, Line, Segment, SegmentIntersection};

/// Parameter window below which a subdivision cell counts as converged.
const PARAM_TOLERANCE: f64 = 1e-9;
/// Candidate pairs closer than this in parameter space are merged.
const DEDUP_TOLERANCE: f64 = 1e-6;
/// Upper bound on subdivision cells visited per segment pair.
const SUBDIVISION_BUDGET: usize = 4096;

/// All intersections between two segments, each parameter in `[0, 1]`.
pub(super) fn segment_segment(a: &Segment, b: &Segment) -> Vec<SegmentIntersection> {
    match (a, b) {
        (Segment::Line(la), Segment::Line(lb)) => line_line(la, lb),
        (Segment::Line(l), Segment::Arc(arc)) => line_arc(l, arc, false),
        (Segment::Arc(arc), Segment::Line(l)) => line_arc(l, arc, true),
        (Segment::Arc(aa), Segment::Arc(ab)) => arc_arc(aa, ab),
        (Segment::Line(l), other) => line_curve(l, other, false),
        (other, Segment::Line(l)) => line_curve(l, other, true),
        _ => subdivision_intersect(a, b),
    }
}

fn line_line(a: &Line, b: &Line) -> Vec<SegmentIntersection> {
    let da = a.delta();
    let db = b.delta();
    let Some((t, u)) = line_line_intersect_2d(&a.start, &da, &b.start, &db) else {
        return Vec::new();
    };
    let eps = 1e-9;
    if t < -eps || t > 1.0 + eps || u < -eps || u > 1.0 + eps {
        return Vec::new();
    }
    let a_t = t.clamp(0.0, 1.0);
    vec![SegmentIntersection {
        a_t,
        b_t: u.clamp(0.0, 1.0),
        point: a.position_at(a_t),
    }]
}

fn line_arc(line: &Line, arc: &Arc, swap: bool) -> Vec<SegmentIntersection> {
    let d = line.delta();
    let mut out = Vec::new();
    for s in line_circle_intersect_2d(&line.start, &d, &arc.center, arc.radius) {
        let eps = 1e-9;
        if s < -eps || s > 1.0 + eps {
            continue;
        }
        let line_t = s.clamp(0.0, 1.0);
        let p = line.position_at(line_t);
        let angle = (p.y - arc.center.y).atan2(p.x - arc.center.x);
        let Some(arc_t) = angle_to_arc_param(angle, arc.start_angle, arc.sweep) else {
            continue;
        };
        let (a_t, b_t) = if swap { (arc_t, line_t) } else { (line_t, arc_t) };
        out.push(SegmentIntersection { a_t, b_t, point: p });
    }
    out
}

fn arc_arc(a: &Arc, b: &Arc) -> Vec<SegmentIntersection> {
    let points =
        crate::math::intersect_2d::circle_circle_intersect_2d(&a.center, a.radius, &b.center, b.radius);
    let mut out = Vec::new();
    for p in points {
        let angle_a = (p.y - a.center.y).atan2(p.x - a.center.x);
        let angle_b = (p.y - b.center.y).atan2(p.x - b.center.x);
        let (Some(a_t), Some(b_t)) = (
            angle_to_arc_param(angle_a, a.start_angle, a.sweep),
            angle_to_arc_param(angle_b, b.start_angle, b.sweep),
        ) else {
            continue;
        };
        out.push(SegmentIntersection { a_t, b_t, point: p });
    }
    out
}

/// Intersections of a line with a quadratic or cubic.
///
/// The curve is projected into the line's frame; roots of the perpendicular
/// coordinate give curve parameters, the parallel coordinate the line ones.
fn line_curve(line: &Line, curve: &Segment, swap: bool) -> Vec<SegmentIntersection> {
    let d = line.delta();
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return Vec::new();
    }
    let cross_poly = perpendicular_polynomial(curve, &line.start, &d);
    let candidates = roots::unit_roots(
        roots::cubic_roots(cross_poly[0], cross_poly[1], cross_poly[2], cross_poly[3]),
        1e-9,
    );

    let mut out = Vec::new();
    for curve_t in candidates {
        let p = curve.position_at(curve_t);
        let line_t = (p - line.start).dot(&d) / len_sq;
        let eps = 1e-9;
        if line_t < -eps || line_t > 1.0 + eps {
            continue;
        }
        let line_t = line_t.clamp(0.0, 1.0);
        let (a_t, b_t) = if swap {
            (curve_t, line_t)
        } else {
            (line_t, curve_t)
        };
        out.push(SegmentIntersection { a_t, b_t, point: p });
    }
    out.sort_by(|x, y| x.a_t.total_cmp(&y.a_t));
    out
}

/// Power coefficients (degree 3, highest first) of
/// `cross(dir, P(t) - origin)`, the perpendicular coordinate of the curve
/// in the frame of a line or ray.
fn perpendicular_polynomial(curve: &Segment, origin: &Point2, dir: &Vector2) -> [f64; 4] {
    let (xs, ys) = curve_power_coefficients(curve);
    let mut out = [0.0; 4];
    for k in 0..4 {
        out[k] = dir.x * ys[k] - dir.y * xs[k];
    }
    // Shift the constant term by the origin.
    out[3] = dir.x * (ys[3] - origin.y) - dir.y * (xs[3] - origin.x);
    out
}

fn curve_power_coefficients(curve: &Segment) -> ([f64; 4], [f64; 4]) {
    match curve {
        Segment::Quadratic(q) => {
            let (xs, ys) = q.power_coefficients();
            ([0.0, xs[0], xs[1], xs[2]], [0.0, ys[0], ys[1], ys[2]])
        }
        Segment::Cubic(c) => c.power_coefficients(),
        // Lines and arcs never reach the polynomial path.
        Segment::Line(l) => {
            let d = l.delta();
            ([0.0, 0.0, d.x, l.start.x], [0.0, 0.0, d.y, l.start.y])
        }
        Segment::Arc(_) => unreachable!("arcs are intersected analytically"),
    }
}

/// Recursive bounding-box subdivision for curve/curve pairs.
fn subdivision_intersect(a: &Segment, b: &Segment) -> Vec<SegmentIntersection> {
    let mut candidates = Vec::new();
    let mut budget = SUBDIVISION_BUDGET;
    subdivide_step(a, (0.0, 1.0), b, (0.0, 1.0), &mut candidates, &mut budget);

    // Merge the candidate cluster around each true crossing.
    candidates.sort_by(|x, y| x.a_t.total_cmp(&y.a_t));
    let mut out: Vec<SegmentIntersection> = Vec::new();
    for c in candidates {
        let duplicate = out.iter().any(|o| {
            (o.a_t - c.a_t).abs() < DEDUP_TOLERANCE && (o.b_t - c.b_t).abs() < DEDUP_TOLERANCE
        });
        if !duplicate {
            out.push(c);
        }
    }
    out
}

fn subdivide_step(
    a: &Segment,
    a_range: (f64, f64),
    b: &Segment,
    b_range: (f64, f64),
    candidates: &mut Vec<SegmentIntersection>,
    budget: &mut usize,
) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;

    let ab = a.bounds();
    let bb = b.bounds();
    if !ab.overlaps(&bb, 1e-9) {
        return;
    }

    let a_span = a_range.1 - a_range.0;
    let b_span = b_range.1 - b_range.0;
    if a_span < PARAM_TOLERANCE && b_span < PARAM_TOLERANCE {
        let a_t = (a_range.0 + a_range.1) * 0.5;
        let b_t = (b_range.0 + b_range.1) * 0.5;
        let pa = a.position_at(0.5);
        let pb = b.position_at(0.5);
        candidates.push(SegmentIntersection {
            a_t,
            b_t,
            point: Point2::from((pa.coords + pb.coords) * 0.5),
        });
        return;
    }

    // Split whichever side is geometrically larger (or parametrically,
    // when one side has already converged).
    let split_a = if a_span < PARAM_TOLERANCE {
        false
    } else if b_span < PARAM_TOLERANCE {
        true
    } else {
        ab.max_extent() >= bb.max_extent()
    };

    if split_a {
        let mid = (a_range.0 + a_range.1) * 0.5;
        let (left, right) = a.subdivided(0.5);
        subdivide_step(&left, (a_range.0, mid), b, b_range, candidates, budget);
        subdivide_step(&right, (mid, a_range.1), b, b_range, candidates, budget);
    } else {
        let mid = (b_range.0 + b_range.1) * 0.5;
        let (left, right) = b.subdivided(0.5);
        subdivide_step(a, a_range, &left, (b_range.0, mid), candidates, budget);
        subdivide_step(a, a_range, &right, (mid, b_range.1), candidates, budget);
    }
}

// ── ray casting ──

/// Intersections of a segment with an outgoing ray, nearest first.
pub(super) fn segment_ray(seg: &Segment, ray: &Ray, back_clip: f64) -> Vec<RayHit> {
    let mut hits = match seg {
        Segment::Line(l) => line_ray(l, ray, back_clip),
        Segment::Quadratic(_) | Segment::Cubic(_) => curve_ray(seg, ray, back_clip),
        Segment::Arc(a) => arc_ray(a, ray, back_clip),
    };
    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits
}

fn make_hit(ray: &Ray, distance: f64, point: Point2, tangent: Vector2) -> RayHit {
    let t_norm = tangent
        .try_normalize(TOLERANCE)
        .unwrap_or_else(Vector2::zeros);
    RayHit {
        distance,
        point,
        normal: Vector2::new(-t_norm.y, t_norm.x),
        wind: if cross_2d(&ray.direction, &tangent) > 0.0 {
            1
        } else {
            -1
        },
    }
}

fn line_ray(line: &Line, ray: &Ray, back_clip: f64) -> Vec<RayHit> {
    let d = line.delta();
    let Some((s, u)) = line_line_intersect_2d(&ray.origin, &ray.direction, &line.start, &d) else {
        return Vec::new();
    };
    let eps = 1e-9;
    if s <= back_clip || u < -eps || u > 1.0 + eps {
        return Vec::new();
    }
    vec![make_hit(ray, s, ray.position_at(s), d)]
}

fn curve_ray(curve: &Segment, ray: &Ray, back_clip: f64) -> Vec<RayHit> {
    let poly = perpendicular_polynomial(curve, &ray.origin, &ray.direction);
    let candidates = roots::unit_roots(roots::cubic_roots(poly[0], poly[1], poly[2], poly[3]), 1e-9);
    let mut out = Vec::new();
    for t in candidates {
        let p = curve.position_at(t);
        let distance = (p - ray.origin).dot(&ray.direction);
        if distance <= back_clip {
            continue;
        }
        out.push(make_hit(ray, distance, p, curve.tangent_at(t)));
    }
    out
}

fn arc_ray(arc: &Arc, ray: &Ray, back_clip: f64) -> Vec<RayHit> {
    let mut out = Vec::new();
    for s in line_circle_intersect_2d(&ray.origin, &ray.direction, &arc.center, arc.radius) {
        if s <= back_clip {
            continue;
        }
        let p = ray.position_at(s);
        let angle = (p.y - arc.center.y).atan2(p.x - arc.center.x);
        let Some(t) = angle_to_arc_param(angle, arc.start_angle, arc.sweep) else {
            continue;
        };
        out.push(make_hit(ray, s, p, arc.tangent_at(t)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::segment::{Cubic, Quadratic};

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_lines() {
        let a = Segment::line(pt(0.0, 0.0), pt(2.0, 2.0));
        let b = Segment::line(pt(0.0, 2.0), pt(2.0, 0.0));
        let hits = a.intersect(&b);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].a_t - 0.5).abs() < 1e-9);
        assert!((hits[0].b_t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn line_cubic_three_crossings() {
        // An S-shaped cubic crossing the x axis three times.
        let curve = Segment::Cubic(Cubic::new(
            pt(0.0, -1.0),
            pt(1.0, 3.0),
            pt(2.0, -3.0),
            pt(3.0, 1.0),
        ));
        let axis = Segment::line(pt(-1.0, 0.0), pt(4.0, 0.0));
        let hits = axis.intersect(&curve);
        assert_eq!(hits.len(), 3, "hits={hits:?}");
        for h in &hits {
            assert!(h.point.y.abs() < 1e-9);
        }
    }

    #[test]
    fn line_quadratic_two_crossings() {
        let curve = Segment::Quadratic(Quadratic::new(pt(0.0, -1.0), pt(1.0, 3.0), pt(2.0, -1.0)));
        let axis = Segment::line(pt(-1.0, 0.0), pt(3.0, 0.0));
        let hits = axis.intersect(&curve);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn quadratic_quadratic_crossings() {
        // Opposite arches cross twice.
        let a = Segment::Quadratic(Quadratic::new(pt(0.0, 0.0), pt(1.0, 2.0), pt(2.0, 0.0)));
        let b = Segment::Quadratic(Quadratic::new(pt(0.0, 1.0), pt(1.0, -1.0), pt(2.0, 1.0)));
        let hits = a.intersect(&b);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        for h in &hits {
            let pa = a.position_at(h.a_t);
            let pb = b.position_at(h.b_t);
            assert!((pa - pb).norm() < 1e-6, "pa={pa:?} pb={pb:?}");
        }
    }

    #[test]
    fn cubic_cubic_crossing() {
        let a = Segment::Cubic(Cubic::new(pt(0.0, 0.0), pt(1.0, 2.0), pt(2.0, 2.0), pt(3.0, 0.0)));
        let b = Segment::Cubic(Cubic::new(pt(0.0, 2.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 2.0)));
        let hits = a.intersect(&b);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        for h in &hits {
            let pa = a.position_at(h.a_t);
            let pb = b.position_at(h.b_t);
            assert!((pa - pb).norm() < 1e-6);
        }
    }

    #[test]
    fn arc_line_crossings() {
        let arc = Segment::Arc(Arc::new(pt(0.0, 0.0), 1.0, 0.0, std::f64::consts::PI));
        let line = Segment::line(pt(-2.0, 0.5), pt(2.0, 0.5));
        let hits = line.intersect(&arc);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        for h in &hits {
            assert!((h.point.y - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn arc_arc_crossing() {
        // Unit circles at distance 1 meet at (0.5, +-sqrt(3)/2); the chosen
        // sweeps cover only the upper meeting point.
        let a = Segment::Arc(Arc::new(pt(0.0, 0.0), 1.0, -1.2, 2.4));
        let b = Segment::Arc(Arc::new(pt(1.0, 0.0), 1.0, 2.0, 2.0));
        let hits = a.intersect(&b);
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        let h = &hits[0];
        assert!((h.point.x - 0.5).abs() < 1e-9);
        assert!((h.point.y - 3.0_f64.sqrt() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn endpoint_touch_is_reported() {
        let a = Segment::line(pt(0.0, 0.0), pt(1.0, 0.0));
        let b = Segment::line(pt(1.0, 0.0), pt(1.0, 1.0));
        let hits = a.intersect(&b);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].a_t - 1.0).abs() < 1e-9);
        assert!(hits[0].b_t.abs() < 1e-9);
    }

    #[test]
    fn ray_hits_sorted_with_wind() {
        let ray = Ray::new(pt(-2.0, 0.5), Vector2::new(1.0, 0.0));
        let arc = Segment::Arc(Arc::new(pt(0.0, 0.0), 1.0, 0.0, std::f64::consts::PI));
        let hits = arc.intersect_ray(&ray, 1e-8);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        assert!(hits[0].distance < hits[1].distance);
        // CCW arc seen from the left: first crossing goes up, second down.
        assert_eq!(hits[0].wind, -1);
        assert_eq!(hits[1].wind, 1);
    }

    #[test]
    fn ray_back_clip_discards_origin_hit() {
        let ray = Ray::new(pt(0.0, 0.0), Vector2::new(1.0, 0.0));
        let line = Segment::line(pt(0.0, -1.0), pt(0.0, 1.0));
        assert!(line.intersect_ray(&ray, 1e-8).is_empty());
    }

    #[test]
    fn winding_of_point_inside_ccw_square_via_rays() {
        let square = [
            Segment::line(pt(0.0, 0.0), pt(2.0, 0.0)),
            Segment::line(pt(2.0, 0.0), pt(2.0, 2.0)),
            Segment::line(pt(2.0, 2.0), pt(0.0, 2.0)),
            Segment::line(pt(0.0, 2.0), pt(0.0, 0.0)),
        ];
        let ray = Ray::from_angle(pt(1.0, 1.0), 0.3);
        let wind: i32 = square
            .iter()
            .flat_map(|s| s.intersect_ray(&ray, 1e-8))
            .map(|h| h.wind)
            .sum();
        assert_eq!(wind, 1);
    }
}
