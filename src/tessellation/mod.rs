//! Flattening of curve segments into polylines.
//!
//! Used by shape consumers (rasterization, export) and by tests. The
//! simplification pipeline itself evaluates areas and extrema exactly and
//! does not depend on flattening.

use crate::geometry::segment::Segment;
use crate::math::Point2;

/// Flattens a segment to a polyline within `tolerance`, including both
/// endpoints.
#[must_use]
pub fn flatten_segment(segment: &Segment, tolerance: f64) -> Vec<Point2> {
    let mut points = vec![segment.start()];
    flatten_into(segment, tolerance, &mut points);
    points
}

/// Appends the flattened interior points and the end point of `segment`.
///
/// The segment's start point is assumed to be present already, so whole
/// subpaths can be appended piecewise without duplicate joints.
pub fn flatten_into(segment: &Segment, tolerance: f64, points: &mut Vec<Point2>) {
    let n = subdivision_count(segment, tolerance);
    for i in 1..n {
        let t = f64::from(i) / f64::from(n);
        points.push(segment.position_at(t));
    }
    points.push(segment.end());
}

/// Number of chords needed to approximate `segment` within `tolerance`.
#[must_use]
pub fn subdivision_count(segment: &Segment, tolerance: f64) -> u32 {
    match segment {
        Segment::Line(_) => 1,
        Segment::Arc(arc) => arc_subdivision_count(arc.radius, arc.sweep.abs(), tolerance),
        Segment::Quadratic(_) | Segment::Cubic(_) => {
            bezier_subdivision_count(segment, tolerance)
        }
    }
}

/// Chord count for an arc from the sagitta formula:
/// `sagitta = r * (1 - cos(theta / 2))`.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.clamp(1, 256)
}

/// Chord count for a Bezier from the deviation of its control polygon.
///
/// A Bezier deviates from its chord by at most the control polygon's
/// deviation; halving the parameter range quarters the deviation, which
/// gives the square-root bound below.
fn bezier_subdivision_count(segment: &Segment, tolerance: f64) -> u32 {
    let deviation = match segment {
        Segment::Quadratic(q) => {
            let chord_mid = (q.start.coords + q.end.coords) * 0.5;
            (q.control.coords - chord_mid).norm()
        }
        Segment::Cubic(c) => {
            let third = (c.end.coords - c.start.coords) / 3.0;
            let d1 = (c.control1.coords - c.start.coords - third).norm();
            let d2 = (c.control2.coords - c.end.coords + third).norm();
            d1.max(d2) * 3.0
        }
        Segment::Line(_) | Segment::Arc(_) => return 1,
    };
    if tolerance <= 0.0 || deviation < 1e-12 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (deviation / tolerance).sqrt().ceil() as u32;
    n.clamp(1, 256)
}
