use std::f64::consts::PI;

use super::{Point2, Vector2, TOLERANCE};

/// Parametric line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        let pt = Point2::new(a0.x + da.x * t_clamped, a0.y + da.y * t_clamped);
        Some((pt, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Parameters `s` along the line `origin + s * dir` where it meets a circle.
///
/// `dir` need not be unit length; the returned parameters are in units of
/// `dir`. Zero, one (tangent), or two ascending parameters.
#[must_use]
pub fn line_circle_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    center: &Point2,
    radius: f64,
) -> Vec<f64> {
    let len_sq = dir.norm_squared();
    if radius < TOLERANCE || len_sq < TOLERANCE * TOLERANCE {
        return Vec::new();
    }
    // Substitute the parametric line into the circle equation.
    let f = origin - center;
    let a = len_sq;
    let b = 2.0 * f.dot(dir);
    let c = f.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return Vec::new();
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();
    if disc_sqrt < TOLERANCE * 100.0 {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    }
}

/// Intersection points of two circles.
///
/// Returns zero, one (tangent), or two points. Concentric circles yield none.
#[must_use]
pub fn circle_circle_intersect_2d(
    c1: &Point2,
    r1: f64,
    c2: &Point2,
    r2: f64,
) -> Vec<Point2> {
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }
    let d = c2 - c1;
    let dist_sq = d.norm_squared();
    let dist = dist_sq.sqrt();
    if dist < TOLERANCE {
        return Vec::new();
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + TOLERANCE || dist < diff - TOLERANCE {
        return Vec::new();
    }

    // Distance from c1 along c1->c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -TOLERANCE {
        return Vec::new();
    }
    let h = h_sq.max(0.0).sqrt();

    let m = c1 + d * (a / dist);
    let perp = Vector2::new(-d.y / dist, d.x / dist);

    if h < TOLERANCE {
        vec![m]
    } else {
        vec![m + perp * h, m - perp * h]
    }
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    if sweep.abs() < TOLERANCE {
        return None;
    }
    let eps = TOLERANCE * 100.0;

    // Angular offset from start_angle, normalized into the sweep direction.
    let mut delta = angle - start_angle;
    if sweep > 0.0 {
        while delta < -eps {
            delta += 2.0 * PI;
        }
        while delta > 2.0 * PI + eps {
            delta -= 2.0 * PI;
        }
    } else {
        while delta > eps {
            delta -= 2.0 * PI;
        }
        while delta < -2.0 * PI - eps {
            delta += 2.0 * PI;
        }
    }

    let t = delta / sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}
