use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Winding number of `p` with respect to a closed polygon.
///
/// Counts signed crossings of the horizontal ray towards +x. Points exactly
/// on an edge may land on either side.
#[must_use]
pub fn winding_number(p: &Point2, points: &[Point2]) -> i32 {
    let n = points.len();
    if n < 2 {
        return 0;
    }
    let mut wind = 0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0.0 {
                wind += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0.0 {
            wind -= 1;
        }
    }
    wind
}

/// Twice the signed area of triangle (a, b, c); positive when c is left of a->b.
fn is_left(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}
