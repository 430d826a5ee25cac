//! Real-root extraction for low-degree polynomials.
//!
//! Used by segment intersection (curve against line or ray) and by
//! bounding-box extrema. Coefficients are given highest degree first.

use super::TOLERANCE;

/// Real roots of `a*x^2 + b*x + c = 0`.
///
/// Degenerate (linear or constant) inputs are handled; the result holds
/// zero, one, or two roots in ascending order.
#[must_use]
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        if b.abs() < TOLERANCE {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < -TOLERANCE {
        return Vec::new();
    }
    if disc <= TOLERANCE {
        return vec![-b / (2.0 * a)];
    }
    // Stable form: avoid cancellation between -b and the square root.
    let sign = if b >= 0.0 { 1.0 } else { -1.0 };
    let q = -0.5 * (b + sign * disc.sqrt());
    let mut roots = vec![q / a, c / q];
    roots.sort_by(f64::total_cmp);
    roots
}

/// Real roots of `a*x^3 + b*x^2 + c*x + d = 0`, ascending.
#[must_use]
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        return quadratic_roots(b, c, d);
    }
    // Depress: x = t - b/(3a) gives t^3 + p*t + q = 0.
    let b = b / a;
    let c = c / a;
    let d = d / a;
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    let half_q = q * 0.5;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;

    let mut roots = if disc > TOLERANCE {
        // One real root (Cardano).
        let sq = disc.sqrt();
        let u = (-half_q + sq).cbrt();
        let v = (-half_q - sq).cbrt();
        vec![u + v - shift]
    } else if disc >= -TOLERANCE {
        // Repeated roots.
        if half_q.abs() < TOLERANCE && third_p.abs() < TOLERANCE {
            vec![-shift]
        } else {
            let u = (-half_q).cbrt();
            vec![2.0 * u - shift, -u - shift]
        }
    } else {
        // Three distinct real roots (trigonometric form).
        let r = (-third_p).sqrt();
        let phi = (-half_q / (r * r * r)).clamp(-1.0, 1.0).acos();
        let tau = 2.0 * std::f64::consts::PI;
        (0..3)
            .map(|k| 2.0 * r * ((phi + tau * f64::from(k)) / 3.0).cos() - shift)
            .collect()
    };
    roots.sort_by(f64::total_cmp);
    roots
}

/// Filters roots to the unit interval, snapping values within `eps`
/// of 0 or 1 to the exact endpoint.
#[must_use]
pub fn unit_roots(roots: Vec<f64>, eps: f64) -> Vec<f64> {
    let mut out: Vec<f64> = roots
        .into_iter()
        .filter(|t| *t >= -eps && *t <= 1.0 + eps)
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    out.dedup_by(|a, b| (*a - *b).abs() < eps);
    out
}
