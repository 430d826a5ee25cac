use std::f64::consts::{FRAC_PI_2, PI};

use crate::math::{intersect_2d::angle_to_arc_param, Aabb, Point2, Vector2, TOLERANCE};

/// A circular arc, parametrized over `[0, 1]`.
///
/// The arc sweeps from `start_angle` through `start_angle + sweep`
/// (radians, CCW positive) around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    /// Creates a new circular arc.
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Absolute angle at parameter `t`.
    #[must_use]
    pub fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + t * self.sweep
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point2 {
        let a = self.angle_at(t);
        Point2::new(
            self.center.x + self.radius * a.cos(),
            self.center.y + self.radius * a.sin(),
        )
    }

    /// Derivative with respect to `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let a = self.angle_at(t);
        Vector2::new(-a.sin(), a.cos()) * (self.radius * self.sweep)
    }

    /// Signed curvature (positive when curving left, constant for an arc).
    #[must_use]
    pub fn curvature_at(&self, _t: f64) -> f64 {
        if self.radius < TOLERANCE {
            return 0.0;
        }
        if self.sweep >= 0.0 {
            1.0 / self.radius
        } else {
            -1.0 / self.radius
        }
    }

    /// Splits at parameter `t` into two sub-arcs.
    #[must_use]
    pub fn subdivided(&self, t: f64) -> (Self, Self) {
        let split = self.angle_at(t);
        (
            Self::new(self.center, self.radius, self.start_angle, t * self.sweep),
            Self::new(self.center, self.radius, split, (1.0 - t) * self.sweep),
        )
    }

    /// The sub-arc between parameters `t0` and `t1`.
    #[must_use]
    pub fn sub_range(&self, t0: f64, t1: f64) -> Self {
        Self::new(
            self.center,
            self.radius,
            self.angle_at(t0),
            (t1 - t0) * self.sweep,
        )
    }

    /// The same arc traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(
            self.center,
            self.radius,
            self.start_angle + self.sweep,
            -self.sweep,
        )
    }

    /// Axis-aligned bounding box, tight over the arc.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_points(&[self.position_at(0.0), self.position_at(1.0)]);
        // Quadrant angles inside the sweep are the only interior extrema.
        let (lo, hi) = if self.sweep >= 0.0 {
            (self.start_angle, self.start_angle + self.sweep)
        } else {
            (self.start_angle + self.sweep, self.start_angle)
        };
        let mut k = (lo / FRAC_PI_2).ceil();
        while k * FRAC_PI_2 <= hi + TOLERANCE {
            let a = k * FRAC_PI_2;
            aabb.include(&Point2::new(
                self.center.x + self.radius * a.cos(),
                self.center.y + self.radius * a.sin(),
            ));
            k += 1.0;
        }
        aabb
    }

    /// Contribution of this arc to the signed area integral.
    #[must_use]
    pub fn signed_area_fragment(&self) -> f64 {
        // For p(theta) = center + r*(cos, sin):
        //   x dy - y dx = (r^2 + r*(cx*cos + cy*sin)) dtheta
        let a0 = self.start_angle;
        let a1 = self.start_angle + self.sweep;
        let (cx, cy) = (self.center.x, self.center.y);
        let r = self.radius;
        let linear = cx * (a1.sin() - a0.sin()) - cy * (a1.cos() - a0.cos());
        (r * r * self.sweep + r * linear) * 0.5
    }

    /// Parameters where the arc passes through `p`, within `eps`.
    #[must_use]
    pub fn parameters_at_point(&self, p: &Point2, eps: f64) -> Vec<f64> {
        let d = p - self.center;
        if (d.norm() - self.radius).abs() > eps {
            return Vec::new();
        }
        let angle = d.y.atan2(d.x);
        match angle_to_arc_param(angle, self.start_angle, self.sweep) {
            Some(t) if (self.position_at(t) - p).norm() < eps * 2.0 => vec![t],
            _ => Vec::new(),
        }
    }

    /// Whether the arc closes a full turn (or more).
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.sweep.abs() >= 2.0 * PI - TOLERANCE
    }
}
