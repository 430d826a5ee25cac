use crate::math::{Point2, TOLERANCE};
use crate::tessellation;

use super::segment::Segment;

/// One contour of a shape: a run of connected segments, optionally closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Subpath {
    /// Creates a subpath from segments.
    #[must_use]
    pub fn new(segments: Vec<Segment>, closed: bool) -> Self {
        Self { segments, closed }
    }

    /// Creates a closed polygonal subpath through the given points.
    #[must_use]
    pub fn polygon(points: &[Point2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::line(points[i], points[(i + 1) % n]))
            .collect();
        Self {
            segments,
            closed: true,
        }
    }

    /// Whether closing this subpath requires an extra line segment.
    ///
    /// True when the subpath is closed and its endpoints do not already
    /// coincide.
    #[must_use]
    pub fn has_closing_segment(&self) -> bool {
        if !self.closed || self.segments.is_empty() {
            return false;
        }
        let first = self.segments[0].start();
        let last = self.segments[self.segments.len() - 1].end();
        (last - first).norm() > TOLERANCE
    }

    /// The implicit closing line from the last point back to the first.
    #[must_use]
    pub fn closing_segment(&self) -> Option<Segment> {
        if !self.has_closing_segment() {
            return None;
        }
        let first = self.segments[0].start();
        let last = self.segments[self.segments.len() - 1].end();
        Some(Segment::line(last, first))
    }

    /// Whether every segment has finite coordinates.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.segments.iter().all(Segment::is_finite)
    }

    /// Flattens the subpath to a polyline within the given chord tolerance.
    #[must_use]
    pub fn flattened(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            if i == 0 {
                points.push(seg.start());
            }
            tessellation::flatten_into(seg, tolerance, &mut points);
        }
        if let Some(closing) = self.closing_segment() {
            tessellation::flatten_into(&closing, tolerance, &mut points);
        }
        points
    }

    /// SVG path-data representation of this subpath.
    #[must_use]
    pub fn to_path_data(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        let Some(first) = self.segments.first() else {
            return out;
        };
        let start = first.start();
        let _ = write!(out, "M {:.6} {:.6}", start.x, start.y);
        for seg in &self.segments {
            out.push(' ');
            seg.write_path_data(&mut out);
        }
        if self.closed {
            out.push_str(" Z");
        }
        out
    }
}

/// A shape: any number of subpaths, interpreted with the nonzero fill rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub subpaths: Vec<Subpath>,
}

impl Shape {
    /// Creates a shape from subpaths.
    #[must_use]
    pub fn new(subpaths: Vec<Subpath>) -> Self {
        Self { subpaths }
    }

    /// A shape with no subpaths (the empty region).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single closed polygon.
    #[must_use]
    pub fn polygon(points: &[Point2]) -> Self {
        Self::new(vec![Subpath::polygon(points)])
    }

    /// An axis-aligned rectangle, counter-clockwise.
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::polygon(&[
            Point2::new(x, y),
            Point2::new(x + width, y),
            Point2::new(x + width, y + height),
            Point2::new(x, y + height),
        ])
    }

    /// Whether every subpath has finite coordinates.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.subpaths.iter().all(Subpath::is_finite)
    }

    /// SVG path-data representation of the whole shape.
    #[must_use]
    pub fn to_path_data(&self) -> String {
        self.subpaths
            .iter()
            .map(Subpath::to_path_data)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
