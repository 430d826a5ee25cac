use std::collections::BTreeSet;

use crate::error::{GeometryError, Result};
use crate::geometry::segment::Segment;
use crate::geometry::shape::{Shape, Subpath};
use crate::math::{midpoint, Epsilons, Point2, TOLERANCE};
use crate::topology::{
    FaceId, HalfEdge, ShapeId, TopologyStore, VertexData, VertexId, WireData,
};

/// A planar graph of curve segments under simplification.
///
/// Shapes are ingested as vertices, edges, and wires; the simplification
/// phases then rewrite the graph into a valid planar subdivision whose
/// faces carry per-shape winding numbers. The graph owns every entity it
/// creates through its [`TopologyStore`].
#[derive(Debug, Default)]
pub struct Graph {
    pub(crate) store: TopologyStore,
    pub(crate) shape_ids: BTreeSet<ShapeId>,
    pub(crate) unbounded_face: Option<FaceId>,
    pub(crate) epsilons: Epsilons,
}

impl Graph {
    /// Creates an empty graph with default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with custom tolerances.
    #[must_use]
    pub fn with_epsilons(epsilons: Epsilons) -> Self {
        Self {
            epsilons,
            ..Self::default()
        }
    }

    /// The underlying topology store.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// The unbounded face, available after face extraction.
    #[must_use]
    pub fn unbounded_face(&self) -> Option<FaceId> {
        self.unbounded_face
    }

    /// The shape ids ingested so far.
    #[must_use]
    pub fn shape_ids(&self) -> &BTreeSet<ShapeId> {
        &self.shape_ids
    }

    /// Ingests a whole shape under the given shape id.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] if any input segment
    /// carries a non-finite coordinate.
    pub fn add_shape(&mut self, shape_id: ShapeId, shape: &Shape) -> Result<()> {
        self.shape_ids.insert(shape_id);
        for subpath in &shape.subpaths {
            self.add_subpath(shape_id, subpath)?;
        }
        Ok(())
    }

    /// Ingests a single subpath under the given shape id.
    ///
    /// Appends the implicit closing line when the subpath is marked closed
    /// and its endpoints are farther apart than the vertex tolerance; a
    /// smaller gap is absorbed by the shared join vertex instead. Interior
    /// joints beyond the vertex tolerance get the same treatment: a
    /// connector line keeps the contour watertight.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] on non-finite input.
    pub fn add_subpath(&mut self, shape_id: ShapeId, subpath: &Subpath) -> Result<()> {
        self.shape_ids.insert(shape_id);
        if subpath.segments.is_empty() {
            return Ok(());
        }
        for seg in &subpath.segments {
            if let Some((x, y)) = seg.non_finite_coordinate() {
                return Err(GeometryError::NonFiniteCoordinate { x, y }.into());
            }
        }

        let mut segments: Vec<Segment> = Vec::with_capacity(subpath.segments.len() + 1);
        for seg in &subpath.segments {
            if let Some(prev) = segments.last() {
                let gap = (seg.start() - prev.end()).norm();
                if gap > self.epsilons.vertex {
                    segments.push(Segment::line(prev.end(), seg.start()));
                }
            }
            segments.push(*seg);
        }
        let closes = subpath.closed;
        if closes {
            let first_start = segments[0].start();
            let last_end = segments[segments.len() - 1].end();
            if (last_end - first_start).norm() > self.epsilons.vertex {
                segments.push(Segment::line(last_end, first_start));
            }
        }

        let n = segments.len();
        let mut vertices: Vec<VertexId> = Vec::with_capacity(n + 1);
        if closes {
            // One vertex per junction, the junction before segment i first.
            for i in 0..n {
                let prev = &segments[(i + n - 1) % n];
                let point = join_point(&prev.end(), &segments[i].start());
                vertices.push(self.store.add_vertex(VertexData::new(point)));
            }
        } else {
            vertices.push(
                self.store
                    .add_vertex(VertexData::new(segments[0].start())),
            );
            for i in 1..n {
                let point = join_point(&segments[i - 1].end(), &segments[i].start());
                vertices.push(self.store.add_vertex(VertexData::new(point)));
            }
            vertices.push(
                self.store
                    .add_vertex(VertexData::new(segments[n - 1].end())),
            );
        }

        let mut halves = Vec::with_capacity(n);
        for (i, segment) in segments.into_iter().enumerate() {
            let start = vertices[i];
            let end = if closes {
                vertices[(i + 1) % n]
            } else {
                vertices[i + 1]
            };
            let edge = self.store.add_edge(segment, start, end)?;
            halves.push(HalfEdge::forward(edge));
        }
        self.store.add_wire(WireData::new(shape_id, halves));
        Ok(())
    }
}

/// Position of the shared vertex between two consecutive segment
/// endpoints: their common point when equal, the midpoint otherwise.
fn join_point(a: &Point2, b: &Point2) -> Point2 {
    if (a - b).norm() <= TOLERANCE {
        *b
    } else {
        midpoint(a, b)
    }
}
