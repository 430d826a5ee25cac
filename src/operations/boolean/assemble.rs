//! Result assembly: the filled sub-graph, collinear edge merging,
//! alternating fill, and shape emission.

use slotmap::SecondaryMap;

use crate::error::{NumericalError, Result};
use crate::geometry::segment::Segment;
use crate::geometry::shape::{Shape, Subpath};
use crate::math::cross_2d;
use crate::topology::{VertexData, VertexId};

use super::graph::Graph;

impl Graph {
    /// Builds a fresh graph containing exactly the edges separating filled
    /// from unfilled faces. Vertices are mapped over on demand; wires are
    /// not carried, since the sub-graph is filled by two-coloring rather
    /// than winding counts.
    ///
    /// # Errors
    ///
    /// Fails if face inclusion has not been computed for both sides of
    /// some edge.
    pub(crate) fn create_filled_sub_graph(&self) -> Result<Graph> {
        let mut sub = Graph::with_epsilons(self.epsilons);
        sub.shape_ids = self.shape_ids.clone();
        let mut vertex_map: SecondaryMap<VertexId, VertexId> = SecondaryMap::new();

        for id in self.store.edge_ids() {
            let e = self.store.edge(id)?;
            let forward_filled = self
                .store
                .face(e.forward_face.ok_or(NumericalError::MissingBoundary)?)?
                .filled
                .ok_or(NumericalError::UnreachableFace)?;
            let reversed_filled = self
                .store
                .face(e.reversed_face.ok_or(NumericalError::MissingBoundary)?)?
                .filled
                .ok_or(NumericalError::UnreachableFace)?;
            if forward_filled == reversed_filled {
                continue;
            }
            let mut map_vertex = |old: VertexId, sub: &mut Graph| -> Result<VertexId> {
                if let Some(mapped) = vertex_map.get(old) {
                    return Ok(*mapped);
                }
                let point = self.store.vertex(old)?.point;
                let created = sub.store.add_vertex(VertexData::new(point));
                vertex_map.insert(old, created);
                Ok(created)
            };
            let start = map_vertex(e.start, &mut sub)?;
            let end = map_vertex(e.end, &mut sub)?;
            sub.store.add_edge(e.segment, start, end)?;
        }
        Ok(sub)
    }

    /// Merges runs of collinear line edges: a degree-two vertex joining two
    /// lines whose directions agree within the collinear tolerance is
    /// replaced by a single line between the far endpoints.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn collapse_adjacent_edges(&mut self) -> Result<()> {
        'restart: loop {
            for vid in self.store.vertex_ids() {
                let incident = self.store.vertex(vid)?.incident.clone();
                if incident.len() != 2 {
                    continue;
                }
                let (h1, h2) = (incident[0], incident[1]);
                if h1.edge == h2.edge {
                    continue;
                }
                let e1 = self.store.edge(h1.edge)?;
                let e2 = self.store.edge(h2.edge)?;
                if !matches!(e1.segment, Segment::Line(_))
                    || !matches!(e2.segment, Segment::Line(_))
                {
                    continue;
                }
                let t1 = self.store.outgoing_tangent(h1)?.normalize();
                let t2 = self.store.outgoing_tangent(h2)?.normalize();
                // Straight through: outgoing directions opposite, parallel.
                if cross_2d(&t1, &t2).abs() > self.epsilons.collinear_tangent || t1.dot(&t2) > 0.0 {
                    continue;
                }
                let far1 = self.store.half_end(h1)?;
                let far2 = self.store.half_end(h2)?;
                if far1 == vid || far2 == vid || far1 == far2 {
                    continue;
                }
                let p1 = self.store.vertex(far1)?.point;
                let p2 = self.store.vertex(far2)?.point;
                self.store.remove_edge(h1.edge)?;
                self.store.remove_edge(h2.edge)?;
                self.store.remove_vertex(vid);
                self.store.add_edge(Segment::line(p1, p2), far1, far2)?;
                continue 'restart;
            }
            return Ok(());
        }
    }

    /// Two-colors the faces of the sub-graph: the unbounded face is
    /// unfilled and adjacent faces alternate.
    ///
    /// # Errors
    ///
    /// Fails with [`NumericalError::UnreachableFace`] if some face cannot
    /// be reached across shared edges.
    pub(crate) fn fill_alternating_faces(&mut self) -> Result<()> {
        let unbounded = self
            .unbounded_face
            .ok_or(NumericalError::UnreachableFace)?;
        self.store.face_mut(unbounded)?.filled = Some(false);
        loop {
            let mut progressed = false;
            for id in self.store.edge_ids() {
                let e = self.store.edge(id)?;
                let forward_face = e.forward_face.ok_or(NumericalError::MissingBoundary)?;
                let reversed_face = e.reversed_face.ok_or(NumericalError::MissingBoundary)?;
                let f = self.store.face(forward_face)?.filled;
                let r = self.store.face(reversed_face)?.filled;
                match (f, r) {
                    (Some(known), None) => {
                        self.store.face_mut(reversed_face)?.filled = Some(!known);
                        progressed = true;
                    }
                    (None, Some(known)) => {
                        self.store.face_mut(forward_face)?.filled = Some(!known);
                        progressed = true;
                    }
                    _ => {}
                }
            }
            if !progressed {
                break;
            }
        }
        for fid in self.store.face_ids() {
            if self.store.face(fid)?.filled.is_none() {
                return Err(NumericalError::UnreachableFace.into());
            }
        }
        Ok(())
    }

    /// Emits every filled face as subpaths: one per boundary, one per hole.
    /// Reversed halves contribute their segment reversed, so each emitted
    /// subpath traverses its cycle head to tail.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub fn faces_to_shape(&self) -> Result<Shape> {
        let mut subpaths = Vec::new();
        for fid in self.store.face_ids() {
            let face = self.store.face(fid)?;
            if face.filled != Some(true) {
                continue;
            }
            let mut cycles = Vec::new();
            if let Some(b) = face.boundary {
                cycles.push(b);
            }
            cycles.extend(face.holes.iter().copied());
            for bid in cycles {
                let boundary = self.store.boundary(bid)?;
                let mut segments = Vec::with_capacity(boundary.half_edges.len());
                for h in &boundary.half_edges {
                    segments.push(self.store.half_segment(*h)?);
                }
                subpaths.push(Subpath::new(segments, true));
            }
        }
        Ok(Shape::new(subpaths))
    }
}
