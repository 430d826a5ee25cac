pub mod boundary;
pub mod edge;
pub mod face;
pub mod vertex;
pub mod wire;

pub use boundary::{BoundaryData, BoundaryId};
pub use edge::{EdgeData, EdgeId, HalfEdge};
pub use face::{FaceData, FaceId, WindingMap};
pub use vertex::{VertexData, VertexId};
pub use wire::{ShapeId, WireData, WireId};

use crate::error::TopologyError;
use crate::geometry::segment::Segment;
use crate::math::Vector2;
use slotmap::SlotMap;

/// Central arena that owns all topological entities of one planar graph.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    boundaries: SlotMap<BoundaryId, BoundaryData>,
    faces: SlotMap<FaceId, FaceData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Removes a vertex. The caller is responsible for having detached its
    /// incident edges first.
    pub fn remove_vertex(&mut self, id: VertexId) {
        self.vertices.remove(id);
    }

    /// All vertex IDs, in storage order.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().collect()
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    /// Inserts an edge between two existing vertices, registering its two
    /// halves in the endpoint incidence lists.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint vertex is not in the store.
    pub fn add_edge(
        &mut self,
        segment: Segment,
        start: VertexId,
        end: VertexId,
    ) -> Result<EdgeId, TopologyError> {
        if !self.vertices.contains_key(start) || !self.vertices.contains_key(end) {
            return Err(TopologyError::EntityNotFound("vertex"));
        }
        let id = self.edges.insert(EdgeData::new(segment, start, end));
        self.vertices[start].incident.push(HalfEdge::forward(id));
        self.vertices[end].incident.push(HalfEdge::reversed(id));
        Ok(id)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Removes an edge and detaches its halves from the endpoint incidence
    /// lists. Wires referencing the edge must be spliced beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData, TopologyError> {
        let data = self
            .edges
            .remove(id)
            .ok_or(TopologyError::EntityNotFound("edge"))?;
        for vid in [data.start, data.end] {
            if let Some(v) = self.vertices.get_mut(vid) {
                v.incident.retain(|h| h.edge != id);
            }
        }
        Ok(data)
    }

    /// Redirects one endpoint of an edge from `from` to `to`, moving the
    /// corresponding incidence entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or either vertex is missing.
    pub fn rewire_edge(
        &mut self,
        id: EdgeId,
        from: VertexId,
        to: VertexId,
    ) -> Result<(), TopologyError> {
        if !self.vertices.contains_key(to) {
            return Err(TopologyError::EntityNotFound("vertex"));
        }
        let (moved_start, moved_end) = {
            let e = self.edge_mut(id)?;
            let ms = e.start == from;
            let me = e.end == from;
            if ms {
                e.start = to;
            }
            if me {
                e.end = to;
            }
            (ms, me)
        };
        for (moved, half) in [
            (moved_start, HalfEdge::forward(id)),
            (moved_end, HalfEdge::reversed(id)),
        ] {
            if !moved {
                continue;
            }
            if let Some(v) = self.vertices.get_mut(from) {
                v.incident.retain(|h| *h != half);
            }
            self.vertices[to].incident.push(half);
        }
        Ok(())
    }

    /// All edge IDs, in storage order.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    /// Number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or(TopologyError::EntityNotFound("wire"))
    }

    /// All wire IDs, in storage order.
    #[must_use]
    pub fn wire_ids(&self) -> Vec<WireId> {
        self.wires.keys().collect()
    }

    /// Iterates all wires.
    pub fn wires(&self) -> impl Iterator<Item = &WireData> {
        self.wires.values()
    }

    /// Replaces every traversal of `edge` in every wire with the
    /// replacement run (see [`WireData::splice`]).
    pub fn splice_wires(&mut self, edge: EdgeId, replacement: &[HalfEdge]) {
        for wire in self.wires.values_mut() {
            wire.splice(edge, replacement);
        }
    }

    // --- Boundary operations ---

    /// Inserts a boundary and returns its ID.
    pub fn add_boundary(&mut self, data: BoundaryData) -> BoundaryId {
        self.boundaries.insert(data)
    }

    /// Returns a reference to the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn boundary(&self, id: BoundaryId) -> Result<&BoundaryData, TopologyError> {
        self.boundaries
            .get(id)
            .ok_or(TopologyError::EntityNotFound("boundary"))
    }

    /// Returns a mutable reference to the boundary data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn boundary_mut(&mut self, id: BoundaryId) -> Result<&mut BoundaryData, TopologyError> {
        self.boundaries
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("boundary"))
    }

    /// All boundary IDs, in storage order.
    #[must_use]
    pub fn boundary_ids(&self) -> Vec<BoundaryId> {
        self.boundaries.keys().collect()
    }

    /// Removes all boundaries (before re-extraction on a rebuilt graph).
    pub fn clear_boundaries(&mut self) {
        self.boundaries.clear();
        for edge in self.edges.values_mut() {
            edge.forward_boundary = None;
            edge.reversed_boundary = None;
        }
    }

    /// Removes all faces and unsets the per-side face references.
    pub fn clear_faces(&mut self) {
        self.faces.clear();
        for edge in self.edges.values_mut() {
            edge.forward_face = None;
            edge.reversed_face = None;
        }
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut FaceData, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// All face IDs, in storage order.
    #[must_use]
    pub fn face_ids(&self) -> Vec<FaceId> {
        self.faces.keys().collect()
    }

    /// Number of live faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Half-edge helpers ---

    /// The vertex a half-edge leaves from.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn half_start(&self, h: HalfEdge) -> Result<VertexId, TopologyError> {
        Ok(self.edge(h.edge)?.half_start(h.forward))
    }

    /// The vertex a half-edge arrives at.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn half_end(&self, h: HalfEdge) -> Result<VertexId, TopologyError> {
        Ok(self.edge(h.edge)?.half_end(h.forward))
    }

    /// The segment of a half-edge, oriented along the half's direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn half_segment(&self, h: HalfEdge) -> Result<Segment, TopologyError> {
        let seg = &self.edge(h.edge)?.segment;
        Ok(if h.forward { *seg } else { seg.reversed() })
    }

    /// Outgoing tangent of a half-edge at its start vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn outgoing_tangent(&self, h: HalfEdge) -> Result<Vector2, TopologyError> {
        let seg = &self.edge(h.edge)?.segment;
        Ok(if h.forward {
            seg.start_tangent()
        } else {
            -seg.end_tangent()
        })
    }

    /// Signed curvature of a half-edge at its start vertex, in traversal
    /// direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the store.
    pub fn outgoing_curvature(&self, h: HalfEdge) -> Result<f64, TopologyError> {
        let seg = &self.edge(h.edge)?.segment;
        Ok(if h.forward {
            seg.curvature_at(0.0)
        } else {
            -seg.curvature_at(1.0)
        })
    }
}
