use crate::math::Point2;

use super::edge::HalfEdge;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the topology store.
    pub struct VertexId;
}

/// Data associated with a topological vertex.
///
/// `incident` holds every half-edge leaving this vertex. The list is kept
/// in insertion order while the graph is being edited and is sorted
/// counter-clockwise by outgoing tangent angle before face extraction.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Position of the vertex in the plane.
    pub point: Point2,
    /// Outgoing half-edges.
    pub incident: Vec<HalfEdge>,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            incident: Vec::new(),
        }
    }
}
