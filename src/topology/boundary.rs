use super::edge::HalfEdge;

slotmap::new_key_type! {
    /// Unique identifier for a boundary in the topology store.
    pub struct BoundaryId;
}

/// A closed cycle of half-edges bounding a region on its left side.
///
/// Inner boundaries (positive signed area, counter-clockwise) bound a
/// finite face. Outer boundaries (negative area, clockwise) rim a hole or
/// the unbounded face.
#[derive(Debug, Clone)]
pub struct BoundaryData {
    /// The half-edge cycle, connected head to tail.
    pub half_edges: Vec<HalfEdge>,
    /// Signed area enclosed by the cycle.
    pub signed_area: f64,
    /// Outer boundaries immediately contained by this one, discovered
    /// during boundary-graph construction.
    pub children: Vec<BoundaryId>,
}

impl BoundaryData {
    /// Creates a boundary from its cycle and signed area.
    #[must_use]
    pub fn new(half_edges: Vec<HalfEdge>, signed_area: f64) -> Self {
        Self {
            half_edges,
            signed_area,
            children: Vec::new(),
        }
    }

    /// Whether this boundary encloses a finite face from within (CCW).
    #[must_use]
    pub fn is_inner(&self) -> bool {
        self.signed_area > 0.0
    }
}
