use super::edge::{EdgeId, HalfEdge};

slotmap::new_key_type! {
    /// Unique identifier for a wire in the topology store.
    pub struct WireId;
}

/// Identifier of an input shape, assigned by the caller.
pub type ShapeId = u32;

/// Data associated with a wire: one original input contour.
///
/// A wire is the ordered cycle of half-edges that an input subpath was
/// ingested as. It is preserved across edge subdivisions by splicing, so
/// that per-shape winding contributions can be recovered after the graph
/// has been rebuilt many times over.
#[derive(Debug, Clone)]
pub struct WireData {
    /// The shape this contour belongs to.
    pub shape: ShapeId,
    /// The ordered, head-to-tail connected half-edge cycle.
    pub edges: Vec<HalfEdge>,
}

impl WireData {
    /// Creates a new wire.
    #[must_use]
    pub fn new(shape: ShapeId, edges: Vec<HalfEdge>) -> Self {
        Self { shape, edges }
    }

    /// Replaces every traversal of `target` with a replacement run.
    ///
    /// Occurrences of the forward half become `replacement` verbatim;
    /// occurrences of the reversed half become the twin sequence in reverse
    /// order, so the wire stays connected head to tail. An empty
    /// replacement splices the edge out.
    pub fn splice(&mut self, target: EdgeId, replacement: &[HalfEdge]) {
        if !self.edges.iter().any(|h| h.edge == target) {
            return;
        }
        let mut out = Vec::with_capacity(self.edges.len() + replacement.len());
        for h in &self.edges {
            if h.edge != target {
                out.push(*h);
            } else if h.forward {
                out.extend_from_slice(replacement);
            } else {
                out.extend(replacement.iter().rev().map(|r| r.twin()));
            }
        }
        self.edges = out;
    }
}
