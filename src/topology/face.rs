use std::collections::BTreeMap;

use super::boundary::BoundaryId;
use super::wire::ShapeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Per-shape winding numbers of a face.
///
/// Shape ids absent from the map wind zero.
pub type WindingMap = BTreeMap<ShapeId, i32>;

/// Data associated with a face: one maximal connected open region of the
/// plane minus the edges.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The inner boundary enclosing this face, or `None` for the single
    /// unbounded face.
    pub boundary: Option<BoundaryId>,
    /// Outer boundaries of regions excluded from this face.
    pub holes: Vec<BoundaryId>,
    /// Winding number per input shape, filled in by winding propagation.
    pub winding: Option<WindingMap>,
    /// Whether the face is part of the filtered result.
    pub filled: Option<bool>,
}

impl FaceData {
    /// Creates a face bounded by the given inner boundary (or unbounded).
    #[must_use]
    pub fn new(boundary: Option<BoundaryId>) -> Self {
        Self {
            boundary,
            holes: Vec::new(),
            winding: None,
            filled: None,
        }
    }
}
