//! Consistency validation of a simplified planar graph.
//!
//! Checks the structural invariants a finished pipeline run guarantees:
//! face duality across every edge, the Euler characteristic per connected
//! component, and agreement between solved winding maps and the wire
//! differentials. Useful in tests and as a debugging probe.

use std::collections::HashSet;

use crate::error::{NumericalError, Result, TopologyError};
use crate::operations::boolean::Graph;
use crate::topology::VertexId;

/// Validates a graph after [`Graph::compute_simplified_faces`].
///
/// # Errors
///
/// Returns [`TopologyError::InvalidTopology`] when the subdivision
/// structure is broken and [`NumericalError::WindingConflict`] when the
/// winding maps disagree with an edge differential.
pub fn validate_graph(graph: &Graph) -> Result<()> {
    let store = graph.store();

    // Face duality: the two sides of an edge bound different faces.
    for id in store.edge_ids() {
        let e = store.edge(id)?;
        let (Some(forward), Some(reversed)) = (e.forward_face, e.reversed_face) else {
            return Err(TopologyError::InvalidTopology(
                "edge without face assignment".into(),
            )
            .into());
        };
        if forward == reversed {
            return Err(TopologyError::InvalidTopology(
                "edge bounded by the same face on both sides".into(),
            )
            .into());
        }
    }

    // Euler characteristic: V - E + F = 1 + C, with the unbounded face
    // counted once and C the number of connected components.
    let components = count_components(graph)?;
    let v = store.vertex_count();
    let e = store.edge_count();
    let f = store.face_count();
    if v + f != e + 1 + components {
        return Err(TopologyError::InvalidTopology(format!(
            "Euler characteristic violated: V={v} E={e} F={f} C={components}"
        ))
        .into());
    }

    // Winding consistency across every edge.
    let diff = graph.edge_differentials();
    for id in store.edge_ids() {
        let e = store.edge(id)?;
        let forward = store
            .face(e.forward_face.ok_or(NumericalError::MissingBoundary)?)?
            .winding
            .clone();
        let reversed = store
            .face(e.reversed_face.ok_or(NumericalError::MissingBoundary)?)?
            .winding
            .clone();
        let (Some(forward), Some(reversed)) = (forward, reversed) else {
            // Winding has not been computed; nothing further to check.
            continue;
        };
        for shape in graph.shape_ids() {
            let expected = diff.get(id).and_then(|m| m.get(shape)).copied().unwrap_or(0);
            let got = forward.get(shape).copied().unwrap_or(0)
                - reversed.get(shape).copied().unwrap_or(0);
            if got != expected {
                return Err(NumericalError::WindingConflict.into());
            }
        }
    }
    Ok(())
}

fn count_components(graph: &Graph) -> Result<usize> {
    let store = graph.store();
    let mut seen: HashSet<VertexId> = HashSet::new();
    let mut components = 0;
    for root in store.vertex_ids() {
        if seen.contains(&root) {
            continue;
        }
        components += 1;
        let mut stack = vec![root];
        seen.insert(root);
        while let Some(v) = stack.pop() {
            for h in &store.vertex(v)?.incident {
                let w = store.half_end(*h)?;
                if seen.insert(w) {
                    stack.push(w);
                }
            }
        }
    }
    Ok(components)
}
