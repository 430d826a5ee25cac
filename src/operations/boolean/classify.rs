//! Winding classification: per-shape winding numbers for every face,
//! propagated from the unbounded face across edge differentials.

use slotmap::SecondaryMap;

use crate::error::{NumericalError, Result};
use crate::topology::{EdgeId, WindingMap};

use super::graph::Graph;

impl Graph {
    /// Signed traversal counts of every edge per shape: +1 for each wire
    /// occurrence of the forward half, -1 for the reversed half. An edge's
    /// differential equals the winding discontinuity across it.
    pub(crate) fn edge_differentials(&self) -> SecondaryMap<EdgeId, WindingMap> {
        let mut diff: SecondaryMap<EdgeId, WindingMap> = SecondaryMap::new();
        for wire in self.store.wires() {
            for h in &wire.edges {
                if !diff.contains_key(h.edge) {
                    diff.insert(h.edge, WindingMap::new());
                }
                let count = diff[h.edge].entry(wire.shape).or_insert(0);
                *count += if h.forward { 1 } else { -1 };
            }
        }
        diff
    }

    /// Solves the winding map of every face, starting from all-zero at the
    /// unbounded face and crossing one edge at a time.
    ///
    /// # Errors
    ///
    /// Fails with [`NumericalError::UnreachableFace`] if some face never
    /// receives a map, or [`NumericalError::WindingConflict`] if the solved
    /// maps disagree with an edge differential.
    pub(crate) fn compute_winding_map(&mut self) -> Result<()> {
        let diff = self.edge_differentials();
        let unbounded = self
            .unbounded_face
            .ok_or(NumericalError::UnreachableFace)?;
        let zero: WindingMap = self.shape_ids.iter().map(|s| (*s, 0)).collect();
        self.store.face_mut(unbounded)?.winding = Some(zero);

        loop {
            let mut progressed = false;
            for id in self.store.edge_ids() {
                let e = self.store.edge(id)?;
                let forward_face = e.forward_face.ok_or(NumericalError::MissingBoundary)?;
                let reversed_face = e.reversed_face.ok_or(NumericalError::MissingBoundary)?;
                let forward_known = self.store.face(forward_face)?.winding.clone();
                let reversed_known = self.store.face(reversed_face)?.winding.clone();
                match (forward_known, reversed_known) {
                    (Some(w), None) => {
                        let solved = self.shifted_map(&w, diff.get(id), -1);
                        self.store.face_mut(reversed_face)?.winding = Some(solved);
                        progressed = true;
                    }
                    (None, Some(w)) => {
                        let solved = self.shifted_map(&w, diff.get(id), 1);
                        self.store.face_mut(forward_face)?.winding = Some(solved);
                        progressed = true;
                    }
                    _ => {}
                }
            }
            if !progressed {
                break;
            }
        }

        // Every face must be reachable through shared edges.
        for fid in self.store.face_ids() {
            if self.store.face(fid)?.winding.is_none() {
                return Err(NumericalError::UnreachableFace.into());
            }
        }
        // The solved maps must satisfy every differential, including across
        // edges whose two sides were solved along different paths.
        for id in self.store.edge_ids() {
            let e = self.store.edge(id)?;
            let forward = self
                .store
                .face(e.forward_face.ok_or(NumericalError::MissingBoundary)?)?
                .winding
                .clone()
                .ok_or(NumericalError::UnreachableFace)?;
            let reversed = self
                .store
                .face(e.reversed_face.ok_or(NumericalError::MissingBoundary)?)?
                .winding
                .clone()
                .ok_or(NumericalError::UnreachableFace)?;
            for s in &self.shape_ids {
                let d = diff.get(id).and_then(|m| m.get(s)).copied().unwrap_or(0);
                let got = forward.get(s).copied().unwrap_or(0)
                    - reversed.get(s).copied().unwrap_or(0);
                if got != d {
                    return Err(NumericalError::WindingConflict.into());
                }
            }
        }
        Ok(())
    }

    /// `base + sign * differential`, per shape id.
    fn shifted_map(&self, base: &WindingMap, diff: Option<&WindingMap>, sign: i32) -> WindingMap {
        self.shape_ids
            .iter()
            .map(|s| {
                let b = base.get(s).copied().unwrap_or(0);
                let d = diff.and_then(|m| m.get(s)).copied().unwrap_or(0);
                (*s, b + sign * d)
            })
            .collect()
    }

    /// Applies the inclusion filter to every face's winding map, setting
    /// its `filled` flag.
    ///
    /// # Errors
    ///
    /// Fails with [`NumericalError::UnreachableFace`] if winding maps have
    /// not been computed.
    pub fn compute_face_inclusion<F>(&mut self, filter: F) -> Result<()>
    where
        F: Fn(&WindingMap) -> bool,
    {
        for fid in self.store.face_ids() {
            let winding = self
                .store
                .face(fid)?
                .winding
                .clone()
                .ok_or(NumericalError::UnreachableFace)?;
            self.store.face_mut(fid)?.filled = Some(filter(&winding));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::shape::Shape;
    use crate::math::Point2;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn classified(shape: &Shape, shape_id: u32) -> Graph {
        let mut graph = Graph::new();
        graph.add_shape(shape_id, shape).unwrap();
        graph.order_vertex_edges().unwrap();
        graph.extract_faces().unwrap();
        graph.compute_boundary_graph().unwrap();
        graph.compute_winding_map().unwrap();
        graph
    }

    #[test]
    fn ccw_square_winds_once() {
        let graph = classified(&Shape::rectangle(0.0, 0.0, 2.0, 2.0), 0);
        let unbounded = graph.unbounded_face().unwrap();
        for fid in graph.store.face_ids() {
            let w = graph.store.face(fid).unwrap().winding.clone().unwrap();
            let expected = i32::from(fid != unbounded);
            assert_eq!(w.get(&0).copied().unwrap_or(0), expected);
        }
    }

    #[test]
    fn cw_square_winds_minus_once() {
        let graph = classified(
            &Shape::polygon(&[pt(0.0, 0.0), pt(0.0, 2.0), pt(2.0, 2.0), pt(2.0, 0.0)]),
            3,
        );
        let unbounded = graph.unbounded_face().unwrap();
        let inner = graph
            .store
            .face_ids()
            .into_iter()
            .find(|f| *f != unbounded)
            .unwrap();
        let w = graph.store.face(inner).unwrap().winding.clone().unwrap();
        assert_eq!(w[&3], -1);
    }

    #[test]
    fn unbounded_face_winds_zero() {
        let graph = classified(&Shape::rectangle(0.0, 0.0, 5.0, 5.0), 0);
        let unbounded = graph.unbounded_face().unwrap();
        let w = graph.store.face(unbounded).unwrap().winding.clone().unwrap();
        assert!(w.values().all(|v| *v == 0));
    }

    #[test]
    fn doubly_wound_region_counts_twice() {
        // Two coincident-in-spirit CCW squares from the same shape, one
        // inside the other: the inner region winds twice.
        let mut shape = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        shape
            .subpaths
            .extend(Shape::rectangle(2.0, 2.0, 6.0, 6.0).subpaths);
        let graph = classified(&shape, 0);
        let windings: Vec<i32> = graph
            .store
            .face_ids()
            .into_iter()
            .map(|f| {
                graph
                    .store
                    .face(f)
                    .unwrap()
                    .winding
                    .clone()
                    .unwrap()
                    .get(&0)
                    .copied()
                    .unwrap_or(0)
            })
            .collect();
        assert!(windings.contains(&0));
        assert!(windings.contains(&1));
        assert!(windings.contains(&2));
    }

    #[test]
    fn inclusion_filter_sets_filled() {
        let mut graph = classified(&Shape::rectangle(0.0, 0.0, 2.0, 2.0), 0);
        graph
            .compute_face_inclusion(|w| w.get(&0).copied().unwrap_or(0) != 0)
            .unwrap();
        let unbounded = graph.unbounded_face().unwrap();
        for fid in graph.store.face_ids() {
            let filled = graph.store.face(fid).unwrap().filled.unwrap();
            assert_eq!(filled, fid != unbounded);
        }
    }
}
