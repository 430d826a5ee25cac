//! Degeneracy cleanup: vertex fusion, bridge removal, and pruning of
//! dangling remnants.

use slotmap::SecondaryMap;

use crate::error::Result;
use crate::math::{midpoint, TOLERANCE};
use crate::topology::{EdgeId, HalfEdge, VertexData, VertexId};

use super::graph::Graph;

struct DfsFrame {
    vertex: VertexId,
    parent_edge: Option<EdgeId>,
    children: Vec<HalfEdge>,
    next: usize,
}

impl Graph {
    /// Fuses every pair of vertices closer than the vertex tolerance into a
    /// midpoint vertex, restarting the scan after each fusion. Edges that
    /// spanned the fused pair and are geometrically tiny collapse away;
    /// larger ones (a contour closing onto itself) survive as loop edges.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn collapse_vertices(&mut self) -> Result<()> {
        'restart: loop {
            let ids = self.store.vertex_ids();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let pa = self.store.vertex(ids[i])?.point;
                    let pb = self.store.vertex(ids[j])?.point;
                    if (pa - pb).norm() < self.epsilons.vertex {
                        self.merge_vertex_pair(ids[i], ids[j])?;
                        continue 'restart;
                    }
                }
            }
            return Ok(());
        }
    }

    fn merge_vertex_pair(&mut self, a: VertexId, b: VertexId) -> Result<()> {
        let pa = self.store.vertex(a)?.point;
        let pb = self.store.vertex(b)?.point;
        let point = if (pa - pb).norm() <= TOLERANCE {
            pa
        } else {
            midpoint(&pa, &pb)
        };
        let merged = self.store.add_vertex(VertexData::new(point));

        let mut touching: Vec<EdgeId> = Vec::new();
        for vid in [a, b] {
            for h in &self.store.vertex(vid)?.incident {
                if !touching.contains(&h.edge) {
                    touching.push(h.edge);
                }
            }
        }

        for id in touching {
            let e = self.store.edge(id)?;
            let spans_pair =
                (e.start == a && e.end == b) || (e.start == b && e.end == a);
            if spans_pair && e.segment.bounds().max_extent() < self.epsilons.vertex * 2.0 {
                // The edge has collapsed to a point.
                self.store.splice_wires(id, &[]);
                self.store.remove_edge(id)?;
            } else {
                self.store.rewire_edge(id, a, merged)?;
                self.store.rewire_edge(id, b, merged)?;
            }
        }
        self.store.remove_vertex(a);
        self.store.remove_vertex(b);
        Ok(())
    }

    /// Removes every bridge of the undirected multigraph (Tarjan low-link,
    /// iterative, skipping the entry edge by identity so parallel edges
    /// stay). Bridges separate no area and cannot bound a filled face.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn remove_bridges(&mut self) -> Result<()> {
        let mut index: SecondaryMap<VertexId, u32> = SecondaryMap::new();
        let mut low: SecondaryMap<VertexId, u32> = SecondaryMap::new();
        let mut counter: u32 = 0;
        let mut bridges: Vec<EdgeId> = Vec::new();

        for root in self.store.vertex_ids() {
            if index.contains_key(root) {
                continue;
            }
            index.insert(root, counter);
            low.insert(root, counter);
            counter += 1;
            let mut stack = vec![DfsFrame {
                vertex: root,
                parent_edge: None,
                children: self.store.vertex(root)?.incident.clone(),
                next: 0,
            }];

            while !stack.is_empty() {
                let step = {
                    let Some(frame) = stack.last_mut() else { break };
                    if frame.next < frame.children.len() {
                        let h = frame.children[frame.next];
                        frame.next += 1;
                        if Some(h.edge) == frame.parent_edge {
                            continue;
                        }
                        Some((h, frame.vertex))
                    } else {
                        None
                    }
                };
                match step {
                    Some((h, v)) => {
                        let w = self.store.half_end(h)?;
                        if let Some(&wi) = index.get(w) {
                            // Back edge.
                            if wi < low[v] {
                                low.insert(v, wi);
                            }
                        } else {
                            index.insert(w, counter);
                            low.insert(w, counter);
                            counter += 1;
                            let children = self.store.vertex(w)?.incident.clone();
                            stack.push(DfsFrame {
                                vertex: w,
                                parent_edge: Some(h.edge),
                                children,
                                next: 0,
                            });
                        }
                    }
                    None => {
                        let Some(finished) = stack.pop() else { break };
                        if let Some(parent) = stack.last() {
                            let u = parent.vertex;
                            let lv = low[finished.vertex];
                            if lv < low[u] {
                                low.insert(u, lv);
                            }
                            if lv > index[u] {
                                if let Some(edge) = finished.parent_edge {
                                    bridges.push(edge);
                                }
                            }
                        }
                    }
                }
            }
        }

        for id in bridges {
            self.store.splice_wires(id, &[]);
            self.store.remove_edge(id)?;
        }
        Ok(())
    }

    /// Removes vertices with fewer than two incident half-edges, disposing
    /// the dangling edge if present, until none remain.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn remove_single_edge_vertices(&mut self) -> Result<()> {
        'restart: loop {
            for id in self.store.vertex_ids() {
                let incident = self.store.vertex(id)?.incident.clone();
                if incident.len() >= 2 {
                    continue;
                }
                for h in incident {
                    self.store.splice_wires(h.edge, &[]);
                    self.store.remove_edge(h.edge)?;
                }
                self.store.remove_vertex(id);
                continue 'restart;
            }
            return Ok(());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::segment::Segment;
    use crate::math::Point2;
    use crate::topology::WireData;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn add_vertex(graph: &mut Graph, x: f64, y: f64) -> VertexId {
        graph.store.add_vertex(VertexData::new(pt(x, y)))
    }

    fn connect(graph: &mut Graph, a: VertexId, b: VertexId) -> EdgeId {
        let pa = graph.store.vertex(a).unwrap().point;
        let pb = graph.store.vertex(b).unwrap().point;
        graph.store.add_edge(Segment::line(pa, pb), a, b).unwrap()
    }

    #[test]
    fn nearby_vertices_fuse_to_midpoint() {
        let mut graph = Graph::new();
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 1.0, 0.0);
        let c = add_vertex(&mut graph, 1.0 + 4e-6, 0.0);
        let d = add_vertex(&mut graph, 2.0, 0.0);
        connect(&mut graph, a, b);
        connect(&mut graph, c, d);
        graph.collapse_vertices().unwrap();
        assert_eq!(graph.store.vertex_count(), 3);
        assert_eq!(graph.store.edge_count(), 2);
        let fused = graph
            .store
            .vertex_ids()
            .into_iter()
            .map(|id| graph.store.vertex(id).unwrap().point)
            .find(|p| (p.x - 1.0).abs() < 1e-5 && p.x != 1.0 && p.x != 2.0);
        assert!(fused.is_some(), "midpoint vertex expected");
    }

    #[test]
    fn tiny_spanning_edge_collapses_away() {
        let mut graph = Graph::new();
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 5e-6, 0.0);
        let c = add_vertex(&mut graph, 1.0, 0.0);
        let tiny = connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        graph
            .store
            .add_wire(WireData::new(0, vec![HalfEdge::forward(tiny)]));
        graph.collapse_vertices().unwrap();
        assert_eq!(graph.store.edge_count(), 1);
        // The wire lost its only traversal.
        let wid = graph.store.wire_ids()[0];
        assert!(graph.store.wire(wid).unwrap().edges.is_empty());
    }

    #[test]
    fn bridge_between_two_triangles_is_removed() {
        let mut graph = Graph::new();
        // Triangle 1.
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 1.0, 0.0);
        let c = add_vertex(&mut graph, 0.5, 1.0);
        connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        connect(&mut graph, c, a);
        // Triangle 2, off to the side.
        let d = add_vertex(&mut graph, 3.0, 0.0);
        let e = add_vertex(&mut graph, 4.0, 0.0);
        let f = add_vertex(&mut graph, 3.5, 1.0);
        connect(&mut graph, d, e);
        connect(&mut graph, e, f);
        connect(&mut graph, f, d);
        // The bridge.
        let bridge = connect(&mut graph, b, d);
        graph.remove_bridges().unwrap();
        assert!(graph.store.edge(bridge).is_err(), "bridge should be gone");
        assert_eq!(graph.store.edge_count(), 6);
    }

    #[test]
    fn parallel_edges_are_not_bridges() {
        let mut graph = Graph::new();
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 1.0, 0.0);
        connect(&mut graph, a, b);
        connect(&mut graph, a, b);
        graph.remove_bridges().unwrap();
        assert_eq!(graph.store.edge_count(), 2);
    }

    #[test]
    fn dangling_chain_is_pruned_entirely() {
        let mut graph = Graph::new();
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 1.0, 0.0);
        let c = add_vertex(&mut graph, 2.0, 0.0);
        connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        graph.remove_single_edge_vertices().unwrap();
        assert_eq!(graph.store.vertex_count(), 0);
        assert_eq!(graph.store.edge_count(), 0);
    }

    #[test]
    fn triangle_survives_pruning() {
        let mut graph = Graph::new();
        let a = add_vertex(&mut graph, 0.0, 0.0);
        let b = add_vertex(&mut graph, 1.0, 0.0);
        let c = add_vertex(&mut graph, 0.5, 1.0);
        connect(&mut graph, a, b);
        connect(&mut graph, b, c);
        connect(&mut graph, c, a);
        graph.remove_single_edge_vertices().unwrap();
        assert_eq!(graph.store.edge_count(), 3);
    }
}
