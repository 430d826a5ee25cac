//! Intersection splitting: cubic self-intersections and pairwise edge
//! crossings become shared vertices of the graph.

use crate::error::Result;
use crate::geometry::segment::SegmentIntersection;
use crate::topology::{EdgeId, HalfEdge, VertexData, VertexId};

use super::graph::Graph;

impl Graph {
    /// Splits every self-intersecting cubic edge into three sub-cubics; the
    /// middle piece becomes a loop edge anchored at the new crossing vertex.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn eliminate_self_intersection(&mut self) -> Result<()> {
        loop {
            let mut found = None;
            for id in self.store.edge_ids() {
                let e = self.store.edge(id)?;
                if let Some(hit) = e.segment.get_self_intersection() {
                    found = Some((id, hit));
                    break;
                }
            }
            let Some((id, hit)) = found else {
                return Ok(());
            };

            let e = self.store.edge(id)?.clone();
            let v = self.store.add_vertex(VertexData::new(hit.point));
            let first = self
                .store
                .add_edge(e.segment.sub_range(0.0, hit.a_t), e.start, v)?;
            let middle = self
                .store
                .add_edge(e.segment.sub_range(hit.a_t, hit.b_t), v, v)?;
            let last = self
                .store
                .add_edge(e.segment.sub_range(hit.b_t, 1.0), v, e.end)?;
            self.store.splice_wires(
                id,
                &[
                    HalfEdge::forward(first),
                    HalfEdge::forward(middle),
                    HalfEdge::forward(last),
                ],
            );
            self.store.remove_edge(id)?;
        }
    }

    /// Repeatedly finds a crossing between two edges and splits at it,
    /// restarting the scan after every rewrite. Touches where both
    /// parameters sit at segment endpoints are ignored.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn eliminate_intersection(&mut self) -> Result<()> {
        let ep = self.epsilons.endpoint_param;
        'restart: loop {
            let ids = self.store.edge_ids();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let a = self.store.edge(ids[i])?;
                    let b = self.store.edge(ids[j])?;
                    if !a
                        .segment
                        .bounds()
                        .overlaps(&b.segment.bounds(), self.epsilons.vertex)
                    {
                        continue;
                    }
                    for hit in a.segment.intersect(&b.segment) {
                        let a_at_end = hit.a_t < ep || hit.a_t > 1.0 - ep;
                        let b_at_end = hit.b_t < ep || hit.b_t > 1.0 - ep;
                        if a_at_end && b_at_end {
                            continue;
                        }
                        self.simple_split(ids[i], ids[j], &hit)?;
                        continue 'restart;
                    }
                }
            }
            return Ok(());
        }
    }

    /// Splits edge `a` and/or edge `b` at one intersection, reusing the
    /// nearer endpoint vertex of a side whose parameter sits at an endpoint
    /// so both sides share a single vertex.
    fn simple_split(
        &mut self,
        a_id: EdgeId,
        b_id: EdgeId,
        hit: &SegmentIntersection,
    ) -> Result<()> {
        let ep = self.epsilons.endpoint_param;
        let a_internal = hit.a_t >= ep && hit.a_t <= 1.0 - ep;
        let b_internal = hit.b_t >= ep && hit.b_t <= 1.0 - ep;

        let vertex: VertexId = if a_internal && b_internal {
            self.store.add_vertex(VertexData::new(hit.point))
        } else if a_internal {
            let b = self.store.edge(b_id)?;
            if hit.b_t < 0.5 {
                b.start
            } else {
                b.end
            }
        } else {
            let a = self.store.edge(a_id)?;
            if hit.a_t < 0.5 {
                a.start
            } else {
                a.end
            }
        };

        if a_internal {
            self.split_edge(a_id, hit.a_t, vertex)?;
        }
        if b_internal {
            self.split_edge(b_id, hit.b_t, vertex)?;
        }
        Ok(())
    }

    /// Splits one edge at parameter `t`, wiring both pieces through the
    /// given vertex and splicing every wire traversal.
    pub(crate) fn split_edge(&mut self, id: EdgeId, t: f64, vertex: VertexId) -> Result<()> {
        let e = self.store.edge(id)?.clone();
        let (s1, s2) = e.segment.subdivided(t);
        let e1 = self.store.add_edge(s1, e.start, vertex)?;
        let e2 = self.store.add_edge(s2, vertex, e.end)?;
        self.store
            .splice_wires(id, &[HalfEdge::forward(e1), HalfEdge::forward(e2)]);
        self.store.remove_edge(id)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::segment::{Cubic, Segment};
    use crate::geometry::shape::Subpath;
    use crate::math::Point2;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn graph_of(segments: &[Segment]) -> Graph {
        let mut graph = Graph::new();
        for (i, seg) in segments.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let shape = i as u32;
            graph
                .add_subpath(shape, &Subpath::new(vec![*seg], false))
                .unwrap();
        }
        graph
    }

    #[test]
    fn crossing_lines_split_into_four() {
        let mut graph = graph_of(&[
            Segment::line(pt(0.0, 0.0), pt(2.0, 2.0)),
            Segment::line(pt(0.0, 2.0), pt(2.0, 0.0)),
        ]);
        graph.eliminate_intersection().unwrap();
        assert_eq!(graph.store.edge_count(), 4);
        // 4 original endpoints plus the one shared crossing vertex.
        assert_eq!(graph.store.vertex_count(), 5);
        let crossing = graph
            .store
            .vertex_ids()
            .into_iter()
            .find(|id| graph.store.vertex(*id).unwrap().incident.len() == 4)
            .expect("crossing vertex of degree 4");
        let p = graph.store.vertex(crossing).unwrap().point;
        assert!((p.x - 1.0).abs() < 1e-9 && (p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn endpoint_touch_is_left_alone() {
        let mut graph = graph_of(&[
            Segment::line(pt(0.0, 0.0), pt(1.0, 0.0)),
            Segment::line(pt(1.0, 0.0), pt(1.0, 1.0)),
        ]);
        graph.eliminate_intersection().unwrap();
        assert_eq!(graph.store.edge_count(), 2);
    }

    #[test]
    fn endpoint_on_interior_splits_one_edge() {
        // b's start sits in the middle of a.
        let mut graph = graph_of(&[
            Segment::line(pt(0.0, 0.0), pt(2.0, 0.0)),
            Segment::line(pt(1.0, 0.0), pt(1.0, 1.0)),
        ]);
        graph.eliminate_intersection().unwrap();
        // a split in two, b untouched.
        assert_eq!(graph.store.edge_count(), 3);
        // The split reuses b's start vertex, so no new vertex appears.
        assert_eq!(graph.store.vertex_count(), 4);
    }

    #[test]
    fn self_intersecting_cubic_becomes_three_edges() {
        let looped = Segment::Cubic(Cubic::new(
            pt(0.0, 0.0),
            pt(2.0, 2.0),
            pt(-1.0, 2.0),
            pt(1.0, 0.0),
        ));
        let mut graph = graph_of(&[looped]);
        graph.eliminate_self_intersection().unwrap();
        assert_eq!(graph.store.edge_count(), 3);
        assert_eq!(graph.store.vertex_count(), 3);
        // The middle piece is a loop edge: one vertex carries four halves.
        let loop_vertex = graph
            .store
            .vertex_ids()
            .into_iter()
            .find(|id| graph.store.vertex(*id).unwrap().incident.len() == 4)
            .expect("loop vertex");
        let wire_id = graph.store.wire_ids()[0];
        assert_eq!(graph.store.wire(wire_id).unwrap().edges.len(), 3);
        let _ = loop_vertex;
    }

    #[test]
    fn line_cubic_crossings_all_split() {
        let curve = Segment::Cubic(Cubic::new(
            pt(0.0, -1.0),
            pt(1.0, 3.0),
            pt(2.0, -3.0),
            pt(3.0, 1.0),
        ));
        let axis = Segment::line(pt(-1.0, 0.0), pt(4.0, 0.0));
        let mut graph = graph_of(&[curve, axis]);
        graph.eliminate_intersection().unwrap();
        // Three crossings: the cubic splits into 4 pieces, the line into 4.
        assert_eq!(graph.store.edge_count(), 8);
        assert_eq!(graph.store.vertex_count(), 7);
    }
}
