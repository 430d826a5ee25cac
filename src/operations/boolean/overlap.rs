//! Overlap elimination: coincident runs of same-typed edges are rebuilt so
//! the shared geometry is represented by a single edge.

use crate::error::Result;
use crate::geometry::segment::SegmentOverlap;
use crate::topology::{EdgeId, HalfEdge, VertexData, VertexId};

use super::graph::Graph;

impl Graph {
    /// Repeatedly finds a pair of same-typed edges tracing the same curve
    /// over a significant range and splits them so the shared middle is a
    /// single edge, restarting the scan after every rewrite.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn eliminate_overlap(&mut self) -> Result<()> {
        let significant = self.epsilons.overlap_param;
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
                    let overlaps = a.segment.get_overlaps(&b.segment, self.epsilons.vertex);
                    for ov in overlaps {
                        if (ov.t1 - ov.t0).abs() > significant
                            && (ov.qt1 - ov.qt0).abs() > significant
                        {
                            self.split_overlap(ids[i], ids[j], &ov)?;
                            continue 'restart;
                        }
                    }
                }
            }
            return Ok(());
        }
    }

    /// Rebuilds edges `a` and `b` around their overlap: up to two outer
    /// pieces per edge plus one shared middle edge, splicing every wire
    /// traversal of the originals.
    fn split_overlap(&mut self, a_id: EdgeId, b_id: EdgeId, ov: &SegmentOverlap) -> Result<()> {
        let eps = self.epsilons.overlap_param;
        let snap = |t: f64| {
            if t < eps {
                0.0
            } else if t > 1.0 - eps {
                1.0
            } else {
                t
            }
        };
        let t0 = snap(ov.t0);
        let t1 = snap(ov.t1);
        let qlo = snap(ov.qt0.min(ov.qt1));
        let qhi = snap(ov.qt0.max(ov.qt1));
        let aligned = ov.aligned;

        let a = self.store.edge(a_id)?.clone();
        let b = self.store.edge(b_id)?.clone();
        // The middle is rebuilt from a's parameterization; b's trace agrees
        // within the vertex tolerance.
        let middle_seg = a.segment.sub_range(t0, t1);

        // Reuse an endpoint vertex whenever one side has no outer piece at
        // that end of the middle.
        let v_start: VertexId = if t0 <= 0.0 {
            a.start
        } else if aligned && qlo <= 0.0 {
            b.start
        } else if !aligned && qhi >= 1.0 {
            b.end
        } else {
            self.store.add_vertex(VertexData::new(middle_seg.start()))
        };
        let v_end: VertexId = if t1 >= 1.0 {
            a.end
        } else if aligned && qhi >= 1.0 {
            b.end
        } else if !aligned && qlo <= 0.0 {
            b.start
        } else {
            self.store.add_vertex(VertexData::new(middle_seg.end()))
        };

        let middle = self.store.add_edge(middle_seg, v_start, v_end)?;

        let mut a_run = Vec::with_capacity(3);
        if t0 > 0.0 {
            let e = self
                .store
                .add_edge(a.segment.sub_range(0.0, t0), a.start, v_start)?;
            a_run.push(HalfEdge::forward(e));
        }
        a_run.push(HalfEdge::forward(middle));
        if t1 < 1.0 {
            let e = self
                .store
                .add_edge(a.segment.sub_range(t1, 1.0), v_end, a.end)?;
            a_run.push(HalfEdge::forward(e));
        }

        // b enters the middle at v_start when aligned, at v_end otherwise.
        let (entry, exit) = if aligned {
            (v_start, v_end)
        } else {
            (v_end, v_start)
        };
        let mut b_run = Vec::with_capacity(3);
        if qlo > 0.0 {
            let e = self
                .store
                .add_edge(b.segment.sub_range(0.0, qlo), b.start, entry)?;
            b_run.push(HalfEdge::forward(e));
        }
        b_run.push(if aligned {
            HalfEdge::forward(middle)
        } else {
            HalfEdge::reversed(middle)
        });
        if qhi < 1.0 {
            let e = self
                .store
                .add_edge(b.segment.sub_range(qhi, 1.0), exit, b.end)?;
            b_run.push(HalfEdge::forward(e));
        }

        self.store.splice_wires(a_id, &a_run);
        self.store.splice_wires(b_id, &b_run);
        self.store.remove_edge(a_id)?;
        self.store.remove_edge(b_id)?;
        Ok(())
    }
}
