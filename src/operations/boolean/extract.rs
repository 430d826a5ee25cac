//! Face extraction: incidence ordering, boundary walking, and the
//! boundary containment graph.

use std::collections::HashSet;

use crate::error::{NumericalError, Result};
use crate::geometry::ray::Ray;
use crate::math::{Point2, Vector2};
use crate::topology::{BoundaryData, BoundaryId, FaceData, FaceId, HalfEdge};

use super::graph::Graph;

/// Retry budget for the boundary classification ray.
const RAY_ATTEMPTS: u32 = 8;
/// Angle step between retries, chosen to stay off any previous direction.
const RAY_PERTURBATION: f64 = 0.173;
/// Two hit distances closer than this are indistinguishable.
const RAY_DISTANCE_EPS: f64 = 1e-9;

impl Graph {
    /// Sorts every vertex's outgoing half-edges counter-clockwise by
    /// tangent angle, breaking tangential ties by signed curvature.
    ///
    /// # Errors
    ///
    /// Propagates topology lookup failures.
    pub(crate) fn order_vertex_edges(&mut self) -> Result<()> {
        for vid in self.store.vertex_ids() {
            let incident = self.store.vertex(vid)?.incident.clone();
            let mut keyed = Vec::with_capacity(incident.len());
            for h in incident {
                let tangent = self.store.outgoing_tangent(h)?;
                let angle = tangent.y.atan2(tangent.x);
                let curvature = self.store.outgoing_curvature(h)?;
                keyed.push((angle, curvature, h));
            }
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
            self.store.vertex_mut(vid)?.incident = keyed.into_iter().map(|(_, _, h)| h).collect();
        }
        Ok(())
    }

    /// The half-edge following `h` around its left face: the one leaving
    /// `h`'s head immediately clockwise of `h`'s twin in the sorted
    /// incidence order (the smallest left turn).
    ///
    /// # Errors
    ///
    /// Fails with [`NumericalError::MissingBoundary`] if the twin is absent
    /// from its origin's incidence list.
    pub(crate) fn next_half(&self, h: HalfEdge) -> Result<HalfEdge> {
        let v = self.store.half_end(h)?;
        let incident = &self.store.vertex(v)?.incident;
        let twin = h.twin();
        let pos = incident
            .iter()
            .position(|x| *x == twin)
            .ok_or(NumericalError::MissingBoundary)?;
        let n = incident.len();
        Ok(incident[(pos + n - 1) % n])
    }

    /// Pools all half-edges into boundaries by walking `next` cycles, then
    /// creates one face per inner (counter-clockwise) boundary.
    ///
    /// # Errors
    ///
    /// Propagates topology failures; a non-closing walk surfaces as
    /// [`NumericalError::MissingBoundary`].
    pub(crate) fn extract_faces(&mut self) -> Result<()> {
        self.store.clear_boundaries();
        self.store.clear_faces();
        self.unbounded_face = None;

        let mut visited: HashSet<HalfEdge> = HashSet::new();
        for edge_id in self.store.edge_ids() {
            for h in [HalfEdge::forward(edge_id), HalfEdge::reversed(edge_id)] {
                if visited.contains(&h) {
                    continue;
                }
                let cycle = self.walk_boundary(h, &mut visited)?;
                let mut area = 0.0;
                for ch in &cycle {
                    let fragment = self.store.edge(ch.edge)?.segment.signed_area_fragment();
                    area += if ch.forward { fragment } else { -fragment };
                }
                let boundary = self.store.add_boundary(BoundaryData::new(cycle.clone(), area));
                for ch in cycle {
                    self.store.edge_mut(ch.edge)?.set_boundary(ch.forward, boundary);
                }
            }
        }

        for bid in self.store.boundary_ids() {
            let data = self.store.boundary(bid)?;
            if !data.is_inner() {
                continue;
            }
            let halves = data.half_edges.clone();
            let face = self.store.add_face(FaceData::new(Some(bid)));
            for h in halves {
                self.store.edge_mut(h.edge)?.set_face(h.forward, face);
            }
        }
        Ok(())
    }

    fn walk_boundary(
        &self,
        start: HalfEdge,
        visited: &mut HashSet<HalfEdge>,
    ) -> Result<Vec<HalfEdge>> {
        let limit = self.store.edge_count() * 2 + 1;
        let mut cycle = Vec::new();
        let mut h = start;
        loop {
            visited.insert(h);
            cycle.push(h);
            h = self.next_half(h)?;
            if h == start {
                return Ok(cycle);
            }
            if cycle.len() > limit {
                return Err(NumericalError::MissingBoundary.into());
            }
        }
    }

    /// Creates the unbounded face and attaches every outer (clockwise)
    /// boundary as a hole of the face it sits in, found by casting a ray
    /// from the boundary's extreme point along a generic direction.
    ///
    /// # Errors
    ///
    /// Fails with [`NumericalError::IndeterminateRay`] when the cast stays
    /// ambiguous after all retries, or [`NumericalError::UnreachableFace`]
    /// if some half-edge ends up without a face.
    pub(crate) fn compute_boundary_graph(&mut self) -> Result<()> {
        let unbounded = self.store.add_face(FaceData::new(None));
        self.unbounded_face = Some(unbounded);

        let mut unbounded_children: Vec<BoundaryId> = Vec::new();
        for bid in self.store.boundary_ids() {
            if self.store.boundary(bid)?.is_inner() {
                continue;
            }
            match self.locate_boundary_parent(bid)? {
                Some(parent_half) => {
                    let parent = self
                        .store
                        .edge(parent_half.edge)?
                        .boundary(parent_half.forward)
                        .ok_or(NumericalError::MissingBoundary)?;
                    self.store.boundary_mut(parent)?.children.push(bid);
                }
                None => unbounded_children.push(bid),
            }
        }

        // Resolve hole ownership: children of an inner boundary belong to
        // its face; children of an outer boundary share that boundary's
        // face, recursively.
        let mut pending: Vec<(FaceId, Vec<BoundaryId>)> = vec![(unbounded, unbounded_children)];
        for fid in self.store.face_ids() {
            let Some(bid) = self.store.face(fid)?.boundary else {
                continue;
            };
            let children = self.store.boundary(bid)?.children.clone();
            pending.push((fid, children));
        }
        while let Some((face, children)) = pending.pop() {
            for child in children {
                self.store.face_mut(face)?.holes.push(child);
                let halves = self.store.boundary(child)?.half_edges.clone();
                for h in halves {
                    self.store.edge_mut(h.edge)?.set_face(h.forward, face);
                }
                let grandchildren = self.store.boundary(child)?.children.clone();
                pending.push((face, grandchildren));
            }
        }

        for id in self.store.edge_ids() {
            let e = self.store.edge(id)?;
            if e.forward_face.is_none() || e.reversed_face.is_none() {
                return Err(NumericalError::UnreachableFace.into());
            }
        }
        Ok(())
    }

    /// Finds the half-edge whose left face immediately surrounds the given
    /// outer boundary, or `None` when nothing lies between it and the
    /// unbounded face.
    ///
    /// The ray leaves the boundary's extreme point along the probe
    /// direction, so every hit beyond the back-clip belongs to other
    /// geometry. Tangent grazes and distance ties are indeterminate and
    /// retried at a perturbed angle.
    fn locate_boundary_parent(&self, bid: BoundaryId) -> Result<Option<HalfEdge>> {
        'attempt: for attempt in 0..RAY_ATTEMPTS {
            let angle = self.epsilons.extreme_ray_angle + RAY_PERTURBATION * f64::from(attempt);
            let direction = Vector2::new(angle.cos(), angle.sin());

            let halves = &self.store.boundary(bid)?.half_edges;
            let mut origin: Option<(Point2, f64)> = None;
            for h in halves {
                let p = self.store.edge(h.edge)?.segment.extreme_point(&direction);
                let proj = p.coords.dot(&direction);
                if origin.map_or(true, |(_, best)| proj > best) {
                    origin = Some((p, proj));
                }
            }
            let Some((origin, _)) = origin else {
                return Ok(None);
            };
            let ray = Ray {
                origin,
                direction,
            };

            let mut closest: Option<(f64, HalfEdge)> = None;
            let mut runner_up = f64::INFINITY;
            for edge_id in self.store.edge_ids() {
                let e = self.store.edge(edge_id)?;
                for hit in e.segment.intersect_ray(&ray, self.epsilons.ray_back_clip) {
                    // A graze parallel to the ray cannot pick a side.
                    if hit.normal.dot(&direction).abs() < 1e-6 {
                        continue 'attempt;
                    }
                    let half = if hit.wind > 0 {
                        HalfEdge::forward(edge_id)
                    } else {
                        HalfEdge::reversed(edge_id)
                    };
                    match closest {
                        Some((best, _)) if hit.distance >= best => {
                            runner_up = runner_up.min(hit.distance);
                        }
                        Some((best, _)) => {
                            runner_up = best;
                            closest = Some((hit.distance, half));
                        }
                        None => closest = Some((hit.distance, half)),
                    }
                }
            }

            return match closest {
                None => Ok(None),
                Some((best, half)) => {
                    if runner_up - best < RAY_DISTANCE_EPS {
                        continue 'attempt;
                    }
                    Ok(Some(half))
                }
            };
        }
        Err(NumericalError::IndeterminateRay {
            attempts: RAY_ATTEMPTS,
        }
        .into())
    }
}
