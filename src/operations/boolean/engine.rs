//! Pipeline orchestration for boolean operations on shapes.

use crate::error::Result;
use crate::geometry::shape::Shape;
use crate::topology::WindingMap;

use super::graph::Graph;

impl Graph {
    /// Runs the full simplification pipeline: overlap and intersection
    /// elimination, vertex fusion, bridge and remnant pruning, incidence
    /// ordering, face extraction, hole nesting, and winding propagation.
    ///
    /// Afterwards the graph is a valid planar subdivision whose faces all
    /// carry winding maps; apply [`Graph::compute_face_inclusion`] and
    /// [`Graph::filled_shape`] to produce a result shape.
    ///
    /// # Errors
    ///
    /// Propagates geometry and numerical failures; no partial result is
    /// exposed.
    pub fn compute_simplified_faces(&mut self) -> Result<()> {
        self.eliminate_overlap()?;
        self.eliminate_self_intersection()?;
        self.eliminate_intersection()?;
        self.collapse_vertices()?;
        self.remove_bridges()?;
        self.remove_single_edge_vertices()?;
        self.order_vertex_edges()?;
        self.extract_faces()?;
        self.compute_boundary_graph()?;
        self.compute_winding_map()
    }

    /// Emits the filtered result as a new shape: a sub-graph of the edges
    /// bordering the filled region is rebuilt, straightened, re-extracted,
    /// and two-colored, then its filled faces become subpaths.
    ///
    /// # Errors
    ///
    /// Requires [`Graph::compute_face_inclusion`] to have run.
    pub fn filled_shape(&self) -> Result<Shape> {
        let mut sub = self.create_filled_sub_graph()?;
        sub.collapse_adjacent_edges()?;
        sub.order_vertex_edges()?;
        sub.extract_faces()?;
        sub.compute_boundary_graph()?;
        sub.fill_alternating_faces()?;
        sub.faces_to_shape()
    }
}

/// Combines two shapes with an arbitrary winding filter; the operands are
/// tagged with shape ids 0 and 1.
///
/// # Errors
///
/// Propagates input validation and pipeline failures.
pub fn binary_result<F>(shape_a: &Shape, shape_b: &Shape, filter: F) -> Result<Shape>
where
    F: Fn(&WindingMap) -> bool,
{
    let mut graph = Graph::new();
    graph.add_shape(super::select::SHAPE_A, shape_a)?;
    graph.add_shape(super::select::SHAPE_B, shape_b)?;
    graph.compute_simplified_faces()?;
    graph.compute_face_inclusion(filter)?;
    graph.filled_shape()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::select;
    use super::*;
    use crate::geometry::segment::{Arc, Cubic, Quadratic, Segment};
    use crate::geometry::shape::Subpath;
    use crate::math::polygon_2d::winding_number;
    use crate::math::Point2;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    const SIZE: usize = 100;

    /// Nonzero-rule coverage of a shape sampled at the centers of a
    /// `SIZE` x `SIZE` pixel grid.
    fn rasterize(shape: &Shape) -> Vec<bool> {
        let polygons: Vec<Vec<Point2>> = shape
            .subpaths
            .iter()
            .map(|s| s.flattened(0.01))
            .collect();
        let mut grid = Vec::with_capacity(SIZE * SIZE);
        for y in 0..SIZE {
            for x in 0..SIZE {
                #[allow(clippy::cast_precision_loss)]
                let p = pt(x as f64 + 0.5, y as f64 + 0.5);
                let wind: i32 = polygons.iter().map(|poly| winding_number(&p, poly)).sum();
                grid.push(wind != 0);
            }
        }
        grid
    }

    /// Per-pixel average difference of two coverage grids.
    fn average_difference(a: &[bool], b: &[bool]) -> f64 {
        let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
        #[allow(clippy::cast_precision_loss)]
        let fraction = differing as f64 / a.len() as f64;
        fraction
    }

    /// Asserts that the CAG result rasterizes like the naive per-pixel
    /// combination of the inputs.
    fn assert_matches_overlay<F>(result: &Shape, a: &Shape, b: &Shape, op: F)
    where
        F: Fn(bool, bool) -> bool,
    {
        let ra = rasterize(a);
        let rb = rasterize(b);
        let expected: Vec<bool> = ra.iter().zip(&rb).map(|(x, y)| op(*x, *y)).collect();
        let got = rasterize(result);
        let diff = average_difference(&expected, &got);
        assert!(
            diff < 1.0 / 255.0,
            "average pixel difference {diff} exceeds threshold"
        );
    }

    #[test]
    fn s1_opposite_oriented_triangles_union() {
        let a = Shape::polygon(&[pt(10.0, 10.0), pt(90.0, 10.0), pt(50.0, 90.0)]);
        let b = Shape::polygon(&[pt(10.0, 90.0), pt(90.0, 90.0), pt(50.0, 10.0)]);
        let result = binary_result(&a, &b, select::union_winding).unwrap();
        assert!(!result.subpaths.is_empty());
        assert_matches_overlay(&result, &a, &b, |x, y| x || y);
    }

    #[test]
    fn s2_multi_subpath_union_with_slivers() {
        let mut a = Shape::polygon(&[pt(10.0, 10.0), pt(45.0, 10.0), pt(25.0, 45.0)]);
        a.subpaths
            .push(Subpath::polygon(&[pt(55.0, 55.0), pt(90.0, 60.0), pt(70.0, 90.0)]));
        let mut b = Shape::polygon(&[pt(20.0, 50.0), pt(80.0, 20.0), pt(80.0, 80.0)]);
        b.subpaths.push(Subpath::polygon(&[
            pt(15.0, 70.0),
            pt(85.0, 72.0),
            pt(85.0, 76.0),
            pt(15.0, 74.0),
        ]));
        b.subpaths.push(Subpath::polygon(&[
            pt(15.0, 72.5),
            pt(85.0, 74.0),
            pt(85.0, 78.0),
            pt(15.0, 76.5),
        ]));
        let result = binary_result(&a, &b, select::union_winding).unwrap();
        assert_matches_overlay(&result, &a, &b, |x, y| x || y);
    }

    #[test]
    fn s3_grid_difference_yields_waffle() {
        let mut a = Shape::empty();
        let mut b = Shape::empty();
        for i in 0..5 {
            let offset = f64::from(i) * 20.0;
            a.subpaths
                .extend(Shape::rectangle(0.0, offset, 100.0, 10.0).subpaths);
            b.subpaths
                .extend(Shape::rectangle(offset, 0.0, 10.0, 100.0).subpaths);
        }
        let result = binary_result(&a, &b, select::difference_winding).unwrap();
        assert_eq!(result.subpaths.len(), 25, "waffle should have 25 squares");
        assert_matches_overlay(&result, &a, &b, |x, y| x && !y);
    }

    #[test]
    fn s4_overlapping_cubic_pieces_union() {
        let parent = Segment::Cubic(Cubic::new(
            pt(10.0, 50.0),
            pt(30.0, 90.0),
            pt(70.0, 90.0),
            pt(90.0, 50.0),
        ));
        let (left, _) = parent.subdivided(0.7);
        let (_, right) = parent.subdivided(0.3);
        let a = Shape::new(vec![Subpath::new(vec![left], true)]);
        let b = Shape::new(vec![Subpath::new(vec![right], true)]);
        let result = binary_result(&a, &b, select::union_winding).unwrap();
        assert_matches_overlay(&result, &a, &b, |x, y| x || y);
    }

    #[test]
    fn s5_overlapping_quadratic_pieces_union() {
        let parent = Segment::Quadratic(Quadratic::new(
            pt(10.0, 30.0),
            pt(50.0, 95.0),
            pt(90.0, 30.0),
        ));
        let (left, _) = parent.subdivided(0.7);
        let (_, right) = parent.subdivided(0.3);
        let a = Shape::new(vec![Subpath::new(vec![left], true)]);
        let b = Shape::new(vec![Subpath::new(vec![right], true)]);
        let result = binary_result(&a, &b, select::union_winding).unwrap();
        assert_matches_overlay(&result, &a, &b, |x, y| x || y);
    }

    #[test]
    fn s6_chained_operations_on_mixed_shapes() {
        // Shape a: a rectangle plus a cubic arch region.
        let mut a = Shape::rectangle(6.0, 6.0, 48.0, 24.0);
        a.subpaths.push(Subpath::new(
            vec![Segment::Cubic(Cubic::new(
                pt(6.0, 36.0),
                pt(30.0, 90.0),
                pt(60.0, 90.0),
                pt(84.0, 36.0),
            ))],
            true,
        ));
        // Shape b: a full circle plus a rectangle.
        let mut b = Shape::rectangle(48.0, 6.0, 36.0, 18.0);
        b.subpaths.push(Subpath::new(
            vec![Segment::Arc(Arc::new(
                pt(60.0, 60.0),
                24.0,
                0.0,
                std::f64::consts::TAU,
            ))],
            true,
        ));
        // Shape c: a rectangle cutting through both.
        let c = Shape::rectangle(30.0, 18.0, 45.0, 45.0);

        let ab = binary_result(&a, &b, select::union_winding).unwrap();
        assert_matches_overlay(&ab, &a, &b, |x, y| x || y);

        let result = binary_result(&ab, &c, select::difference_winding).unwrap();
        assert_matches_overlay(&result, &ab, &c, |x, y| x && !y);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = Shape::polygon(&[pt(20.0, 20.0), pt(80.0, 25.0), pt(50.0, 75.0)]);
        let result = binary_result(&a, &Shape::empty(), select::union_winding).unwrap();
        let diff = average_difference(&rasterize(&a), &rasterize(&result));
        assert!(diff < 1.0 / 255.0, "diff={diff}");
    }

    #[test]
    fn idempotence_of_union_and_intersection() {
        let a = Shape::polygon(&[pt(20.0, 20.0), pt(80.0, 25.0), pt(50.0, 75.0)]);
        for filter in [select::union_winding, select::intersection_winding] {
            let result = binary_result(&a, &a.clone(), filter).unwrap();
            let diff = average_difference(&rasterize(&a), &rasterize(&result));
            assert!(diff < 1.0 / 255.0, "diff={diff}");
        }
    }

    #[test]
    fn self_difference_is_empty() {
        let a = Shape::polygon(&[pt(20.0, 20.0), pt(80.0, 25.0), pt(50.0, 75.0)]);
        let result = binary_result(&a, &a.clone(), select::difference_winding).unwrap();
        assert!(rasterize(&result).iter().all(|filled| !filled));
    }

    #[test]
    fn difference_distributes_over_union() {
        let a = Shape::rectangle(10.0, 10.0, 40.0, 40.0);
        let b = Shape::rectangle(30.0, 30.0, 50.0, 30.0);
        let c = Shape::rectangle(20.0, 20.0, 40.0, 60.0);

        let lhs = {
            let ab = binary_result(&a, &b, select::union_winding).unwrap();
            binary_result(&ab, &c, select::difference_winding).unwrap()
        };
        let rhs = {
            let ac = binary_result(&a, &c, select::difference_winding).unwrap();
            let bc = binary_result(&b, &c, select::difference_winding).unwrap();
            binary_result(&ac, &bc, select::union_winding).unwrap()
        };
        let diff = average_difference(&rasterize(&lhs), &rasterize(&rhs));
        assert!(diff < 1.0 / 255.0, "diff={diff}");
    }

    #[test]
    fn xor_of_overlapping_squares_matches_overlay() {
        let a = Shape::rectangle(10.0, 10.0, 50.0, 50.0);
        let b = Shape::rectangle(40.0, 40.0, 50.0, 50.0);
        let result = binary_result(&a, &b, select::xor_winding).unwrap();
        assert_matches_overlay(&result, &a, &b, |x, y| x != y);
    }

    #[test]
    fn unbounded_face_is_never_filled_by_monotone_filters() {
        let a = Shape::rectangle(10.0, 10.0, 30.0, 30.0);
        let b = Shape::rectangle(20.0, 20.0, 30.0, 30.0);
        let mut graph = Graph::new();
        graph.add_shape(0, &a).unwrap();
        graph.add_shape(1, &b).unwrap();
        graph.compute_simplified_faces().unwrap();
        graph.compute_face_inclusion(select::union_winding).unwrap();
        let unbounded = graph.unbounded_face().unwrap();
        assert_eq!(graph.store().face(unbounded).unwrap().filled, Some(false));
    }
}
