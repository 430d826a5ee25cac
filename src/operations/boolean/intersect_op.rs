use crate::error::Result;
use crate::geometry::shape::Shape;

use super::engine::binary_result;
use super::select;

/// Computes the boolean intersection of two shapes.
pub struct Intersect<'a> {
    shape_a: &'a Shape,
    shape_b: &'a Shape,
}

impl<'a> Intersect<'a> {
    /// Creates a new `Intersect` operation.
    #[must_use]
    pub fn new(shape_a: &'a Shape, shape_b: &'a Shape) -> Self {
        Self { shape_a, shape_b }
    }

    /// Executes the intersection, returning the common shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<Shape> {
        binary_result(self.shape_a, self.shape_b, select::intersection_winding)
    }
}
