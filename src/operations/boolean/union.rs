use crate::error::Result;
use crate::geometry::shape::Shape;

use super::engine::binary_result;
use super::select;

/// Computes the boolean union of two shapes.
pub struct Union<'a> {
    shape_a: &'a Shape,
    shape_b: &'a Shape,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(shape_a: &'a Shape, shape_b: &'a Shape) -> Self {
        Self { shape_a, shape_b }
    }

    /// Executes the union, returning the combined shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<Shape> {
        binary_result(self.shape_a, self.shape_b, select::union_winding)
    }
}
