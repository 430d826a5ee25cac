use crate::error::Result;
use crate::geometry::shape::Shape;

use super::engine::binary_result;
use super::select;

/// Computes the boolean difference of two shapes (A minus B).
pub struct Subtract<'a> {
    shape_a: &'a Shape,
    shape_b: &'a Shape,
}

impl<'a> Subtract<'a> {
    /// Creates a new `Subtract` operation.
    #[must_use]
    pub fn new(shape_a: &'a Shape, shape_b: &'a Shape) -> Self {
        Self { shape_a, shape_b }
    }

    /// Executes the subtraction, returning the remaining shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<Shape> {
        binary_result(self.shape_a, self.shape_b, select::difference_winding)
    }
}
