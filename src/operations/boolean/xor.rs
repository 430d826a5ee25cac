use crate::error::Result;
use crate::geometry::shape::Shape;

use super::engine::binary_result;
use super::select;

/// Computes the symmetric difference of two shapes.
pub struct Xor<'a> {
    shape_a: &'a Shape,
    shape_b: &'a Shape,
}

impl<'a> Xor<'a> {
    /// Creates a new `Xor` operation.
    #[must_use]
    pub fn new(shape_a: &'a Shape, shape_b: &'a Shape) -> Self {
        Self { shape_a, shape_b }
    }

    /// Executes the symmetric difference, returning the exclusive shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<Shape> {
        binary_result(self.shape_a, self.shape_b, select::xor_winding)
    }
}
