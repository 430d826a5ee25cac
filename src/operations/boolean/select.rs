//! Standard winding filters for binary boolean operations.
//!
//! A filter maps a face's winding map to "part of the result". Binary
//! operations tag their operands with shape ids 0 and 1.

use crate::topology::{ShapeId, WindingMap};

/// Shape id of the first binary operand.
pub const SHAPE_A: ShapeId = 0;
/// Shape id of the second binary operand.
pub const SHAPE_B: ShapeId = 1;

fn wind(map: &WindingMap, shape: ShapeId) -> i32 {
    map.get(&shape).copied().unwrap_or(0)
}

/// Inside A or inside B.
#[must_use]
pub fn union_winding(map: &WindingMap) -> bool {
    wind(map, SHAPE_A) != 0 || wind(map, SHAPE_B) != 0
}

/// Inside A and inside B.
#[must_use]
pub fn intersection_winding(map: &WindingMap) -> bool {
    wind(map, SHAPE_A) != 0 && wind(map, SHAPE_B) != 0
}

/// Inside A but not inside B.
#[must_use]
pub fn difference_winding(map: &WindingMap) -> bool {
    wind(map, SHAPE_A) != 0 && wind(map, SHAPE_B) == 0
}

/// Inside exactly one of A and B.
#[must_use]
pub fn xor_winding(map: &WindingMap) -> bool {
    (wind(map, SHAPE_A) != 0) != (wind(map, SHAPE_B) != 0)
}
