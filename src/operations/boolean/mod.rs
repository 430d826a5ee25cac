mod assemble;
mod classify;
mod engine;
mod extract;
mod graph;
mod intersect_op;
mod merge;
mod overlap;
mod select;
mod split;
mod subtract;
mod union;
mod xor;

pub use engine::binary_result;
pub use graph::Graph;
pub use intersect_op::Intersect;
pub use select::{
    difference_winding, intersection_winding, union_winding, xor_winding, SHAPE_A, SHAPE_B,
};
pub use subtract::Subtract;
pub use union::Union;
pub use xor::Xor;
