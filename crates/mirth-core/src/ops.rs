//! Tensor operations: elementwise maps and axis contraction.
//!
//! All operations return new tensors (functional style); operands are
//! never mutated.

pub mod contraction;
pub mod elementwise;
