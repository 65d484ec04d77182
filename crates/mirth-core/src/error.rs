//! Error types for mirth-core.
//!
//! One enum covers every failure the engine can report. All errors are
//! raised synchronously at the call that violates the precondition and
//! propagate to the caller; no operation partially applies.

use thiserror::Error;

/// The error type for all mirth-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MirthError {
    /// A requested axis length is not a positive integer.
    #[error("dimension must be positive, got {dim}")]
    InvalidDimension { dim: isize },

    /// Nested-literal construction found sibling sequences of unequal
    /// length at the same depth.
    #[error("ragged nested data: expected length {expected} at depth {depth}, got {got}")]
    RaggedShape {
        depth: usize,
        expected: usize,
        got: usize,
    },

    /// A reshape target cannot be reconciled with the current size.
    #[error("cannot reshape tensor of size {size} to {target:?}")]
    SizeMismatch { size: usize, target: Vec<isize> },

    /// More than one axis of a reshape request asked to be inferred.
    #[error("at most one reshape dimension may be -1")]
    MultipleInferredDimensions,

    /// Two operands of an elementwise operation have different shapes.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// The contracted axes of a dot product have different lengths.
    #[error("cannot contract axis of length {left} against axis of length {right}")]
    ContractionMismatch { left: usize, right: usize },

    /// A coordinate lies outside the tensor's shape.
    #[error("coordinate {coord} out of bounds for axis {axis} of length {len}")]
    IndexOutOfBounds {
        coord: usize,
        axis: usize,
        len: usize,
    },

    /// The number of supplied coordinates does not match the rank.
    #[error("expected {expected} coordinates, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Operation requires a contiguous view (call `.contiguous()` or
    /// `.flatten()` first).
    #[error("operation requires a contiguous tensor")]
    NotContiguous,

    /// Operation not supported on the void (0-dimensional) tensor.
    #[error("operation not supported on empty tensor")]
    EmptyTensor,
}
