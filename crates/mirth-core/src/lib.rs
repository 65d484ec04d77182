//! # mirth-core
//!
//! Core tensor engine for Mirth.
//!
//! Provides the foundational `Tensor` type:
//! - A flat, shared f64 buffer plus strided view descriptors
//! - Zero-copy views (slice, transpose, reshape share storage)
//! - Checked coordinate/index arithmetic
//! - Elementwise maps and a generalized axis contraction (`dot`)

pub mod error;
pub mod shape;
pub mod storage;
pub mod iter;
pub mod nested;
pub mod tensor;
pub mod ops;
pub mod prelude;

pub use error::MirthError;
pub use iter::{AxisState, StridedCursor};
pub use nested::NestedData;
pub use shape::Shape;
pub use storage::Storage;
pub use tensor::Tensor;

pub type Result<T> = std::result::Result<T, MirthError>;
