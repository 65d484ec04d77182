//! Convenience re-exports for common mirth-core types.
//!
//! ```rust
//! use mirth_core::prelude::*;
//! ```

pub use crate::AxisState;
pub use crate::MirthError;
pub use crate::NestedData;
pub use crate::Result;
pub use crate::Shape;
pub use crate::Storage;
pub use crate::Tensor;
