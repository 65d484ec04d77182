//! Tensor shape with stack-allocated storage for ≤4 dimensions.

use std::fmt;

use smallvec::SmallVec;

use crate::error::MirthError;
use crate::Result;

/// Per-axis lengths of a tensor.
///
/// Every axis length is a positive integer; `new` rejects anything else.
/// The void tensor is the one exception: it has an empty shape and size 0.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create a shape, validating every axis length.
    pub fn new(dims: &[usize]) -> Result<Self> {
        for &d in dims {
            if d == 0 {
                return Err(MirthError::InvalidDimension { dim: 0 });
            }
        }
        Ok(Self {
            dims: SmallVec::from_slice(dims),
        })
    }

    /// The empty shape (0 dimensions, size 0) of the void tensor.
    pub fn empty() -> Self {
        Self {
            dims: SmallVec::new(),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of addressable elements: the product of all axis
    /// lengths, or 0 for the void shape.
    pub fn size(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().product()
        }
    }

    /// Axis lengths as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Length of a specific axis.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Whether this is the void shape.
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Strides of a fresh row-major allocation of this shape.
    ///
    /// `strides[n-1] = 1`, `strides[i] = strides[i+1] * dims[i+1]`.
    pub fn contiguous_strides(&self) -> SmallVec<[usize; 4]> {
        let ndim = self.dims.len();
        if ndim == 0 {
            return SmallVec::new();
        }
        let mut strides = SmallVec::from_elem(0usize, ndim);
        strides[ndim - 1] = 1;
        for i in (0..ndim - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Validate and compute a reshape target.
    ///
    /// At most one entry may be `-1` (inferred so the product matches
    /// `self.size()`). Fails with `MultipleInferredDimensions` on a second
    /// `-1`, `InvalidDimension` on zero or other negative entries, and
    /// `SizeMismatch` when the product cannot be reconciled.
    pub fn resolve_reshape(&self, target: &[isize]) -> Result<Shape> {
        let size = self.size();
        let mut inferred_idx = None;
        let mut known_product: usize = 1;

        for (i, &d) in target.iter().enumerate() {
            if d == -1 {
                if inferred_idx.is_some() {
                    return Err(MirthError::MultipleInferredDimensions);
                }
                inferred_idx = Some(i);
            } else if d <= 0 {
                return Err(MirthError::InvalidDimension { dim: d });
            } else {
                known_product = known_product.checked_mul(d as usize).ok_or(
                    MirthError::SizeMismatch {
                        size,
                        target: target.to_vec(),
                    },
                )?;
            }
        }

        let mut dims: SmallVec<[usize; 4]> = target
            .iter()
            .map(|&d| if d == -1 { 0 } else { d as usize })
            .collect();

        if let Some(idx) = inferred_idx {
            if size % known_product != 0 {
                return Err(MirthError::SizeMismatch {
                    size,
                    target: target.to_vec(),
                });
            }
            dims[idx] = size / known_product;
        } else if known_product != size {
            return Err(MirthError::SizeMismatch {
                size,
                target: target.to_vec(),
            });
        }

        Shape::new(&dims)
    }

    /// The shape with all axes reversed end-to-end (full transpose).
    pub fn reversed(&self) -> Shape {
        let mut dims = self.dims.clone();
        dims.reverse();
        Shape { dims }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
