//! The `Tensor` type: a strided view descriptor over a shared f64 buffer.

use std::fmt;

use smallvec::SmallVec;

use crate::error::MirthError;
use crate::iter::{AxisState, StridedCursor};
use crate::nested::NestedData;
use crate::shape::Shape;
use crate::storage::Storage;
use crate::Result;

/// A multi-dimensional array over a flat, shared f64 buffer.
///
/// A tensor is shape + per-axis strides + an offset into the buffer.
/// Shape, strides, and offset are immutable after construction; only the
/// buffer contents change (via [`Tensor::set`]). Views produced by
/// [`slice`](Tensor::slice), [`transpose`](Tensor::transpose), and
/// [`reshape`](Tensor::reshape) share the buffer, so a `set` through one
/// view is visible through every alias. `Clone` is a shallow copy (it
/// aliases too); [`deep_copy`](Tensor::deep_copy) is the only severing
/// mechanism.
///
/// # Examples
///
/// ```
/// use mirth_core::Tensor;
///
/// let t = Tensor::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// assert_eq!(t.size(), 4);
/// assert_eq!(t.get(&[1, 0]).unwrap(), 3.0);
///
/// let flat = t.reshape(&[4]).unwrap();
/// assert_eq!(flat.dims(), &[4]);
/// ```
#[derive(Clone)]
pub struct Tensor {
    storage: Storage,
    shape: Shape,
    strides: SmallVec<[usize; 4]>,
    offset: usize,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a zero-filled tensor with the given shape.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let strides = shape.contiguous_strides();
        let storage = Storage::zeros(shape.size());
        Ok(Self {
            storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Create a tensor filled with ones.
    pub fn ones(dims: &[usize]) -> Result<Self> {
        Self::full(dims, 1.0)
    }

    /// Create a tensor filled with `value`.
    pub fn full(dims: &[usize], value: f64) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let strides = shape.contiguous_strides();
        let storage = Storage::from_vec(vec![value; shape.size()]);
        Ok(Self {
            storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Create a tensor from flat data with the given shape.
    pub fn from_slice(data: &[f64], dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        if shape.size() != data.len() {
            return Err(MirthError::SizeMismatch {
                size: data.len(),
                target: dims.iter().map(|&d| d as isize).collect(),
            });
        }
        let strides = shape.contiguous_strides();
        Ok(Self {
            storage: Storage::from_vec(data.to_vec()),
            shape,
            strides,
            offset: 0,
        })
    }

    /// Create a tensor from nested literal data, inferring the shape from
    /// the nesting.
    ///
    /// A bare scalar yields shape `[1]`. Fails with `RaggedShape` when
    /// sibling sequences at the same depth disagree in length.
    ///
    /// ```
    /// use mirth_core::{NestedData, Tensor};
    ///
    /// let t = Tensor::from_nested(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(t.dims(), &[2, 2]);
    /// ```
    pub fn from_nested(data: impl Into<NestedData>) -> Result<Self> {
        let (mut dims, flat) = data.into().parse()?;
        if dims.is_empty() {
            dims.push(1);
        }
        Self::from_slice(&flat, &dims)
    }

    /// Create a tensor from nested literal data, then reinterpret the
    /// flat buffer under an explicitly supplied shape.
    ///
    /// The target follows the full reshape rules, including `-1`
    /// inference.
    pub fn from_nested_with_shape(
        data: impl Into<NestedData>,
        dims: &[isize],
    ) -> Result<Self> {
        Self::from_nested(data)?.reshape(dims)
    }

    /// The void tensor: zero dimensions, size 0, empty buffer.
    pub fn empty() -> Self {
        Self {
            storage: Storage::zeros(0),
            shape: Shape::empty(),
            strides: SmallVec::new(),
            offset: 0,
        }
    }

    /// Create a 1-D tensor with values from `start` to `end` (exclusive)
    /// in increments of `step`.
    ///
    /// # Panics
    /// Panics if `step` is zero or points away from `end`.
    pub fn arange(start: f64, end: f64, step: f64) -> Self {
        assert!(step != 0.0, "arange: step must be non-zero");
        assert!(
            (end - start) * step > 0.0 || (end - start).abs() < f64::EPSILON,
            "arange: step direction ({step}) does not match start ({start}) -> end ({end})"
        );
        let mut data = Vec::new();
        let mut v = start;
        if step > 0.0 {
            while v < end {
                data.push(v);
                v += step;
            }
        } else {
            while v > end {
                data.push(v);
                v += step;
            }
        }
        if data.is_empty() {
            return Self::empty();
        }
        let len = data.len();
        Self::from_slice(&data, &[len]).expect("arange: length matches shape")
    }

    /// Create a tensor with values drawn from the standard normal
    /// distribution N(0, 1).
    pub fn randn(dims: &[usize]) -> Result<Self> {
        use rand::Rng;
        let shape = Shape::new(dims)?;
        let mut rng = rand::thread_rng();
        // Box-Muller transform
        let data: Vec<f64> = (0..shape.size())
            .map(|_| {
                let u1: f64 = rng.gen_range(1e-12f64..1.0f64);
                let u2: f64 = rng.gen_range(0.0f64..std::f64::consts::TAU);
                (-2.0 * u1.ln()).sqrt() * u2.cos()
            })
            .collect();
        Self::from_slice(&data, dims)
    }

    /// Create a tensor with values uniformly distributed in `[low, high)`.
    pub fn rand_uniform(dims: &[usize], low: f64, high: f64) -> Result<Self> {
        use rand::Rng;
        let shape = Shape::new(dims)?;
        let mut rng = rand::thread_rng();
        let data: Vec<f64> = (0..shape.size()).map(|_| rng.gen_range(low..high)).collect();
        Self::from_slice(&data, dims)
    }

    /// Build a tensor from already-validated parts.
    pub(crate) fn from_parts(
        storage: Storage,
        shape: Shape,
        strides: SmallVec<[usize; 4]>,
        offset: usize,
    ) -> Self {
        Self {
            storage,
            shape,
            strides,
            offset,
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Axis lengths as a slice.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of addressable elements (0 for the void tensor).
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Per-axis strides, in buffer slots.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Buffer position of the origin coordinate.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether this view has the strides of a fresh row-major allocation.
    pub fn is_contiguous(&self) -> bool {
        self.strides == self.shape.contiguous_strides() && self.offset == 0
    }

    /// Whether two tensors share one buffer.
    pub fn aliases(&self, other: &Tensor) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }

    // =========================================================================
    // Coordinate / index mapping
    // =========================================================================

    /// Linear buffer index of a coordinate: `offset + Σ coord[i] * stride[i]`.
    ///
    /// Checked: fails with `RankMismatch` on the wrong number of
    /// coordinates and `IndexOutOfBounds` when any coordinate exceeds its
    /// axis length.
    pub fn to_index(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.ndim() {
            return Err(MirthError::RankMismatch {
                expected: self.ndim(),
                got: coords.len(),
            });
        }
        let mut index = self.offset;
        for (axis, (&c, &s)) in coords.iter().zip(self.strides.iter()).enumerate() {
            let len = self.shape.dims()[axis];
            if c >= len {
                return Err(MirthError::IndexOutOfBounds {
                    coord: c,
                    axis,
                    len,
                });
            }
            index += c * s;
        }
        Ok(index)
    }

    /// Coordinates of a linear buffer index — the inverse of `to_index`.
    ///
    /// Defined only for contiguous views, where the decomposition against
    /// the strides is a bijection; fails with `NotContiguous` otherwise.
    pub fn to_coordinates(&self, index: usize) -> Result<Vec<usize>> {
        if !self.is_contiguous() {
            return Err(MirthError::NotContiguous);
        }
        let mut rem = index;
        let mut coords = vec![0usize; self.ndim()];
        for (axis, &s) in self.strides.iter().enumerate() {
            let c = rem / s;
            let len = self.shape.dims()[axis];
            if c >= len {
                return Err(MirthError::IndexOutOfBounds {
                    coord: c,
                    axis,
                    len,
                });
            }
            coords[axis] = c;
            rem %= s;
        }
        Ok(coords)
    }

    /// Value at the given coordinates.
    pub fn get(&self, coords: &[usize]) -> Result<f64> {
        let index = self.to_index(coords)?;
        Ok(self.storage.read()[index])
    }

    /// Overwrite the value at the given coordinates.
    ///
    /// Visible through every view sharing this buffer.
    pub fn set(&self, coords: &[usize], value: f64) -> Result<()> {
        let index = self.to_index(coords)?;
        self.storage.write()[index] = value;
        Ok(())
    }

    /// Cursor over every position of this view in row-major order.
    pub(crate) fn cursor(&self) -> StridedCursor {
        StridedCursor::new(self.shape.dims(), &self.strides, self.offset)
    }

    // =========================================================================
    // Views (zero-copy, buffer-sharing)
    // =========================================================================

    /// Select a sub-view: `Fixed(c)` removes an axis and folds `c` into
    /// the offset, `Free` retains the axis unchanged.
    ///
    /// Trailing axes may be omitted from `sel` and are retained. The
    /// result always aliases this tensor's buffer. Fixing every axis
    /// yields shape `[1]`.
    ///
    /// ```
    /// use mirth_core::{AxisState, Tensor};
    ///
    /// let t = Tensor::from_nested(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
    /// let col = t.slice(&[AxisState::Free, AxisState::Fixed(1)]).unwrap();
    /// assert_eq!(col.dims(), &[2]);
    /// assert_eq!(col.get(&[1]).unwrap(), 3.0);
    /// ```
    pub fn slice(&self, sel: &[AxisState]) -> Result<Tensor> {
        if self.ndim() == 0 {
            return Err(MirthError::EmptyTensor);
        }
        if sel.len() > self.ndim() {
            return Err(MirthError::RankMismatch {
                expected: self.ndim(),
                got: sel.len(),
            });
        }

        let mut dims: SmallVec<[usize; 4]> = SmallVec::new();
        let mut strides: SmallVec<[usize; 4]> = SmallVec::new();
        let mut offset = self.offset;
        for axis in 0..self.ndim() {
            let len = self.shape.dims()[axis];
            match sel.get(axis).copied().unwrap_or(AxisState::Free) {
                AxisState::Free => {
                    dims.push(len);
                    strides.push(self.strides[axis]);
                }
                AxisState::Fixed(c) => {
                    if c >= len {
                        return Err(MirthError::IndexOutOfBounds {
                            coord: c,
                            axis,
                            len,
                        });
                    }
                    offset += c * self.strides[axis];
                }
            }
        }

        // Fixing every axis pins a single element; scalar results are
        // shape [1] throughout the engine.
        if dims.is_empty() {
            dims.push(1);
            strides.push(1);
        }

        Ok(Tensor::from_parts(
            self.storage.clone(),
            Shape::new(&dims)?,
            strides,
            offset,
        ))
    }

    /// Reversed view: shape and strides both reversed end-to-end.
    ///
    /// Shares the buffer; no data movement.
    pub fn transpose(&self) -> Tensor {
        let mut strides = self.strides.clone();
        strides.reverse();
        Tensor::from_parts(
            self.storage.clone(),
            self.shape.reversed(),
            strides,
            self.offset,
        )
    }

    /// Reinterpret this tensor under a new shape of the same size.
    ///
    /// At most one axis may be `-1` (inferred). Requires a contiguous
    /// source — reshaping a transposed or sliced view would silently
    /// mislabel elements, so it fails with `NotContiguous`; materialize
    /// with [`contiguous`](Tensor::contiguous) first.
    pub fn reshape(&self, target: &[isize]) -> Result<Tensor> {
        let shape = self.shape.resolve_reshape(target)?;
        if !self.is_contiguous() {
            return Err(MirthError::NotContiguous);
        }
        let strides = shape.contiguous_strides();
        Ok(Tensor::from_parts(
            self.storage.clone(),
            shape,
            strides,
            self.offset,
        ))
    }

    /// Copy this view into a fresh contiguous 1-D tensor of length
    /// `size`, in row-major order.
    pub fn flatten(&self) -> Tensor {
        if self.ndim() == 0 {
            return Tensor::empty();
        }
        let buf = self.storage.read();
        let data: Vec<f64> = self.cursor().map(|i| buf[i]).collect();
        drop(buf);
        let len = data.len();
        let shape = Shape::new(&[len]).expect("flatten: non-void tensor has positive size");
        let strides = shape.contiguous_strides();
        Tensor::from_parts(Storage::from_vec(data), shape, strides, 0)
    }

    // =========================================================================
    // Copies
    // =========================================================================

    /// Copy every element this view addresses into an independent buffer,
    /// walking in row-major order. The result is contiguous and shares
    /// nothing with the source.
    pub fn deep_copy(&self) -> Tensor {
        if self.ndim() == 0 {
            return Tensor::empty();
        }
        let buf = self.storage.read();
        let data: Vec<f64> = self.cursor().map(|i| buf[i]).collect();
        drop(buf);
        let strides = self.shape.contiguous_strides();
        Tensor::from_parts(Storage::from_vec(data), self.shape.clone(), strides, 0)
    }

    /// A contiguous tensor with this view's values: `clone()` when the
    /// view is already contiguous, a deep copy otherwise.
    pub fn contiguous(&self) -> Tensor {
        if self.is_contiguous() {
            self.clone()
        } else {
            self.deep_copy()
        }
    }

    /// The values this view addresses, in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        if self.ndim() == 0 {
            return Vec::new();
        }
        let buf = self.storage.read();
        self.cursor().map(|i| buf[i]).collect()
    }
}

// =========================================================================
// Formatting
// =========================================================================

impl Tensor {
    fn fmt_axis(
        &self,
        f: &mut fmt::Formatter<'_>,
        axis: usize,
        index: usize,
        indent: &str,
        buf: &[f64],
    ) -> fmt::Result {
        write!(f, "[")?;
        let len = self.shape.dims()[axis];
        let stride = self.strides[axis];
        let innermost = axis + 1 == self.ndim();
        for i in 0..len {
            let child = index + i * stride;
            if innermost {
                write!(f, "{}", buf[child])?;
            } else {
                let deeper = format!("{indent} ");
                self.fmt_axis(f, axis + 1, child, &deeper, buf)?;
            }
            if i + 1 != len {
                if innermost {
                    write!(f, ", ")?;
                } else {
                    write!(f, ",\n{indent}")?;
                }
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for Tensor {
    /// Nested bracket notation: `", "` between innermost elements,
    /// `",\n"` plus one space of indentation per nesting level between
    /// sub-arrays.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ndim() == 0 {
            return write!(f, "[]");
        }
        let buf = self.storage.read();
        self.fmt_axis(f, 0, self.offset, " ", &buf)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, strides={:?}, offset={}, contiguous={})",
            self.shape,
            self.strides.as_slice(),
            self.offset,
            self.is_contiguous(),
        )
    }
}
