//! Generalized axis contraction.
//!
//! `dot` subsumes the vector dot product, matrix-vector and matrix-matrix
//! multiplication, and batched tensor contraction: the left operand's last
//! axis is summed against the right operand's second-to-last axis (its
//! only axis when 1-D).

use smallvec::SmallVec;

use crate::error::MirthError;
use crate::iter::{AxisState, StridedCursor};
use crate::shape::Shape;
use crate::storage::Storage;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Contract the last axis of `self` against the second-to-last axis
    /// of `other` (its only axis if `other` is 1-D).
    ///
    /// The output shape is the left operand's free axes followed by the
    /// right operand's free axes; an all-scalar result is shape `[1]`.
    /// Both operands are read-only; the output owns a fresh buffer.
    ///
    /// ```
    /// use mirth_core::Tensor;
    ///
    /// let a = Tensor::from_nested(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]).unwrap();
    /// let v = Tensor::from_nested(vec![3.0, 2.0, 1.0]).unwrap();
    /// let p = a.dot(&v).unwrap();
    /// assert_eq!(p.dims(), &[2]);
    /// assert_eq!(p.to_vec(), vec![10.0, 10.0]);
    /// ```
    pub fn dot(&self, other: &Tensor) -> Result<Tensor> {
        let lnd = self.ndim();
        let rnd = other.ndim();
        if lnd == 0 || rnd == 0 {
            return Err(MirthError::EmptyTensor);
        }

        // Contracted axes.
        let lc = lnd - 1;
        let rc = if rnd == 1 { 0 } else { rnd - 2 };
        let k = self.dims()[lc];
        if k != other.dims()[rc] {
            return Err(MirthError::ContractionMismatch {
                left: k,
                right: other.dims()[rc],
            });
        }

        let mut out_dims: Vec<usize> = Vec::with_capacity(lnd + rnd - 2);
        out_dims.extend_from_slice(&self.dims()[..lc]);
        for (axis, &d) in other.dims().iter().enumerate() {
            if axis != rc {
                out_dims.push(d);
            }
        }
        if out_dims.is_empty() {
            // Scalar results are shape [1].
            out_dims.push(1);
        }

        let mut lstates: SmallVec<[AxisState; 4]> = SmallVec::from_elem(AxisState::Free, lnd);
        lstates[lc] = AxisState::Fixed(0);
        let mut rstates: SmallVec<[AxisState; 4]> = SmallVec::from_elem(AxisState::Free, rnd);
        rstates[rc] = AxisState::Fixed(0);

        let lstride = self.strides()[lc];
        let rstride = other.strides()[rc];

        let lbuf = self.storage().read();
        let rbuf = other.storage().read();

        // The right operand's free positions are revisited for every left
        // position; collect their base indices once.
        let rbases: Vec<usize> = StridedCursor::with_states(
            other.dims(),
            other.strides(),
            other.offset(),
            &rstates,
        )
        .collect();

        let mut data = Vec::with_capacity(out_dims.iter().product());
        let lcursor =
            StridedCursor::with_states(self.dims(), self.strides(), self.offset(), &lstates);
        for lbase in lcursor {
            for &rbase in &rbases {
                let mut acc = 0.0;
                for j in 0..k {
                    acc += lbuf[lbase + j * lstride] * rbuf[rbase + j * rstride];
                }
                data.push(acc);
            }
        }
        drop(lbuf);
        drop(rbuf);

        let shape = Shape::new(&out_dims)?;
        let strides = shape.contiguous_strides();
        Ok(Tensor::from_parts(Storage::from_vec(data), shape, strides, 0))
    }
}
