//! Element-wise operations on tensors.
//!
//! Unary and binary maps walk their operands with lock-step strided
//! cursors, so views (slices, transposes) participate without being
//! materialized first. Binary operations require exact shape equality.

use crate::error::MirthError;
use crate::storage::Storage;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Unary map: a new tensor of identical shape with `f` applied to
    /// every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tensor {
        if self.ndim() == 0 {
            return Tensor::empty();
        }
        let buf = self.storage().read();
        let data: Vec<f64> = self.cursor().map(|i| f(buf[i])).collect();
        drop(buf);
        let shape = self.shape().clone();
        let strides = shape.contiguous_strides();
        Tensor::from_parts(Storage::from_vec(data), shape, strides, 0)
    }

    /// Binary map: combine two tensors of equal shape element by element.
    ///
    /// Fails with `ShapeMismatch` when the shapes differ; there is no
    /// implicit broadcasting.
    pub fn zip_with(&self, other: &Tensor, f: impl Fn(f64, f64) -> f64) -> Result<Tensor> {
        if self.ndim() == 0 || other.ndim() == 0 {
            return Err(MirthError::EmptyTensor);
        }
        if self.shape() != other.shape() {
            return Err(MirthError::ShapeMismatch {
                expected: self.dims().to_vec(),
                got: other.dims().to_vec(),
            });
        }
        let a = self.storage().read();
        let b = other.storage().read();
        let data: Vec<f64> = self
            .cursor()
            .zip(other.cursor())
            .map(|(i, j)| f(a[i], b[j]))
            .collect();
        drop(a);
        drop(b);
        let shape = self.shape().clone();
        let strides = shape.contiguous_strides();
        Ok(Tensor::from_parts(Storage::from_vec(data), shape, strides, 0))
    }

    /// Element-wise addition: self + other.
    pub fn add(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise subtraction: self - other.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Element-wise multiplication: self * other.
    pub fn mul(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Element-wise division: self / other.
    pub fn div(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Element-wise negation: -self.
    pub fn neg(&self) -> Tensor {
        self.map(|v| -v)
    }

    /// Scalar addition: self + scalar.
    pub fn add_scalar(&self, scalar: f64) -> Tensor {
        self.map(|v| v + scalar)
    }

    /// Scalar multiplication: self * scalar.
    pub fn mul_scalar(&self, scalar: f64) -> Tensor {
        self.map(|v| v * scalar)
    }
}

// Operator overloads
impl std::ops::Add for &Tensor {
    type Output = Tensor;
    fn add(self, rhs: &Tensor) -> Tensor {
        Tensor::add(self, rhs).expect("Add failed")
    }
}

impl std::ops::Sub for &Tensor {
    type Output = Tensor;
    fn sub(self, rhs: &Tensor) -> Tensor {
        Tensor::sub(self, rhs).expect("Sub failed")
    }
}

impl std::ops::Mul for &Tensor {
    type Output = Tensor;
    fn mul(self, rhs: &Tensor) -> Tensor {
        Tensor::mul(self, rhs).expect("Mul failed")
    }
}

impl std::ops::Neg for &Tensor {
    type Output = Tensor;
    fn neg(self) -> Tensor {
        Tensor::neg(self)
    }
}
