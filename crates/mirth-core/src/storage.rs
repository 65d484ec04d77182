//! Backing storage for tensor data.
//!
//! Storage is reference-counted (`Arc`) so multiple tensors can share the
//! same underlying buffer (views from slice/transpose/reshape and shallow
//! copies). Mutation goes through an `RwLock`, so a `set` through one view
//! is immediately visible through every alias. The buffer is fixed-length:
//! it is allocated once and never resized.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, reference-counted f64 buffer.
#[derive(Debug, Clone)]
pub struct Storage {
    data: Arc<RwLock<Vec<f64>>>,
    len: usize,
}

impl Storage {
    /// Allocate a zero-filled buffer of `len` elements.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(vec![0.0; len])),
            len,
        }
    }

    /// Take ownership of an existing buffer.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let len = data.len();
        Self {
            data: Arc::new(RwLock::new(data)),
            len,
        }
    }

    /// Number of slots in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has zero slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Acquire a read guard over the buffer.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<f64>> {
        self.data.read()
    }

    /// Acquire a write guard over the buffer.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<f64>> {
        self.data.write()
    }

    /// Value at a buffer slot.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.read().get(index).copied()
    }

    /// Overwrite a buffer slot.
    pub fn set(&self, index: usize, value: f64) {
        self.data.write()[index] = value;
    }

    /// Whether two handles share one buffer (aliasing).
    pub fn ptr_eq(&self, other: &Storage) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Whether this handle is the only reference to the buffer.
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.data) == 1
    }

    /// Copy the whole buffer out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let s = Storage::zeros(10);
        assert_eq!(s.len(), 10);
        assert!(s.read().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_vec() {
        let s = Storage::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(1), Some(2.0));
        assert_eq!(s.get(3), None);
    }

    #[test]
    fn test_aliasing() {
        let a = Storage::from_vec(vec![1.0, 2.0, 3.0]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.is_unique());

        // A write through one handle is visible through the other.
        b.set(0, 99.0);
        assert_eq!(a.get(0), Some(99.0));
    }

    #[test]
    fn test_independent_buffers() {
        let a = Storage::from_vec(vec![1.0]);
        let b = Storage::from_vec(vec![1.0]);
        assert!(!a.ptr_eq(&b));
        assert!(a.is_unique());

        b.set(0, 2.0);
        assert_eq!(a.get(0), Some(1.0));
    }
}
