//! Nested-literal tensor input.
//!
//! `NestedData` is a tagged variant over arbitrarily nested number
//! sequences, resolved once at the call site instead of by runtime type
//! inspection. The shape is inferred from the nesting: each level's length
//! becomes an axis, and siblings at the same depth must agree in length.

use crate::error::MirthError;
use crate::Result;

/// Arbitrarily nested sequences of numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedData {
    Scalar(f64),
    List(Vec<NestedData>),
}

impl NestedData {
    /// Infer the shape and flatten all leaves in depth-first order.
    ///
    /// Fails with `RaggedShape` when sibling sequences at the same depth
    /// disagree in length.
    pub fn parse(&self) -> Result<(Vec<usize>, Vec<f64>)> {
        let mut dims = Vec::new();
        let mut flat = Vec::new();
        self.walk(&mut dims, &mut flat, 0)?;
        Ok((dims, flat))
    }

    fn walk(&self, dims: &mut Vec<usize>, flat: &mut Vec<f64>, depth: usize) -> Result<()> {
        match self {
            NestedData::Scalar(v) => {
                if depth < dims.len() {
                    // A number where earlier siblings nested deeper.
                    return Err(MirthError::RaggedShape {
                        depth,
                        expected: dims[depth],
                        got: 0,
                    });
                }
                flat.push(*v);
                Ok(())
            }
            NestedData::List(items) => {
                if dims.len() <= depth {
                    dims.push(items.len());
                } else if dims[depth] != items.len() {
                    return Err(MirthError::RaggedShape {
                        depth,
                        expected: dims[depth],
                        got: items.len(),
                    });
                }
                for item in items {
                    item.walk(dims, flat, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for NestedData {
    fn from(v: f64) -> Self {
        NestedData::Scalar(v)
    }
}

impl<T: Into<NestedData>> From<Vec<T>> for NestedData {
    fn from(items: Vec<T>) -> Self {
        NestedData::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&[f64]> for NestedData {
    fn from(items: &[f64]) -> Self {
        NestedData::List(items.iter().map(|&v| NestedData::Scalar(v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_vector() {
        let data: NestedData = vec![1.0, 2.0, 3.0].into();
        let (dims, flat) = data.parse().unwrap();
        assert_eq!(dims, vec![3]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_nested_matrix() {
        let data: NestedData = vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]].into();
        let (dims, flat) = data.parse().unwrap();
        assert_eq!(dims, vec![2, 3]);
        assert_eq!(flat, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_three_levels() {
        let data: NestedData =
            vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![vec![5.0, 6.0], vec![7.0, 8.0]]]
                .into();
        let (dims, flat) = data.parse().unwrap();
        assert_eq!(dims, vec![2, 2, 2]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_ragged_rejected() {
        let data: NestedData = vec![vec![1.0, 2.0], vec![3.0]].into();
        assert_eq!(
            data.parse(),
            Err(MirthError::RaggedShape {
                depth: 1,
                expected: 2,
                got: 1,
            })
        );
    }

    #[test]
    fn test_scalar_leaf() {
        let data = NestedData::Scalar(7.0);
        let (dims, flat) = data.parse().unwrap();
        assert!(dims.is_empty());
        assert_eq!(flat, vec![7.0]);
    }
}
