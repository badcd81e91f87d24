//! Shape Normalization - Removing 0-d Asymmetry Before Broadcasting
//!
//! The engine picks a result dtype from the *value* of a 0-dimensional
//! operand when the other operand has dimensions. Giving the 0-d operand a
//! leading axis of size 1 makes both operands arrays in the engine's eyes,
//! so the result dtype depends on dtypes alone. Broadcasting gives the same
//! result shape either way.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::Result;

use crate::array::Array;

/// Rewrites a 0-d operand as a shape `[1]` view when the other operand is
/// not 0-d. Both 0-d, or both n-d, pass through unchanged.
pub fn normalize_two_args(a: &Array, b: &Array) -> Result<(Array, Array)> {
    match (a.ndim(), b.ndim()) {
        (0, n) if n != 0 => {
            tracing::trace!(shape = ?b.shape(), "normalizing 0-d left operand");
            Ok((a.new_axis()?, b.clone()))
        }
        (n, 0) if n != 0 => {
            tracing::trace!(shape = ?a.shape(), "normalizing 0-d right operand");
            Ok((a.clone(), b.new_axis()?))
        }
        _ => Ok((a.clone(), b.clone())),
    }
}

impl Array {
    fn new_axis(&self) -> Result<Array> {
        Ok(Array::from_raw(self.raw().expand_dims(0)?))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{asarray, from_vec, DType};

    #[test]
    fn test_zero_d_left() {
        let s = asarray(1.0, None).unwrap();
        let v = from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
        let (a, b) = normalize_two_args(&s, &v).unwrap();
        assert_eq!(a.shape(), &[1]);
        assert_eq!(a.dtype(), DType::F64);
        assert!(a.shares_buffer(&s));
        assert_eq!(b.shape(), &[2]);
    }

    #[test]
    fn test_zero_d_right() {
        let v = from_vec(vec![1i8, 2, 3, 4], &[2, 2]).unwrap();
        let s = asarray(5, Some(DType::I64)).unwrap();
        let (a, b) = normalize_two_args(&v, &s).unwrap();
        assert_eq!(a.shape(), &[2, 2]);
        assert_eq!(b.shape(), &[1]);
    }

    #[test]
    fn test_symmetric_pairs_unchanged() {
        let s = asarray(1, None).unwrap();
        let (a, b) = normalize_two_args(&s, &s).unwrap();
        assert_eq!((a.ndim(), b.ndim()), (0, 0));

        let v = from_vec(vec![1u8], &[1]).unwrap();
        let (a, b) = normalize_two_args(&v, &v).unwrap();
        assert_eq!((a.shape(), b.shape()), (&[1usize][..], &[1usize][..]));
    }
}
