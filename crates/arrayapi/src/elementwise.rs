//! Elementwise Functions - Power and Result Types
//!
//! Namespace-level elementwise functions. `pow` restricts exponentiation to
//! floating-point operands and removes the 0-d asymmetry before calling the
//! engine; `result_type` answers promotion questions with the standard's
//! table rather than the engine's.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::{DType, Error, Result};
use arrayapi_engine::BinaryOp;

use crate::array::Array;
use crate::normalize::normalize_two_args;
use crate::rejected;

/// Fails unless both dtypes are floating point.
pub(crate) fn require_floating(a: &Array, b: &Array, op: &str) -> Result<()> {
    if a.dtype().is_float() && b.dtype().is_float() {
        Ok(())
    } else {
        Err(rejected(Error::type_error(format!(
            "Only floating-point dtypes are allowed in {op}"
        ))))
    }
}

/// Raises `x1` to the power `x2`, elementwise.
pub fn pow(x1: &Array, x2: &Array) -> Result<Array> {
    require_floating(x1, x2, "pow")?;
    let (a, b) = normalize_two_args(x1, x2)?;
    let out = a.raw().binary(BinaryOp::Power, b.raw()).map_err(rejected)?;
    Ok(Array::from_value(out))
}

/// The dtype that results from promoting all of `dtypes` together.
///
/// Mixed classes and the `int64`/`uint64` pair have no result type.
pub fn result_type(dtypes: impl IntoIterator<Item = DType>) -> Result<DType> {
    let mut dtypes = dtypes.into_iter();
    let Some(first) = dtypes.next() else {
        return Err(rejected(Error::value(
            "at least one array or dtype is required",
        )));
    };
    dtypes.try_fold(first, |acc, dtype| {
        acc.standard_promote(dtype).ok_or_else(|| {
            rejected(Error::type_error(format!(
                "{acc} and {dtype} cannot be type promoted together"
            )))
        })
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{asarray, from_vec};

    #[test]
    fn test_pow_floats() {
        let two = asarray(2.0, None).unwrap();
        let three = asarray(3.0, None).unwrap();
        let r = pow(&two, &three).unwrap();
        assert_eq!(r.ndim(), 0);
        assert_eq!(r.to_float().unwrap(), 8.0);
    }

    #[test]
    fn test_pow_rejects_integers() {
        let ints = from_vec(vec![1i32, 2], &[2]).unwrap();
        let floats = from_vec(vec![1.0f64, 2.0], &[2]).unwrap();
        assert!(pow(&ints, &floats).unwrap_err().is_type_error());
        assert!(pow(&floats, &ints).unwrap_err().is_type_error());
    }

    #[test]
    fn test_pow_zero_d_exponent_uses_dtype() {
        let base = from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
        let exponent = asarray(2.0, Some(DType::F64)).unwrap();
        let r = pow(&base, &exponent).unwrap();
        assert_eq!(r.dtype(), DType::F64);
        assert_eq!(r.shape(), &[2]);
    }

    #[test]
    fn test_result_type() {
        assert_eq!(result_type([DType::I8, DType::I32]).unwrap(), DType::I32);
        assert_eq!(result_type([DType::U8, DType::I8]).unwrap(), DType::I16);
        assert_eq!(result_type([DType::F32, DType::F64]).unwrap(), DType::F64);
        assert_eq!(result_type([DType::Bool]).unwrap(), DType::Bool);
        assert!(result_type([DType::I64, DType::U64]).unwrap_err().is_type_error());
        assert!(result_type([DType::I8, DType::F32]).unwrap_err().is_type_error());
        assert!(result_type([DType::Bool, DType::I8]).unwrap_err().is_type_error());
        assert!(result_type(Vec::new()).unwrap_err().is_value_error());
    }
}
