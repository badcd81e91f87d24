//! Promotion - Value-Based Result Types
//!
//! The engine picks the result dtype of a binary operation the way legacy
//! `NumPy` does: when exactly one operand is 0-dimensional and its kind does
//! not exceed the array operand's kind, the 0-d operand contributes the
//! smallest dtype able to hold its *value* rather than its own dtype.
//!
//! # Key Features
//! - `result_type` over two raw arrays
//! - `min_scalar_type` for a single value
//! - `same_kind` cast checks for in-place results
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::dtype::{DType, DTypeClass, Value};

use crate::raw::RawArray;

// =============================================================================
// Kinds
// =============================================================================

/// Kind order used when deciding whether a 0-d operand is value-cast.
fn kind_rank(dtype: DType) -> u8 {
    match dtype.class() {
        DTypeClass::Boolean => 0,
        DTypeClass::Integer => 1,
        DTypeClass::Floating => 2,
    }
}

/// Kind character distinguishing signed from unsigned integers.
fn kind_char(dtype: DType) -> char {
    if dtype.is_bool() {
        'b'
    } else if dtype.is_unsigned_integer() {
        'u'
    } else if dtype.is_signed_integer() {
        'i'
    } else {
        'f'
    }
}

// =============================================================================
// Minimum Scalar Types
// =============================================================================

fn smallest_unsigned(value: u64) -> DType {
    if value <= u64::from(u8::MAX) {
        DType::U8
    } else if value <= u64::from(u16::MAX) {
        DType::U16
    } else if value <= u64::from(u32::MAX) {
        DType::U32
    } else {
        DType::U64
    }
}

fn smallest_signed(value: i64) -> DType {
    if i8::try_from(value).is_ok() {
        DType::I8
    } else if i16::try_from(value).is_ok() {
        DType::I16
    } else if i32::try_from(value).is_ok() {
        DType::I32
    } else {
        DType::I64
    }
}

/// The signed integer dtype with as many bits as `dtype`.
fn signed_counterpart(dtype: DType) -> DType {
    match dtype.bits() {
        8 => DType::I8,
        16 => DType::I16,
        32 => DType::I32,
        _ => DType::I64,
    }
}

/// Smallest dtype holding `value`, as seen next to an array of `array_dtype`.
///
/// Non-negative integers prefer the signed type of the same width when the
/// array is signed and the value fits it.
#[must_use]
pub fn min_scalar_type(value: Value, array_dtype: DType) -> DType {
    let non_negative = |v: u64| {
        let unsigned = smallest_unsigned(v);
        let signed = signed_counterpart(unsigned);
        let fits_signed = signed
            .int_range()
            .is_some_and(|(_, hi)| i128::from(v) <= hi);
        if array_dtype.is_signed_integer() && fits_signed {
            signed
        } else {
            unsigned
        }
    };

    match value {
        Value::Bool(_) => DType::Bool,
        Value::Int(i) if i < 0 => smallest_signed(i),
        Value::Int(i) => non_negative(i as u64),
        Value::UInt(u) => non_negative(u),
        Value::Float(f) => {
            if !f.is_finite() || f.abs() <= f64::from(f32::MAX) {
                DType::F32
            } else {
                DType::F64
            }
        }
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// Result dtype of a binary operation between `lhs` and `rhs`.
#[must_use]
pub fn result_type(lhs: &RawArray, rhs: &RawArray) -> DType {
    let (scalar, array) = match (lhs.ndim() == 0, rhs.ndim() == 0) {
        (true, false) => (lhs, rhs),
        (false, true) => (rhs, lhs),
        _ => return lhs.dtype().promote(rhs.dtype()),
    };

    if kind_rank(scalar.dtype()) > kind_rank(array.dtype()) {
        return lhs.dtype().promote(rhs.dtype());
    }

    match scalar.scalar_value() {
        Some(value) => array.dtype().promote(min_scalar_type(value, array.dtype())),
        None => lhs.dtype().promote(rhs.dtype()),
    }
}

/// True when `from` can be cast to `to` under the `same_kind` rule.
#[must_use]
pub fn can_cast_same_kind(from: DType, to: DType) -> bool {
    from.promote(to) == to || kind_char(from) == kind_char(to)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn array(dtype: DType) -> RawArray {
        RawArray::full(&[3], Value::Int(1), dtype)
    }

    #[test]
    fn test_min_scalar_type() {
        assert_eq!(min_scalar_type(Value::Int(3), DType::U8), DType::U8);
        assert_eq!(min_scalar_type(Value::Int(3), DType::I8), DType::I8);
        assert_eq!(min_scalar_type(Value::Int(200), DType::I8), DType::U8);
        assert_eq!(min_scalar_type(Value::Int(-129), DType::I8), DType::I16);
        assert_eq!(min_scalar_type(Value::Float(0.1), DType::F32), DType::F32);
        assert_eq!(min_scalar_type(Value::Float(1e300), DType::F32), DType::F64);
    }

    #[test]
    fn test_value_based_result_type() {
        let f32_array = array(DType::F32);
        let f64_scalar = RawArray::scalar(Value::Float(0.5), DType::F64);
        assert_eq!(result_type(&f32_array, &f64_scalar), DType::F32);

        let i8_array = array(DType::I8);
        let i64_scalar = RawArray::scalar(Value::Int(3), DType::I64);
        assert_eq!(result_type(&i8_array, &i64_scalar), DType::I8);
        assert_eq!(result_type(&i64_scalar, &i8_array), DType::I8);

        let big = RawArray::scalar(Value::Int(1000), DType::I64);
        assert_eq!(result_type(&i8_array, &big), DType::I16);
    }

    #[test]
    fn test_higher_kind_scalar_uses_dtype() {
        let i8_array = array(DType::I8);
        let float_scalar = RawArray::scalar(Value::Float(0.5), DType::F32);
        assert_eq!(result_type(&i8_array, &float_scalar), DType::F32);
    }

    #[test]
    fn test_same_shape_class_uses_dtype() {
        let a = RawArray::full(&[1], Value::Int(1), DType::F32);
        let b = RawArray::full(&[1], Value::Int(1), DType::F64);
        assert_eq!(result_type(&a, &b), DType::F64);
    }

    #[test]
    fn test_same_kind() {
        assert!(can_cast_same_kind(DType::F64, DType::F32));
        assert!(can_cast_same_kind(DType::I64, DType::I8));
        assert!(can_cast_same_kind(DType::U8, DType::I16));
        assert!(!can_cast_same_kind(DType::F64, DType::I64));
        assert!(!can_cast_same_kind(DType::I16, DType::U8));
        assert!(!can_cast_same_kind(DType::I8, DType::Bool));
    }
}
