//! Array Creation Functions
//!
//! Factory functions producing raw arrays of a runtime dtype: constant
//! fills, identity matrices, ranges and evenly spaced values.
//!
//! # Key Features
//! - `zeros`, `ones`, `full`, `empty` and the `*_like` variants
//! - `eye` with row/column counts and diagonal offset
//! - `arange` with exact integer stepping
//! - `linspace` with optional endpoint
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use num_traits::ToPrimitive;

use arrayapi_core::dtype::{DType, Element, Value};
use arrayapi_core::error::{Error, Result};

use crate::raw::{dispatch_all, RawArray};

// =============================================================================
// Constant Fills
// =============================================================================

/// Creates an array filled with zeros.
#[must_use]
pub fn zeros(shape: &[usize], dtype: DType) -> RawArray {
    full(shape, Value::Int(0), dtype)
}

/// Creates an array filled with ones.
#[must_use]
pub fn ones(shape: &[usize], dtype: DType) -> RawArray {
    full(shape, Value::Int(1), dtype)
}

/// Creates an array filled with `value`, cast to `dtype`.
#[must_use]
pub fn full(shape: &[usize], value: Value, dtype: DType) -> RawArray {
    RawArray::full(shape, value, dtype)
}

/// Creates an array whose contents are unspecified.
///
/// Elements are zero-initialized.
#[must_use]
pub fn empty(shape: &[usize], dtype: DType) -> RawArray {
    zeros(shape, dtype)
}

/// Creates zeros shaped like `other`, with its dtype unless overridden.
#[must_use]
pub fn zeros_like(other: &RawArray, dtype: Option<DType>) -> RawArray {
    zeros(other.shape(), dtype.unwrap_or_else(|| other.dtype()))
}

/// Creates ones shaped like `other`, with its dtype unless overridden.
#[must_use]
pub fn ones_like(other: &RawArray, dtype: Option<DType>) -> RawArray {
    ones(other.shape(), dtype.unwrap_or_else(|| other.dtype()))
}

/// Creates a fill shaped like `other`, with its dtype unless overridden.
#[must_use]
pub fn full_like(other: &RawArray, value: Value, dtype: Option<DType>) -> RawArray {
    full(other.shape(), value, dtype.unwrap_or_else(|| other.dtype()))
}

/// Creates an unspecified array shaped like `other`.
#[must_use]
pub fn empty_like(other: &RawArray, dtype: Option<DType>) -> RawArray {
    empty(other.shape(), dtype.unwrap_or_else(|| other.dtype()))
}

// =============================================================================
// Identity
// =============================================================================

/// Creates a 2-D array with ones on the `k`-th diagonal.
///
/// # Arguments
/// * `n_rows` - Number of rows
/// * `n_cols` - Number of columns (defaults to `n_rows`)
/// * `k` - Diagonal offset; positive values move above the main diagonal
pub fn eye(n_rows: usize, n_cols: Option<usize>, k: isize, dtype: DType) -> Result<RawArray> {
    let n_cols = n_cols.unwrap_or(n_rows);
    let mut values = vec![Value::Int(0); n_rows * n_cols];
    for row in 0..n_rows {
        let col = row as isize + k;
        if col >= 0 && (col as usize) < n_cols {
            values[row * n_cols + col as usize] = Value::Int(1);
        }
    }
    RawArray::from_values(&values, &[n_rows, n_cols], dtype)
}

// =============================================================================
// Ranges
// =============================================================================

/// Creates a 1-D array of values from `start` towards `stop` (exclusive)
/// spaced by `step`.
///
/// Integer inputs step exactly; any float input steps in `f64`.
pub fn arange(start: Value, stop: Value, step: Value, dtype: DType) -> Result<RawArray> {
    let (begin, end, delta) = (start.as_f64(), stop.as_f64(), step.as_f64());
    if delta == 0.0 {
        return Err(Error::value("arange: step must not be zero"));
    }

    let span = ((end - begin) / delta).ceil();
    let len = if span > 0.0 {
        span.to_usize()
            .ok_or_else(|| Error::value("arange: maximum allowed size exceeded"))?
    } else {
        0
    };

    let exact = start.as_i128().zip(step.as_i128());

    let values: Vec<Value> = (0..len)
        .map(|i| match exact {
            Some((s, d)) => Value::Int((s + i as i128 * d) as i64),
            None => Value::Float(begin + i as f64 * delta),
        })
        .collect();
    RawArray::from_values(&values, &[len], dtype)
}

/// Creates `num` evenly spaced values over `[start, stop]`, or over
/// `[start, stop)` without the endpoint.
pub fn linspace(start: f64, stop: f64, num: usize, endpoint: bool, dtype: DType) -> Result<RawArray> {
    let divisions = if endpoint { num.saturating_sub(1) } else { num };
    let step = if divisions > 0 {
        (stop - start) / divisions as f64
    } else {
        0.0
    };

    dispatch_all!(dtype, T => {
        let mut data: Vec<T> = (0..num)
            .map(|i| T::from_value(Value::Float(start + i as f64 * step)))
            .collect();
        if endpoint && num > 1 {
            data[num - 1] = T::from_value(Value::Float(stop));
        }
        RawArray::from_vec(data, &[num])
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(array: &RawArray) -> Vec<f64> {
        array.values().into_iter().map(Value::as_f64).collect()
    }

    #[test]
    fn test_zeros_and_ones() {
        let z = zeros(&[2, 3], DType::F32);
        assert_eq!(z.shape(), &[2, 3]);
        assert_eq!(z.dtype(), DType::F32);
        assert!(floats(&z).iter().all(|&v| v == 0.0));

        let o = ones(&[2], DType::Bool);
        assert_eq!(o.values(), vec![Value::Bool(true); 2]);
    }

    #[test]
    fn test_like_variants() {
        let base = full(&[3], Value::Float(2.5), DType::F64);
        assert_eq!(zeros_like(&base, None).dtype(), DType::F64);
        assert_eq!(ones_like(&base, Some(DType::I8)).dtype(), DType::I8);
        assert_eq!(floats(&full_like(&base, Value::Int(7), None)), vec![7.0; 3]);
        assert_eq!(empty_like(&base, None).shape(), &[3]);
    }

    #[test]
    fn test_eye() {
        let e = eye(2, Some(3), 1, DType::I64).unwrap();
        assert_eq!(e.shape(), &[2, 3]);
        assert_eq!(floats(&e), vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

        let square = eye(3, None, 0, DType::F32).unwrap();
        assert_eq!(floats(&square), vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_arange() {
        let a = arange(Value::Int(0), Value::Int(5), Value::Int(2), DType::I64).unwrap();
        assert_eq!(a.values(), vec![Value::Int(0), Value::Int(2), Value::Int(4)]);

        let down = arange(Value::Int(3), Value::Int(0), Value::Int(-1), DType::I32).unwrap();
        assert_eq!(down.values(), vec![Value::Int(3), Value::Int(2), Value::Int(1)]);

        let f = arange(Value::Float(0.0), Value::Float(1.0), Value::Float(0.25), DType::F64).unwrap();
        assert_eq!(floats(&f), vec![0.0, 0.25, 0.5, 0.75]);

        let none = arange(Value::Int(5), Value::Int(0), Value::Int(1), DType::I64).unwrap();
        assert_eq!(none.shape(), &[0]);

        assert!(arange(Value::Int(0), Value::Int(1), Value::Int(0), DType::I64).is_err());
    }

    #[test]
    fn test_linspace() {
        let l = linspace(0.0, 1.0, 5, true, DType::F64).unwrap();
        assert_eq!(floats(&l), vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let open = linspace(0.0, 1.0, 4, false, DType::F64).unwrap();
        assert_eq!(floats(&open), vec![0.0, 0.25, 0.5, 0.75]);

        assert_eq!(linspace(2.0, 3.0, 1, true, DType::F32).unwrap().values(), vec![Value::Float(2.0)]);
        assert_eq!(linspace(0.0, 1.0, 0, true, DType::F32).unwrap().shape(), &[0]);
    }
}
