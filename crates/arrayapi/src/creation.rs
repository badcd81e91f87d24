//! Creation Functions - Building Arrays
//!
//! The public entry points for making an `Array`. Native values are typed
//! by kind (bool, integer, float) using the default dtypes unless a dtype is
//! given; the namespace handle calls the same builders with its configured
//! defaults.
//!
//! # Key Features
//! - `asarray` for native scalars and existing arrays, `from_vec` for data
//! - `zeros`, `ones`, `empty`, `full` and the `*_like` variants
//! - `arange`, `linspace` and `eye`
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::{DType, Error, Result, Value};
use arrayapi_engine::{self as engine, RawArray, RawElement};

use crate::array::Array;
use crate::rejected;
use crate::scalar::Operand;

// =============================================================================
// Default Dtypes
// =============================================================================

/// Dtypes given to native values when no dtype is requested.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Defaults {
    pub(crate) int: DType,
    pub(crate) float: DType,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            int: DType::default_int(),
            float: DType::default_float(),
        }
    }
}

impl Defaults {
    /// Dtype for a native value of the operand's kind.
    fn for_operand(self, operand: &Operand) -> Result<DType> {
        match operand {
            Operand::Bool(_) => Ok(DType::Bool),
            Operand::Int(i) if *i > i128::from(i64::MAX) && self.int == DType::I64 => Ok(DType::U64),
            Operand::Int(_) => Ok(self.int),
            Operand::Float(_) => Ok(self.float),
            Operand::Array(a) => Ok(a.dtype()),
            Operand::Unsupported(kind) => Err(unsupported(kind)),
        }
    }
}

fn unsupported(kind: &str) -> Error {
    rejected(Error::type_error(format!(
        "cannot create an array from a value of type {kind}"
    )))
}

/// The element value of a native operand held in `dtype`.
///
/// Integers are range checked against integer dtypes.
fn native_value(operand: &Operand, dtype: DType) -> Result<Value> {
    match operand {
        Operand::Bool(b) => Ok(Value::Bool(*b)),
        Operand::Int(i) => Value::from_int_checked(*i, dtype).map_err(rejected),
        Operand::Float(f) => Ok(Value::Float(*f)),
        Operand::Array(a) => match a.raw().scalar_value() {
            Some(value) => Ok(value),
            None => Err(rejected(Error::type_error(
                "only 0-dimensional arrays can be used as scalar values",
            ))),
        },
        Operand::Unsupported(kind) => Err(unsupported(kind)),
    }
}

// =============================================================================
// Conversion
// =============================================================================

pub(crate) fn asarray_with(obj: Operand, dtype: Option<DType>, defaults: Defaults) -> Result<Array> {
    if let Operand::Array(array) = obj {
        return Ok(match dtype {
            Some(dtype) if dtype != array.dtype() => Array::from_raw(array.raw().astype(dtype)),
            _ => array,
        });
    }
    let dtype = match dtype {
        Some(dtype) => dtype,
        None => defaults.for_operand(&obj)?,
    };
    let value = native_value(&obj, dtype)?;
    Ok(Array::from_raw(RawArray::scalar(value, dtype)))
}

/// Converts a native scalar or an array into an `Array`.
///
/// Native values become 0-d arrays (bool, `int64` or `float64` by default;
/// integers above `i64::MAX` become `uint64`). An array is returned as is,
/// or cast when a different dtype is requested.
pub fn asarray(obj: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
    asarray_with(obj.into(), dtype, Defaults::default())
}

/// Creates an array from a vector of elements with the given shape.
pub fn from_vec<T: RawElement>(data: Vec<T>, shape: &[usize]) -> Result<Array> {
    Ok(Array::from_raw(RawArray::from_vec(data, shape).map_err(rejected)?))
}

// =============================================================================
// Constant Fills
// =============================================================================

/// Creates an array of zeros (`float64` by default).
pub fn zeros(shape: &[usize], dtype: Option<DType>) -> Array {
    Array::from_raw(engine::zeros(shape, dtype.unwrap_or_else(DType::default_float)))
}

/// Creates an array of ones (`float64` by default).
pub fn ones(shape: &[usize], dtype: Option<DType>) -> Array {
    Array::from_raw(engine::ones(shape, dtype.unwrap_or_else(DType::default_float)))
}

/// Creates an array with unspecified contents (`float64` by default).
pub fn empty(shape: &[usize], dtype: Option<DType>) -> Array {
    Array::from_raw(engine::empty(shape, dtype.unwrap_or_else(DType::default_float)))
}

pub(crate) fn full_with(
    shape: &[usize],
    fill: Operand,
    dtype: Option<DType>,
    defaults: Defaults,
) -> Result<Array> {
    let dtype = match dtype {
        Some(dtype) => dtype,
        None => defaults.for_operand(&fill)?,
    };
    let value = native_value(&fill, dtype)?;
    Ok(Array::from_raw(engine::full(shape, value, dtype)))
}

/// Creates an array filled with `fill`, typed by its kind unless `dtype`
/// is given.
pub fn full(shape: &[usize], fill: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
    full_with(shape, fill.into(), dtype, Defaults::default())
}

/// Zeros shaped like `x`, with its dtype unless overridden.
pub fn zeros_like(x: &Array, dtype: Option<DType>) -> Array {
    Array::from_raw(engine::zeros_like(x.raw(), dtype))
}

/// Ones shaped like `x`, with its dtype unless overridden.
pub fn ones_like(x: &Array, dtype: Option<DType>) -> Array {
    Array::from_raw(engine::ones_like(x.raw(), dtype))
}

/// Unspecified contents shaped like `x`, with its dtype unless overridden.
pub fn empty_like(x: &Array, dtype: Option<DType>) -> Array {
    Array::from_raw(engine::empty_like(x.raw(), dtype))
}

/// A fill shaped like `x`, with its dtype unless overridden.
pub fn full_like(x: &Array, fill: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
    let dtype = dtype.unwrap_or_else(|| x.dtype());
    let value = native_value(&fill.into(), dtype)?;
    Ok(Array::from_raw(engine::full_like(x.raw(), value, Some(dtype))))
}

// =============================================================================
// Ranges and Identity
// =============================================================================

pub(crate) fn arange_with(
    start: Operand,
    stop: Operand,
    step: Operand,
    dtype: Option<DType>,
    defaults: Defaults,
) -> Result<Array> {
    let any_float = [&start, &stop, &step]
        .iter()
        .any(|o| matches!(o, Operand::Float(_)));
    let dtype = match dtype {
        Some(dtype) => dtype,
        None if any_float => defaults.float,
        None => defaults.int,
    };
    let value = |o: &Operand| match o {
        Operand::Int(i) => i64::try_from(*i)
            .map(Value::Int)
            .map_err(|_| rejected(Error::Overflow { value: i.to_string(), dtype: DType::I64 })),
        other => native_value(other, DType::F64),
    };
    let raw = engine::arange(value(&start)?, value(&stop)?, value(&step)?, dtype).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

/// Values from `start` towards `stop` (exclusive) spaced by `step`.
///
/// Integer inputs produce the default integer dtype, any float input the
/// default float dtype.
pub fn arange(
    start: impl Into<Operand>,
    stop: impl Into<Operand>,
    step: impl Into<Operand>,
    dtype: Option<DType>,
) -> Result<Array> {
    arange_with(start.into(), stop.into(), step.into(), dtype, Defaults::default())
}

/// `num` evenly spaced values over `[start, stop]`, or `[start, stop)`
/// without the endpoint.
pub fn linspace(start: f64, stop: f64, num: usize, dtype: Option<DType>, endpoint: bool) -> Result<Array> {
    let dtype = dtype.unwrap_or_else(DType::default_float);
    let raw = engine::linspace(start, stop, num, endpoint, dtype).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

/// A 2-D array with ones on the `k`-th diagonal (`float64` by default).
pub fn eye(n_rows: usize, n_cols: Option<usize>, k: isize, dtype: Option<DType>) -> Result<Array> {
    let dtype = dtype.unwrap_or_else(DType::default_float);
    let raw = engine::eye(n_rows, n_cols, k, dtype).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

// =============================================================================
// Tests
// =============================================================================
