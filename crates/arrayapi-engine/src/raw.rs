//! Raw Arrays - Dtype-Erased Engine Handles
//!
//! `RawArray` wraps a `Tensor<T>` for every registered element type so that
//! the dtype becomes a runtime property. All engine entry points (operators,
//! indexing, manipulation) take and return raw arrays; operations on
//! 0-dimensional inputs may instead produce a bare `Scalar`.
//!
//! # Key Features
//! - One enum variant per registered dtype
//! - Dispatch macros selecting the element type from a runtime `DType`
//! - Unsafe (`as`) casting between any two dtypes
//! - `NumPy`-style repr formatting
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use arrayapi_core::dtype::{DType, Element, Value};
use arrayapi_core::error::Result;
use arrayapi_core::Device;

use crate::shape::numel;
use crate::tensor::Tensor;

// =============================================================================
// Dispatch Macros
// =============================================================================

/// Binds the typed tensor inside a `RawArray` and evaluates `$body`.
macro_rules! with_tensor {
    ($raw:expr, $t:ident => $body:expr) => {
        match $raw {
            $crate::raw::RawArray::Bool($t) => $body,
            $crate::raw::RawArray::I8($t) => $body,
            $crate::raw::RawArray::I16($t) => $body,
            $crate::raw::RawArray::I32($t) => $body,
            $crate::raw::RawArray::I64($t) => $body,
            $crate::raw::RawArray::U8($t) => $body,
            $crate::raw::RawArray::U16($t) => $body,
            $crate::raw::RawArray::U32($t) => $body,
            $crate::raw::RawArray::U64($t) => $body,
            $crate::raw::RawArray::F32($t) => $body,
            $crate::raw::RawArray::F64($t) => $body,
        }
    };
}

/// Evaluates `$body` with `$T` aliased to the element type of any dtype.
macro_rules! dispatch_all {
    ($dtype:expr, $T:ident => $body:expr) => {
        match $dtype {
            arrayapi_core::DType::Bool => {
                type $T = bool;
                $body
            }
            arrayapi_core::DType::I8 => {
                type $T = i8;
                $body
            }
            arrayapi_core::DType::I16 => {
                type $T = i16;
                $body
            }
            arrayapi_core::DType::I32 => {
                type $T = i32;
                $body
            }
            arrayapi_core::DType::I64 => {
                type $T = i64;
                $body
            }
            arrayapi_core::DType::U8 => {
                type $T = u8;
                $body
            }
            arrayapi_core::DType::U16 => {
                type $T = u16;
                $body
            }
            arrayapi_core::DType::U32 => {
                type $T = u32;
                $body
            }
            arrayapi_core::DType::U64 => {
                type $T = u64;
                $body
            }
            arrayapi_core::DType::F32 => {
                type $T = f32;
                $body
            }
            arrayapi_core::DType::F64 => {
                type $T = f64;
                $body
            }
        }
    };
}

/// Like `dispatch_all!` for integer and floating dtypes; `bool` takes `$other`.
macro_rules! dispatch_numeric {
    ($dtype:expr, $T:ident => $body:expr, bool => $other:expr) => {
        match $dtype {
            arrayapi_core::DType::Bool => $other,
            arrayapi_core::DType::I8 => {
                type $T = i8;
                $body
            }
            arrayapi_core::DType::I16 => {
                type $T = i16;
                $body
            }
            arrayapi_core::DType::I32 => {
                type $T = i32;
                $body
            }
            arrayapi_core::DType::I64 => {
                type $T = i64;
                $body
            }
            arrayapi_core::DType::U8 => {
                type $T = u8;
                $body
            }
            arrayapi_core::DType::U16 => {
                type $T = u16;
                $body
            }
            arrayapi_core::DType::U32 => {
                type $T = u32;
                $body
            }
            arrayapi_core::DType::U64 => {
                type $T = u64;
                $body
            }
            arrayapi_core::DType::F32 => {
                type $T = f32;
                $body
            }
            arrayapi_core::DType::F64 => {
                type $T = f64;
                $body
            }
        }
    };
}

/// Like `dispatch_all!` for integer dtypes; other dtypes take `$other`.
macro_rules! dispatch_integer {
    ($dtype:expr, $T:ident => $body:expr, _ => $other:expr) => {
        match $dtype {
            arrayapi_core::DType::I8 => {
                type $T = i8;
                $body
            }
            arrayapi_core::DType::I16 => {
                type $T = i16;
                $body
            }
            arrayapi_core::DType::I32 => {
                type $T = i32;
                $body
            }
            arrayapi_core::DType::I64 => {
                type $T = i64;
                $body
            }
            arrayapi_core::DType::U8 => {
                type $T = u8;
                $body
            }
            arrayapi_core::DType::U16 => {
                type $T = u16;
                $body
            }
            arrayapi_core::DType::U32 => {
                type $T = u32;
                $body
            }
            arrayapi_core::DType::U64 => {
                type $T = u64;
                $body
            }
            _ => $other,
        }
    };
}

pub(crate) use {dispatch_all, dispatch_integer, dispatch_numeric, with_tensor};

// =============================================================================
// RawElement Trait
// =============================================================================

/// Element types that have a `RawArray` variant.
pub trait RawElement: Element {
    /// Wraps a typed tensor.
    fn wrap(tensor: Tensor<Self>) -> RawArray;

    /// Borrows the typed tensor when the variant matches.
    fn unwrap_ref(raw: &RawArray) -> Option<&Tensor<Self>>;
}

macro_rules! impl_raw_element {
    ($ty:ty, $variant:ident) => {
        impl RawElement for $ty {
            fn wrap(tensor: Tensor<Self>) -> RawArray {
                RawArray::$variant(tensor)
            }

            fn unwrap_ref(raw: &RawArray) -> Option<&Tensor<Self>> {
                match raw {
                    RawArray::$variant(t) => Some(t),
                    _ => None,
                }
            }
        }
    };
}

impl_raw_element!(bool, Bool);
impl_raw_element!(i8, I8);
impl_raw_element!(i16, I16);
impl_raw_element!(i32, I32);
impl_raw_element!(i64, I64);
impl_raw_element!(u8, U8);
impl_raw_element!(u16, U16);
impl_raw_element!(u32, U32);
impl_raw_element!(u64, U64);
impl_raw_element!(f32, F32);
impl_raw_element!(f64, F64);

// =============================================================================
// RawArray Enum
// =============================================================================

/// A dtype-erased engine array.
#[derive(Clone)]
pub enum RawArray {
    /// `bool` elements.
    Bool(Tensor<bool>),
    /// `int8` elements.
    I8(Tensor<i8>),
    /// `int16` elements.
    I16(Tensor<i16>),
    /// `int32` elements.
    I32(Tensor<i32>),
    /// `int64` elements.
    I64(Tensor<i64>),
    /// `uint8` elements.
    U8(Tensor<u8>),
    /// `uint16` elements.
    U16(Tensor<u16>),
    /// `uint32` elements.
    U32(Tensor<u32>),
    /// `uint64` elements.
    U64(Tensor<u64>),
    /// `float32` elements.
    F32(Tensor<f32>),
    /// `float64` elements.
    F64(Tensor<f64>),
}

impl<T: RawElement> From<Tensor<T>> for RawArray {
    fn from(tensor: Tensor<T>) -> Self {
        T::wrap(tensor)
    }
}

impl RawArray {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an array from a vector with the given shape.
    pub fn from_vec<T: RawElement>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Ok(Tensor::from_vec(data, shape)?.into())
    }

    /// Creates an array of `dtype` filled with `value` (cast with `as`).
    #[must_use]
    pub fn full(shape: &[usize], value: Value, dtype: DType) -> Self {
        dispatch_all!(dtype, T => Tensor::<T>::full(shape, T::from_value(value)).into())
    }

    /// Creates a 0-d array of `dtype` holding `value` (cast with `as`).
    #[must_use]
    pub fn scalar(value: Value, dtype: DType) -> Self {
        Self::full(&[], value, dtype)
    }

    /// Creates a 0-d integer or float array, raising `Overflow` when the
    /// value does not fit an integer `dtype`.
    pub fn scalar_from_int(value: i128, dtype: DType) -> Result<Self> {
        Ok(Self::scalar(Value::from_int_checked(value, dtype)?, dtype))
    }

    /// Creates an array of `dtype` from erased values.
    pub fn from_values(values: &[Value], shape: &[usize], dtype: DType) -> Result<Self> {
        dispatch_all!(dtype, T => {
            let data: Vec<T> = values.iter().map(|&v| T::from_value(v)).collect();
            Self::from_vec(data, shape)
        })
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the element dtype.
    #[must_use]
    pub fn dtype(&self) -> DType {
        with_tensor!(self, t => t.dtype())
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        with_tensor!(self, t => t.shape())
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(self.shape())
    }

    /// Returns the device holding the buffer.
    #[must_use]
    pub fn device(&self) -> Device {
        with_tensor!(self, t => t.device())
    }

    /// Returns true if both arrays view the same allocation.
    #[must_use]
    pub fn shares_buffer(&self, other: &Self) -> bool {
        with_tensor!(self, t => same_buffer(t, other))
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns every element as an erased value in C order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        with_tensor!(self, t => t.to_vec().into_iter().map(Element::to_value).collect())
    }

    /// Returns the only element of a single-element array.
    pub fn item_value(&self) -> Result<Value> {
        with_tensor!(self, t => t.item().map(Element::to_value))
    }

    /// Returns the element of a 0-d array.
    #[must_use]
    pub fn scalar_value(&self) -> Option<Value> {
        if self.ndim() == 0 {
            self.item_value().ok()
        } else {
            None
        }
    }

    /// Returns the tensor of element type `T`, casting when the dtype differs.
    #[must_use]
    pub fn typed<T: RawElement>(&self) -> Tensor<T> {
        match T::unwrap_ref(self) {
            Some(t) => t.clone(),
            None => with_tensor!(self, t => t.cast::<T>()),
        }
    }

    /// Returns a copy converted to `dtype` with `as` casting.
    #[must_use]
    pub fn astype(&self, dtype: DType) -> Self {
        dispatch_all!(dtype, T => with_tensor!(self, t => t.cast::<T>().into()))
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Reshapes, as a view when the layout allows it.
    pub fn reshape(&self, shape: &[isize]) -> Result<Self> {
        with_tensor!(self, t => Ok(t.reshape(shape)?.into()))
    }

    /// Inserts an axis of size 1.
    pub fn expand_dims(&self, axis: usize) -> Result<Self> {
        with_tensor!(self, t => Ok(t.expand_dims(axis)?.into()))
    }

    /// Removes the given size-1 axes.
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Self> {
        with_tensor!(self, t => Ok(t.squeeze_axes(axes)?.into()))
    }

    /// Reorders axes.
    pub fn permute(&self, axes: &[usize]) -> Result<Self> {
        with_tensor!(self, t => Ok(t.permute(axes)?.into()))
    }

    /// Reverses the order of all axes.
    #[must_use]
    pub fn reversed_axes(&self) -> Self {
        with_tensor!(self, t => t.reversed_axes().into())
    }

    /// Reverses element order along the given axes.
    #[must_use]
    pub fn flip_axes(&self, axes: &[usize]) -> Self {
        with_tensor!(self, t => t.flip_axes(axes).into())
    }

    /// Broadcasts to `shape` as a view.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        with_tensor!(self, t => Ok(t.broadcast_to(shape)?.into()))
    }

    /// Copies into a fresh contiguous buffer.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        with_tensor!(self, t => t.deep_copy().into())
    }

    /// Writes `src` into this array, broadcasting it and casting it to this
    /// array's dtype with `as` semantics.
    pub fn assign(&self, src: &Self) -> Result<()> {
        with_tensor!(self, t => t.assign(&src.typed()))
    }
}

// =============================================================================
// Bare Scalars
// =============================================================================

/// A bare engine scalar, as produced by fully indexing an array or by
/// operators whose inputs are all 0-dimensional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    /// The element value.
    pub value: Value,
    /// The element dtype.
    pub dtype: DType,
}

impl Scalar {
    /// Converts into a 0-d array.
    #[must_use]
    pub fn into_array(self) -> RawArray {
        RawArray::scalar(self.value, self.dtype)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// The result of an engine operation: an array or a bare scalar.
#[derive(Debug, Clone)]
pub enum RawValue {
    /// An n-dimensional result.
    Array(RawArray),
    /// A bare scalar result.
    Scalar(Scalar),
}

impl RawValue {
    /// Wraps a result, turning 0-d arrays into bare scalars when `bare`.
    #[must_use]
    pub fn from_array(array: RawArray, bare: bool) -> Self {
        match array.scalar_value() {
            Some(value) if bare => Self::Scalar(Scalar {
                value,
                dtype: array.dtype(),
            }),
            _ => Self::Array(array),
        }
    }

    /// Converts into an array, collapsing bare scalars into 0-d arrays.
    #[must_use]
    pub fn into_array(self) -> RawArray {
        match self {
            Self::Array(array) => array,
            Self::Scalar(scalar) => scalar.into_array(),
        }
    }

    /// Returns true for a bare scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

fn same_buffer<T: RawElement>(tensor: &Tensor<T>, other: &RawArray) -> bool {
    T::unwrap_ref(other).is_some_and(|o| tensor.shares_buffer(o))
}

// =============================================================================
// Display Implementation
// =============================================================================

fn write_nested(f: &mut fmt::Formatter<'_>, values: &[Value], shape: &[usize]) -> fmt::Result {
    if shape.is_empty() {
        return write!(f, "{}", values[0]);
    }

    write!(f, "[")?;
    let chunk = numel(&shape[1..]);
    for i in 0..shape[0] {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_nested(f, &values[i * chunk..(i + 1) * chunk], &shape[1..])?;
    }
    write!(f, "]")
}

impl fmt::Display for RawArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array(")?;
        write_nested(f, &self.values(), self.shape())?;
        write!(f, ", dtype={})", self.dtype())
    }
}

impl fmt::Debug for RawArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// =============================================================================
// Tests
// =============================================================================
