//! Scalar Promotion - Class-Based Promotion of Native Operands
//!
//! Every binary operator takes its right-hand side as an `Operand`: either
//! a wrapped `Array` or a native Rust scalar. Native scalars are turned into
//! 0-dimensional arrays of the receiver's dtype, but only when the scalar's
//! kind matches the dtype class; the engine's value-dependent casting is
//! never consulted.
//!
//! # Key Features
//! - `Operand` tagged variant decided once at each operator entry
//! - Boolean, integer and floating promotion rules
//! - Range-checked integer conversion
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::{DType, DTypeClass, Error, Result, Value};
use arrayapi_engine::RawArray;

use crate::array::Array;
use crate::rejected;

// =============================================================================
// Operand
// =============================================================================

/// The right-hand side of an operator.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A native boolean.
    Bool(bool),
    /// A native integer of any width.
    Int(i128),
    /// A native float.
    Float(f64),
    /// A wrapped array.
    Array(Array),
    /// A value of a kind no operator accepts, named for diagnostics.
    Unsupported(&'static str),
}

impl Operand {
    /// Short name of the operand's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Array(_) => "Array",
            Self::Unsupported(name) => name,
        }
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_operand_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Self::Int(value as i128)
                }
            }
        )*
    };
}

impl_operand_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Array> for Operand {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl From<&Array> for Operand {
    fn from(array: &Array) -> Self {
        Self::Array(array.clone())
    }
}

impl From<&'static str> for Operand {
    fn from(_: &'static str) -> Self {
        Self::Unsupported("str")
    }
}

impl From<char> for Operand {
    fn from(_: char) -> Self {
        Self::Unsupported("char")
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// Converts a native scalar into a 0-d array of `target`.
///
/// Booleans need a boolean target, integers a non-boolean one and floats a
/// floating one. Integers outside an integer target's range overflow.
pub fn promote_scalar(scalar: &Operand, target: DType) -> Result<Array> {
    let raw = match (scalar, target.class()) {
        (Operand::Bool(b), DTypeClass::Boolean) => RawArray::scalar(Value::Bool(*b), target),
        (Operand::Bool(_), _) => {
            return Err(rejected(Error::type_error(
                "native bool scalars can only be promoted with bool arrays",
            )))
        }
        (Operand::Int(_), DTypeClass::Boolean) => {
            return Err(rejected(Error::type_error(
                "native int scalars cannot be promoted with bool arrays",
            )))
        }
        (Operand::Int(i), _) => RawArray::scalar_from_int(*i, target).map_err(rejected)?,
        (Operand::Float(f), DTypeClass::Floating) => RawArray::scalar(Value::Float(*f), target),
        (Operand::Float(_), _) => {
            return Err(rejected(Error::type_error(
                "native float scalars can only be promoted with floating-point arrays",
            )))
        }
        (other, _) => {
            return Err(rejected(Error::type_error(format!(
                "'scalar' must be a native scalar, got {}",
                other.kind()
            ))))
        }
    };
    Ok(Array::from_raw(raw))
}

impl Array {
    /// Converts a native scalar into a 0-d array of this array's dtype.
    pub fn promote_scalar(&self, scalar: &Operand) -> Result<Array> {
        promote_scalar(scalar, self.dtype())
    }

    /// Resolves an operator's right-hand side: arrays pass through, native
    /// scalars are promoted to this array's dtype.
    pub(crate) fn operand(&self, other: Operand) -> Result<Array> {
        match other {
            Operand::Array(array) => Ok(array),
            scalar => self.promote_scalar(&scalar),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
