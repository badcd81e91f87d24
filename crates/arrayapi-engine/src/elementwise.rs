//! Elementwise Operators - Broadcasting Arithmetic, Comparison and Bitwise Kernels
//!
//! Implements every operator the engine exposes on raw arrays. The result
//! dtype is chosen by value-based promotion; the kernel dtype may differ
//! from it where `NumPy` computes booleans and integer divisions in a wider
//! type. Results of operations whose inputs are all 0-dimensional are bare
//! scalars.
//!
//! # Key Features
//! - Binary operators with broadcasting (`BinaryOp`)
//! - Unary operators (`UnaryOp`)
//! - In-place operators with shape and `same_kind` checks
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::dtype::{Bitwise, DType, DTypeClass, Numeric, Shift};
use arrayapi_core::error::{Error, Result};

use crate::promotion::{can_cast_same_kind, result_type};
use crate::raw::{dispatch_all, dispatch_integer, dispatch_numeric, RawArray, RawElement, RawValue};
use crate::tensor::Tensor;

// =============================================================================
// Operator Enums
// =============================================================================

/// Binary operators understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Subtract,
    /// `a * b`.
    Multiply,
    /// `a / b`.
    TrueDivide,
    /// `a // b`.
    FloorDivide,
    /// `a % b`.
    Remainder,
    /// `a ** b`.
    Power,
    /// `a @ b`.
    MatMul,
    /// `a == b`.
    Equal,
    /// `a != b`.
    NotEqual,
    /// `a < b`.
    Less,
    /// `a <= b`.
    LessEqual,
    /// `a > b`.
    Greater,
    /// `a >= b`.
    GreaterEqual,
    /// `a & b`.
    BitAnd,
    /// `a | b`.
    BitOr,
    /// `a ^ b`.
    BitXor,
    /// `a << b`.
    LeftShift,
    /// `a >> b`.
    RightShift,
}

impl BinaryOp {
    /// The ufunc-style name of the operator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::TrueDivide => "true_divide",
            Self::FloorDivide => "floor_divide",
            Self::Remainder => "remainder",
            Self::Power => "power",
            Self::MatMul => "matmul",
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::Less => "less",
            Self::LessEqual => "less_equal",
            Self::Greater => "greater",
            Self::GreaterEqual => "greater_equal",
            Self::BitAnd => "bitwise_and",
            Self::BitOr => "bitwise_or",
            Self::BitXor => "bitwise_xor",
            Self::LeftShift => "left_shift",
            Self::RightShift => "right_shift",
        }
    }

    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
        )
    }
}

/// Unary operators understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-a`.
    Negative,
    /// `+a`.
    Positive,
    /// `abs(a)`.
    Absolute,
    /// `~a`.
    Invert,
}

impl UnaryOp {
    /// The ufunc-style name of the operator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
            Self::Absolute => "absolute",
            Self::Invert => "invert",
        }
    }
}

fn unsupported(op: &str, dtype: DType) -> Error {
    Error::type_error(format!(
        "ufunc '{op}' not supported for the input types (dtype {dtype})"
    ))
}

// =============================================================================
// Typed Kernels
// =============================================================================

fn arithmetic<T: Numeric + RawElement>(lhs: &RawArray, rhs: &RawArray, op: BinaryOp) -> Result<RawArray> {
    let a = lhs.typed::<T>();
    let b = rhs.typed::<T>();
    let out = match op {
        BinaryOp::Add => a.zip_map(&b, T::plus)?,
        BinaryOp::Subtract => a.zip_map(&b, T::minus)?,
        BinaryOp::Multiply => a.zip_map(&b, T::times)?,
        BinaryOp::FloorDivide => a.zip_map(&b, T::floor_div)?,
        BinaryOp::Remainder => a.zip_map(&b, T::modulo)?,
        BinaryOp::Power => a.try_zip_map(&b, T::power)?,
        BinaryOp::MatMul => a.matmul(&b)?,
        _ => return Err(unsupported(op.name(), T::DTYPE)),
    };
    Ok(out.into())
}

fn compare<T: RawElement>(lhs: &RawArray, rhs: &RawArray, op: BinaryOp) -> Result<RawArray> {
    let a = lhs.typed::<T>();
    let b = rhs.typed::<T>();
    let out: Tensor<bool> = match op {
        BinaryOp::Equal => a.zip_map(&b, |x, y| x == y)?,
        BinaryOp::NotEqual => a.zip_map(&b, |x, y| x != y)?,
        BinaryOp::Less => a.zip_map(&b, |x, y| x < y)?,
        BinaryOp::LessEqual => a.zip_map(&b, |x, y| x <= y)?,
        BinaryOp::Greater => a.zip_map(&b, |x, y| x > y)?,
        BinaryOp::GreaterEqual => a.zip_map(&b, |x, y| x >= y)?,
        _ => return Err(unsupported(op.name(), T::DTYPE)),
    };
    Ok(out.into())
}

fn bitwise<T: Bitwise + RawElement>(lhs: &RawArray, rhs: &RawArray, op: BinaryOp) -> Result<RawArray> {
    let a = lhs.typed::<T>();
    let b = rhs.typed::<T>();
    let out = match op {
        BinaryOp::BitAnd => a.zip_map(&b, T::bit_and)?,
        BinaryOp::BitOr => a.zip_map(&b, T::bit_or)?,
        BinaryOp::BitXor => a.zip_map(&b, T::bit_xor)?,
        _ => return Err(unsupported(op.name(), T::DTYPE)),
    };
    Ok(out.into())
}

fn shift<T: Shift + RawElement>(lhs: &RawArray, rhs: &RawArray, op: BinaryOp) -> Result<RawArray> {
    let a = lhs.typed::<T>();
    let b = rhs.typed::<T>();
    let out = match op {
        BinaryOp::LeftShift => a.zip_map(&b, T::shift_left)?,
        BinaryOp::RightShift => a.zip_map(&b, T::shift_right)?,
        _ => return Err(unsupported(op.name(), T::DTYPE)),
    };
    Ok(out.into())
}

fn true_divide(lhs: &RawArray, rhs: &RawArray, dtype: DType) -> Result<RawArray> {
    if dtype == DType::F32 {
        Ok(lhs.typed::<f32>().zip_map(&rhs.typed::<f32>(), |x, y| x / y)?.into())
    } else {
        Ok(lhs.typed::<f64>().zip_map(&rhs.typed::<f64>(), |x, y| x / y)?.into())
    }
}

fn bool_matmul(lhs: &RawArray, rhs: &RawArray) -> Result<RawArray> {
    let product = lhs.typed::<i64>().matmul(&rhs.typed::<i64>())?;
    Ok(product.map(|v| v != 0).into())
}

// =============================================================================
// Binary Operators
// =============================================================================

impl RawArray {
    /// Applies a binary operator with broadcasting.
    ///
    /// Both operands 0-dimensional yields a bare scalar.
    pub fn binary(&self, op: BinaryOp, other: &Self) -> Result<RawValue> {
        let dtype = result_type(self, other);
        tracing::trace!(op = op.name(), lhs = %self.dtype(), rhs = %other.dtype(), result = %dtype, "engine binary op");

        let out = match op {
            BinaryOp::Add | BinaryOp::Multiply if dtype == DType::Bool => {
                let logical = if op == BinaryOp::Add {
                    BinaryOp::BitOr
                } else {
                    BinaryOp::BitAnd
                };
                bitwise::<bool>(self, other, logical)?
            }
            BinaryOp::Subtract if dtype == DType::Bool => {
                return Err(Error::type_error(
                    "numpy boolean subtract, the `-` operator, is not supported, use the bitwise_xor, the `^` operator, or the logical_xor function instead.",
                ));
            }
            BinaryOp::MatMul if dtype == DType::Bool => bool_matmul(self, other)?,
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::FloorDivide
            | BinaryOp::Remainder
            | BinaryOp::Power
            | BinaryOp::MatMul => {
                let kernel = if dtype == DType::Bool { DType::I8 } else { dtype };
                dispatch_numeric!(kernel, T => arithmetic::<T>(self, other, op)?, bool => return Err(unsupported(op.name(), kernel)))
            }
            BinaryOp::TrueDivide => {
                let kernel = if dtype.is_float() { dtype } else { DType::F64 };
                true_divide(self, other, kernel)?
            }
            op if op.is_comparison() => {
                dispatch_all!(dtype, T => compare::<T>(self, other, op)?)
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => match dtype.class() {
                DTypeClass::Boolean => bitwise::<bool>(self, other, op)?,
                DTypeClass::Integer => {
                    dispatch_integer!(dtype, T => bitwise::<T>(self, other, op)?, _ => return Err(unsupported(op.name(), dtype)))
                }
                DTypeClass::Floating => return Err(unsupported(op.name(), dtype)),
            },
            _ => {
                let kernel = if dtype == DType::Bool { DType::I8 } else { dtype };
                dispatch_integer!(kernel, T => shift::<T>(self, other, op)?, _ => return Err(unsupported(op.name(), dtype)))
            }
        };

        Ok(RawValue::from_array(out, self.ndim() == 0 && other.ndim() == 0))
    }

    /// Applies a binary operator in place, storing into `self`.
    ///
    /// The broadcast result must have exactly `self`'s shape and its dtype
    /// must cast to `self`'s dtype under the `same_kind` rule.
    pub fn binary_inplace(&self, op: BinaryOp, other: &Self) -> Result<()> {
        let result = self.binary(op, other)?.into_array();

        if result.shape() != self.shape() {
            return Err(Error::value(format!(
                "non-broadcastable output operand with shape {:?} doesn't match the broadcast shape {:?}",
                self.shape(),
                result.shape()
            )));
        }
        if !can_cast_same_kind(result.dtype(), self.dtype()) {
            return Err(Error::type_error(format!(
                "Cannot cast ufunc '{}' output from dtype('{}') to dtype('{}') with casting rule 'same_kind'",
                op.name(),
                result.dtype(),
                self.dtype()
            )));
        }

        self.assign(&result)
    }

    // =========================================================================
    // Unary Operators
    // =========================================================================

    /// Applies a unary operator; a 0-d input yields a bare scalar.
    pub fn unary(&self, op: UnaryOp) -> Result<RawValue> {
        let dtype = self.dtype();
        let out: Self = match (op, dtype) {
            (UnaryOp::Negative, DType::Bool) => {
                return Err(Error::type_error(
                    "The numpy boolean negative, the `-` operator, is not supported, use the `~` operator or the logical_not function instead.",
                ));
            }
            (UnaryOp::Positive, DType::Bool) => return Err(unsupported(op.name(), dtype)),
            (UnaryOp::Absolute, DType::Bool) => self.deep_copy(),
            (UnaryOp::Invert, DType::Bool) => self.typed::<bool>().map(|v| !v).into(),
            (UnaryOp::Invert, _) => {
                dispatch_integer!(dtype, T => self.typed::<T>().map(Bitwise::bit_not).into(), _ => return Err(unsupported(op.name(), dtype)))
            }
            (UnaryOp::Negative, _) => {
                dispatch_numeric!(dtype, T => self.typed::<T>().map(Numeric::negate).into(), bool => return Err(unsupported(op.name(), dtype)))
            }
            (UnaryOp::Absolute, _) => {
                dispatch_numeric!(dtype, T => self.typed::<T>().map(Numeric::absolute).into(), bool => return Err(unsupported(op.name(), dtype)))
            }
            (UnaryOp::Positive, _) => self.deep_copy(),
        };

        Ok(RawValue::from_array(out, self.ndim() == 0))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrayapi_core::Value;

    fn ints(data: Vec<i64>) -> RawArray {
        let n = data.len();
        RawArray::from_vec(data, &[n]).unwrap()
    }

    #[test]
    fn test_add_broadcast() {
        let a = RawArray::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
        let b = RawArray::from_vec(vec![10i32, 20], &[2]).unwrap();
        let c = a.binary(BinaryOp::Add, &b).unwrap().into_array();
        assert_eq!(c.dtype(), DType::I32);
        assert_eq!(
            c.values(),
            vec![Value::Int(11), Value::Int(22), Value::Int(13), Value::Int(24)]
        );
    }

    #[test]
    fn test_value_based_scalar_operand() {
        let a = RawArray::from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
        let s = RawArray::scalar(Value::Float(0.5), DType::F64);
        let c = a.binary(BinaryOp::Add, &s).unwrap().into_array();
        assert_eq!(c.dtype(), DType::F32);
    }

    #[test]
    fn test_scalar_inputs_give_bare_scalar() {
        let a = RawArray::scalar(Value::Int(2), DType::I64);
        let b = RawArray::scalar(Value::Int(3), DType::I64);
        let c = a.binary(BinaryOp::Multiply, &b).unwrap();
        assert!(c.is_scalar());
        assert_eq!(c.into_array().scalar_value(), Some(Value::Int(6)));
    }

    #[test]
    fn test_bool_arithmetic() {
        let a = RawArray::from_vec(vec![true, false], &[2]).unwrap();
        let b = RawArray::from_vec(vec![true, true], &[2]).unwrap();
        let sum = a.binary(BinaryOp::Add, &b).unwrap().into_array();
        assert_eq!(sum.dtype(), DType::Bool);
        assert!(a.binary(BinaryOp::Subtract, &b).is_err());
        let q = a.binary(BinaryOp::FloorDivide, &b).unwrap().into_array();
        assert_eq!(q.dtype(), DType::I8);
    }

    #[test]
    fn test_true_divide_ints() {
        let c = ints(vec![1, 3])
            .binary(BinaryOp::TrueDivide, &ints(vec![2, 2]))
            .unwrap()
            .into_array();
        assert_eq!(c.dtype(), DType::F64);
        assert_eq!(c.values(), vec![Value::Float(0.5), Value::Float(1.5)]);
    }

    #[test]
    fn test_comparison() {
        let c = ints(vec![1, 5])
            .binary(BinaryOp::Less, &ints(vec![3, 3]))
            .unwrap()
            .into_array();
        assert_eq!(c.dtype(), DType::Bool);
        assert_eq!(c.values(), vec![Value::Bool(true), Value::Bool(false)]);
    }

    #[test]
    fn test_bitwise_rejects_floats() {
        let f = RawArray::from_vec(vec![1.0f64], &[1]).unwrap();
        assert!(f.binary(BinaryOp::BitAnd, &f).unwrap_err().is_type_error());
        assert!(f.binary(BinaryOp::LeftShift, &f).unwrap_err().is_type_error());
    }

    #[test]
    fn test_shift_promotes_with_value() {
        let a = RawArray::from_vec(vec![1u8, 2], &[2]).unwrap();
        let s = RawArray::scalar(Value::Int(3), DType::I64);
        let c = a.binary(BinaryOp::LeftShift, &s).unwrap().into_array();
        assert_eq!(c.dtype(), DType::U8);
        assert_eq!(c.values(), vec![Value::UInt(8), Value::UInt(16)]);
    }

    #[test]
    fn test_inplace_shape_and_kind() {
        let a = ints(vec![1, 2, 3]);
        let alias = a.expand_dims(0).unwrap();
        a.binary_inplace(BinaryOp::Add, &ints(vec![1, 1, 1])).unwrap();
        assert_eq!(alias.values(), vec![Value::Int(2), Value::Int(3), Value::Int(4)]);

        let wide = RawArray::from_vec(vec![1i64; 6], &[2, 3]).unwrap();
        assert!(a.binary_inplace(BinaryOp::Add, &wide).unwrap_err().is_value_error());

        let floats = RawArray::from_vec(vec![0.5f64; 3], &[3]).unwrap();
        assert!(a.binary_inplace(BinaryOp::Add, &floats).unwrap_err().is_type_error());
    }

    #[test]
    fn test_inplace_self_alias() {
        let a = ints(vec![1, 2, 3]);
        a.binary_inplace(BinaryOp::Add, &a.clone()).unwrap();
        assert_eq!(a.values(), vec![Value::Int(2), Value::Int(4), Value::Int(6)]);
    }

    #[test]
    fn test_unary() {
        let a = ints(vec![-1, 2]);
        let n = a.unary(UnaryOp::Negative).unwrap().into_array();
        assert_eq!(n.values(), vec![Value::Int(1), Value::Int(-2)]);
        let i = a.unary(UnaryOp::Invert).unwrap().into_array();
        assert_eq!(i.values(), vec![Value::Int(0), Value::Int(-3)]);

        let b = RawArray::from_vec(vec![true], &[1]).unwrap();
        assert!(b.unary(UnaryOp::Negative).is_err());
        let f = RawArray::from_vec(vec![1.5f32], &[1]).unwrap();
        assert!(f.unary(UnaryOp::Invert).is_err());
    }

    #[test]
    fn test_integer_power_negative_exponent() {
        assert!(ints(vec![2])
            .binary(BinaryOp::Power, &ints(vec![-1]))
            .unwrap_err()
            .is_value_error());
    }
}
