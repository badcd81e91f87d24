//! Operator Dispatch - Named Operators on `Array`
//!
//! Each operator resolves its right-hand side into an `Array` (promoting
//! native scalars to the receiver's dtype), applies the operator's own rule
//! and then hands the engine handles over:
//! - arithmetic, comparison and bitwise operators normalize 0-d operands
//! - division and power require floating-point operands
//! - shifts keep the left operand's dtype and skip normalization
//! - in-place operators write through the receiver's buffer
//!
//! # Key Features
//! - Forward, reflected and in-place binary operators
//! - Unary operators
//! - Validated indexing (`get`) and item assignment (`set`)
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::{Error, Result};
use arrayapi_engine::{BinaryOp, UnaryOp};

use crate::array::Array;
use crate::creation::asarray;
use crate::elementwise::{pow, require_floating};
use crate::index::{validate_index, Index};
use crate::normalize::normalize_two_args;
use crate::rejected;
use crate::scalar::Operand;

// =============================================================================
// Operator Plumbing
// =============================================================================

impl Array {
    /// `lhs op rhs` with 0-d normalization.
    fn normalized(lhs: &Array, op: BinaryOp, rhs: &Array) -> Result<Array> {
        tracing::trace!(op = op.name(), lhs = %lhs.dtype(), rhs = %rhs.dtype(), "dispatching binary op");
        let (a, b) = normalize_two_args(lhs, rhs)?;
        let out = a.raw().binary(op, b.raw()).map_err(rejected)?;
        Ok(Array::from_value(out))
    }

    /// `lhs op rhs` as the engine sees it.
    fn direct(lhs: &Array, op: BinaryOp, rhs: &Array) -> Result<Array> {
        tracing::trace!(op = op.name(), lhs = %lhs.dtype(), rhs = %rhs.dtype(), "dispatching binary op");
        let out = lhs.raw().binary(op, rhs.raw()).map_err(rejected)?;
        Ok(Array::from_value(out))
    }

    /// A shift whose result takes the left operand's dtype.
    fn shift(lhs: &Array, op: BinaryOp, rhs: &Array) -> Result<Array> {
        let out = Self::direct(lhs, op, rhs)?;
        Ok(Array::from_raw(out.raw().astype(lhs.dtype())))
    }

    fn binary(&self, op: BinaryOp, other: Operand) -> Result<Array> {
        let other = self.operand(other)?;
        Self::normalized(self, op, &other)
    }

    fn reflected(&self, op: BinaryOp, other: Operand) -> Result<Array> {
        let other = self.operand(other)?;
        Self::normalized(&other, op, self)
    }

    fn inplace(&mut self, op: BinaryOp, other: Operand) -> Result<&mut Self> {
        let other = self.operand(other)?;
        tracing::trace!(op = op.name(), lhs = %self.dtype(), rhs = %other.dtype(), "dispatching in-place op");
        self.raw().binary_inplace(op, other.raw()).map_err(rejected)?;
        Ok(self)
    }

    fn unary(&self, op: UnaryOp) -> Result<Array> {
        Ok(Array::from_value(self.raw().unary(op).map_err(rejected)?))
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// `self + other`.
    pub fn add(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Add, other.into())
    }

    /// `self - other`.
    pub fn sub(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Subtract, other.into())
    }

    /// `self * other`.
    pub fn mul(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Multiply, other.into())
    }

    /// `self / other`; both operands must be floating point.
    pub fn div(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        require_floating(self, &other, "div")?;
        Self::normalized(self, BinaryOp::TrueDivide, &other)
    }

    /// `self // other`.
    pub fn floor_div(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::FloorDivide, other.into())
    }

    /// `self % other`.
    pub fn rem(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Remainder, other.into())
    }

    /// `self ** other`; both operands must be floating point.
    pub fn pow(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        pow(self, &other)
    }

    /// `self @ other`.
    pub fn matmul(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::direct(self, BinaryOp::MatMul, &other)
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// `self == other`, elementwise.
    pub fn equal(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Equal, other.into())
    }

    /// `self != other`, elementwise.
    pub fn not_equal(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::NotEqual, other.into())
    }

    /// `self < other`, elementwise.
    pub fn less(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Less, other.into())
    }

    /// `self <= other`, elementwise.
    pub fn less_equal(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::LessEqual, other.into())
    }

    /// `self > other`, elementwise.
    pub fn greater(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::Greater, other.into())
    }

    /// `self >= other`, elementwise.
    pub fn greater_equal(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::GreaterEqual, other.into())
    }

    // =========================================================================
    // Bitwise
    // =========================================================================

    /// `self & other`.
    pub fn bitand(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::BitAnd, other.into())
    }

    /// `self | other`.
    pub fn bitor(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::BitOr, other.into())
    }

    /// `self ^ other`.
    pub fn bitxor(&self, other: impl Into<Operand>) -> Result<Array> {
        self.binary(BinaryOp::BitXor, other.into())
    }

    /// `self << other`, in `self`'s dtype.
    pub fn shl(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::shift(self, BinaryOp::LeftShift, &other)
    }

    /// `self >> other`, in `self`'s dtype.
    pub fn shr(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::shift(self, BinaryOp::RightShift, &other)
    }

    // =========================================================================
    // Reflected
    // =========================================================================

    /// `other + self`.
    pub fn radd(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::Add, other.into())
    }

    /// `other - self`.
    pub fn rsub(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::Subtract, other.into())
    }

    /// `other * self`.
    pub fn rmul(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::Multiply, other.into())
    }

    /// `other / self`; both operands must be floating point.
    pub fn rdiv(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        require_floating(self, &other, "rdiv")?;
        Self::normalized(&other, BinaryOp::TrueDivide, self)
    }

    /// `other // self`.
    pub fn rfloor_div(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::FloorDivide, other.into())
    }

    /// `other % self`.
    pub fn rrem(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::Remainder, other.into())
    }

    /// `other ** self`; both operands must be floating point.
    pub fn rpow(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        pow(&other, self)
    }

    /// `other @ self`.
    pub fn rmatmul(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::direct(&other, BinaryOp::MatMul, self)
    }

    /// `other & self`.
    pub fn rbitand(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::BitAnd, other.into())
    }

    /// `other | self`.
    pub fn rbitor(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::BitOr, other.into())
    }

    /// `other ^ self`.
    pub fn rbitxor(&self, other: impl Into<Operand>) -> Result<Array> {
        self.reflected(BinaryOp::BitXor, other.into())
    }

    /// `other << self`, in `other`'s dtype.
    pub fn rshl(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::shift(&other, BinaryOp::LeftShift, self)
    }

    /// `other >> self`, in `other`'s dtype.
    pub fn rshr(&self, other: impl Into<Operand>) -> Result<Array> {
        let other = self.operand(other.into())?;
        Self::shift(&other, BinaryOp::RightShift, self)
    }

    // =========================================================================
    // In-Place
    // =========================================================================

    /// `self += other`.
    pub fn add_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::Add, other.into())
    }

    /// `self -= other`.
    pub fn sub_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::Subtract, other.into())
    }

    /// `self *= other`.
    pub fn mul_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::Multiply, other.into())
    }

    /// `self /= other`; both operands must be floating point.
    pub fn div_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        let other = self.operand(other.into())?;
        require_floating(self, &other, "div_assign")?;
        self.inplace(BinaryOp::TrueDivide, other.into())
    }

    /// `self //= other`.
    pub fn floor_div_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::FloorDivide, other.into())
    }

    /// `self %= other`.
    pub fn rem_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::Remainder, other.into())
    }

    /// `self **= other`; both operands must be floating point.
    pub fn pow_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        let other = self.operand(other.into())?;
        require_floating(self, &other, "pow_assign")?;
        self.inplace(BinaryOp::Power, other.into())
    }

    /// `self @= other`.
    ///
    /// Both operands need a dimension, and `other` must be a square matrix
    /// (or a stack of them) so the receiver keeps its shape.
    pub fn matmul_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        let other = self.operand(other.into())?;
        if self.ndim() == 0 || other.ndim() == 0 {
            return Err(rejected(Error::value(
                "@= requires at least one dimension",
            )));
        }
        let shape = other.shape();
        if shape.len() == 1 || shape[shape.len() - 1] != shape[shape.len() - 2] {
            return Err(rejected(Error::value(
                "@= cannot change the shape of the input array",
            )));
        }
        let product = Self::direct(self, BinaryOp::MatMul, &other)?;
        self.raw().assign(product.raw()).map_err(rejected)?;
        Ok(self)
    }

    /// `self &= other`.
    pub fn bitand_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::BitAnd, other.into())
    }

    /// `self |= other`.
    pub fn bitor_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::BitOr, other.into())
    }

    /// `self ^= other`.
    pub fn bitxor_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::BitXor, other.into())
    }

    /// `self <<= other`.
    pub fn shl_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::LeftShift, other.into())
    }

    /// `self >>= other`.
    pub fn shr_assign(&mut self, other: impl Into<Operand>) -> Result<&mut Self> {
        self.inplace(BinaryOp::RightShift, other.into())
    }

    // =========================================================================
    // Unary
    // =========================================================================

    /// `|self|`, elementwise.
    pub fn abs(&self) -> Result<Array> {
        self.unary(UnaryOp::Absolute)
    }

    /// `-self`.
    pub fn neg(&self) -> Result<Array> {
        self.unary(UnaryOp::Negative)
    }

    /// `+self`.
    pub fn pos(&self) -> Result<Array> {
        self.unary(UnaryOp::Positive)
    }

    /// `~self`.
    pub fn invert(&self) -> Result<Array> {
        self.unary(UnaryOp::Invert)
    }

    // =========================================================================
    // Indexing
    // =========================================================================

    /// Reads `self[key]`; the result is always an array.
    pub fn get(&self, key: impl Into<Index>) -> Result<Array> {
        let key = validate_index(&key.into(), Some(self.shape()))?;
        let out = self.raw().get(&key).map_err(rejected)?;
        Ok(Array::from_value(out))
    }

    /// Writes `value` into `self[key]`, casting it to `self`'s dtype.
    pub fn set(&self, key: impl Into<Index>, value: impl Into<Operand>) -> Result<()> {
        let key = validate_index(&key.into(), Some(self.shape()))?;
        let value = asarray(value, None)?;
        self.raw().set(&key, value.raw()).map_err(rejected)
    }
}

// =============================================================================
// Tests
// =============================================================================
