//! Operator Traits - `std::ops` Adapters for `Array`
//!
//! Thin wrappers over the named operators so arrays can be combined with
//! `+`, `-`, `&` and friends. Operators cannot report errors, so a rejected
//! operation panics with the error message; use the named methods to handle
//! failures.
//!
//! The binary traits are implemented for `&Array` only. Owned `Array`
//! receivers would take precedence over the fallible inherent methods of
//! the same name.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::array::Array;
use crate::scalar::Operand;

// =============================================================================
// Binary Operators
// =============================================================================

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $what:literal) => {
        impl<R: Into<Operand>> $trait<R> for &Array {
            type Output = Array;

            fn $method(self, rhs: R) -> Array {
                Array::$method(self, rhs).unwrap_or_else(|e| panic!("{} failed: {}", $what, e))
            }
        }
    };
}

impl_binary_op!(Add, add, "Addition");
impl_binary_op!(Sub, sub, "Subtraction");
impl_binary_op!(Mul, mul, "Multiplication");
impl_binary_op!(Div, div, "Division");
impl_binary_op!(Rem, rem, "Remainder");
impl_binary_op!(BitAnd, bitand, "Bitwise and");
impl_binary_op!(BitOr, bitor, "Bitwise or");
impl_binary_op!(BitXor, bitxor, "Bitwise xor");
impl_binary_op!(Shl, shl, "Left shift");
impl_binary_op!(Shr, shr, "Right shift");

// Scalar on the left-hand side
macro_rules! impl_reflected_op {
    ($scalar:ty => $($trait:ident, $method:ident, $reflected:ident, $what:literal);*) => {
        $(
            impl $trait<&Array> for $scalar {
                type Output = Array;

                fn $method(self, rhs: &Array) -> Array {
                    rhs.$reflected(self).unwrap_or_else(|e| panic!("{} failed: {}", $what, e))
                }
            }
        )*
    };
}

impl_reflected_op!(f64 =>
    Add, add, radd, "Addition";
    Sub, sub, rsub, "Subtraction";
    Mul, mul, rmul, "Multiplication";
    Div, div, rdiv, "Division"
);

impl_reflected_op!(i64 =>
    Add, add, radd, "Addition";
    Sub, sub, rsub, "Subtraction";
    Mul, mul, rmul, "Multiplication";
    Rem, rem, rrem, "Remainder"
);

// =============================================================================
// Unary Operators
// =============================================================================

impl Neg for &Array {
    type Output = Array;

    fn neg(self) -> Array {
        Array::neg(self).unwrap_or_else(|e| panic!("Negation failed: {e}"))
    }
}

impl Not for &Array {
    type Output = Array;

    fn not(self) -> Array {
        self.invert().unwrap_or_else(|e| panic!("Inversion failed: {e}"))
    }
}

// =============================================================================
// Compound Assignment
// =============================================================================

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $what:literal) => {
        impl<R: Into<Operand>> $trait<R> for Array {
            fn $method(&mut self, rhs: R) {
                if let Err(e) = Array::$method(self, rhs) {
                    panic!("{} failed: {}", $what, e);
                }
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, "Addition");
impl_assign_op!(SubAssign, sub_assign, "Subtraction");
impl_assign_op!(MulAssign, mul_assign, "Multiplication");
impl_assign_op!(DivAssign, div_assign, "Division");
impl_assign_op!(RemAssign, rem_assign, "Remainder");
impl_assign_op!(BitAndAssign, bitand_assign, "Bitwise and");
impl_assign_op!(BitOrAssign, bitor_assign, "Bitwise or");
impl_assign_op!(BitXorAssign, bitxor_assign, "Bitwise xor");
impl_assign_op!(ShlAssign, shl_assign, "Left shift");
impl_assign_op!(ShrAssign, shr_assign, "Right shift");

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{asarray, from_vec, DType};

    #[test]
    fn test_binary_operators() {
        let a = from_vec(vec![1.0f64, 2.0], &[2]).unwrap();
        let b = from_vec(vec![3.0f64, 4.0], &[2]).unwrap();
        assert_eq!((&a + &b).to_string(), "Array([4.0, 6.0], dtype=float64)");
        assert_eq!((&b - &a).to_string(), "Array([2.0, 2.0], dtype=float64)");
        assert_eq!((&a * 2.0).to_string(), "Array([2.0, 4.0], dtype=float64)");
        assert_eq!((&b / &a).to_string(), "Array([3.0, 2.0], dtype=float64)");
    }

    #[test]
    fn test_integer_operators() {
        let a = from_vec(vec![5u8, 6], &[2]).unwrap();
        assert_eq!((&a % 4).to_string(), "Array([1, 2], dtype=uint8)");
        assert_eq!((&a & 4).to_string(), "Array([4, 4], dtype=uint8)");
        assert_eq!((&a | 1).to_string(), "Array([5, 7], dtype=uint8)");
        assert_eq!((&a ^ 1).to_string(), "Array([4, 7], dtype=uint8)");
        assert_eq!((&a << 1).to_string(), "Array([10, 12], dtype=uint8)");
        assert_eq!((&a >> 1).to_string(), "Array([2, 3], dtype=uint8)");
        assert_eq!((!&a).to_string(), "Array([250, 249], dtype=uint8)");
    }

    #[test]
    fn test_scalar_on_left() {
        let a = from_vec(vec![1.0f64, 2.0], &[2]).unwrap();
        assert_eq!((1.0 - &a).to_string(), "Array([0.0, -1.0], dtype=float64)");
        assert_eq!((4.0 / &a).to_string(), "Array([4.0, 2.0], dtype=float64)");

        let i = from_vec(vec![3i64, 4], &[2]).unwrap();
        assert_eq!((10i64 % &i).to_string(), "Array([1, 2], dtype=int64)");
        assert_eq!((-&i).to_string(), "Array([-3, -4], dtype=int64)");
    }

    #[test]
    fn test_compound_assignment() {
        let mut a = from_vec(vec![1i32, 2], &[2]).unwrap();
        a += 1;
        a *= 3;
        a -= 1;
        a <<= 1;
        assert_eq!(a.to_string(), "Array([10, 16], dtype=int32)");
        assert_eq!(a.dtype(), DType::I32);
    }

    #[test]
    #[should_panic(expected = "Division failed")]
    fn test_integer_division_panics() {
        let a = from_vec(vec![1i64], &[1]).unwrap();
        let _ = &a / &a;
    }

    #[test]
    #[should_panic(expected = "Addition failed")]
    fn test_bool_scalar_with_ints_panics() {
        let a = asarray(1, None).unwrap();
        let _ = &a + true;
    }
}
