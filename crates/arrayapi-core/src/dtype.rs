//! Data Types - Dtype Registry and Element Traits
//!
//! Defines the fixed set of element types an array may hold and partitions
//! them into the three semantic classes (boolean, integer, floating-point)
//! that every promotion and operator-legality rule is written against.
//!
//! # Key Features
//! - Runtime dtype information via the `DType` enum
//! - Class membership via `DTypeClass`
//! - Dtype-only promotion (`DType::promote`) and the stricter standard table
//!   (`DType::standard_promote`)
//! - Type-erased element values (`Value`) with `as`-style casting
//! - Element kernels (`Numeric`, `Bitwise`) used by the engine
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt::{self, Debug};
use core::str::FromStr;

use bytemuck::{NoUninit, Zeroable};
use num_traits::{WrappingAdd, WrappingMul, WrappingNeg, WrappingSub};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of array element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean type.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit floating point (single precision).
    F32,
    /// 64-bit floating point (double precision).
    F64,
}

/// Semantic class of a dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DTypeClass {
    /// `bool`.
    Boolean,
    /// Signed and unsigned integers of every width.
    Integer,
    /// Floating point of every width.
    Floating,
}

/// Every registered dtype.
pub const ALL_DTYPES: [DType; 11] = [
    DType::Bool,
    DType::I8,
    DType::I16,
    DType::I32,
    DType::I64,
    DType::U8,
    DType::U16,
    DType::U32,
    DType::U64,
    DType::F32,
    DType::F64,
];

/// Dtypes of the boolean class.
pub const BOOLEAN_DTYPES: [DType; 1] = [DType::Bool];

/// Dtypes of the integer class.
pub const INTEGER_DTYPES: [DType; 8] = [
    DType::I8,
    DType::I16,
    DType::I32,
    DType::I64,
    DType::U8,
    DType::U16,
    DType::U32,
    DType::U64,
];

/// Dtypes of the floating-point class.
pub const FLOATING_DTYPES: [DType; 2] = [DType::F32, DType::F64];

/// Integer and floating-point dtypes.
pub const NUMERIC_DTYPES: [DType; 10] = [
    DType::I8,
    DType::I16,
    DType::I32,
    DType::I64,
    DType::U8,
    DType::U16,
    DType::U32,
    DType::U64,
    DType::F32,
    DType::F64,
];

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        self.size_of() * 8
    }

    /// Returns the class this dtype belongs to.
    #[must_use]
    pub const fn class(self) -> DTypeClass {
        match self {
            Self::Bool => DTypeClass::Boolean,
            Self::F32 | Self::F64 => DTypeClass::Floating,
            _ => DTypeClass::Integer,
        }
    }

    /// Returns true if this is the boolean type.
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns true if this is an integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self.class(), DTypeClass::Integer)
    }

    /// Returns true if this is a signed integer type.
    #[must_use]
    pub const fn is_signed_integer(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns true if this is an unsigned integer type.
    #[must_use]
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }

    /// Inclusive value range of an integer dtype.
    #[must_use]
    pub const fn int_range(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Smallest signed integer dtype with at least `bits` bits.
    const fn signed_with_bits(bits: usize) -> Option<Self> {
        match bits {
            0..=8 => Some(Self::I8),
            9..=16 => Some(Self::I16),
            17..=32 => Some(Self::I32),
            33..=64 => Some(Self::I64),
            _ => None,
        }
    }

    /// Promotes two dtypes by dtype alone, the way the engine's kernels do.
    ///
    /// Booleans yield to anything, integers of one signedness widen, mixed
    /// signedness goes to the smallest signed type holding both (or
    /// `float64` when none exists) and integer/float mixes pick the float
    /// wide enough for the integer.
    #[must_use]
    pub fn promote(self, other: Self) -> Self {
        use DTypeClass::{Boolean, Floating, Integer};

        if self == other {
            return self;
        }
        match (self.class(), other.class()) {
            (Boolean, _) => other,
            (_, Boolean) => self,
            (Floating, Floating) => {
                if self.bits() >= other.bits() {
                    self
                } else {
                    other
                }
            }
            (Integer, Integer) => {
                if self.is_signed_integer() == other.is_signed_integer() {
                    if self.bits() >= other.bits() {
                        self
                    } else {
                        other
                    }
                } else {
                    let (signed, unsigned) = if self.is_signed_integer() {
                        (self, other)
                    } else {
                        (other, self)
                    };
                    if unsigned.bits() < signed.bits() {
                        signed
                    } else {
                        Self::signed_with_bits(unsigned.bits() + 1).unwrap_or(Self::F64)
                    }
                }
            }
            (Integer, Floating) | (Floating, Integer) => {
                let (int, float) = if self.is_float() {
                    (other, self)
                } else {
                    (self, other)
                };
                if float == Self::F32 && int.bits() <= 16 {
                    Self::F32
                } else {
                    Self::F64
                }
            }
        }
    }

    /// Promotes two dtypes by the array API standard's table.
    ///
    /// Returns `None` for pairs the standard leaves undefined: mixed classes
    /// and `int64`/`uint64` style mixes with no signed type wide enough.
    #[must_use]
    pub fn standard_promote(self, other: Self) -> Option<Self> {
        if self.class() != other.class() {
            return None;
        }
        let promoted = self.promote(other);
        if promoted.class() == self.class() {
            Some(promoted)
        } else {
            None
        }
    }

    /// Returns the default floating point type.
    #[must_use]
    pub const fn default_float() -> Self {
        Self::F64
    }

    /// Returns the default integer type.
    #[must_use]
    pub const fn default_int() -> Self {
        Self::I64
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ALL_DTYPES
            .iter()
            .copied()
            .find(|dtype| dtype.name() == s)
            .ok_or_else(|| Error::value(format!("unknown dtype '{s}'")))
    }
}

impl Serialize for DType {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for DType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A single type-erased element.
///
/// Conversions between variants follow `as` casting (wrapping for integers,
/// saturating for float to integer, `!= 0` for booleans).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
}

impl Value {
    /// Truthiness of the value.
    #[must_use]
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(i) => i != 0,
            Self::UInt(u) => u != 0,
            Self::Float(f) => f != 0.0,
        }
    }

    /// The value as `i64`.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(b),
            Self::Int(i) => i,
            Self::UInt(u) => u as i64,
            Self::Float(f) => f as i64,
        }
    }

    /// The value as `u64`.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Bool(b) => u64::from(b),
            Self::Int(i) => i as u64,
            Self::UInt(u) => u,
            Self::Float(f) => f as u64,
        }
    }

    /// The value as `f64`.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(b)),
            Self::Int(i) => i as f64,
            Self::UInt(u) => u as f64,
            Self::Float(f) => f,
        }
    }

    /// The value widened to `i128` when it is integral.
    #[must_use]
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Self::Bool(b) => Some(i128::from(b)),
            Self::Int(i) => Some(i128::from(i)),
            Self::UInt(u) => Some(i128::from(u)),
            Self::Float(_) => None,
        }
    }

    /// Builds the value of an integer held in a dtype, checking its range.
    ///
    /// Floating dtypes accept any integer (rounded to nearest); integer
    /// dtypes raise `Overflow` outside their range.
    pub fn from_int_checked(value: i128, dtype: DType) -> Result<Self> {
        match dtype.int_range() {
            Some((lo, hi)) => {
                if value < lo || value > hi {
                    return Err(Error::Overflow {
                        value: value.to_string(),
                        dtype,
                    });
                }
                if dtype.is_unsigned_integer() {
                    Ok(Self::UInt(value as u64))
                } else {
                    Ok(Self::Int(value as i64))
                }
            }
            None if dtype.is_float() => Ok(Self::Float(value as f64)),
            None => Ok(Self::Bool(value != 0)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => {
                if x.is_nan() {
                    write!(f, "nan")
                } else if x.is_infinite() {
                    write!(f, "{}inf", if *x < 0.0 { "-" } else { "" })
                } else if x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
        }
    }
}

// =============================================================================
// Element Trait
// =============================================================================

/// Trait for all element types that can be stored in an array.
pub trait Element:
    Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + NoUninit + Zeroable + 'static
{
    /// The runtime dtype for this element type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }

    /// Erases the element into a `Value`.
    fn to_value(self) -> Value;

    /// Builds an element from a `Value` with `as` casting.
    fn from_value(value: Value) -> Self;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Self {
        value.as_bool()
    }
}

macro_rules! impl_element_signed {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn to_value(self) -> Value {
                Value::Int(self as i64)
            }

            fn from_value(value: Value) -> Self {
                match value {
                    Value::Float(f) => f as $ty,
                    other => other.as_i64() as $ty,
                }
            }
        }
    };
}

macro_rules! impl_element_unsigned {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn to_value(self) -> Value {
                Value::UInt(self as u64)
            }

            fn from_value(value: Value) -> Self {
                match value {
                    Value::Float(f) => f as $ty,
                    other => other.as_u64() as $ty,
                }
            }
        }
    };
}

macro_rules! impl_element_float {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn to_value(self) -> Value {
                Value::Float(self as f64)
            }

            fn from_value(value: Value) -> Self {
                value.as_f64() as $ty
            }
        }
    };
}

impl_element_signed!(i8, DType::I8);
impl_element_signed!(i16, DType::I16);
impl_element_signed!(i32, DType::I32);
impl_element_signed!(i64, DType::I64);
impl_element_unsigned!(u8, DType::U8);
impl_element_unsigned!(u16, DType::U16);
impl_element_unsigned!(u32, DType::U32);
impl_element_unsigned!(u64, DType::U64);
impl_element_float!(f32, DType::F32);
impl_element_float!(f64, DType::F64);

// =============================================================================
// Numeric Trait
// =============================================================================

/// Arithmetic kernels for integer and floating-point elements.
///
/// Integer arithmetic wraps; integer division and remainder by zero yield
/// zero. Floor division and remainder follow the sign of the divisor.
pub trait Numeric: Element {
    /// The additive identity.
    const ZERO: Self;

    /// The multiplicative identity.
    const ONE: Self;

    /// `self + rhs`.
    fn plus(self, rhs: Self) -> Self;

    /// `self - rhs`.
    fn minus(self, rhs: Self) -> Self;

    /// `self * rhs`.
    fn times(self, rhs: Self) -> Self;

    /// `floor(self / rhs)`.
    fn floor_div(self, rhs: Self) -> Self;

    /// Remainder with the sign of `rhs`.
    fn modulo(self, rhs: Self) -> Self;

    /// `self ** rhs`.
    fn power(self, rhs: Self) -> Result<Self>;

    /// `-self`.
    fn negate(self) -> Self;

    /// `|self|`.
    fn absolute(self) -> Self;
}

macro_rules! impl_numeric_signed {
    ($ty:ty) => {
        impl Numeric for $ty {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn plus(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }

            fn minus(self, rhs: Self) -> Self {
                WrappingSub::wrapping_sub(&self, &rhs)
            }

            fn times(self, rhs: Self) -> Self {
                WrappingMul::wrapping_mul(&self, &rhs)
            }

            fn floor_div(self, rhs: Self) -> Self {
                if rhs == 0 {
                    return 0;
                }
                let q = self.wrapping_div(rhs);
                if self.wrapping_rem(rhs) != 0 && ((self < 0) != (rhs < 0)) {
                    q - 1
                } else {
                    q
                }
            }

            fn modulo(self, rhs: Self) -> Self {
                if rhs == 0 {
                    return 0;
                }
                let r = self.wrapping_rem(rhs);
                if r != 0 && ((r < 0) != (rhs < 0)) {
                    r + rhs
                } else {
                    r
                }
            }

            fn power(self, rhs: Self) -> Result<Self> {
                if rhs < 0 {
                    return Err(Error::value(
                        "Integers to negative integer powers are not allowed.",
                    ));
                }
                let exp = u32::try_from(rhs).unwrap_or(u32::MAX);
                Ok(self.wrapping_pow(exp))
            }

            fn negate(self) -> Self {
                WrappingNeg::wrapping_neg(&self)
            }

            fn absolute(self) -> Self {
                self.wrapping_abs()
            }
        }
    };
}

macro_rules! impl_numeric_unsigned {
    ($ty:ty) => {
        impl Numeric for $ty {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn plus(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }

            fn minus(self, rhs: Self) -> Self {
                WrappingSub::wrapping_sub(&self, &rhs)
            }

            fn times(self, rhs: Self) -> Self {
                WrappingMul::wrapping_mul(&self, &rhs)
            }

            fn floor_div(self, rhs: Self) -> Self {
                if rhs == 0 {
                    0
                } else {
                    self / rhs
                }
            }

            fn modulo(self, rhs: Self) -> Self {
                if rhs == 0 {
                    0
                } else {
                    self % rhs
                }
            }

            fn power(self, rhs: Self) -> Result<Self> {
                let exp = u32::try_from(rhs).unwrap_or(u32::MAX);
                Ok(self.wrapping_pow(exp))
            }

            fn negate(self) -> Self {
                WrappingNeg::wrapping_neg(&self)
            }

            fn absolute(self) -> Self {
                self
            }
        }
    };
}

macro_rules! impl_numeric_float {
    ($ty:ty) => {
        impl Numeric for $ty {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            fn plus(self, rhs: Self) -> Self {
                self + rhs
            }

            fn minus(self, rhs: Self) -> Self {
                self - rhs
            }

            fn times(self, rhs: Self) -> Self {
                self * rhs
            }

            fn floor_div(self, rhs: Self) -> Self {
                (self / rhs).floor()
            }

            fn modulo(self, rhs: Self) -> Self {
                let r = self % rhs;
                if r != 0.0 && ((r < 0.0) != (rhs < 0.0)) {
                    r + rhs
                } else {
                    r
                }
            }

            fn power(self, rhs: Self) -> Result<Self> {
                Ok(self.powf(rhs))
            }

            fn negate(self) -> Self {
                -self
            }

            fn absolute(self) -> Self {
                self.abs()
            }
        }
    };
}

impl_numeric_signed!(i8);
impl_numeric_signed!(i16);
impl_numeric_signed!(i32);
impl_numeric_signed!(i64);
impl_numeric_unsigned!(u8);
impl_numeric_unsigned!(u16);
impl_numeric_unsigned!(u32);
impl_numeric_unsigned!(u64);
impl_numeric_float!(f32);
impl_numeric_float!(f64);

// =============================================================================
// Bitwise Trait
// =============================================================================

/// Bitwise kernels for boolean and integer elements.
pub trait Bitwise: Element {
    /// `self & rhs`.
    fn bit_and(self, rhs: Self) -> Self;

    /// `self | rhs`.
    fn bit_or(self, rhs: Self) -> Self;

    /// `self ^ rhs`.
    fn bit_xor(self, rhs: Self) -> Self;

    /// `!self` (logical not for booleans).
    fn bit_not(self) -> Self;
}

/// Shift kernels for integer elements.
///
/// Shifting by a negative amount or by at least the bit width yields zero
/// (or the sign fill for right shifts of negative values).
pub trait Shift: Bitwise {
    /// `self << rhs`.
    fn shift_left(self, rhs: Self) -> Self;

    /// `self >> rhs`.
    fn shift_right(self, rhs: Self) -> Self;
}

impl Bitwise for bool {
    fn bit_and(self, rhs: Self) -> Self {
        self & rhs
    }

    fn bit_or(self, rhs: Self) -> Self {
        self | rhs
    }

    fn bit_xor(self, rhs: Self) -> Self {
        self ^ rhs
    }

    fn bit_not(self) -> Self {
        !self
    }
}

/// Shift amount of an integer element, `None` when negative.
fn shift_amount(value: Value) -> Option<u64> {
    match value {
        Value::Int(i) => u64::try_from(i).ok(),
        Value::UInt(u) => Some(u),
        Value::Bool(b) => Some(u64::from(b)),
        Value::Float(_) => None,
    }
}

macro_rules! impl_bitwise_int {
    ($ty:ty) => {
        impl Bitwise for $ty {
            fn bit_and(self, rhs: Self) -> Self {
                self & rhs
            }

            fn bit_or(self, rhs: Self) -> Self {
                self | rhs
            }

            fn bit_xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            fn bit_not(self) -> Self {
                !self
            }
        }

        impl Shift for $ty {
            fn shift_left(self, rhs: Self) -> Self {
                match shift_amount(rhs.to_value()) {
                    Some(n) if n < u64::from(<$ty>::BITS) => self << n,
                    _ => 0,
                }
            }

            #[allow(unused_comparisons)]
            fn shift_right(self, rhs: Self) -> Self {
                match shift_amount(rhs.to_value()) {
                    Some(n) if n < u64::from(<$ty>::BITS) => self >> n,
                    _ => {
                        if self < 0 {
                            !0
                        } else {
                            0
                        }
                    }
                }
            }
        }
    };
}

impl_bitwise_int!(i8);
impl_bitwise_int!(i16);
impl_bitwise_int!(i32);
impl_bitwise_int!(i64);
impl_bitwise_int!(u8);
impl_bitwise_int!(u16);
impl_bitwise_int!(u32);
impl_bitwise_int!(u64);

// =============================================================================
// Tests
// =============================================================================
