//! arrayapi Engine - Permissive N-Dimensional Arrays
//!
//! This crate provides the strided array engine underneath the `arrayapi`
//! namespace. Arrays are dtype-erased `RawArray` handles over typed
//! `Tensor<T>` views of shared storage. The engine is deliberately
//! permissive: it follows `NumPy` semantics, including value-based casting of
//! 0-dimensional operands, boolean arithmetic and fancy indexing.
//!
//! # Key Features
//! - Strided views with shared storage (reshape, transpose, flip, slicing)
//! - Broadcasting elementwise, comparison and bitwise operators
//! - Value-based result types for 0-d operands
//! - Basic and advanced indexing with broadcasting assignment
//! - Creation, manipulation, searching and set functions
//! - Zero-copy DLPack-style export
//!
//! # Example
//! ```rust
//! use arrayapi_engine::{arange, BinaryOp, DType, RawArray, Value};
//!
//! let a = arange(Value::Int(0), Value::Int(4), Value::Int(1), DType::I8).unwrap();
//! let b = RawArray::scalar(Value::Int(300), DType::I64);
//!
//! // The 0-d operand only contributes the type needed for its value.
//! let c = a.binary(BinaryOp::Add, &b).unwrap().into_array();
//! assert_eq!(c.dtype(), DType::I16);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric-casting allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::items_after_statements)]

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod dlpack;
pub mod elementwise;
pub mod ops;
pub mod promotion;
pub mod raw;
pub mod shape;
pub mod tensor;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use arrayapi_core::{DType, DTypeClass, Device, Error, Result, Value};
pub use creation::*;
pub use dlpack::{from_dlpack, to_dlpack, DLDataType, DLDevice, DLPackTensor};
pub use elementwise::{BinaryOp, UnaryOp};
pub use ops::{argmax, argmin, flip, nonzero, roll, squeeze, unique, where_, UniqueResult};
pub use promotion::{can_cast_same_kind, min_scalar_type, result_type};
pub use raw::{RawArray, RawElement, RawValue, Scalar};
pub use shape::{Shape, Strides};
pub use tensor::Tensor;
pub use view::{concat, stack, RawBound, RawIndex, RawIndexItem, RawSlice};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::elementwise::{BinaryOp, UnaryOp};
    pub use crate::raw::{RawArray, RawValue, Scalar};
    pub use crate::view::{RawIndex, RawIndexItem, RawSlice};
    pub use crate::{arange, full, linspace, ones, zeros};
    pub use arrayapi_core::{DType, Device, Error, Result, Value};
}
