//! arrayapi - Strict Array API Namespace
//!
//! This crate provides `Array`, a minimal array type that enforces the
//! interoperability standard's rules on top of the permissive
//! `arrayapi-engine`. Every operator and index expression is checked before
//! the engine sees it: native scalars are promoted by dtype class, 0-d
//! operands are normalized so the engine cannot apply value-based casting,
//! and index expressions outside the allowed subset are rejected.
//!
//! # Key Features
//! - `Array` wrapper that never hands out bare scalars
//! - Class-based scalar promotion with overflow checks
//! - Shape-asymmetry normalization for binary operators
//! - Index validation (slice bounds, boolean masks, integer arrays)
//! - Named operators plus `std::ops` adapters
//! - Namespace handle with serde-loadable configuration
//! - Creation, manipulation, searching, set and elementwise functions
//!
//! # Example
//! ```rust
//! use arrayapi::{asarray, from_vec, DType, Index};
//!
//! let a = from_vec(vec![1.0f32, 2.0, 3.0], &[3]).unwrap();
//! let b = asarray(2.0, Some(DType::F64)).unwrap();
//!
//! // A 0-d float64 operand widens the result instead of being value-cast.
//! let c = a.add(&b).unwrap();
//! assert_eq!(c.dtype(), DType::F64);
//!
//! // Native scalars adopt the array's dtype.
//! assert_eq!(a.mul(2.0).unwrap().dtype(), DType::F32);
//!
//! // Indexing always yields arrays.
//! let first = a.get(0).unwrap();
//! assert_eq!(first.ndim(), 0);
//! assert_eq!(first.to_float().unwrap(), 1.0);
//!
//! // Integer operands are rejected by true division.
//! let ints = from_vec(vec![1i64, 2], &[2]).unwrap();
//! assert!(ints.div(&ints).is_err());
//! assert!(ints.get(Index::NewAxis).is_err());
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
#![allow(clippy::should_implement_trait)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::fn_params_excessive_bools)]

// =============================================================================
// Modules
// =============================================================================

pub mod array;
pub mod creation;
pub mod dispatch;
pub mod elementwise;
pub mod index;
pub mod manipulation;
pub mod namespace;
pub mod normalize;
pub mod ops;
pub mod scalar;
pub mod searching;
pub mod set_functions;

// =============================================================================
// Re-exports
// =============================================================================

pub use arrayapi_core::{
    DType, DTypeClass, Error, Result, ALL_DTYPES, BOOLEAN_DTYPES, FLOATING_DTYPES,
    INTEGER_DTYPES, NUMERIC_DTYPES,
};
pub use arrayapi_engine::{DLDevice, DLPackTensor};

pub use array::Array;
pub use creation::{
    arange, asarray, empty, empty_like, eye, from_vec, full, full_like, linspace, ones,
    ones_like, zeros, zeros_like,
};
pub use elementwise::{pow, result_type};
pub use index::{validate_index, Index, Slice, SliceBound};
pub use manipulation::{concat, expand_dims, flip, reshape, roll, squeeze, stack};
pub use namespace::{ArrayNamespace, NamespaceConfig};
pub use normalize::normalize_two_args;
pub use scalar::{promote_scalar, Operand};
pub use searching::{argmax, argmin, nonzero, where_};
pub use set_functions::{unique, UniqueOutput};

// =============================================================================
// Rejection Logging
// =============================================================================

/// Records a rejected request before handing the error back to the caller.
pub(crate) fn rejected(error: Error) -> Error {
    tracing::debug!(%error, "array API request rejected");
    error
}

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::array::Array;
    pub use crate::creation::{arange, asarray, from_vec, full, ones, zeros};
    pub use crate::index::{Index, Slice};
    pub use crate::namespace::{ArrayNamespace, NamespaceConfig};
    pub use crate::scalar::Operand;
    pub use arrayapi_core::{DType, Error, Result};
}
