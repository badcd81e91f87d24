//! Arrayapi Core - Foundation Layer for the Arrayapi Workspace
//!
//! This crate provides the abstractions shared by the permissive engine and
//! the strict namespace built on top of it: the dtype registry, element
//! traits, the unified error type and reference-counted storage.
//!
//! # Key Features
//! - Closed dtype registry partitioned into boolean, integer and floating classes
//! - Dtype-only and standard promotion tables
//! - Efficient memory storage with reference counting
//! - One error type for every layer
//!
//! # Example
//! ```rust
//! use arrayapi_core::{DType, Device, Storage};
//!
//! let storage = Storage::<f64>::zeros(4, Device::Cpu);
//! assert_eq!(storage.len(), 4);
//! assert_eq!(DType::I8.promote(DType::U8), DType::I16);
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
#![allow(clippy::unreadable_literal)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]

// =============================================================================
// Modules
// =============================================================================

pub mod device;
pub mod dtype;
pub mod error;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use device::Device;
pub use dtype::{
    Bitwise, DType, DTypeClass, Element, Numeric, Shift, Value, ALL_DTYPES, BOOLEAN_DTYPES,
    FLOATING_DTYPES, INTEGER_DTYPES, NUMERIC_DTYPES,
};
pub use error::{Error, Result};
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::device::Device;
    pub use crate::dtype::{DType, DTypeClass, Element, Value};
    pub use crate::error::{Error, Result};
    pub use crate::storage::Storage;
}
