//! Error Types - Unified Error Handling for the Array API Layers
//!
//! Provides one error type shared by the engine and the strict namespace.
//! The strict layer raises the first six kinds; the engine raises the
//! shape and dimension kinds while executing an accepted request.
//!
//! # Key Features
//! - Unified error type for all array operations
//! - Distinct kinds for construction, type, index, value and overflow failures
//! - Integration with `std::error::Error`
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use thiserror::Error;

use crate::dtype::DType;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for array operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Direct construction of a wrapped array was attempted.
    #[error("The Array() constructor is not meant to be used directly. Use one of the creation functions instead.")]
    Construction,

    /// Operand types are not compatible with the operation.
    #[error("Type error: {message}")]
    TypeCompatibility {
        /// Description of the incompatibility.
        message: String,
    },

    /// The index expression is outside the supported subset.
    #[error("Index error: {message}")]
    Index {
        /// Description of the rejected index.
        message: String,
    },

    /// A value is invalid for the operation.
    #[error("Value error: {message}")]
    Value {
        /// Description of the invalid value.
        message: String,
    },

    /// An integer does not fit the target dtype.
    #[error("integer {value} out of bounds for {dtype}")]
    Overflow {
        /// The offending value.
        value: String,
        /// The dtype it was converted to.
        dtype: DType,
    },

    /// The feature is not provided.
    #[error("Not implemented: {feature}")]
    NotImplemented {
        /// Name of the missing feature.
        feature: String,
    },

    /// Shape mismatch between arrays.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape.
        expected: Vec<usize>,
        /// The actual shape.
        actual: Vec<usize>,
    },

    /// Invalid dimension index.
    #[error("Invalid dimension: index {index} for array with {ndim} dimensions")]
    InvalidDimension {
        /// The invalid dimension index.
        index: i64,
        /// Number of dimensions in the array.
        ndim: usize,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: i64,
        /// The size of the dimension.
        size: usize,
    },

    /// Invalid operation for the given array.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// Broadcasting failed between shapes.
    #[error("Cannot broadcast shapes {shape1:?} and {shape2:?}")]
    BroadcastError {
        /// The first shape.
        shape1: Vec<usize>,
        /// The second shape.
        shape2: Vec<usize>,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for array operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new type-compatibility error.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeCompatibility {
            message: message.into(),
        }
    }

    /// Creates a new indexing error.
    #[must_use]
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    /// Creates a new value error.
    #[must_use]
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value {
            message: message.into(),
        }
    }

    /// Creates a new not-implemented error.
    #[must_use]
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Creates a new shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new broadcast error.
    #[must_use]
    pub fn broadcast(shape1: &[usize], shape2: &[usize]) -> Self {
        Self::BroadcastError {
            shape1: shape1.to_vec(),
            shape2: shape2.to_vec(),
        }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true for the type-compatibility kind.
    #[must_use]
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeCompatibility { .. })
    }

    /// Returns true for the indexing kind.
    #[must_use]
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::Index { .. } | Self::IndexOutOfBounds { .. })
    }

    /// Returns true for the value kind.
    #[must_use]
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::Value { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::shape_mismatch(&[2, 3], &[2, 4]);
        assert!(err.to_string().contains("Shape mismatch"));

        let err = Error::Overflow {
            value: "300".to_string(),
            dtype: DType::I8,
        };
        assert_eq!(err.to_string(), "integer 300 out of bounds for int8");
    }

    #[test]
    fn test_error_kinds() {
        assert!(Error::type_error("x").is_type_error());
        assert!(Error::index("x").is_index_error());
        assert!(Error::value("x").is_value_error());
        assert!(!Error::Construction.is_value_error());
        assert_eq!(Error::Construction, Error::Construction);
    }
}
