//! Array - The Strict Wrapped Array Type
//!
//! `Array` owns a handle on an engine `RawArray`. It can only be created by
//! the crate's creation functions (or by adopting an engine result); the
//! public constructor exists to fail. Results that the engine returns as
//! bare scalars are collapsed into 0-dimensional arrays, so the only way to
//! obtain a native value is an explicit extraction on a 0-d array.
//!
//! # Key Features
//! - Read-only accessors (`dtype`, `shape`, `ndim`, `size`, `t`)
//! - Scalar extraction (`to_bool`, `to_int`, `to_float`) and `len`
//! - Namespace introspection and DLPack export
//! - Display as `Array(..., dtype=...)`
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use arrayapi_core::{DType, Device, Error, Result};
use arrayapi_engine::{from_dlpack, to_dlpack, DLDevice, DLPackTensor, RawArray, RawValue};

use crate::namespace::ArrayNamespace;
use crate::rejected;

// =============================================================================
// Array Struct
// =============================================================================

/// An n-dimensional array restricted to the array API standard.
///
/// Clones share the underlying buffer.
#[derive(Clone)]
pub struct Array {
    raw: RawArray,
}

impl Array {
    /// Always fails: arrays are created with the creation functions such
    /// as [`asarray`](crate::asarray).
    pub fn new<A>(_args: A) -> Result<Self> {
        Err(rejected(Error::Construction))
    }

    /// Adopts an engine array.
    pub(crate) fn from_raw(raw: RawArray) -> Self {
        Self { raw }
    }

    /// Adopts an engine result, collapsing a bare scalar into a 0-d array.
    pub(crate) fn from_value(value: RawValue) -> Self {
        Self::from_raw(value.into_array())
    }

    /// The engine array behind this handle.
    pub(crate) fn raw(&self) -> &RawArray {
        &self.raw
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the element dtype.
    pub fn dtype(&self) -> DType {
        self.raw.dtype()
    }

    /// Returns the shape; `[]` for a 0-d array.
    pub fn shape(&self) -> &[usize] {
        self.raw.shape()
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.raw.ndim()
    }

    /// Returns the total number of elements.
    pub fn size(&self) -> usize {
        self.raw.numel()
    }

    /// Returns a view with the order of the axes reversed.
    pub fn t(&self) -> Self {
        Self::from_raw(self.raw.reversed_axes())
    }

    /// Returns true if both arrays reference the same buffer.
    pub fn shares_buffer(&self, other: &Self) -> bool {
        self.raw.shares_buffer(&other.raw)
    }

    // =========================================================================
    // Scalar Extraction
    // =========================================================================

    fn scalar_only(&self, what: &str) -> Result<arrayapi_core::Value> {
        match self.raw.scalar_value() {
            Some(value) => Ok(value),
            None => Err(rejected(Error::type_error(format!(
                "{what} is only allowed on arrays with shape ()"
            )))),
        }
    }

    /// Truthiness of a 0-d array.
    pub fn to_bool(&self) -> Result<bool> {
        Ok(self.scalar_only("bool")?.as_bool())
    }

    /// Integer value of a 0-d array; floats truncate toward zero.
    pub fn to_int(&self) -> Result<i128> {
        let value = self.scalar_only("int")?;
        match value.as_i128() {
            Some(i) => Ok(i),
            None => {
                let f = value.as_f64();
                if f.is_finite() {
                    Ok(f.trunc() as i128)
                } else {
                    Err(rejected(Error::value(format!(
                        "cannot convert float {f} to integer"
                    ))))
                }
            }
        }
    }

    /// Floating-point value of a 0-d array.
    pub fn to_float(&self) -> Result<f64> {
        Ok(self.scalar_only("float")?.as_f64())
    }

    /// Size of the leading axis.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Result<usize> {
        match self.shape().first() {
            Some(&n) => Ok(n),
            None => Err(rejected(Error::type_error("len() of unsized object"))),
        }
    }

    // =========================================================================
    // Interchange
    // =========================================================================

    /// Returns the namespace this array belongs to.
    ///
    /// No explicit API version is recognized.
    pub fn array_namespace(&self, api_version: Option<&str>) -> Result<ArrayNamespace> {
        match api_version {
            None => Ok(ArrayNamespace::default()),
            Some(version) => Err(rejected(Error::value(format!(
                "Unrecognized array API version '{version}'"
            )))),
        }
    }

    /// Exports the buffer without copying. The stream is not used.
    pub fn dlpack(&self, _stream: Option<i64>) -> DLPackTensor {
        to_dlpack(&self.raw)
    }

    /// Adopts an exported buffer without copying.
    pub fn from_dlpack(tensor: DLPackTensor) -> Self {
        Self::from_raw(from_dlpack(tensor))
    }

    /// Device of the buffer, in DLPack terms.
    pub fn dlpack_device(&self) -> Result<DLDevice> {
        Err(rejected(Error::not_implemented("__dlpack_device__")))
    }

    /// Device holding the buffer.
    pub fn device(&self) -> Result<Device> {
        Err(rejected(Error::not_implemented(
            "The device attribute is not yet implemented",
        )))
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw.to_string().replace("array", "Array"))
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// =============================================================================
// Tests
// =============================================================================
