//! DLPack Exchange - Zero-Copy Buffer Export
//!
//! Safe, in-process rendition of the DLPack tensor exchange protocol. An
//! exported `DLPackTensor` carries the DLPack metadata (device, dtype code,
//! shape, strides, byte offset) and keeps a handle on the exporting array's
//! storage, so importing it yields an array aliasing the original buffer.
//!
//! # Key Features
//! - `DLDevice` and `DLDataType` descriptors with the standard codes
//! - Export (`to_dlpack`) and import (`from_dlpack`) without copying
//! - Byte view of the exported elements
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::dtype::{DType, DTypeClass};
use arrayapi_core::Device;

use crate::raw::{with_tensor, RawArray};

/// DLPack device type codes.
pub mod device_type {
    /// CPU device.
    pub const CPU: i32 = 1;
}

/// DLPack data type codes.
pub mod type_code {
    /// Signed integer.
    pub const INT: u8 = 0;
    /// Unsigned integer.
    pub const UINT: u8 = 1;
    /// IEEE floating point.
    pub const FLOAT: u8 = 2;
    /// Boolean.
    pub const BOOL: u8 = 6;
}

// =============================================================================
// Descriptors
// =============================================================================

/// Device on which an exported buffer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DLDevice {
    /// Device type code.
    pub device_type: i32,
    /// Device ordinal.
    pub device_id: i32,
}

impl From<Device> for DLDevice {
    fn from(device: Device) -> Self {
        Self {
            device_type: device.dlpack_code(),
            device_id: device.index() as i32,
        }
    }
}

/// Element type of an exported buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DLDataType {
    /// Type code (`type_code::*`).
    pub code: u8,
    /// Bits per element.
    pub bits: u8,
    /// Vector lanes; always 1.
    pub lanes: u16,
}

impl From<DType> for DLDataType {
    fn from(dtype: DType) -> Self {
        let code = match dtype.class() {
            DTypeClass::Boolean => type_code::BOOL,
            DTypeClass::Integer if dtype.is_unsigned_integer() => type_code::UINT,
            DTypeClass::Integer => type_code::INT,
            DTypeClass::Floating => type_code::FLOAT,
        };
        Self {
            code,
            bits: dtype.bits() as u8,
            lanes: 1,
        }
    }
}

// =============================================================================
// Exported Tensor
// =============================================================================

/// An exported array: DLPack metadata plus a shared handle on the buffer.
#[derive(Debug, Clone)]
pub struct DLPackTensor {
    array: RawArray,
    /// Device holding the buffer.
    pub device: DLDevice,
    /// Element type.
    pub dtype: DLDataType,
    /// Extent of every dimension.
    pub shape: Vec<i64>,
    /// Element strides of every dimension.
    pub strides: Vec<i64>,
    /// Offset of the first element in bytes.
    pub byte_offset: u64,
}

impl DLPackTensor {
    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// The exported elements in C order as raw bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        with_tensor!(&self.array, t => bytemuck::cast_slice::<_, u8>(&t.to_vec()).to_vec())
    }
}

/// Exports `array` without copying its buffer.
#[must_use]
pub fn to_dlpack(array: &RawArray) -> DLPackTensor {
    let (strides, offset) = with_tensor!(array, t => {
        (t.strides().iter().map(|&s| s as i64).collect::<Vec<i64>>(), t.offset())
    });

    tracing::trace!(dtype = %array.dtype(), shape = ?array.shape(), "dlpack export");
    DLPackTensor {
        device: array.device().into(),
        dtype: array.dtype().into(),
        shape: array.shape().iter().map(|&d| d as i64).collect(),
        strides,
        byte_offset: (offset * array.dtype().size_of()) as u64,
        array: array.clone(),
    }
}

/// Adopts an exported tensor; the result aliases the exporter's buffer.
#[must_use]
pub fn from_dlpack(tensor: DLPackTensor) -> RawArray {
    tensor.array
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrayapi_core::dtype::Value;

    #[test]
    fn test_descriptors() {
        assert_eq!(
            DLDataType::from(DType::U16),
            DLDataType {
                code: type_code::UINT,
                bits: 16,
                lanes: 1
            }
        );
        assert_eq!(DLDataType::from(DType::Bool).code, type_code::BOOL);
        assert_eq!(DLDataType::from(DType::F64).bits, 64);
        assert_eq!(DLDevice::from(Device::Cpu).device_type, device_type::CPU);
        assert_eq!(DLDevice::from(Device::Cpu).device_id, 0);
    }

    #[test]
    fn test_round_trip_shares_buffer() {
        let a = RawArray::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
        let exported = to_dlpack(&a);
        assert_eq!(exported.shape, vec![2, 2]);
        assert_eq!(exported.strides, vec![2, 1]);
        assert_eq!(exported.ndim(), 2);

        let b = from_dlpack(exported);
        assert!(b.shares_buffer(&a));
        b.assign(&RawArray::scalar(Value::Int(0), DType::I32)).unwrap();
        assert_eq!(a.values(), vec![Value::Int(0); 4]);
    }

    #[test]
    fn test_bytes_follow_view_order() {
        let a = RawArray::from_vec(vec![1u8, 2, 3], &[3]).unwrap();
        let reversed = a.flip_axes(&[0]);
        let exported = to_dlpack(&reversed);
        assert_eq!(exported.byte_offset, 2);
        assert_eq!(exported.to_bytes(), vec![3, 2, 1]);
    }
}
