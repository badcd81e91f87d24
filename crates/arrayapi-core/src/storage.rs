//! Storage - Shared Element Buffers for Arrays
//!
//! Provides the reference-counted buffer that every array view points into.
//! Views created by indexing, reshaping or axis insertion clone the handle,
//! so a write through one view is visible through all of them.
//!
//! # Key Features
//! - Reference-counted memory shared between views
//! - Read/write guards over a `parking_lot` lock
//! - Aliasing queries (`shares_buffer`)
//! - Byte views for buffer export
//!
//! # Example
//! ```rust
//! use arrayapi_core::{Device, Storage};
//!
//! let storage = Storage::<f32>::zeros(100, Device::Cpu);
//! assert_eq!(storage.len(), 100);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::device::Device;
use crate::dtype::Element;

// =============================================================================
// Storage Struct
// =============================================================================

/// Reference-counted element buffer.
#[derive(Debug)]
pub struct Storage<T: Element> {
    inner: Arc<RwLock<StorageInner<T>>>,
}

#[derive(Debug)]
struct StorageInner<T: Element> {
    data: Vec<T>,
    device: Device,
}

impl<T: Element> Storage<T> {
    /// Creates new storage initialized to zero.
    #[must_use]
    pub fn zeros(len: usize, device: Device) -> Self {
        Self::from_vec(vec![T::zeroed(); len], device)
    }

    /// Creates storage from an existing vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>, device: Device) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StorageInner { data, device })),
        }
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the device this storage is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.inner.read().device
    }

    /// Returns true if both handles point at the same allocation.
    #[must_use]
    pub fn shares_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a read guard over the elements.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
        }
    }

    /// Returns a write guard over the elements.
    ///
    /// Callers must not hold a read guard of the same storage.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
        }
    }

    /// Copies the buffer out as raw bytes in native order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.as_slice()).to_vec()
    }

    /// Makes a deep copy of this storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        let data = self.as_slice().to_vec();
        Self::from_vec(data, self.device())
    }
}

impl<T: Element> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Element> {
    guard: parking_lot::RwLockReadGuard<'a, StorageInner<T>>,
}

impl<T: Element> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Element> {
    guard: parking_lot::RwLockWriteGuard<'a, StorageInner<T>>,
}

impl<T: Element> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

impl<T: Element> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard.data
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_zeros() {
        let storage = Storage::<f32>::zeros(10, Device::Cpu);
        assert_eq!(storage.len(), 10);
        assert!(!storage.is_empty());
        assert!(storage.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_storage_clone_shares() {
        let storage1 = Storage::from_vec(vec![1i64, 2, 3], Device::Cpu);
        let storage2 = storage1.clone();

        assert!(storage1.shares_buffer(&storage2));

        storage2.as_slice_mut()[0] = 99;
        assert_eq!(storage1.as_slice()[0], 99);
    }

    #[test]
    fn test_storage_deep_copy() {
        let storage1 = Storage::from_vec(vec![1.0_f32, 2.0, 3.0], Device::Cpu);
        let storage2 = storage1.deep_copy();

        assert!(!storage1.shares_buffer(&storage2));
        storage2.as_slice_mut()[0] = 99.0;
        assert_eq!(storage1.as_slice()[0], 1.0);
    }

    #[test]
    fn test_storage_bytes() {
        let storage = Storage::from_vec(vec![1u16, 2], Device::Cpu);
        assert_eq!(storage.to_bytes().len(), 4);

        let flags = Storage::from_vec(vec![true, false], Device::Cpu);
        assert_eq!(flags.to_bytes(), vec![1, 0]);
    }
}
