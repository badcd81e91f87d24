//! Tensor - Typed Strided N-Dimensional Array
//!
//! The `Tensor` struct is the statically typed building block of the engine.
//! It is a strided view into reference-counted storage: reshaping, axis
//! insertion, transposition, flipping and broadcasting all produce new views
//! over the same buffer.
//!
//! # Key Features
//! - Generic over every registered element type
//! - Views with shared storage and signed strides
//! - Broadcasting elementwise kernels
//! - Broadcasting assignment into views
//! - Batched matrix multiplication
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use arrayapi_core::dtype::{DType, Element, Numeric};
use arrayapi_core::error::{Error, Result};
use arrayapi_core::storage::Storage;
use arrayapi_core::Device;

use crate::shape::{
    broadcast_shape, broadcast_strides, contiguous_strides, is_contiguous, numel, positions,
    reshape, Shape, Strides,
};

// =============================================================================
// Tensor Struct
// =============================================================================

/// A typed, strided view into shared storage.
#[derive(Clone)]
pub struct Tensor<T: Element> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Storage<T>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
    /// Strides for each dimension, in elements.
    pub(crate) strides: Strides,
    /// Storage index of the element at all-zero indices.
    pub(crate) offset: usize,
}

impl<T: Element> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new tensor from storage with the given shape.
    pub fn from_storage(storage: Storage<T>, shape: &[usize]) -> Result<Self> {
        let total = numel(shape);
        if total != storage.len() {
            return Err(Error::shape_mismatch(&[storage.len()], shape));
        }

        let shape = Shape::from_slice(shape);
        let strides = contiguous_strides(&shape);

        Ok(Self {
            storage,
            shape,
            strides,
            offset: 0,
        })
    }

    /// Creates a new tensor from a vector with the given shape.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let storage = Storage::from_vec(data, Device::Cpu);
        Self::from_storage(storage, shape)
    }

    /// Creates a scalar tensor (0-dimensional).
    pub fn scalar(value: T) -> Self {
        Self {
            storage: Storage::from_vec(vec![value], Device::Cpu),
            shape: Shape::new(),
            strides: Strides::new(),
            offset: 0,
        }
    }

    /// Creates a tensor filled with a constant value.
    #[must_use]
    pub fn full(shape: &[usize], value: T) -> Self {
        Self {
            storage: Storage::from_vec(vec![value; numel(shape)], Device::Cpu),
            shape: Shape::from_slice(shape),
            strides: contiguous_strides(shape),
            offset: 0,
        }
    }

    /// Creates a view over this tensor's storage with a new layout.
    pub(crate) fn view(&self, shape: Shape, strides: Strides, offset: usize) -> Self {
        Self {
            storage: self.storage.clone(),
            shape,
            strides,
            offset,
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the tensor.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Returns the storage index of the first element.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns true if the tensor has zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Returns true if this tensor is 0-dimensional.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Returns the runtime dtype of the elements.
    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns the device this tensor is on.
    #[must_use]
    pub fn device(&self) -> Device {
        self.storage.device()
    }

    /// Returns the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Returns true if the tensor is contiguous in memory.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.shape, &self.strides)
    }

    /// Returns true if both tensors view the same allocation.
    #[must_use]
    pub fn shares_buffer(&self, other: &Self) -> bool {
        self.storage.shares_buffer(&other.storage)
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Storage positions of every element in C order.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        positions(&self.shape, &self.strides, self.offset)
    }

    /// Returns the data as a contiguous vector in C order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let storage = self.storage.as_slice();
        if self.is_contiguous() {
            storage[self.offset..self.offset + self.numel()].to_vec()
        } else {
            self.positions().into_iter().map(|p| storage[p]).collect()
        }
    }

    /// Reads the elements at the given storage positions.
    pub(crate) fn read_positions(&self, positions: &[usize]) -> Vec<T> {
        let storage = self.storage.as_slice();
        positions.iter().map(|&p| storage[p]).collect()
    }

    /// Writes `values[i]` to storage position `positions[i]`.
    pub(crate) fn write_positions(&self, positions: &[usize], values: &[T]) {
        let mut storage = self.storage.as_slice_mut();
        for (&p, &v) in positions.iter().zip(values) {
            storage[p] = v;
        }
    }

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        if indices.len() != self.ndim() {
            return Err(Error::invalid_operation(format!(
                "Expected {} indices, got {}",
                self.ndim(),
                indices.len()
            )));
        }

        let mut position = self.offset as isize;
        for ((&idx, &dim), &stride) in indices.iter().zip(self.shape.iter()).zip(self.strides.iter()) {
            if idx >= dim {
                return Err(Error::IndexOutOfBounds {
                    index: idx as i64,
                    size: dim,
                });
            }
            position += idx as isize * stride;
        }

        Ok(self.storage.as_slice()[position as usize])
    }

    /// Returns the only element of a single-element tensor.
    pub fn item(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::value(
                "only single-element arrays can be converted to scalars",
            ));
        }
        Ok(self.storage.as_slice()[self.offset])
    }

    // =========================================================================
    // Shape Operations
    // =========================================================================

    /// Returns a tensor with the specified shape.
    ///
    /// Contiguous tensors are reshaped as views; others are copied first.
    pub fn reshape(&self, new_shape: &[isize]) -> Result<Self> {
        let shape = reshape(&self.shape, new_shape)?;

        let strides = contiguous_strides(&shape);
        if self.is_contiguous() {
            Ok(self.view(shape, strides, self.offset))
        } else {
            Ok(self.deep_copy().view(shape, strides, 0))
        }
    }

    /// Inserts an axis of size 1 at `axis` (in `0..=ndim`).
    pub fn expand_dims(&self, axis: usize) -> Result<Self> {
        if axis > self.ndim() {
            return Err(Error::InvalidDimension {
                index: axis as i64,
                ndim: self.ndim() + 1,
            });
        }

        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.insert(axis, 1);
        strides.insert(axis, 0);
        Ok(self.view(shape, strides, self.offset))
    }

    /// Removes the given axes, each of which must have size 1.
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Self> {
        for &axis in axes {
            match self.shape.get(axis) {
                Some(1) => {}
                Some(_) => {
                    return Err(Error::value(
                        "cannot select an axis to squeeze out which has size not equal to one",
                    ))
                }
                None => {
                    return Err(Error::InvalidDimension {
                        index: axis as i64,
                        ndim: self.ndim(),
                    })
                }
            }
        }

        let (shape, strides) = self
            .shape
            .iter()
            .zip(self.strides.iter())
            .enumerate()
            .filter(|(i, _)| !axes.contains(i))
            .map(|(_, (&d, &s))| (d, s))
            .unzip::<usize, isize, Shape, Strides>();
        Ok(self.view(shape, strides, self.offset))
    }

    /// Returns a view with dimensions reordered.
    pub fn permute(&self, dims: &[usize]) -> Result<Self> {
        if dims.len() != self.ndim() {
            return Err(Error::value(format!(
                "axes don't match array: expected {} dimensions, got {}",
                self.ndim(),
                dims.len()
            )));
        }

        let mut seen = vec![false; self.ndim()];
        for &d in dims {
            if d >= self.ndim() {
                return Err(Error::InvalidDimension {
                    index: d as i64,
                    ndim: self.ndim(),
                });
            }
            if seen[d] {
                return Err(Error::value("repeated axis in transpose"));
            }
            seen[d] = true;
        }

        let shape: Shape = dims.iter().map(|&d| self.shape[d]).collect();
        let strides: Strides = dims.iter().map(|&d| self.strides[d]).collect();
        Ok(self.view(shape, strides, self.offset))
    }

    /// Returns a view with the order of all axes reversed.
    #[must_use]
    pub fn reversed_axes(&self) -> Self {
        let shape: Shape = self.shape.iter().rev().copied().collect();
        let strides: Strides = self.strides.iter().rev().copied().collect();
        self.view(shape, strides, self.offset)
    }

    /// Returns a view with the element order reversed along `axes`.
    #[must_use]
    pub fn flip_axes(&self, axes: &[usize]) -> Self {
        let mut strides = self.strides.clone();
        let mut offset = self.offset as isize;
        for &axis in axes {
            let dim = self.shape[axis];
            if dim > 0 {
                offset += (dim as isize - 1) * strides[axis];
            }
            strides[axis] = -strides[axis];
        }
        self.view(self.shape.clone(), strides, offset as usize)
    }

    /// Returns a read-only style view broadcast to `shape`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let strides = broadcast_strides(&self.shape, &self.strides, shape)?;
        Ok(self.view(Shape::from_slice(shape), strides, self.offset))
    }

    /// Returns a contiguous tensor, copying only when needed.
    #[must_use]
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && self.offset == 0 && self.storage.len() == self.numel() {
            return self.clone();
        }
        self.deep_copy()
    }

    /// Creates a deep copy of this tensor with its own storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            storage: Storage::from_vec(self.to_vec(), self.device()),
            shape: self.shape.clone(),
            strides: contiguous_strides(&self.shape),
            offset: 0,
        }
    }

    // =========================================================================
    // Elementwise Kernels
    // =========================================================================

    /// Applies `f` to every element.
    #[must_use]
    pub fn map<U: Element>(&self, f: impl Fn(T) -> U) -> Tensor<U> {
        let data: Vec<U> = self.to_vec().into_iter().map(f).collect();
        Tensor::from_data(data, &self.shape)
    }

    /// Applies a fallible `f` to every element.
    pub fn try_map<U: Element>(&self, f: impl Fn(T) -> Result<U>) -> Result<Tensor<U>> {
        let data = self
            .to_vec()
            .into_iter()
            .map(f)
            .collect::<Result<Vec<U>>>()?;
        Tensor::from_vec(data, &self.shape)
    }

    /// Applies `f` pairwise after broadcasting both tensors.
    pub fn zip_map<U: Element, R: Element>(
        &self,
        other: &Tensor<U>,
        f: impl Fn(T, U) -> R,
    ) -> Result<Tensor<R>> {
        self.try_zip_map(other, |a, b| Ok(f(a, b)))
    }

    /// Applies a fallible `f` pairwise after broadcasting both tensors.
    pub fn try_zip_map<U: Element, R: Element>(
        &self,
        other: &Tensor<U>,
        f: impl Fn(T, U) -> Result<R>,
    ) -> Result<Tensor<R>> {
        let result_shape = broadcast_shape(&self.shape, &other.shape)?;
        let lhs = self.broadcast_to(&result_shape)?.to_vec();
        let rhs = other.broadcast_to(&result_shape)?.to_vec();

        let data = lhs
            .into_iter()
            .zip(rhs)
            .map(|(a, b)| f(a, b))
            .collect::<Result<Vec<R>>>()?;
        Tensor::from_vec(data, &result_shape)
    }

    /// Converts every element with `as`-style casting.
    #[must_use]
    pub fn cast<U: Element>(&self) -> Tensor<U> {
        self.map(|v| U::from_value(v.to_value()))
    }

    /// Writes `src`, broadcast to this view's shape, into this view.
    ///
    /// The source is fully read before the destination is locked, so `src`
    /// may alias `self`.
    pub fn assign(&self, src: &Self) -> Result<()> {
        let values = src
            .broadcast_to(&self.shape)
            .map_err(|_| {
                Error::value(format!(
                    "could not broadcast input array from shape {:?} into shape {:?}",
                    src.shape(),
                    self.shape()
                ))
            })?
            .to_vec();
        self.write_positions(&self.positions(), &values);
        Ok(())
    }

    /// Wraps a vector whose length is known to match `shape`.
    pub(crate) fn from_data(data: Vec<T>, shape: &[usize]) -> Self {
        debug_assert_eq!(data.len(), numel(shape));
        Self {
            storage: Storage::from_vec(data, Device::Cpu),
            shape: Shape::from_slice(shape),
            strides: contiguous_strides(shape),
            offset: 0,
        }
    }
}

// =============================================================================
// Numeric Operations
// =============================================================================

impl<T: Numeric> Tensor<T> {
    /// Matrix product with `NumPy` `matmul` semantics.
    ///
    /// 1-D operands are promoted to matrices and the added axis removed from
    /// the result; leading batch dimensions broadcast.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.ndim() == 0 || other.ndim() == 0 {
            return Err(Error::value(
                "matmul: Input operand does not have enough dimensions",
            ));
        }

        let lhs = if self.ndim() == 1 {
            self.expand_dims(0)?
        } else {
            self.clone()
        };
        let rhs = if other.ndim() == 1 {
            other.expand_dims(1)?
        } else {
            other.clone()
        };

        let (m, k) = (lhs.shape[lhs.ndim() - 2], lhs.shape[lhs.ndim() - 1]);
        let (k2, n) = (rhs.shape[rhs.ndim() - 2], rhs.shape[rhs.ndim() - 1]);
        if k != k2 {
            return Err(Error::value(format!(
                "matmul: Input operand 1 has a mismatch in its core dimension 0 (size {k2} is different from {k})"
            )));
        }

        let batch = broadcast_shape(&lhs.shape[..lhs.ndim() - 2], &rhs.shape[..rhs.ndim() - 2])?;
        let mut lhs_shape = batch.clone();
        lhs_shape.extend_from_slice(&[m, k]);
        let mut rhs_shape = batch.clone();
        rhs_shape.extend_from_slice(&[k, n]);

        let a = lhs.broadcast_to(&lhs_shape)?.to_vec();
        let b = rhs.broadcast_to(&rhs_shape)?.to_vec();

        let batches = numel(&batch);
        let mut data = vec![T::ZERO; batches * m * n];
        for bi in 0..batches {
            let a_base = bi * m * k;
            let b_base = bi * k * n;
            let c_base = bi * m * n;
            for i in 0..m {
                for j in 0..n {
                    let mut acc = T::ZERO;
                    for p in 0..k {
                        acc = acc.plus(a[a_base + i * k + p].times(b[b_base + p * n + j]));
                    }
                    data[c_base + i * n + j] = acc;
                }
            }
        }

        let mut shape: Shape = batch;
        if self.ndim() > 1 {
            shape.push(m);
        }
        if other.ndim() > 1 {
            shape.push(n);
        }
        Tensor::from_vec(data, &shape)
    }
}

// =============================================================================
// Debug Implementation
// =============================================================================

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={:?}, dtype={}, device={}",
            self.shape(),
            self.dtype(),
            self.device()
        )?;
        if self.numel() <= 10 {
            write!(f, ", data={:?}", self.to_vec())?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.dtype(), DType::F32);
        assert!(Tensor::<f32>::from_vec(vec![1.0], &[2]).is_err());
    }

    #[test]
    fn test_get() {
        let t = Tensor::<i64>::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        assert_eq!(t.get(&[0, 1]).unwrap(), 2);
        assert_eq!(t.get(&[1, 0]).unwrap(), 3);
        assert!(t.get(&[2, 0]).is_err());
    }

    #[test]
    fn test_reshape_shares_storage() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let r = t.reshape(&[3, 2]).unwrap();
        assert_eq!(r.shape(), &[3, 2]);
        assert!(r.shares_buffer(&t));

        let r = t.reshape(&[-1]).unwrap();
        assert_eq!(r.shape(), &[6]);
    }

    #[test]
    fn test_reversed_axes() {
        let t = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let r = t.reversed_axes();
        assert_eq!(r.shape(), &[3, 2]);
        assert_eq!(r.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_flip_axes() {
        let t = Tensor::<i32>::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        assert_eq!(t.flip_axes(&[1]).to_vec(), vec![3, 2, 1, 6, 5, 4]);
        assert_eq!(t.flip_axes(&[0, 1]).to_vec(), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_expand_and_squeeze() {
        let t = Tensor::<u8>::from_vec(vec![1, 2, 3], &[3]).unwrap();
        let e = t.expand_dims(0).unwrap();
        assert_eq!(e.shape(), &[1, 3]);
        assert!(e.shares_buffer(&t));
        assert_eq!(e.squeeze_axes(&[0]).unwrap().shape(), &[3]);
        assert!(e.squeeze_axes(&[1]).is_err());
    }

    #[test]
    fn test_zip_map_broadcasting() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![10.0], &[1]).unwrap();
        let c = a.zip_map(&b, |x, y| x + y).unwrap();
        assert_eq!(c.to_vec(), vec![11.0, 12.0, 13.0]);

        let d = Tensor::<f32>::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        assert!(a.zip_map(&d, |x, y| x + y).is_err());
    }

    #[test]
    fn test_assign_through_view() {
        let t = Tensor::<i64>::from_vec(vec![0, 0, 0, 0], &[2, 2]).unwrap();
        let column = t.reversed_axes();
        column.assign(&Tensor::scalar(7)).unwrap();
        assert_eq!(t.to_vec(), vec![7, 7, 7, 7]);

        let bad = Tensor::<i64>::from_vec(vec![1, 2, 3], &[3]).unwrap();
        assert!(t.assign(&bad).is_err());
    }

    #[test]
    fn test_assign_self_alias() {
        let t = Tensor::<i64>::from_vec(vec![1, 2, 3], &[3]).unwrap();
        t.assign(&t.flip_axes(&[0])).unwrap();
        assert_eq!(t.to_vec(), vec![3, 2, 1]);
    }

    #[test]
    fn test_matmul() {
        let a = Tensor::<f32>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b = Tensor::<f32>::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);

        let v = Tensor::<f32>::from_vec(vec![1.0, 1.0], &[2]).unwrap();
        let mv = a.matmul(&v).unwrap();
        assert_eq!(mv.shape(), &[2]);
        assert_eq!(mv.to_vec(), vec![3.0, 7.0]);
        assert_eq!(v.matmul(&v).unwrap().shape(), &[] as &[usize]);

        let bad = Tensor::<f32>::from_vec(vec![1.0; 3], &[3]).unwrap();
        assert!(a.matmul(&bad).is_err());
        assert!(a.matmul(&Tensor::scalar(1.0)).is_err());
    }

    #[test]
    fn test_scalar() {
        let s = Tensor::<f32>::scalar(42.0);
        assert!(s.is_scalar());
        assert_eq!(s.numel(), 1);
        assert_eq!(s.item().unwrap(), 42.0);
    }

    #[test]
    fn test_cast() {
        let t = Tensor::<f64>::from_vec(vec![1.7, -2.2], &[2]).unwrap();
        assert_eq!(t.cast::<i32>().to_vec(), vec![1, -2]);
        assert_eq!(t.cast::<bool>().to_vec(), vec![true, true]);
    }
}
