//! Shape and Strides - Array Dimension Management
//!
//! Provides types and functions for managing array shapes, strides, and
//! broadcasting rules. Shapes define the dimensions of an array, while
//! strides define how to traverse the underlying storage. Strides are
//! signed so reversed views need no copy.
//!
//! # Key Features
//! - Efficient shape representation with small-vector optimization
//! - Stride computation for contiguous layouts
//! - Broadcasting support following `NumPy` rules
//! - Axis normalization with negative indices
//! - Storage position enumeration for strided layouts
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use arrayapi_core::error::{Error, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Shape type - dimensions of an array.
/// Uses `SmallVec` for stack allocation of small shapes (up to 6 dimensions).
pub type Shape = SmallVec<[usize; 6]>;

/// Strides type - step sizes for each dimension.
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Shape Utilities
// =============================================================================

/// Computes the total number of elements from a shape.
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Computes row-major (C-order) strides for a shape.
#[must_use]
pub fn contiguous_strides(shape: &[usize]) -> Strides {
    let mut strides = Strides::with_capacity(shape.len());
    let mut stride = 1isize;

    for &dim in shape.iter().rev() {
        strides.push(stride);
        stride *= dim.max(1) as isize;
    }

    strides.reverse();
    strides
}

/// Checks if strides represent a contiguous row-major layout.
///
/// Dimensions of size 1 may carry any stride.
#[must_use]
pub fn is_contiguous(shape: &[usize], strides: &[isize]) -> bool {
    let expected = contiguous_strides(shape);
    shape
        .iter()
        .zip(strides.iter().zip(expected.iter()))
        .all(|(&dim, (&actual, &wanted))| dim <= 1 || actual == wanted)
}

/// Converts a linear index to multi-dimensional indices.
#[must_use]
pub fn unravel_index(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];

    for (i, &dim) in shape.iter().enumerate().rev() {
        if dim == 0 {
            continue;
        }
        indices[i] = linear % dim;
        linear /= dim;
    }

    indices
}

/// Offsets, relative to the first element, of every element of a strided
/// layout in C order.
#[must_use]
pub fn relative_offsets(shape: &[usize], strides: &[isize]) -> Vec<isize> {
    let total = numel(shape);
    let mut result = Vec::with_capacity(total);
    if total == 0 {
        return result;
    }

    let ndim = shape.len();
    let mut index = vec![0usize; ndim];
    let mut current = 0isize;

    for _ in 0..total {
        result.push(current);

        // Odometer increment from the last axis.
        for axis in (0..ndim).rev() {
            index[axis] += 1;
            current += strides[axis];
            if index[axis] < shape[axis] {
                break;
            }
            current -= strides[axis] * shape[axis] as isize;
            index[axis] = 0;
        }
    }

    result
}

/// Storage positions of every element of a strided layout in C order.
///
/// `offset` is the storage index of the element at all-zero indices.
#[must_use]
pub fn positions(shape: &[usize], strides: &[isize], offset: usize) -> Vec<usize> {
    relative_offsets(shape, strides)
        .into_iter()
        .map(|rel| (offset as isize + rel) as usize)
        .collect()
}

/// Normalizes a possibly negative axis against `ndim` dimensions.
pub fn normalize_axis(axis: isize, ndim: usize) -> Result<usize> {
    let n = ndim as isize;
    let resolved = if axis < 0 { axis + n } else { axis };

    if resolved < 0 || resolved >= n {
        return Err(Error::InvalidDimension {
            index: axis as i64,
            ndim,
        });
    }

    Ok(resolved as usize)
}

/// Normalizes a list of axes, rejecting duplicates.
pub fn normalize_axes(axes: &[isize], ndim: usize) -> Result<Vec<usize>> {
    let mut result = Vec::with_capacity(axes.len());
    for &axis in axes {
        let resolved = normalize_axis(axis, ndim)?;
        if result.contains(&resolved) {
            return Err(Error::value("repeated axis"));
        }
        result.push(resolved);
    }
    Ok(result)
}

// =============================================================================
// Broadcasting
// =============================================================================

/// Computes the broadcast shape of two shapes.
///
/// Broadcasting follows `NumPy` rules:
/// 1. Shapes are aligned from the right
/// 2. Dimensions are compatible if equal or one of them is 1
/// 3. Missing dimensions are treated as 1
pub fn broadcast_shape(shape1: &[usize], shape2: &[usize]) -> Result<Shape> {
    let max_ndim = shape1.len().max(shape2.len());
    let mut result = Shape::with_capacity(max_ndim);

    for i in 0..max_ndim {
        let d1 = if i < shape1.len() {
            shape1[shape1.len() - 1 - i]
        } else {
            1
        };

        let d2 = if i < shape2.len() {
            shape2[shape2.len() - 1 - i]
        } else {
            1
        };

        if d1 == d2 {
            result.push(d1);
        } else if d1 == 1 {
            result.push(d2);
        } else if d2 == 1 {
            result.push(d1);
        } else {
            return Err(Error::broadcast(shape1, shape2));
        }
    }

    result.reverse();
    Ok(result)
}

/// Computes the broadcast shape of any number of shapes.
pub fn broadcast_shapes<'a>(shapes: impl IntoIterator<Item = &'a [usize]>) -> Result<Shape> {
    let mut result = Shape::new();
    for shape in shapes {
        result = broadcast_shape(&result, shape)?;
    }
    Ok(result)
}

/// Computes strides that present `shape` as `target_shape`.
///
/// Fails unless `shape` broadcasts to exactly `target_shape`.
pub fn broadcast_strides(
    shape: &[usize],
    strides: &[isize],
    target_shape: &[usize],
) -> Result<Strides> {
    if shape.len() > target_shape.len() {
        return Err(Error::broadcast(shape, target_shape));
    }

    let mut result = Strides::with_capacity(target_shape.len());
    let shape_offset = target_shape.len() - shape.len();

    for (i, &target_dim) in target_shape.iter().enumerate() {
        if i < shape_offset {
            result.push(0);
        } else {
            let orig_idx = i - shape_offset;
            let orig_dim = shape[orig_idx];

            if orig_dim == target_dim {
                result.push(strides[orig_idx]);
            } else if orig_dim == 1 {
                result.push(0);
            } else {
                return Err(Error::broadcast(shape, target_shape));
            }
        }
    }

    Ok(result)
}

// =============================================================================
// Shape Manipulation
// =============================================================================

/// Resolves a reshape target, validating that total elements match.
///
/// Supports -1 in one dimension to infer the size.
pub fn reshape(old_shape: &[usize], new_shape: &[isize]) -> Result<Shape> {
    let old_numel = numel(old_shape);
    let mut result = Shape::with_capacity(new_shape.len());
    let mut infer_idx = None;
    let mut known_numel = 1usize;

    for (i, &dim) in new_shape.iter().enumerate() {
        if dim == -1 {
            if infer_idx.is_some() {
                return Err(Error::value("can only specify one unknown dimension"));
            }
            infer_idx = Some(i);
            result.push(0);
        } else if dim < 0 {
            return Err(Error::value(format!("negative dimension {dim} in reshape")));
        } else {
            let d = dim as usize;
            known_numel *= d;
            result.push(d);
        }
    }

    if let Some(idx) = infer_idx {
        if known_numel == 0 || old_numel % known_numel != 0 {
            return Err(Error::value(format!(
                "cannot reshape array of size {old_numel} into shape {new_shape:?}"
            )));
        }
        result[idx] = old_numel / known_numel;
    } else if known_numel != old_numel {
        return Err(Error::value(format!(
            "cannot reshape array of size {old_numel} into shape {new_shape:?}"
        )));
    }

    Ok(result)
}

// =============================================================================
// Tests
// =============================================================================
