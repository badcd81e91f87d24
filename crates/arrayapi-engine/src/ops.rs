//! Array Operations - Structural, Searching and Set Operations
//!
//! Standalone functions over raw arrays that go beyond single elementwise
//! kernels. Operations are organized by category.
//!
//! # Categories
//!
//! ## Shape Manipulation
//! - `flip` - Reverses element order along axes (a view)
//! - `roll` - Circular shift along axes or the flattened array
//! - `squeeze` - Removes size-1 axes
//!
//! ## Searching
//! - `argmax`, `argmin` - Positions of extreme values
//! - `nonzero` - Coordinates of non-zero elements
//! - `where_` - Elementwise selection between two arrays
//!
//! ## Set Operations
//! - `unique` - Sorted distinct values with counts, first indices, inverse
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::cmp::Ordering;

use arrayapi_core::error::{Error, Result};

use crate::promotion::result_type;
use crate::raw::{dispatch_all, with_tensor, RawArray, RawElement};
use crate::shape::{
    broadcast_shapes, contiguous_strides, normalize_axes, normalize_axis, unravel_index, Shape,
};
use crate::tensor::Tensor;

/// Resolves an optional axis list; `None` selects every axis.
fn resolve_axes(axes: Option<&[isize]>, ndim: usize) -> Result<Vec<usize>> {
    match axes {
        Some(axes) => normalize_axes(axes, ndim),
        None => Ok((0..ndim).collect()),
    }
}

// =============================================================================
// Flip Operation
// =============================================================================

/// Reverses the order of elements along `axes` (all axes when `None`).
pub fn flip(x: &RawArray, axes: Option<&[isize]>) -> Result<RawArray> {
    let axes = resolve_axes(axes, x.ndim())?;
    Ok(x.flip_axes(&axes))
}

// =============================================================================
// Roll Operation
// =============================================================================

/// Rolls elements along `axes`; with `None` the flattened array is rolled
/// and the original shape restored.
///
/// A single shift applies to every axis; otherwise shifts pair with axes.
pub fn roll(x: &RawArray, shifts: &[isize], axes: Option<&[isize]>) -> Result<RawArray> {
    let Some(axes) = axes else {
        let shift = match shifts {
            [shift] => *shift,
            _ => {
                return Err(Error::value(
                    "shift must be a single integer when rolling the flattened array",
                ))
            }
        };
        let flat = x.reshape(&[-1])?;
        let rolled = with_tensor!(&flat, t => roll_typed(t, &[shift], &[0]))?;
        let shape: Vec<isize> = x.shape().iter().map(|&d| d as isize).collect();
        return rolled.reshape(&shape);
    };

    let axes: Vec<usize> = axes
        .iter()
        .map(|&a| normalize_axis(a, x.ndim()))
        .collect::<Result<_>>()?;
    let shifts: Vec<isize> = match shifts {
        [shift] => vec![*shift; axes.len()],
        _ if shifts.len() == axes.len() => shifts.to_vec(),
        _ => {
            return Err(Error::value(
                "'shift' and 'axis' should be scalars or 1D sequences of the same length",
            ))
        }
    };

    with_tensor!(x, t => roll_typed(t, &shifts, &axes))
}

fn roll_typed<T: RawElement>(x: &Tensor<T>, shifts: &[isize], axes: &[usize]) -> Result<RawArray> {
    let shape = x.shape();
    let data = x.to_vec();
    let strides = contiguous_strides(shape);

    let mut result = data.clone();
    for (src_linear, &value) in data.iter().enumerate() {
        let mut index = unravel_index(src_linear, shape);

        for (&shift, &axis) in shifts.iter().zip(axes) {
            let size = shape[axis] as isize;
            index[axis] = (index[axis] as isize + shift).rem_euclid(size) as usize;
        }

        let dst_linear: isize = index
            .iter()
            .zip(strides.iter())
            .map(|(&i, &s)| i as isize * s)
            .sum();
        result[dst_linear as usize] = value;
    }

    RawArray::from_vec(result, shape)
}

// =============================================================================
// Squeeze Operation
// =============================================================================

/// Removes the given axes, each of which must have size 1; `None` removes
/// every size-1 axis.
pub fn squeeze(x: &RawArray, axes: Option<&[isize]>) -> Result<RawArray> {
    let axes = match axes {
        Some(axes) => normalize_axes(axes, x.ndim())?,
        None => (0..x.ndim()).filter(|&a| x.shape()[a] == 1).collect(),
    };
    x.squeeze_axes(&axes)
}

// =============================================================================
// Searching
// =============================================================================

/// Elementwise selection: `x` where `condition` is true, else `y`.
///
/// The result dtype is the engine's result type of `x` and `y`.
pub fn where_(condition: &RawArray, x: &RawArray, y: &RawArray) -> Result<RawArray> {
    let dtype = result_type(x, y);
    let shape = broadcast_shapes([condition.shape(), x.shape(), y.shape()])?;
    let mask = condition.typed::<bool>().broadcast_to(&shape)?.to_vec();

    dispatch_all!(dtype, T => {
        let xs = x.typed::<T>().broadcast_to(&shape)?.to_vec();
        let ys = y.typed::<T>().broadcast_to(&shape)?.to_vec();
        let data: Vec<T> = mask
            .iter()
            .zip(xs.into_iter().zip(ys))
            .map(|(&c, (a, b))| if c { a } else { b })
            .collect();
        RawArray::from_vec(data, &shape)
    })
}

/// Coordinates of the non-zero elements, one `int64` array per axis.
pub fn nonzero(x: &RawArray) -> Result<Vec<RawArray>> {
    if x.ndim() == 0 {
        return Err(Error::value(
            "Calling nonzero on 0d arrays is not allowed. Use an explicit 1d array instead.",
        ));
    }

    let shape = x.shape().to_vec();
    let mut coords = vec![Vec::<i64>::new(); shape.len()];
    for (linear, value) in x.values().into_iter().enumerate() {
        if value.as_bool() {
            for (column, i) in coords.iter_mut().zip(unravel_index(linear, &shape)) {
                column.push(i as i64);
            }
        }
    }

    coords
        .into_iter()
        .map(|column| {
            let n = column.len();
            RawArray::from_vec(column, &[n])
        })
        .collect()
}

fn is_nan<T: PartialOrd>(v: &T) -> bool {
    v.partial_cmp(v).is_none()
}

/// Index of the preferred element of `lane`; the first NaN always wins.
fn arg_extreme<T: PartialOrd>(lane: &[T], wanted: Ordering) -> usize {
    let mut best = 0;
    for (i, v) in lane.iter().enumerate().skip(1) {
        if is_nan(&lane[best]) {
            break;
        }
        if is_nan(v) || v.partial_cmp(&lane[best]) == Some(wanted) {
            best = i;
        }
    }
    best
}

fn arg_reduce(
    x: &RawArray,
    axis: Option<isize>,
    keepdims: bool,
    wanted: Ordering,
    name: &str,
) -> Result<RawArray> {
    if x.numel() == 0 {
        return Err(Error::value(format!(
            "attempt to get {name} of an empty sequence"
        )));
    }

    let (lanes_source, lane_len, out_shape): (RawArray, usize, Shape) = match axis {
        None => {
            let shape: Shape = if keepdims {
                x.shape().iter().map(|_| 1).collect()
            } else {
                Shape::new()
            };
            (x.reshape(&[-1])?, x.numel(), shape)
        }
        Some(axis) => {
            let axis = normalize_axis(axis, x.ndim())?;
            let mut order: Vec<usize> = (0..x.ndim()).filter(|&a| a != axis).collect();
            order.push(axis);
            let mut shape = Shape::from_slice(x.shape());
            if keepdims {
                shape[axis] = 1;
            } else {
                shape.remove(axis);
            }
            (x.permute(&order)?, x.shape()[axis], shape)
        }
    };

    let indices: Vec<i64> = with_tensor!(&lanes_source, t => {
        t.to_vec()
            .chunks(lane_len)
            .map(|lane| arg_extreme(lane, wanted) as i64)
            .collect()
    });
    RawArray::from_vec(indices, &out_shape)
}

/// Index of the largest element along `axis` (of the flattened array when
/// `None`).
pub fn argmax(x: &RawArray, axis: Option<isize>, keepdims: bool) -> Result<RawArray> {
    arg_reduce(x, axis, keepdims, Ordering::Greater, "argmax")
}

/// Index of the smallest element along `axis` (of the flattened array when
/// `None`).
pub fn argmin(x: &RawArray, axis: Option<isize>, keepdims: bool) -> Result<RawArray> {
    arg_reduce(x, axis, keepdims, Ordering::Less, "argmin")
}

// =============================================================================
// Unique Operation
// =============================================================================

/// Result of `unique`.
#[derive(Debug, Clone)]
pub struct UniqueResult {
    /// Sorted distinct values (1-D).
    pub values: RawArray,
    /// Occurrences of each value.
    pub counts: Option<RawArray>,
    /// Flat index of the first occurrence of each value.
    pub indices: Option<RawArray>,
    /// Position in `values` of every input element, shaped like the input.
    pub inverse: Option<RawArray>,
}

/// Returns the sorted distinct elements of `x`.
///
/// NaNs sort last and are never equal to each other.
pub fn unique(
    x: &RawArray,
    return_counts: bool,
    return_index: bool,
    return_inverse: bool,
) -> Result<UniqueResult> {
    let (values, first, counts, inverse) = with_tensor!(x, t => unique_typed(t))?;

    let n = counts.len();
    Ok(UniqueResult {
        values,
        counts: if return_counts {
            Some(RawArray::from_vec(counts, &[n])?)
        } else {
            None
        },
        indices: if return_index {
            Some(RawArray::from_vec(first, &[n])?)
        } else {
            None
        },
        inverse: if return_inverse {
            Some(RawArray::from_vec(inverse, x.shape())?)
        } else {
            None
        },
    })
}

type UniqueParts = (RawArray, Vec<i64>, Vec<i64>, Vec<i64>);

fn unique_typed<T: RawElement>(x: &Tensor<T>) -> Result<UniqueParts> {
    let data = x.to_vec();

    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| match data[a].partial_cmp(&data[b]) {
        Some(ordering) => ordering.then(a.cmp(&b)),
        None => is_nan(&data[a]).cmp(&is_nan(&data[b])).then(a.cmp(&b)),
    });

    let mut values: Vec<T> = Vec::new();
    let mut first: Vec<i64> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    let mut inverse = vec![0i64; data.len()];

    for &i in &order {
        let value = data[i];
        let repeat = values.last().is_some_and(|&last| last == value);
        if !repeat {
            values.push(value);
            first.push(i as i64);
            counts.push(0);
        }
        if let Some(count) = counts.last_mut() {
            *count += 1;
        }
        inverse[i] = values.len() as i64 - 1;
    }

    let n = values.len();
    Ok((RawArray::from_vec(values, &[n])?, first, counts, inverse))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrayapi_core::dtype::{DType, Value};

    fn ints(array: &RawArray) -> Vec<i64> {
        array.values().into_iter().map(Value::as_i64).collect()
    }

    fn floats(array: &RawArray) -> Vec<f64> {
        array.values().into_iter().map(Value::as_f64).collect()
    }

    #[test]
    fn test_flip() {
        let t = RawArray::from_vec(vec![1i32, 2, 3, 4], &[2, 2]).unwrap();
        assert_eq!(ints(&flip(&t, Some(&[0])).unwrap()), vec![3, 4, 1, 2]);
        assert_eq!(ints(&flip(&t, None).unwrap()), vec![4, 3, 2, 1]);
        assert!(flip(&t, Some(&[2])).is_err());
    }

    #[test]
    fn test_roll() {
        let t = RawArray::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[4]).unwrap();
        assert_eq!(floats(&roll(&t, &[1], Some(&[0])).unwrap()), vec![4.0, 1.0, 2.0, 3.0]);
        assert_eq!(floats(&roll(&t, &[-1], Some(&[0])).unwrap()), vec![2.0, 3.0, 4.0, 1.0]);
    }

    #[test]
    fn test_roll_flattened() {
        let t = RawArray::from_vec(vec![1i64, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let r = roll(&t, &[2], None).unwrap();
        assert_eq!(r.shape(), &[2, 3]);
        assert_eq!(ints(&r), vec![5, 6, 1, 2, 3, 4]);
        assert!(roll(&t, &[1, 2], None).is_err());
    }

    #[test]
    fn test_squeeze() {
        let t = RawArray::from_vec(vec![1u8, 2], &[1, 2, 1]).unwrap();
        assert_eq!(squeeze(&t, Some(&[0, -1])).unwrap().shape(), &[2]);
        assert_eq!(squeeze(&t, None).unwrap().shape(), &[2]);
        assert!(squeeze(&t, Some(&[1])).is_err());
    }

    #[test]
    fn test_where() {
        let c = RawArray::from_vec(vec![true, false, true], &[3]).unwrap();
        let x = RawArray::from_vec(vec![1i8, 2, 3], &[3]).unwrap();
        let y = RawArray::scalar(Value::Int(0), DType::I64);
        let r = where_(&c, &x, &y).unwrap();
        assert_eq!(r.dtype(), DType::I8);
        assert_eq!(ints(&r), vec![1, 0, 3]);
    }

    #[test]
    fn test_nonzero() {
        let t = RawArray::from_vec(vec![1.0f64, 0.0, 0.0, 2.0], &[2, 2]).unwrap();
        let coords = nonzero(&t).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(ints(&coords[0]), vec![0, 1]);
        assert_eq!(ints(&coords[1]), vec![0, 1]);
        assert_eq!(coords[0].dtype(), DType::I64);
        assert!(nonzero(&RawArray::scalar(Value::Int(1), DType::I64)).is_err());
    }

    #[test]
    fn test_argmax_argmin() {
        let t = RawArray::from_vec(vec![3i64, 9, 2, 7, 1, 8], &[2, 3]).unwrap();
        assert_eq!(ints(&argmax(&t, None, false).unwrap()), vec![1]);
        assert_eq!(argmax(&t, None, false).unwrap().ndim(), 0);
        assert_eq!(ints(&argmax(&t, Some(1), false).unwrap()), vec![1, 2]);
        assert_eq!(ints(&argmin(&t, Some(0), false).unwrap()), vec![0, 1, 0]);

        let kept = argmin(&t, Some(-1), true).unwrap();
        assert_eq!(kept.shape(), &[2, 1]);
        assert_eq!(ints(&kept), vec![2, 1]);

        let empty = RawArray::from_vec(Vec::<f32>::new(), &[0]).unwrap();
        assert!(argmax(&empty, None, false).is_err());
    }

    #[test]
    fn test_argmax_nan() {
        let t = RawArray::from_vec(vec![1.0f64, f64::NAN, 5.0], &[3]).unwrap();
        assert_eq!(ints(&argmax(&t, None, false).unwrap()), vec![1]);
        assert_eq!(ints(&argmin(&t, None, false).unwrap()), vec![1]);
    }

    #[test]
    fn test_unique() {
        let t = RawArray::from_vec(vec![3i64, 1, 3, 2, 1, 3], &[2, 3]).unwrap();
        let result = unique(&t, true, true, true).unwrap();
        assert_eq!(ints(&result.values), vec![1, 2, 3]);
        assert_eq!(ints(&result.counts.unwrap()), vec![2, 1, 3]);
        assert_eq!(ints(&result.indices.unwrap()), vec![1, 3, 0]);
        let inverse = result.inverse.unwrap();
        assert_eq!(inverse.shape(), &[2, 3]);
        assert_eq!(ints(&inverse), vec![2, 0, 2, 1, 0, 2]);
    }

    #[test]
    fn test_unique_nan_distinct() {
        let t = RawArray::from_vec(vec![f64::NAN, 1.0, f64::NAN], &[3]).unwrap();
        let result = unique(&t, true, false, false).unwrap();
        let values = floats(&result.values);
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan() && values[2].is_nan());
        assert!(result.indices.is_none());
    }
}
