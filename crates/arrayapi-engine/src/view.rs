//! Views and Indexing - Index Resolution, Joining
//!
//! Resolves `NumPy`-style index expressions against a strided layout.
//! Integers, slices, ellipsis and new axes produce views sharing storage;
//! integer and boolean arrays (and boolean scalars) select elements by
//! gathering their storage positions.
//!
//! # Key Features
//! - `RawIndex` index expressions
//! - Basic indexing as zero-copy views (negative steps included)
//! - Advanced indexing with broadcast index arrays
//! - Reads (`get`) and broadcasting writes (`set`)
//! - `concat` and `stack` of raw arrays
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::dtype::{DType, DTypeClass, Value};
use arrayapi_core::error::{Error, Result};

use crate::raw::{dispatch_all, with_tensor, RawArray, RawElement, RawValue};
use crate::shape::{
    broadcast_shapes, normalize_axis, numel, relative_offsets, unravel_index, Shape, Strides,
};
use crate::tensor::Tensor;

// =============================================================================
// Index Expressions
// =============================================================================

/// A slice bound or step.
#[derive(Debug, Clone)]
pub enum RawBound {
    /// A plain integer.
    Int(i64),
    /// A 0-d integer array.
    Array(RawArray),
}

/// `start:stop:step` with optional parts.
#[derive(Debug, Clone, Default)]
pub struct RawSlice {
    /// First index (inclusive).
    pub start: Option<RawBound>,
    /// Last index (exclusive).
    pub stop: Option<RawBound>,
    /// Step; defaults to 1.
    pub step: Option<RawBound>,
}

impl RawSlice {
    /// Creates a slice from plain integer parts.
    #[must_use]
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self {
            start: start.map(RawBound::Int),
            stop: stop.map(RawBound::Int),
            step: step.map(RawBound::Int),
        }
    }

    /// The full slice `:`.
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }
}

/// One component of an index expression.
#[derive(Debug, Clone)]
pub enum RawIndexItem {
    /// Selects one position and drops the axis.
    Int(i64),
    /// Selects a strided range.
    Slice(RawSlice),
    /// Expands to as many full slices as needed.
    Ellipsis,
    /// Inserts an axis of size 1.
    NewAxis,
    /// Inserts an axis of size 1 (true) or 0 (false).
    Bool(bool),
    /// An integer or boolean index array.
    Array(RawArray),
}

/// A complete index expression; a single item and a 1-tuple are equivalent.
#[derive(Debug, Clone, Default)]
pub struct RawIndex(pub Vec<RawIndexItem>);

impl RawIndex {
    /// An index of one item.
    #[must_use]
    pub fn single(item: RawIndexItem) -> Self {
        Self(vec![item])
    }
}

impl From<Vec<RawIndexItem>> for RawIndex {
    fn from(items: Vec<RawIndexItem>) -> Self {
        Self(items)
    }
}

// =============================================================================
// Slice Adjustment
// =============================================================================

fn bound_value(bound: &RawBound) -> Result<i64> {
    match bound {
        RawBound::Int(i) => Ok(*i),
        RawBound::Array(a) if a.ndim() == 0 && a.dtype().is_integer() => {
            Ok(a.item_value()?.as_i64())
        }
        RawBound::Array(_) => Err(Error::type_error(
            "slice indices must be integers or None or have an __index__ method",
        )),
    }
}

/// Clamps a slice against an axis of size `n`.
///
/// Returns `(start, step, length)`.
pub(crate) fn adjust_slice(slice: &RawSlice, n: usize) -> Result<(i64, i64, usize)> {
    let step = match &slice.step {
        Some(b) => bound_value(b)?,
        None => 1,
    };
    if step == 0 {
        return Err(Error::value("slice step cannot be zero"));
    }

    let n = n as i64;
    let clamp = |value: i64| -> i64 {
        if value < 0 {
            let shifted = value + n;
            if shifted < 0 {
                if step < 0 {
                    -1
                } else {
                    0
                }
            } else {
                shifted
            }
        } else if value >= n {
            if step < 0 {
                n - 1
            } else {
                n
            }
        } else {
            value
        }
    };

    let start = match &slice.start {
        Some(b) => clamp(bound_value(b)?),
        None if step < 0 => n - 1,
        None => 0,
    };
    let stop = match &slice.stop {
        Some(b) => clamp(bound_value(b)?),
        None if step < 0 => -1,
        None => n,
    };

    let length = if step < 0 {
        if stop < start {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        }
    } else if start < stop {
        (stop - start - 1) / step + 1
    } else {
        0
    };

    Ok((start, step, length as usize))
}

// =============================================================================
// Selection
// =============================================================================

/// The storage footprint of an index expression.
#[derive(Debug)]
pub(crate) enum Selection {
    /// A strided view; `bare` marks a fully integer-indexed element.
    View {
        shape: Shape,
        strides: Strides,
        offset: usize,
        bare: bool,
    },
    /// Gathered elements in C order of `shape`.
    Gather { shape: Shape, positions: Vec<usize> },
}

/// A normalized index component.
enum Prepared {
    Int(i64),
    Slice(RawSlice),
    Ellipsis,
    NewAxis,
    BoolScalar(bool),
    IntArray(RawArray),
    BoolArray(RawArray),
}

impl Prepared {
    fn consumed(&self) -> usize {
        match self {
            Self::Int(_) | Self::Slice(_) | Self::IntArray(_) => 1,
            Self::BoolArray(a) => a.ndim(),
            Self::Ellipsis | Self::NewAxis | Self::BoolScalar(_) => 0,
        }
    }
}

fn prepare(item: &RawIndexItem) -> Result<Prepared> {
    Ok(match item {
        RawIndexItem::Int(i) => Prepared::Int(*i),
        RawIndexItem::Slice(s) => Prepared::Slice(s.clone()),
        RawIndexItem::Ellipsis => Prepared::Ellipsis,
        RawIndexItem::NewAxis => Prepared::NewAxis,
        RawIndexItem::Bool(b) => Prepared::BoolScalar(*b),
        RawIndexItem::Array(a) => match a.dtype().class() {
            DTypeClass::Boolean if a.ndim() == 0 => {
                Prepared::BoolScalar(a.item_value()?.as_bool())
            }
            DTypeClass::Boolean => Prepared::BoolArray(a.clone()),
            DTypeClass::Integer if a.ndim() == 0 => Prepared::Int(a.item_value()?.as_i64()),
            DTypeClass::Integer => Prepared::IntArray(a.clone()),
            DTypeClass::Floating => {
                return Err(Error::index(
                    "arrays used as indices must be of integer (or boolean) type",
                ))
            }
        },
    })
}

/// An advanced index attached to one axis of the intermediate view.
struct Advanced {
    axis: usize,
    shape: Shape,
    values: Vec<i64>,
}

fn wrap_index(index: i64, size: usize, axis: usize) -> Result<i64> {
    let n = size as i64;
    let resolved = if index < 0 { index + n } else { index };
    if resolved < 0 || resolved >= n {
        return Err(Error::index(format!(
            "index {index} is out of bounds for axis {axis} with size {size}"
        )));
    }
    Ok(resolved)
}

/// Resolves `index` against a strided layout.
pub(crate) fn select(
    shape: &[usize],
    strides: &[isize],
    offset: usize,
    index: &RawIndex,
) -> Result<Selection> {
    let items = index.0.iter().map(prepare).collect::<Result<Vec<_>>>()?;

    let ellipses = items.iter().filter(|i| matches!(i, Prepared::Ellipsis)).count();
    if ellipses > 1 {
        return Err(Error::index("an index can only have a single ellipsis ('...')"));
    }
    let consumed: usize = items.iter().map(Prepared::consumed).sum();
    if consumed > shape.len() {
        return Err(Error::index(format!(
            "too many indices for array: array is {}-dimensional, but {} were indexed",
            shape.len(),
            consumed
        )));
    }

    let mut out_shape = Shape::new();
    let mut out_strides = Strides::new();
    let mut base = offset as isize;
    let mut advanced: Vec<Advanced> = Vec::new();
    let mut axis = 0usize;

    for item in &items {
        match item {
            Prepared::Int(i) => {
                let resolved = wrap_index(*i, shape[axis], axis)?;
                base += resolved as isize * strides[axis];
                axis += 1;
            }
            Prepared::Slice(slice) => {
                let (start, step, length) = adjust_slice(slice, shape[axis])?;
                if length > 0 {
                    base += start as isize * strides[axis];
                }
                out_shape.push(length);
                out_strides.push(strides[axis] * step as isize);
                axis += 1;
            }
            Prepared::Ellipsis => {
                let fill = shape.len() - consumed;
                for _ in 0..fill {
                    out_shape.push(shape[axis]);
                    out_strides.push(strides[axis]);
                    axis += 1;
                }
            }
            Prepared::NewAxis => {
                out_shape.push(1);
                out_strides.push(0);
            }
            Prepared::BoolScalar(b) => {
                advanced.push(Advanced {
                    axis: out_shape.len(),
                    shape: Shape::from_slice(&[usize::from(*b)]),
                    values: if *b { vec![0] } else { Vec::new() },
                });
                out_shape.push(1);
                out_strides.push(0);
            }
            Prepared::IntArray(array) => {
                advanced.push(Advanced {
                    axis: out_shape.len(),
                    shape: Shape::from_slice(array.shape()),
                    values: array.values().into_iter().map(Value::as_i64).collect(),
                });
                out_shape.push(shape[axis]);
                out_strides.push(strides[axis]);
                axis += 1;
            }
            Prepared::BoolArray(mask) => {
                let k = mask.ndim();
                for (j, (&mask_dim, &dim)) in mask.shape().iter().zip(&shape[axis..axis + k]).enumerate() {
                    if mask_dim != dim {
                        return Err(Error::index(format!(
                            "boolean index did not match indexed array along axis {}; size of axis is {} but size of corresponding boolean axis is {}",
                            axis + j,
                            dim,
                            mask_dim
                        )));
                    }
                }
                let coords = nonzero_coords(mask);
                let count = coords.first().map_or(0, Vec::len);
                for column in coords {
                    advanced.push(Advanced {
                        axis: out_shape.len(),
                        shape: Shape::from_slice(&[count]),
                        values: column,
                    });
                    out_shape.push(shape[axis]);
                    out_strides.push(strides[axis]);
                    axis += 1;
                }
            }
        }
    }

    while axis < shape.len() {
        out_shape.push(shape[axis]);
        out_strides.push(strides[axis]);
        axis += 1;
    }

    if advanced.is_empty() {
        let bare = out_shape.is_empty() && items.iter().all(|i| matches!(i, Prepared::Int(_)));
        return Ok(Selection::View {
            shape: out_shape,
            strides: out_strides,
            offset: base as usize,
            bare,
        });
    }

    gather(&out_shape, &out_strides, base, &advanced)
}

/// Coordinates of the true elements of a mask, one vector per axis.
fn nonzero_coords(mask: &RawArray) -> Vec<Vec<i64>> {
    let shape = mask.shape().to_vec();
    let mut coords = vec![Vec::new(); shape.len()];
    for (linear, value) in mask.values().into_iter().enumerate() {
        if value.as_bool() {
            let index = unravel_index(linear, &shape);
            for (column, i) in coords.iter_mut().zip(index) {
                column.push(i as i64);
            }
        }
    }
    coords
}

fn gather(
    view_shape: &[usize],
    view_strides: &[isize],
    base: isize,
    advanced: &[Advanced],
) -> Result<Selection> {
    let index_shapes: Vec<&[usize]> = advanced.iter().map(|a| a.shape.as_slice()).collect();
    let broadcast = broadcast_shapes(index_shapes.iter().copied()).map_err(|_| {
        Error::index(format!(
            "shape mismatch: indexing arrays could not be broadcast together with shapes {index_shapes:?}"
        ))
    })?;

    // Offset contributed by the advanced axes for each broadcast position.
    let mut advanced_offsets = vec![0isize; numel(&broadcast)];
    for adv in advanced {
        let size = view_shape[adv.axis];
        let values = Tensor::from_vec(adv.values.clone(), &adv.shape)?
            .broadcast_to(&broadcast)?
            .to_vec();
        for (slot, value) in advanced_offsets.iter_mut().zip(values) {
            let resolved = wrap_index(value, size, adv.axis)?;
            *slot += resolved as isize * view_strides[adv.axis];
        }
    }

    let axes: Vec<usize> = advanced.iter().map(|a| a.axis).collect();
    let consecutive = axes.windows(2).all(|w| w[1] == w[0] + 1);
    let first = axes[0];

    let (mut before_shape, mut before_strides) = (Shape::new(), Strides::new());
    let (mut after_shape, mut after_strides) = (Shape::new(), Strides::new());
    for (axis, (&dim, &stride)) in view_shape.iter().zip(view_strides).enumerate() {
        if axes.contains(&axis) {
            continue;
        }
        if consecutive && axis < first {
            before_shape.push(dim);
            before_strides.push(stride);
        } else {
            after_shape.push(dim);
            after_strides.push(stride);
        }
    }

    let before = relative_offsets(&before_shape, &before_strides);
    let after = relative_offsets(&after_shape, &after_strides);

    let mut positions = Vec::with_capacity(before.len() * advanced_offsets.len() * after.len());
    for &b in &before {
        for &a in &advanced_offsets {
            for &r in &after {
                positions.push((base + b + a + r) as usize);
            }
        }
    }

    let mut shape = before_shape;
    shape.extend_from_slice(&broadcast);
    shape.extend_from_slice(&after_shape);

    Ok(Selection::Gather { shape, positions })
}

// =============================================================================
// Indexing on Raw Arrays
// =============================================================================

impl RawArray {
    /// Reads `self[index]`.
    ///
    /// Basic indices produce views; a fully integer-indexed element is
    /// returned as a bare scalar.
    pub fn get(&self, index: &RawIndex) -> Result<RawValue> {
        with_tensor!(self, t => {
            match select(t.shape(), t.strides(), t.offset(), index)? {
                Selection::View { shape, strides, offset, bare } => {
                    Ok(RawValue::from_array(t.view(shape, strides, offset).into(), bare))
                }
                Selection::Gather { shape, positions } => {
                    let data = t.read_positions(&positions);
                    Ok(RawValue::Array(Tensor::from_data(data, &shape).into()))
                }
            }
        })
    }

    /// Writes `value` into `self[index]`, broadcasting and casting it.
    pub fn set(&self, index: &RawIndex, value: &Self) -> Result<()> {
        with_tensor!(self, t => set_typed(t, index, value))
    }
}

fn set_typed<T: RawElement>(target: &Tensor<T>, index: &RawIndex, value: &RawArray) -> Result<()> {
    let src: Tensor<T> = value.typed();
    match select(target.shape(), target.strides(), target.offset(), index)? {
        Selection::View {
            shape,
            strides,
            offset,
            ..
        } => target.view(shape, strides, offset).assign(&src),
        Selection::Gather { shape, positions } => {
            let values = src
                .broadcast_to(&shape)
                .map_err(|_| {
                    Error::value(format!(
                        "shape mismatch: value array of shape {:?} could not be broadcast to indexing result of shape {:?}",
                        value.shape(),
                        shape.as_slice()
                    ))
                })?
                .to_vec();
            target.write_positions(&positions, &values);
            Ok(())
        }
    }
}

// =============================================================================
// Joining
// =============================================================================

fn joined_dtype(arrays: &[RawArray]) -> Result<DType> {
    let first = arrays
        .first()
        .ok_or_else(|| Error::value("need at least one array to concatenate"))?;
    Ok(arrays
        .iter()
        .skip(1)
        .fold(first.dtype(), |acc, a| acc.promote(a.dtype())))
}

/// Joins arrays along an existing axis.
pub fn concat(arrays: &[RawArray], axis: usize) -> Result<RawArray> {
    let dtype = joined_dtype(arrays)?;
    let first = &arrays[0];
    if first.ndim() == 0 {
        return Err(Error::value("zero-dimensional arrays cannot be concatenated"));
    }
    if axis >= first.ndim() {
        return Err(Error::InvalidDimension {
            index: axis as i64,
            ndim: first.ndim(),
        });
    }

    let mut shape = Shape::from_slice(first.shape());
    shape[axis] = 0;
    for array in arrays {
        let matches = array.ndim() == first.ndim()
            && array
                .shape()
                .iter()
                .zip(first.shape())
                .enumerate()
                .all(|(d, (a, b))| d == axis || a == b);
        if !matches {
            return Err(Error::value(format!(
                "all the input array dimensions except for the concatenation axis must match exactly, but got shapes {:?} and {:?}",
                first.shape(),
                array.shape()
            )));
        }
        shape[axis] += array.shape()[axis];
    }

    dispatch_all!(dtype, T => {
        let parts: Vec<Vec<T>> = arrays.iter().map(|a| a.typed::<T>().to_vec()).collect();
        let outer: usize = shape[..axis].iter().product();
        let mut data = Vec::with_capacity(numel(&shape));
        for o in 0..outer {
            for (array, part) in arrays.iter().zip(&parts) {
                let chunk: usize = array.shape()[axis..].iter().product();
                data.extend_from_slice(&part[o * chunk..(o + 1) * chunk]);
            }
        }
        RawArray::from_vec(data, &shape)
    })
}

/// Joins arrays along a new axis.
pub fn stack(arrays: &[RawArray], axis: isize) -> Result<RawArray> {
    let first = arrays
        .first()
        .ok_or_else(|| Error::value("need at least one array to stack"))?;
    if arrays.iter().any(|a| a.shape() != first.shape()) {
        return Err(Error::value("all input arrays must have the same shape"));
    }

    let axis = normalize_axis(axis, first.ndim() + 1)?;
    let expanded = arrays
        .iter()
        .map(|a| a.expand_dims(axis))
        .collect::<Result<Vec<_>>>()?;
    concat(&expanded, axis)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(n: i64, shape: &[usize]) -> RawArray {
        RawArray::from_vec((0..n).collect::<Vec<i64>>(), shape).unwrap()
    }

    fn ints(array: &RawArray) -> Vec<i64> {
        array.values().into_iter().map(Value::as_i64).collect()
    }

    fn slice(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> RawIndexItem {
        RawIndexItem::Slice(RawSlice::new(start, stop, step))
    }

    #[test]
    fn test_adjust_slice() {
        assert_eq!(adjust_slice(&RawSlice::new(None, None, None), 5).unwrap(), (0, 1, 5));
        assert_eq!(adjust_slice(&RawSlice::new(None, None, Some(-1)), 5).unwrap(), (4, -1, 5));
        assert_eq!(adjust_slice(&RawSlice::new(Some(-2), None, None), 5).unwrap(), (3, 1, 2));
        assert_eq!(adjust_slice(&RawSlice::new(Some(10), None, None), 5).unwrap(), (5, 1, 0));
        assert_eq!(adjust_slice(&RawSlice::new(Some(1), Some(4), Some(2)), 5).unwrap(), (1, 2, 2));
        assert!(adjust_slice(&RawSlice::new(None, None, Some(0)), 5).is_err());
    }

    #[test]
    fn test_integer_index_is_bare() {
        let a = arange(6, &[2, 3]);
        let v = a.get(&RawIndex(vec![RawIndexItem::Int(1), RawIndexItem::Int(-1)])).unwrap();
        assert!(v.is_scalar());
        assert_eq!(v.into_array().scalar_value(), Some(Value::Int(5)));
    }

    #[test]
    fn test_ellipsis_keeps_zero_d_array() {
        let a = RawArray::scalar(Value::Int(3), DType::I64);
        let v = a.get(&RawIndex::single(RawIndexItem::Ellipsis)).unwrap();
        assert!(!v.is_scalar());
    }

    #[test]
    fn test_slice_view_shares_storage() {
        let a = arange(6, &[6]);
        let v = a.get(&RawIndex::single(slice(None, None, Some(-2)))).unwrap().into_array();
        assert_eq!(ints(&v), vec![5, 3, 1]);
        assert!(v.shares_buffer(&a));
    }

    #[test]
    fn test_out_of_bounds_integer() {
        let a = arange(3, &[3]);
        let err = a.get(&RawIndex::single(RawIndexItem::Int(3))).unwrap_err();
        assert!(err.is_index_error());
    }

    #[test]
    fn test_too_many_indices() {
        let a = arange(3, &[3]);
        let index = RawIndex(vec![RawIndexItem::Int(0), RawIndexItem::Int(0)]);
        assert!(a.get(&index).unwrap_err().is_index_error());
    }

    #[test]
    fn test_boolean_mask() {
        let a = arange(6, &[2, 3]);
        let mask = RawArray::from_vec(vec![true, false], &[2]).unwrap();
        let v = a.get(&RawIndex::single(RawIndexItem::Array(mask))).unwrap().into_array();
        assert_eq!(v.shape(), &[1, 3]);
        assert_eq!(ints(&v), vec![0, 1, 2]);

        let full = RawArray::from_vec(vec![true, false, true, false, false, true], &[2, 3]).unwrap();
        let v = a.get(&RawIndex::single(RawIndexItem::Array(full))).unwrap().into_array();
        assert_eq!(ints(&v), vec![0, 2, 5]);
    }

    #[test]
    fn test_boolean_scalar() {
        let a = arange(3, &[3]);
        let t = a.get(&RawIndex::single(RawIndexItem::Bool(true))).unwrap().into_array();
        assert_eq!(t.shape(), &[1, 3]);
        let f = a.get(&RawIndex::single(RawIndexItem::Bool(false))).unwrap().into_array();
        assert_eq!(f.shape(), &[0, 3]);
    }

    #[test]
    fn test_integer_array_placement() {
        let a = arange(24, &[2, 3, 4]);
        let idx = RawArray::from_vec(vec![0i64, 2], &[2]).unwrap();
        let v = a
            .get(&RawIndex(vec![slice(None, None, None), RawIndexItem::Array(idx.clone())]))
            .unwrap()
            .into_array();
        assert_eq!(v.shape(), &[2, 2, 4]);
        assert_eq!(ints(&v)[..4], [0, 1, 2, 3]);
        assert_eq!(ints(&v)[4..8], [8, 9, 10, 11]);

        // Separated advanced indices move to the front.
        let v = a
            .get(&RawIndex(vec![
                RawIndexItem::Array(idx),
                slice(None, None, None),
                RawIndexItem::Array(RawArray::from_vec(vec![1i64, 3], &[2]).unwrap()),
            ]))
            .unwrap()
            .into_array();
        assert_eq!(v.shape(), &[2, 3]);
        assert_eq!(ints(&v), vec![1, 5, 9, 15, 19, 23]);
    }

    #[test]
    fn test_float_array_index_rejected() {
        let a = arange(3, &[3]);
        let idx = RawArray::from_vec(vec![0.0f64], &[1]).unwrap();
        assert!(a.get(&RawIndex::single(RawIndexItem::Array(idx))).is_err());
    }

    #[test]
    fn test_set_view_and_gather() {
        let a = arange(6, &[2, 3]);
        a.set(
            &RawIndex(vec![RawIndexItem::Int(0)]),
            &RawArray::scalar(Value::Int(9), DType::I64),
        )
        .unwrap();
        assert_eq!(ints(&a), vec![9, 9, 9, 3, 4, 5]);

        let mask = RawArray::from_vec(vec![false, true], &[2]).unwrap();
        a.set(
            &RawIndex::single(RawIndexItem::Array(mask)),
            &RawArray::scalar(Value::Float(1.9), DType::F64),
        )
        .unwrap();
        assert_eq!(ints(&a), vec![9, 9, 9, 1, 1, 1]);
    }

    #[test]
    fn test_concat_and_stack() {
        let a = arange(4, &[2, 2]);
        let b = RawArray::from_vec(vec![10i32, 11], &[1, 2]).unwrap();
        let c = concat(&[a.clone(), b], 0).unwrap();
        assert_eq!(c.shape(), &[3, 2]);
        assert_eq!(c.dtype(), DType::I64);
        assert_eq!(ints(&c), vec![0, 1, 2, 3, 10, 11]);

        let s = stack(&[a.clone(), a], -1).unwrap();
        assert_eq!(s.shape(), &[2, 2, 2]);
        assert_eq!(ints(&s), vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }
}
