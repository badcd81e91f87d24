//! Index Validation - The Supported Indexing Subset
//!
//! The engine accepts far more index expressions than the array API
//! standard requires. `validate_index` rejects everything outside the
//! standard subset and rewrites what remains into an engine `RawIndex`.
//! It runs to completion before the engine sees the key.
//!
//! Rejected, although the engine would accept them:
//! - slice starts and stops outside the axis
//! - boolean masks combined with other indices
//! - integer index arrays with dimensions
//! - `newaxis`
//!
//! # Key Features
//! - `Index` expression type with conversions from integers, ranges,
//!   slices, arrays and tuples
//! - Shape-dependent slice bound checks
//! - Ellipsis-aware pairing of tuple items with axes
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

use arrayapi_core::{Error, Result};
use arrayapi_engine::{RawBound, RawIndex, RawIndexItem, RawSlice};

use crate::array::Array;
use crate::rejected;

// =============================================================================
// Index Expressions
// =============================================================================

/// A slice bound or step.
#[derive(Debug, Clone)]
pub enum SliceBound {
    /// A plain integer.
    Int(i64),
    /// A 0-d array; never range checked.
    Array(Array),
}

/// `start:stop:step` with optional parts.
#[derive(Debug, Clone, Default)]
pub struct Slice {
    /// First index (inclusive).
    pub start: Option<SliceBound>,
    /// Last index (exclusive).
    pub stop: Option<SliceBound>,
    /// Step; defaults to 1.
    pub step: Option<SliceBound>,
}

impl Slice {
    /// Creates a slice from plain integer parts.
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self {
            start: start.map(SliceBound::Int),
            stop: stop.map(SliceBound::Int),
            step: step.map(SliceBound::Int),
        }
    }

    /// The full slice `:`.
    pub fn full() -> Self {
        Self::default()
    }

    fn to_raw(&self) -> RawSlice {
        let bound = |b: &Option<SliceBound>| {
            b.as_ref().map(|b| match b {
                SliceBound::Int(i) => RawBound::Int(*i),
                SliceBound::Array(a) => RawBound::Array(a.raw().clone()),
            })
        };
        RawSlice {
            start: bound(&self.start),
            stop: bound(&self.stop),
            step: bound(&self.step),
        }
    }
}

/// An index expression as written by the caller.
#[derive(Debug, Clone)]
pub enum Index {
    /// A single position.
    Int(i64),
    /// A strided range.
    Slice(Slice),
    /// `...`.
    Ellipsis,
    /// A new axis of size 1; always rejected.
    NewAxis,
    /// A boolean scalar.
    Bool(bool),
    /// A 0-d integer array or a boolean mask.
    Array(Array),
    /// A float; always rejected.
    Float(f64),
    /// Several indices applied to consecutive axes.
    Tuple(Vec<Index>),
}

impl Index {
    fn is_boolean(&self) -> bool {
        match self {
            Self::Bool(_) => true,
            Self::Array(a) => a.dtype().is_bool(),
            _ => false,
        }
    }
}

macro_rules! impl_index_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Index {
                fn from(i: $t) -> Self {
                    // Out of range for every axis, so the engine rejects it.
                    Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

impl_index_int!(i32, i64, isize, usize);

impl From<bool> for Index {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Index {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Slice> for Index {
    fn from(slice: Slice) -> Self {
        Self::Slice(slice)
    }
}

impl From<Array> for Index {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl From<&Array> for Index {
    fn from(array: &Array) -> Self {
        Self::Array(array.clone())
    }
}

impl From<Range<i64>> for Index {
    fn from(r: Range<i64>) -> Self {
        Self::Slice(Slice::new(Some(r.start), Some(r.end), None))
    }
}

impl From<RangeFrom<i64>> for Index {
    fn from(r: RangeFrom<i64>) -> Self {
        Self::Slice(Slice::new(Some(r.start), None, None))
    }
}

impl From<RangeTo<i64>> for Index {
    fn from(r: RangeTo<i64>) -> Self {
        Self::Slice(Slice::new(None, Some(r.end), None))
    }
}

impl From<RangeFull> for Index {
    fn from(_: RangeFull) -> Self {
        Self::Slice(Slice::full())
    }
}

impl From<Vec<Index>> for Index {
    fn from(items: Vec<Index>) -> Self {
        Self::Tuple(items)
    }
}

impl<A: Into<Index>, B: Into<Index>> From<(A, B)> for Index {
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Index>, B: Into<Index>, C: Into<Index>> From<(A, B, C)> for Index {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

// =============================================================================
// Validation
// =============================================================================

fn index_error(message: &str) -> Error {
    rejected(Error::index(message))
}

fn plain(bound: Option<&SliceBound>) -> Option<Option<i64>> {
    match bound {
        None => Some(None),
        Some(SliceBound::Int(i)) => Some(Some(*i)),
        Some(SliceBound::Array(_)) => None,
    }
}

fn check_slice(slice: &Slice, size: i64) -> Result<()> {
    let Some(start) = plain(slice.start.as_ref()) else {
        return Ok(());
    };
    if let Some(i) = start {
        if !(-size..=(size - 1).max(0)).contains(&i) {
            return Err(index_error(
                "Slices with out-of-bounds start are not allowed in the array API namespace",
            ));
        }
    }

    let (Some(stop), Some(step)) = (plain(slice.stop.as_ref()), plain(slice.step.as_ref())) else {
        return Ok(());
    };
    if let Some(j) = stop {
        let step = step.unwrap_or(1);
        let out_of_bounds = (step > 0 && !(-size..=size).contains(&j))
            || (step < 0 && !(-size - 1..=(size - 1).max(0)).contains(&j));
        if out_of_bounds {
            return Err(index_error(
                "Slices with out-of-bounds stop are not allowed in the array API namespace",
            ));
        }
    }
    Ok(())
}

fn check(key: &Index, shape: Option<&[usize]>) -> Result<()> {
    match key {
        Index::Slice(slice) => match shape.and_then(<[usize]>::first) {
            Some(&size) => check_slice(slice, size as i64),
            None => Ok(()),
        },
        Index::Tuple(items) => check_tuple(items, shape),
        Index::Int(_) | Index::Bool(_) | Index::Ellipsis => Ok(()),
        Index::Array(a) => {
            if a.dtype().is_integer() && a.ndim() != 0 {
                Err(index_error(
                    "Integer array indices with shape != () are not allowed in the array API namespace",
                ))
            } else {
                Ok(())
            }
        }
        Index::NewAxis => Err(index_error(
            "newaxis indices are not allowed in the array API namespace",
        )),
        Index::Float(_) => Err(index_error(
            "Only integers, slices (`:`), ellipsis (`...`), and boolean arrays are valid indices in the array API namespace",
        )),
    }
}

fn check_tuple(items: &[Index], shape: Option<&[usize]>) -> Result<()> {
    for item in items {
        if matches!(item, Index::Tuple(_)) {
            return Err(index_error(
                "Nested tuple indices are not allowed in the array API namespace",
            ));
        }
        check(item, None)?;
    }

    if items.iter().any(Index::is_boolean) {
        if items.len() == 1 {
            return Ok(());
        }
        return Err(index_error(
            "Boolean array indices combined with other indices are not allowed in the array API namespace",
        ));
    }

    let Some(shape) = shape else {
        return Ok(());
    };
    let ellipses: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches!(item, Index::Ellipsis))
        .map(|(i, _)| i)
        .collect();
    if ellipses.len() > 1 {
        return Ok(());
    }
    let split = ellipses.first().copied().unwrap_or(items.len());

    // Items after the ellipsis pair with the last axes, matched from the end.
    let leading = items[..split].iter().zip(shape.iter());
    let trailing = items
        .get(split + 1..)
        .unwrap_or_default()
        .iter()
        .rev()
        .zip(shape.iter().rev());
    for (item, &size) in leading.chain(trailing) {
        check(item, Some(core::slice::from_ref(&size)))?;
    }
    Ok(())
}

fn to_raw_item(key: &Index) -> RawIndexItem {
    match key {
        Index::Int(i) => RawIndexItem::Int(*i),
        Index::Slice(slice) => RawIndexItem::Slice(slice.to_raw()),
        Index::Ellipsis => RawIndexItem::Ellipsis,
        Index::Bool(b) => RawIndexItem::Bool(*b),
        Index::Array(a) => RawIndexItem::Array(a.raw().clone()),
        // Rejected by `check` before conversion.
        Index::NewAxis | Index::Float(_) | Index::Tuple(_) => RawIndexItem::NewAxis,
    }
}

/// Validates `key` against the supported subset and rewrites it for the
/// engine.
///
/// With `shape` set, slice bounds are checked against the axes they apply
/// to; without it only shape-independent rules run.
pub fn validate_index(key: &Index, shape: Option<&[usize]>) -> Result<RawIndex> {
    check(key, shape)?;
    Ok(match key {
        Index::Tuple(items) => RawIndex(items.iter().map(to_raw_item).collect()),
        single => RawIndex::single(to_raw_item(single)),
    })
}

// =============================================================================
// Tests
// =============================================================================
