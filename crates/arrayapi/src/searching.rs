//! Searching Functions
//!
//! `argmax`, `argmin`, `nonzero` and `where_`. Index results are `int64`
//! arrays; `where_` requires its two branches to have a standard result
//! type.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::Result;
use arrayapi_engine as engine;

use crate::array::Array;
use crate::elementwise::result_type;
use crate::rejected;

/// Index of the largest element, over the flattened array or along `axis`.
///
/// The first occurrence wins; a NaN counts as the largest value.
pub fn argmax(x: &Array, axis: Option<isize>, keepdims: bool) -> Result<Array> {
    let raw = engine::argmax(x.raw(), axis, keepdims).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

/// Index of the smallest element, over the flattened array or along `axis`.
///
/// The first occurrence wins; a NaN counts as the smallest value.
pub fn argmin(x: &Array, axis: Option<isize>, keepdims: bool) -> Result<Array> {
    let raw = engine::argmin(x.raw(), axis, keepdims).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

/// Coordinates of the non-zero elements, one array per axis.
pub fn nonzero(x: &Array) -> Result<Vec<Array>> {
    let coords = engine::nonzero(x.raw()).map_err(rejected)?;
    Ok(coords.into_iter().map(Array::from_raw).collect())
}

/// Elements of `x1` where `condition` holds and of `x2` elsewhere.
pub fn where_(condition: &Array, x1: &Array, x2: &Array) -> Result<Array> {
    result_type([x1.dtype(), x2.dtype()])?;
    let raw = engine::where_(condition.raw(), x1.raw(), x2.raw()).map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

// =============================================================================
// Tests
// =============================================================================
