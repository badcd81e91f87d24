//! Manipulation Functions - Joining, Reshaping and Reordering
//!
//! Namespace functions that change the layout of arrays. Joining functions
//! require the inputs' dtypes to have a standard result type; the layout
//! work itself is done by the engine, as views wherever it can.
//!
//! # Key Features
//! - `concat` and `stack`
//! - `expand_dims`, `squeeze` and `reshape`
//! - `flip` and `roll`
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::Result;
use arrayapi_engine::shape::normalize_axis;
use arrayapi_engine::{self as engine, RawArray};

use crate::array::Array;
use crate::elementwise::result_type;
use crate::rejected;

fn raw_arrays(arrays: &[Array]) -> Result<Vec<RawArray>> {
    result_type(arrays.iter().map(Array::dtype))?;
    Ok(arrays.iter().map(|a| a.raw().clone()).collect())
}

/// Joins arrays along an existing axis; `None` joins the flattened arrays.
pub fn concat(arrays: &[Array], axis: Option<isize>) -> Result<Array> {
    let raws = raw_arrays(arrays)?;
    let joined = match axis {
        None => {
            let flat = raws
                .iter()
                .map(|a| a.reshape(&[-1]))
                .collect::<Result<Vec<_>>>()
                .map_err(rejected)?;
            engine::concat(&flat, 0)
        }
        Some(axis) => {
            let ndim = raws.first().map_or(0, RawArray::ndim);
            normalize_axis(axis, ndim).and_then(|axis| engine::concat(&raws, axis))
        }
    };
    Ok(Array::from_raw(joined.map_err(rejected)?))
}

/// Joins equally shaped arrays along a new axis.
pub fn stack(arrays: &[Array], axis: isize) -> Result<Array> {
    let raws = raw_arrays(arrays)?;
    Ok(Array::from_raw(engine::stack(&raws, axis).map_err(rejected)?))
}

/// Inserts an axis of size 1 at `axis`, counted in the result's axes.
pub fn expand_dims(x: &Array, axis: isize) -> Result<Array> {
    let raw = normalize_axis(axis, x.ndim() + 1)
        .and_then(|axis| x.raw().expand_dims(axis))
        .map_err(rejected)?;
    Ok(Array::from_raw(raw))
}

/// Reverses element order along `axis` (every axis when `None`).
pub fn flip(x: &Array, axis: Option<&[isize]>) -> Result<Array> {
    Ok(Array::from_raw(engine::flip(x.raw(), axis).map_err(rejected)?))
}

/// Gives `x` a new shape; one dimension may be `-1`.
pub fn reshape(x: &Array, shape: &[isize]) -> Result<Array> {
    Ok(Array::from_raw(x.raw().reshape(shape).map_err(rejected)?))
}

/// Rolls elements along `axis`, or the flattened array when `None`.
pub fn roll(x: &Array, shift: &[isize], axis: Option<&[isize]>) -> Result<Array> {
    Ok(Array::from_raw(engine::roll(x.raw(), shift, axis).map_err(rejected)?))
}

/// Removes size-1 axes (all of them when `None`).
pub fn squeeze(x: &Array, axis: Option<&[isize]>) -> Result<Array> {
    Ok(Array::from_raw(engine::squeeze(x.raw(), axis).map_err(rejected)?))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arange, from_vec, DType};

    fn grid() -> Array {
        from_vec(vec![1i64, 2, 3, 4, 5, 6], &[2, 3]).unwrap()
    }

    #[test]
    fn test_concat() {
        let a = grid();
        assert_eq!(concat(&[a.clone(), a.clone()], Some(0)).unwrap().shape(), &[4, 3]);
        assert_eq!(concat(&[a.clone(), a.clone()], Some(-1)).unwrap().shape(), &[2, 6]);
        assert_eq!(concat(&[a.clone(), a.clone()], None).unwrap().shape(), &[12]);

        let small = from_vec(vec![1i8, 2, 3], &[1, 3]).unwrap();
        let joined = concat(&[a.clone(), small], Some(0)).unwrap();
        assert_eq!(joined.dtype(), DType::I64);
        assert_eq!(joined.shape(), &[3, 3]);

        assert!(concat(&[a.clone(), a.clone()], Some(2)).is_err());
        assert!(concat(&[], Some(0)).is_err());
    }

    #[test]
    fn test_concat_rejects_mixed_classes() {
        let ints = grid();
        let floats = from_vec(vec![0.0f32; 3], &[1, 3]).unwrap();
        assert!(concat(&[ints, floats], Some(0)).unwrap_err().is_type_error());
    }

    #[test]
    fn test_stack() {
        let a = from_vec(vec![1u8, 2], &[2]).unwrap();
        let b = from_vec(vec![3u8, 4], &[2]).unwrap();
        let s = stack(&[a.clone(), b.clone()], 0).unwrap();
        assert_eq!(s.to_string(), "Array([[1, 2], [3, 4]], dtype=uint8)");
        let t = stack(&[a, b], -1).unwrap();
        assert_eq!(t.to_string(), "Array([[1, 3], [2, 4]], dtype=uint8)");
    }

    #[test]
    fn test_expand_and_squeeze() {
        let a = grid();
        assert_eq!(expand_dims(&a, 0).unwrap().shape(), &[1, 2, 3]);
        assert_eq!(expand_dims(&a, -1).unwrap().shape(), &[2, 3, 1]);
        assert!(expand_dims(&a, 3).is_err());

        let e = expand_dims(&a, 1).unwrap();
        assert!(e.shares_buffer(&a));
        assert_eq!(squeeze(&e, Some(&[1])).unwrap().shape(), &[2, 3]);
        assert_eq!(squeeze(&e, None).unwrap().shape(), &[2, 3]);
        assert!(squeeze(&e, Some(&[0])).is_err());
    }

    #[test]
    fn test_reshape() {
        let a = arange(0, 6, 1, None).unwrap();
        assert_eq!(reshape(&a, &[2, -1]).unwrap().shape(), &[2, 3]);
        assert!(reshape(&a, &[4, -1]).is_err());
    }

    #[test]
    fn test_flip_and_roll() {
        let a = grid();
        assert_eq!(
            flip(&a, None).unwrap().to_string(),
            "Array([[6, 5, 4], [3, 2, 1]], dtype=int64)"
        );
        assert_eq!(
            flip(&a, Some(&[1])).unwrap().to_string(),
            "Array([[3, 2, 1], [6, 5, 4]], dtype=int64)"
        );
        assert_eq!(
            roll(&a, &[1], None).unwrap().to_string(),
            "Array([[6, 1, 2], [3, 4, 5]], dtype=int64)"
        );
        assert_eq!(
            roll(&a, &[1], Some(&[0])).unwrap().to_string(),
            "Array([[4, 5, 6], [1, 2, 3]], dtype=int64)"
        );
    }
}
