//! Set Functions
//!
//! `unique` with the optional counts, first-occurrence indices and inverse
//! mapping of the engine's implementation.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use arrayapi_core::Result;
use arrayapi_engine as engine;

use crate::array::Array;
use crate::rejected;

/// Output of [`unique`].
#[derive(Debug, Clone)]
pub struct UniqueOutput {
    /// Sorted distinct values.
    pub values: Array,
    /// Occurrences of each value, when requested.
    pub counts: Option<Array>,
    /// Flat index of each value's first occurrence, when requested.
    pub indices: Option<Array>,
    /// Position in `values` of every input element, when requested.
    pub inverse: Option<Array>,
}

/// The sorted distinct elements of `x`.
///
/// NaNs sort last and are never merged.
pub fn unique(
    x: &Array,
    return_counts: bool,
    return_index: bool,
    return_inverse: bool,
) -> Result<UniqueOutput> {
    let out = engine::unique(x.raw(), return_counts, return_index, return_inverse)
        .map_err(rejected)?;
    Ok(UniqueOutput {
        values: Array::from_raw(out.values),
        counts: out.counts.map(Array::from_raw),
        indices: out.indices.map(Array::from_raw),
        inverse: out.inverse.map(Array::from_raw),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_vec;

    #[test]
    fn test_values_only() {
        let x = from_vec(vec![3i32, 1, 3, 2, 1], &[5]).unwrap();
        let out = unique(&x, false, false, false).unwrap();
        assert_eq!(out.values.to_string(), "Array([1, 2, 3], dtype=int32)");
        assert!(out.counts.is_none() && out.indices.is_none() && out.inverse.is_none());
    }

    #[test]
    fn test_all_outputs() {
        let x = from_vec(vec![2u8, 0, 2, 1], &[2, 2]).unwrap();
        let out = unique(&x, true, true, true).unwrap();
        assert_eq!(out.values.to_string(), "Array([0, 1, 2], dtype=uint8)");
        assert_eq!(out.counts.unwrap().to_string(), "Array([1, 1, 2], dtype=int64)");
        assert_eq!(out.indices.unwrap().to_string(), "Array([1, 3, 0], dtype=int64)");
        let inverse = out.inverse.unwrap();
        assert_eq!(inverse.shape(), &[2, 2]);
        assert_eq!(inverse.to_string(), "Array([[2, 0], [2, 1]], dtype=int64)");
    }

    #[test]
    fn test_nans_stay_distinct() {
        let x = from_vec(vec![f64::NAN, 1.0, f64::NAN], &[3]).unwrap();
        let out = unique(&x, true, false, false).unwrap();
        assert_eq!(out.values.to_string(), "Array([1.0, nan, nan], dtype=float64)");
        assert_eq!(out.counts.unwrap().to_string(), "Array([1, 1, 1], dtype=int64)");
    }
}
