//! Array Namespace - Namespace Handle and Configuration
//!
//! `ArrayNamespace` is what `Array::array_namespace` hands out: a handle
//! exposing the namespace functions, the dtype registry and the default
//! dtypes given to native values. Defaults come from a `NamespaceConfig`,
//! which embedding applications may load with serde.
//!
//! # Key Features
//! - Serde-loadable `NamespaceConfig` with validated defaults
//! - Creation functions honoring the configured default dtypes
//! - Manipulation, searching, set and elementwise functions
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use serde::{Deserialize, Serialize};

use arrayapi_core::{DType, DTypeClass, Error, Result, ALL_DTYPES};
use arrayapi_engine::RawElement;

use crate::array::Array;
use crate::creation::{self, arange_with, asarray_with, full_with, Defaults};
use crate::scalar::Operand;
use crate::set_functions::UniqueOutput;
use crate::{elementwise, manipulation, rejected, searching, set_functions};

/// Version of the array API standard this namespace implements.
pub const API_VERSION: &str = "2021.12";

// =============================================================================
// Configuration
// =============================================================================

/// Namespace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Reported standard version.
    pub api_version: String,
    /// Dtype of native integers (must be an integer dtype).
    pub default_int: DType,
    /// Dtype of native floats (must be a floating dtype).
    pub default_float: DType,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            default_int: DType::default_int(),
            default_float: DType::default_float(),
        }
    }
}

impl NamespaceConfig {
    /// Checks that the default dtypes belong to the right classes.
    pub fn validate(&self) -> Result<()> {
        if self.api_version.is_empty() {
            return Err(Error::value("api_version must not be empty"));
        }
        if self.default_int.class() != DTypeClass::Integer {
            return Err(Error::value(format!(
                "default_int must be an integer dtype, got {}",
                self.default_int
            )));
        }
        if self.default_float.class() != DTypeClass::Floating {
            return Err(Error::value(format!(
                "default_float must be a floating dtype, got {}",
                self.default_float
            )));
        }
        Ok(())
    }

    fn defaults(&self) -> Defaults {
        Defaults {
            int: self.default_int,
            float: self.default_float,
        }
    }
}

// =============================================================================
// Namespace Handle
// =============================================================================

/// Handle on the array namespace.
#[derive(Debug, Clone, Default)]
pub struct ArrayNamespace {
    config: NamespaceConfig,
}

impl ArrayNamespace {
    /// Creates a namespace from a validated configuration.
    pub fn new(config: NamespaceConfig) -> Result<Self> {
        config.validate().map_err(rejected)?;
        tracing::debug!(
            api_version = %config.api_version,
            default_int = %config.default_int,
            default_float = %config.default_float,
            "array namespace configured"
        );
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Reported standard version.
    pub fn api_version(&self) -> &str {
        &self.config.api_version
    }

    /// Every dtype the namespace supports.
    pub fn dtypes(&self) -> &'static [DType] {
        &ALL_DTYPES
    }

    /// Default integer dtype.
    pub fn default_int(&self) -> DType {
        self.config.default_int
    }

    /// Default floating dtype.
    pub fn default_float(&self) -> DType {
        self.config.default_float
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// See [`crate::asarray`]; native values use the configured defaults.
    pub fn asarray(&self, obj: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
        asarray_with(obj.into(), dtype, self.config.defaults())
    }

    /// See [`crate::from_vec`].
    pub fn from_vec<T: RawElement>(&self, data: Vec<T>, shape: &[usize]) -> Result<Array> {
        creation::from_vec(data, shape)
    }

    /// See [`crate::zeros`]; defaults to the configured float dtype.
    pub fn zeros(&self, shape: &[usize], dtype: Option<DType>) -> Array {
        creation::zeros(shape, Some(dtype.unwrap_or(self.config.default_float)))
    }

    /// See [`crate::ones`]; defaults to the configured float dtype.
    pub fn ones(&self, shape: &[usize], dtype: Option<DType>) -> Array {
        creation::ones(shape, Some(dtype.unwrap_or(self.config.default_float)))
    }

    /// See [`crate::empty`]; defaults to the configured float dtype.
    pub fn empty(&self, shape: &[usize], dtype: Option<DType>) -> Array {
        creation::empty(shape, Some(dtype.unwrap_or(self.config.default_float)))
    }

    /// See [`crate::full`]; native fills use the configured defaults.
    pub fn full(&self, shape: &[usize], fill: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
        full_with(shape, fill.into(), dtype, self.config.defaults())
    }

    /// See [`crate::zeros_like`].
    pub fn zeros_like(&self, x: &Array, dtype: Option<DType>) -> Array {
        creation::zeros_like(x, dtype)
    }

    /// See [`crate::ones_like`].
    pub fn ones_like(&self, x: &Array, dtype: Option<DType>) -> Array {
        creation::ones_like(x, dtype)
    }

    /// See [`crate::empty_like`].
    pub fn empty_like(&self, x: &Array, dtype: Option<DType>) -> Array {
        creation::empty_like(x, dtype)
    }

    /// See [`crate::full_like`].
    pub fn full_like(&self, x: &Array, fill: impl Into<Operand>, dtype: Option<DType>) -> Result<Array> {
        creation::full_like(x, fill, dtype)
    }

    /// See [`crate::arange`]; results use the configured defaults.
    pub fn arange(
        &self,
        start: impl Into<Operand>,
        stop: impl Into<Operand>,
        step: impl Into<Operand>,
        dtype: Option<DType>,
    ) -> Result<Array> {
        arange_with(start.into(), stop.into(), step.into(), dtype, self.config.defaults())
    }

    /// See [`crate::linspace`]; defaults to the configured float dtype.
    pub fn linspace(
        &self,
        start: f64,
        stop: f64,
        num: usize,
        dtype: Option<DType>,
        endpoint: bool,
    ) -> Result<Array> {
        creation::linspace(start, stop, num, Some(dtype.unwrap_or(self.config.default_float)), endpoint)
    }

    /// See [`crate::eye`]; defaults to the configured float dtype.
    pub fn eye(&self, n_rows: usize, n_cols: Option<usize>, k: isize, dtype: Option<DType>) -> Result<Array> {
        creation::eye(n_rows, n_cols, k, Some(dtype.unwrap_or(self.config.default_float)))
    }

    // =========================================================================
    // Manipulation
    // =========================================================================

    /// See [`crate::concat`].
    pub fn concat(&self, arrays: &[Array], axis: Option<isize>) -> Result<Array> {
        manipulation::concat(arrays, axis)
    }

    /// See [`crate::stack`].
    pub fn stack(&self, arrays: &[Array], axis: isize) -> Result<Array> {
        manipulation::stack(arrays, axis)
    }

    /// See [`crate::expand_dims`].
    pub fn expand_dims(&self, x: &Array, axis: isize) -> Result<Array> {
        manipulation::expand_dims(x, axis)
    }

    /// See [`crate::flip`].
    pub fn flip(&self, x: &Array, axis: Option<&[isize]>) -> Result<Array> {
        manipulation::flip(x, axis)
    }

    /// See [`crate::reshape`].
    pub fn reshape(&self, x: &Array, shape: &[isize]) -> Result<Array> {
        manipulation::reshape(x, shape)
    }

    /// See [`crate::roll`].
    pub fn roll(&self, x: &Array, shift: &[isize], axis: Option<&[isize]>) -> Result<Array> {
        manipulation::roll(x, shift, axis)
    }

    /// See [`crate::squeeze`].
    pub fn squeeze(&self, x: &Array, axis: Option<&[isize]>) -> Result<Array> {
        manipulation::squeeze(x, axis)
    }

    // =========================================================================
    // Searching, Sets and Elementwise
    // =========================================================================

    /// See [`crate::argmax`].
    pub fn argmax(&self, x: &Array, axis: Option<isize>, keepdims: bool) -> Result<Array> {
        searching::argmax(x, axis, keepdims)
    }

    /// See [`crate::argmin`].
    pub fn argmin(&self, x: &Array, axis: Option<isize>, keepdims: bool) -> Result<Array> {
        searching::argmin(x, axis, keepdims)
    }

    /// See [`crate::nonzero`].
    pub fn nonzero(&self, x: &Array) -> Result<Vec<Array>> {
        searching::nonzero(x)
    }

    /// See [`crate::where_`].
    pub fn where_(&self, condition: &Array, x1: &Array, x2: &Array) -> Result<Array> {
        searching::where_(condition, x1, x2)
    }

    /// See [`crate::unique`].
    pub fn unique(
        &self,
        x: &Array,
        return_counts: bool,
        return_index: bool,
        return_inverse: bool,
    ) -> Result<UniqueOutput> {
        set_functions::unique(x, return_counts, return_index, return_inverse)
    }

    /// See [`crate::pow`].
    pub fn pow(&self, x1: &Array, x2: &Array) -> Result<Array> {
        elementwise::pow(x1, x2)
    }

    /// See [`crate::result_type`].
    pub fn result_type(&self, dtypes: impl IntoIterator<Item = DType>) -> Result<DType> {
        elementwise::result_type(dtypes)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let ns = ArrayNamespace::default();
        assert_eq!(ns.api_version(), "2021.12");
        assert_eq!(ns.default_int(), DType::I64);
        assert_eq!(ns.default_float(), DType::F64);
        assert_eq!(ns.dtypes().len(), 11);
    }

    #[test]
    fn test_config_from_json() {
        let config: NamespaceConfig =
            serde_json::from_str(r#"{"default_int": "int32", "default_float": "float32"}"#).unwrap();
        assert_eq!(config.api_version, API_VERSION);
        let ns = ArrayNamespace::new(config).unwrap();

        assert_eq!(ns.asarray(1, None).unwrap().dtype(), DType::I32);
        assert_eq!(ns.asarray(1.0, None).unwrap().dtype(), DType::F32);
        assert_eq!(ns.zeros(&[2], None).dtype(), DType::F32);
        assert_eq!(ns.arange(0, 3, 1, None).unwrap().dtype(), DType::I32);
        assert_eq!(ns.full(&[1], 2.0, None).unwrap().dtype(), DType::F32);
    }

    #[test]
    fn test_config_round_trip() {
        let config = NamespaceConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"int64\""));
        let back: NamespaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_configs() {
        let bad_int = NamespaceConfig {
            default_int: DType::F32,
            ..NamespaceConfig::default()
        };
        assert!(ArrayNamespace::new(bad_int).unwrap_err().is_value_error());

        let bad_float = NamespaceConfig {
            default_float: DType::I8,
            ..NamespaceConfig::default()
        };
        assert!(bad_float.validate().is_err());

        assert!(serde_json::from_str::<NamespaceConfig>(r#"{"default_int": "int128"}"#).is_err());
    }

    #[test]
    fn test_functions_delegate() {
        let ns = ArrayNamespace::default();
        let x = ns.from_vec(vec![3i64, 1, 2], &[3]).unwrap();
        assert_eq!(ns.argmax(&x, None, false).unwrap().to_int().unwrap(), 0);
        assert_eq!(ns.unique(&x, false, false, false).unwrap().values.shape(), &[3]);
        assert_eq!(ns.concat(&[x.clone(), x.clone()], None).unwrap().shape(), &[6]);
        assert_eq!(ns.result_type([DType::I8, DType::I16]).unwrap(), DType::I16);
    }
}
