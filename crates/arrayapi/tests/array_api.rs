//! End-to-end tests of the strict namespace.
//! Each test drives the public API the way a caller would.

use arrayapi::prelude::*;
use arrayapi::{linspace, normalize_two_args, promote_scalar, reshape};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test 1: a 0-d operand never triggers value-based casting
#[test]
fn test_zero_d_operands_promote_by_dtype() {
    init_tracing();

    let f32s = from_vec(vec![1.0f32, 2.0, 3.0], &[3]).unwrap();
    let f64_scalar = asarray(2.0, Some(DType::F64)).unwrap();
    assert_eq!(f32s.add(&f64_scalar).unwrap().dtype(), DType::F64);
    assert_eq!(f64_scalar.add(&f32s).unwrap().dtype(), DType::F64);

    let u8s = from_vec(vec![1u8, 2], &[2]).unwrap();
    let small = asarray(1, Some(DType::I64)).unwrap();
    let sum = u8s.add(&small).unwrap();
    assert_eq!(sum.dtype(), DType::I64);
    assert_eq!(sum.shape(), &[2]);

    let same = asarray(1, Some(DType::U8)).unwrap();
    assert_eq!(u8s.add(&same).unwrap().dtype(), DType::U8);
}

/// Test 2: native scalars take the array's dtype
#[test]
fn test_native_scalars_adopt_array_dtype() {
    let f32s = from_vec(vec![1.0f32, 2.0], &[2]).unwrap();
    assert_eq!(f32s.add(2.0).unwrap().dtype(), DType::F32);
    assert_eq!(f32s.add(2).unwrap().dtype(), DType::F32);

    let i8s = from_vec(vec![1i8, 2], &[2]).unwrap();
    assert_eq!(i8s.mul(3).unwrap().dtype(), DType::I8);
    assert!(matches!(i8s.add(1000), Err(Error::Overflow { .. })));
}

/// Test 3: bool scalars only combine with bool arrays
#[test]
fn test_bool_scalar_rules() {
    let ints = from_vec(vec![1i32, 2], &[2]).unwrap();
    assert!(ints.add(true).unwrap_err().is_type_error());

    let flags = from_vec(vec![true, false], &[2]).unwrap();
    let summed = flags.add(true).unwrap();
    assert_eq!(summed.dtype(), DType::Bool);
    assert_eq!(summed.to_string(), "Array([True, True], dtype=bool)");

    let anded = flags.bitand(true).unwrap();
    assert_eq!(anded.dtype(), DType::Bool);
    assert!(flags.bitor(1).unwrap_err().is_type_error());
}

/// Test 4: slice bounds at the limit succeed, one past fails
#[test]
fn test_slice_bound_limits() {
    let a = arange(0, 5, 1, None).unwrap();
    assert_eq!(a.get(Slice::new(Some(-5), Some(5), None)).unwrap().shape(), &[5]);
    assert!(a.get(Slice::new(Some(-6), None, None)).unwrap_err().is_index_error());
    assert!(a.get(Slice::new(None, Some(6), None)).unwrap_err().is_index_error());

    let reversed = a.get(Slice::new(Some(4), Some(-6), Some(-1))).unwrap();
    assert_eq!(reversed.to_string(), "Array([4, 3, 2, 1, 0], dtype=int64)");
    assert!(a.get(Slice::new(None, Some(-7), Some(-1))).is_err());
}

/// Test 5: boolean masks cannot be combined with other indices
#[test]
fn test_boolean_mask_indexing() {
    let grid = reshape(&arange(0, 6, 1, None).unwrap(), &[2, 3]).unwrap();
    let mask = from_vec(vec![false, true], &[2]).unwrap();

    assert!(grid.get((&mask, 0)).unwrap_err().is_index_error());
    let rows = grid.get(Index::Tuple(vec![Index::from(&mask)])).unwrap();
    assert_eq!(rows.to_string(), "Array([[3, 4, 5]], dtype=int64)");
}

/// Test 6: power and true division need floating-point operands
#[test]
fn test_power_and_division_types() {
    let two = asarray(2.0, None).unwrap();
    assert_eq!(two.pow(3.0).unwrap().to_float().unwrap(), 8.0);

    let int = asarray(2, None).unwrap();
    assert!(int.pow(3).unwrap_err().is_type_error());
    assert!(int.div(2).unwrap_err().is_type_error());
    assert!(two.pow(&int).unwrap_err().is_type_error());
    assert!(two.div(&int).unwrap_err().is_type_error());
}

/// Test 7: shifts keep the left operand's dtype
#[test]
fn test_shift_dtype() {
    let a = from_vec(vec![1i8, 2, 3], &[3]).unwrap();
    let s = asarray(1, Some(DType::I64)).unwrap();
    assert_eq!(a.shl(&s).unwrap().dtype(), DType::I8);
    assert_eq!(a.shr(&s).unwrap().dtype(), DType::I8);
    assert_eq!((&a << 2).dtype(), DType::I8);
}

/// Test 8: promoted scalars round-trip through extraction
#[test]
fn test_promoted_scalars_round_trip() {
    assert!(promote_scalar(&true.into(), DType::Bool).unwrap().to_bool().unwrap());
    assert_eq!(promote_scalar(&(-7).into(), DType::I8).unwrap().to_int().unwrap(), -7);
    assert_eq!(promote_scalar(&0.25.into(), DType::F32).unwrap().to_float().unwrap(), 0.25);
}

/// Test 9: arrays cannot be constructed directly
#[test]
fn test_constructor_is_closed() {
    assert_eq!(Array::new(()).unwrap_err(), Error::Construction);
    assert_eq!(Array::new(1.0).unwrap_err(), Error::Construction);
}

/// Test 10: `@=` keeps the receiver's shape
#[test]
fn test_matmul_assign_shapes() {
    let mut square = ones(&[3, 3], None);
    let vector = ones(&[3], None);
    assert!(square.matmul_assign(&vector).is_err());

    let mut wide = ones(&[2, 3], None);
    assert!(wide.matmul_assign(&ones(&[3, 4], None)).is_err());

    let alias = square.clone();
    square.matmul_assign(&ones(&[3, 3], None)).unwrap();
    assert_eq!(alias.get((0, 0)).unwrap().to_float().unwrap(), 3.0);
}

/// Test 11: normalization only inserts an axis for asymmetric pairs
#[test]
fn test_normalizer_preserves_broadcast_shape() {
    let matrix = zeros(&[2, 3], None);
    let scalar = asarray(1.0, None).unwrap();
    let (a, b) = normalize_two_args(&matrix, &scalar).unwrap();
    assert_eq!(b.shape(), &[1]);
    assert_eq!(a.add(&b).unwrap().shape(), matrix.add(&scalar).unwrap().shape());
}

/// Test 12: conversions require 0-d arrays
#[test]
fn test_scalar_conversions() {
    let v = linspace(0.0, 1.0, 3, None, true).unwrap();
    assert!(v.to_float().unwrap_err().is_type_error());
    assert_eq!(v.len().unwrap(), 3);

    let mid = v.get(1).unwrap();
    assert_eq!(mid.to_float().unwrap(), 0.5);
    assert!(mid.len().unwrap_err().is_type_error());
}

/// Test 13: views and in-place updates share storage
#[test]
fn test_views_share_storage() {
    let a = arange(0, 4, 1, None).unwrap();
    let mut tail = a.get(2..4i64).unwrap();
    tail.add_assign(10).unwrap();
    assert_eq!(a.to_string(), "Array([0, 1, 12, 13], dtype=int64)");

    a.set(.., 0).unwrap();
    assert_eq!(tail.to_string(), "Array([0, 0], dtype=int64)");
}

/// Test 14: the namespace handle reports its configuration
#[test]
fn test_namespace_handle() {
    let a = zeros(&[1], None);
    let ns = a.array_namespace(None).unwrap();
    assert_eq!(ns.api_version(), "2021.12");
    assert!(a.array_namespace(Some("2022.12")).is_err());

    let config: NamespaceConfig = serde_json::from_str(r#"{"default_float": "float32"}"#).unwrap();
    let ns = ArrayNamespace::new(config).unwrap();
    assert_eq!(ns.ones(&[2], None).dtype(), DType::F32);
}
