//! Integration tests for the permissive engine.
//! Covers the behaviors the strict namespace corrects or relies on.

use proptest::prelude::*;

use arrayapi_engine::prelude::*;
use arrayapi_engine::shape::{broadcast_shape, numel};
use arrayapi_engine::{concat, unique};

/// Test 1: 0-d operands take part in promotion by value
#[test]
fn test_value_based_casting() {
    let small = RawArray::full(&[3], Value::Int(1), DType::I8);
    let fits = RawArray::scalar(Value::Int(100), DType::I64);
    let wide = RawArray::scalar(Value::Int(100_000), DType::I64);

    assert_eq!(small.binary(BinaryOp::Add, &fits).unwrap().into_array().dtype(), DType::I8);
    assert_eq!(small.binary(BinaryOp::Add, &wide).unwrap().into_array().dtype(), DType::I32);

    let one_elem = RawArray::full(&[1], Value::Int(100_000), DType::I64);
    assert_eq!(small.binary(BinaryOp::Add, &one_elem).unwrap().into_array().dtype(), DType::I64);
}

/// Test 2: full indexing and 0-d arithmetic produce bare scalars
#[test]
fn test_bare_scalars() {
    let a = arange(Value::Int(0), Value::Int(4), Value::Int(1), DType::I64).unwrap();
    let item = a.get(&RawIndex::single(RawIndexItem::Int(2))).unwrap();
    assert!(item.is_scalar());

    let s = RawArray::scalar(Value::Float(1.5), DType::F64);
    assert!(s.binary(BinaryOp::Multiply, &s).unwrap().is_scalar());
    assert!(!a.get(&RawIndex::single(RawIndexItem::Slice(RawSlice::full()))).unwrap().is_scalar());
}

/// Test 3: the engine accepts index forms the strict layer refuses
#[test]
fn test_permissive_indexing() {
    let a = arange(Value::Int(0), Value::Int(6), Value::Int(1), DType::I64)
        .unwrap()
        .reshape(&[2, 3])
        .unwrap();

    let clipped = a
        .get(&RawIndex::single(RawIndexItem::Slice(RawSlice::new(Some(-100), Some(100), None))))
        .unwrap()
        .into_array();
    assert_eq!(clipped.shape(), &[2, 3]);

    let expanded = a.get(&RawIndex::single(RawIndexItem::NewAxis)).unwrap().into_array();
    assert_eq!(expanded.shape(), &[1, 2, 3]);

    let rows = RawArray::from_vec(vec![1i64, 0, 1], &[3]).unwrap();
    let fancy = a.get(&RawIndex::single(RawIndexItem::Array(rows))).unwrap().into_array();
    assert_eq!(fancy.shape(), &[3, 3]);

    let mask = RawArray::from_vec(vec![true, false], &[2]).unwrap();
    let mixed = a
        .get(&RawIndex(vec![RawIndexItem::Array(mask), RawIndexItem::Int(1)]))
        .unwrap()
        .into_array();
    assert_eq!(mixed.values(), vec![Value::Int(1)]);
}

/// Test 4: writes through one view are visible in every alias
#[test]
fn test_shared_storage() {
    let a = zeros(&[2, 2], DType::F32);
    let row = a.get(&RawIndex::single(RawIndexItem::Int(1))).unwrap().into_array();
    row.assign(&RawArray::scalar(Value::Float(5.0), DType::F64)).unwrap();
    assert_eq!(a.values()[2], Value::Float(5.0));
    assert!(row.shares_buffer(&a));
}

/// Test 5: joining and set functions
#[test]
fn test_concat_and_unique() {
    let a = RawArray::from_vec(vec![3u8, 1], &[2]).unwrap();
    let b = RawArray::from_vec(vec![1i16, 2], &[2]).unwrap();
    let joined = concat(&[a, b], 0).unwrap();
    assert_eq!(joined.dtype(), DType::I16);

    let u = unique(&joined, true, false, false).unwrap();
    assert_eq!(u.values.values(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(
        u.counts.unwrap().values(),
        vec![Value::Int(2), Value::Int(1), Value::Int(1)]
    );
}

fn small_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 0..=3)
}

proptest! {
    #[test]
    fn prop_broadcast_with_ones_is_identity(shape in small_shape()) {
        let ones_shape = vec![1; shape.len()];
        let result = broadcast_shape(&shape, &ones_shape).unwrap();
        prop_assert_eq!(result.as_slice(), shape.as_slice());
    }

    #[test]
    fn prop_broadcast_is_symmetric(a in small_shape(), b in small_shape()) {
        let ab = broadcast_shape(&a, &b).ok();
        let ba = broadcast_shape(&b, &a).ok();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_reshape_preserves_values(shape in small_shape()) {
        let n = numel(&shape);
        let data: Vec<i32> = (0..n as i32).collect();
        let a = RawArray::from_vec(data, &shape).unwrap();
        let flat = a.reshape(&[-1]).unwrap();
        prop_assert_eq!(flat.shape(), &[n][..]);
        prop_assert_eq!(flat.values(), a.values());
    }

    #[test]
    fn prop_transpose_twice_is_identity(shape in small_shape()) {
        let n = numel(&shape);
        let a = RawArray::from_vec((0..n as i64).collect::<Vec<_>>(), &shape).unwrap();
        let back = a.reversed_axes().reversed_axes();
        prop_assert_eq!(back.shape(), a.shape());
        prop_assert_eq!(back.values(), a.values());
    }

    #[test]
    fn prop_slice_length_matches_range(n in 0usize..10, start in -12i64..12, stop in -12i64..12) {
        let a = zeros(&[n], DType::U8);
        let key = RawIndex::single(RawIndexItem::Slice(RawSlice::new(Some(start), Some(stop), None)));
        let view = a.get(&key).unwrap().into_array();

        let size = n as i64;
        let clamp = |v: i64| if v < 0 { (v + size).max(0) } else { v.min(size) };
        let expected = (clamp(stop) - clamp(start)).max(0) as usize;
        prop_assert_eq!(view.shape(), &[expected][..]);
    }
}
