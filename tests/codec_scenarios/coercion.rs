//! Retyped primitive fields

use crate::common::*;
use std::sync::Arc;

/// Write `value` as field `v` of type `from`, read it back as `to`
fn retype(from: WireTag, to: WireTag, value: Value) -> (Option<Value>, MigrationReport) {
    let class = |tag: WireTag| {
        registry_of(
            ClassDescriptor::new("app::Cell")
                .with_field(scalar("v", tag))
                .with_field(scalar("after", WireTag::Int32)),
            vec![],
        )
    };
    let store = Arc::new(MemorySnapshotStore::new());
    let old = memory_codec(&store, 1, class(from));
    let new = memory_codec(&store, 2, class(to));

    let record = Record::new("app::Cell").with("v", value).with("after", 77i32);
    let (decoded, report) = write_then_read(&old, &new, &record);
    assert_eq!(
        decoded.get("after"),
        Some(&Value::Int32(77)),
        "field after a retyped one must stay aligned"
    );
    (decoded.get("v").cloned(), report)
}

#[test]
fn int32_widens_to_int64() {
    let (v, report) = retype(WireTag::Int32, WireTag::Int64, Value::Int32(-123_456));
    assert_eq!(v, Some(Value::Int64(-123_456)));
    assert_eq!(report.coerced.len(), 1);
    assert_eq!(report.coerced[0].from, WireTag::Int32);
    assert_eq!(report.coerced[0].to, WireTag::Int64);
}

#[test]
fn float64_truncates_to_int32() {
    let (v, _) = retype(WireTag::Float64, WireTag::Int32, Value::Float64(12.9));
    assert_eq!(v, Some(Value::Int32(12)));

    let (v, _) = retype(WireTag::Float64, WireTag::Int32, Value::Float64(-12.9));
    assert_eq!(v, Some(Value::Int32(-12)));
}

#[test]
fn float_to_int_saturates_and_nan_is_zero() {
    let (v, _) = retype(WireTag::Float64, WireTag::Int16, Value::Float64(1e12));
    assert_eq!(v, Some(Value::Int16(i16::MAX)));

    let (v, _) = retype(WireTag::Float64, WireTag::Int32, Value::Float64(f64::NAN));
    assert_eq!(v, Some(Value::Int32(0)));
}

#[test]
fn integer_narrowing_wraps() {
    let (v, _) = retype(WireTag::UInt64, WireTag::Byte, Value::UInt64(300));
    assert_eq!(v, Some(Value::Byte(44)));
}

#[test]
fn numbers_and_bools_convert_to_strings() {
    let (v, _) = retype(WireTag::Int32, WireTag::String, Value::Int32(42));
    assert_eq!(v, Some(Value::String("42".into())));

    let (v, _) = retype(WireTag::Bool, WireTag::String, Value::Bool(true));
    assert_eq!(v, Some(Value::String("true".into())));
}

#[test]
fn bool_and_numeric_convert_both_ways() {
    let (v, _) = retype(WireTag::Bool, WireTag::Int32, Value::Bool(true));
    assert_eq!(v, Some(Value::Int32(1)));

    let (v, _) = retype(WireTag::Int64, WireTag::Bool, Value::Int64(-5));
    assert_eq!(v, Some(Value::Bool(true)));
}

#[test]
fn string_to_number_is_skipped() {
    let (v, report) = retype(WireTag::String, WireTag::Int32, Value::String("17".into()));
    assert_eq!(v, Some(Value::Int32(0)));
    assert_eq!(
        report.skipped_field("app::Cell", "v").unwrap().reason,
        SkipReason::NotConvertible {
            from: WireTag::String,
            to: WireTag::Int32
        }
    );
}

#[test]
fn unrepresentable_value_is_reported_not_fatal() {
    let (v, report) = retype(WireTag::Float64, WireTag::Decimal128, Value::Float64(f64::INFINITY));
    assert_eq!(v, Some(Value::default_for(WireTag::Decimal128)));
    assert!(matches!(
        report.skipped_field("app::Cell", "v").unwrap().reason,
        SkipReason::NotConvertible { .. }
    ));
    assert!(report.coerced.is_empty());
}

#[test]
fn coercion_table_is_enumerable() {
    let pairs = verscodec::coercion_pairs();
    assert!(pairs.contains(&(WireTag::Int32, WireTag::Int64)));
    assert!(pairs.contains(&(WireTag::Char, WireTag::UInt16)));
    assert!(!pairs.contains(&(WireTag::String, WireTag::Int32)));
    assert!(!pairs.contains(&(WireTag::DateTime, WireTag::Int64)));
    for (from, to) in pairs {
        assert!(verscodec::can_coerce(from, to));
    }
}
