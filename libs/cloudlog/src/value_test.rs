//! Tests for Value conversions and JSON wire form

use std::collections::HashMap;

use chrono::{FixedOffset, TimeZone, Utc};
use serde_json::json;

use crate::record::Record;
use crate::value::{ToValue, Value};

// =============================================================================
// ToValue
// =============================================================================

#[test]
fn test_integers_keep_signedness_class() {
    assert_eq!(42i32.to_value(), Value::Int(42));
    assert_eq!(42u32.to_value(), Value::Int(42));
    assert_eq!(42u64.to_value(), Value::UInt(42));
    assert_eq!(42usize.to_value(), Value::UInt(42));
}

#[test]
fn test_option_and_vec() {
    assert_eq!(Some("x").to_value(), Value::String("x".to_string()));
    assert_eq!(None::<i64>.to_value(), Value::Null);
    assert_eq!(
        vec![1i64, 2].to_value(),
        Value::Array(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn test_hash_map_becomes_map() {
    let mut map = HashMap::new();
    map.insert("a".to_string(), 1i64);
    assert_eq!(map.to_value(), Value::Map(Record::from([("a", 1i64)])));
}

#[test]
fn test_datetime_keeps_offset() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let t = offset.with_ymd_and_hms(2017, 6, 15, 3, 30, 15).unwrap();
    match t.to_value() {
        Value::Time(v) => {
            assert_eq!(v.offset(), &offset);
            assert_eq!(v.timestamp(), 1_497_515_415);
        }
        other => panic!("expected time, got {other:?}"),
    }
}

// =============================================================================
// From serde_json
// =============================================================================

#[test]
fn test_from_json_number_classes() {
    assert_eq!(Value::from(json!(-3)), Value::Int(-3));
    assert_eq!(Value::from(json!(u64::MAX)), Value::UInt(u64::MAX));
    assert_eq!(Value::from(json!(2.5)), Value::Float(2.5));
}

#[test]
fn test_from_json_object_is_recursive() {
    let value = Value::from(json!({"a": {"b": [true, null]}}));
    let inner = Record::from([(
        "b",
        Value::Array(vec![Value::Bool(true), Value::Null]),
    )]);
    assert_eq!(value, Value::Map(Record::from([("a", inner)])));
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_serialize_scalars_and_nesting() {
    let record = Record::from([
        ("n", Value::Int(1)),
        ("f", Value::Float(0.5)),
        ("s", Value::from("x")),
        ("z", Value::Null),
        ("l", Value::Array(vec![Value::Bool(false)])),
    ]);
    let json = serde_json::to_value(&record).expect("should serialize");
    assert_eq!(
        json,
        json!({"n": 1, "f": 0.5, "s": "x", "z": null, "l": [false]})
    );
}

#[test]
fn test_serialize_bytes_as_base64() {
    let json = serde_json::to_value(Value::Bytes(b"hello".to_vec())).expect("should serialize");
    assert_eq!(json, json!("aGVsbG8="));
}

#[test]
fn test_serialize_time_as_rfc3339() {
    let t = Utc.with_ymd_and_hms(2017, 6, 15, 8, 30, 15).unwrap();
    let json = serde_json::to_value(t.to_value()).expect("should serialize");
    assert_eq!(json, json!("2017-06-15T08:30:15Z"));
}

#[test]
fn test_serialize_non_finite_float_fails() {
    assert!(serde_json::to_vec(&Value::Float(f64::NAN)).is_err());
    assert!(serde_json::to_vec(&Value::Float(f64::INFINITY)).is_err());
}
