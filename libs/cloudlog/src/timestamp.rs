//! Canonical timestamp derivation.
//!
//! The canonical representation is a UTC epoch-millisecond `Value::Int`.
//! Rules, in order:
//! - `Int`: already canonical, returned unchanged.
//! - `Time`: converted to UTC epoch millis, sub-millisecond precision
//!   truncated toward zero.
//! - anything else (`UInt`, `Float`, `String`, `Null`, ...): returned
//!   unchanged. Unrecognized data is never zeroed.
//!
//! Optional calendar times are dereferenced when the field is converted
//! (`ToValue for Option<T>`), so an absent one arrives here as `Null` and
//! passes through.

use chrono::{DateTime, TimeZone, Utc};

use crate::value::Value;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Normalize a record's timestamp value.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Time(t) => Value::Int(epoch_millis(&t)),
        other => other,
    }
}

/// UTC epoch milliseconds of `t`, truncating sub-millisecond precision.
pub fn epoch_millis<Tz: TimeZone>(t: &DateTime<Tz>) -> i64 {
    match t.timestamp_nanos_opt() {
        // Integer division truncates toward zero, also before 1970.
        Some(nanos) => nanos / NANOS_PER_MILLI,
        // Outside the i64-nanosecond range (before 1677, after 2262).
        None => t.timestamp_millis(),
    }
}

/// Current wall-clock time as UTC epoch milliseconds.
pub fn now_millis() -> i64 {
    epoch_millis(&Utc::now())
}
