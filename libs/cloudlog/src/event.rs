use std::fmt;
use std::sync::Arc;

use crate::record::Record;
use crate::value::Value;

/// Caller-supplied input of unknown shape.
///
/// The shape decides which encoder applies:
/// - `Map`, `Text`, `Bytes` and self-describing `Object`s: primitive encoder.
/// - `Object`s carrying a field descriptor: struct encoder.
/// - `Sequence` is flattened by the record builder when it is the only
///   argument of a push; anywhere else it is an unsupported shape, as are the
///   bare scalars.
#[derive(Debug, Clone)]
pub enum Event {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Map(Record),
    Sequence(Vec<Event>),
    Object(Arc<dyn EventObject>),
}

impl Event {
    /// Wrap an application type that implements [`EventObject`].
    pub fn object<T: EventObject + 'static>(value: T) -> Self {
        Event::Object(Arc::new(value))
    }

    /// Build a sequence event from anything convertible into events.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Event>,
    {
        Event::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Short shape name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Null => "null",
            Event::Bool(_) => "bool",
            Event::Int(_) => "int",
            Event::UInt(_) => "uint",
            Event::Float(_) => "float",
            Event::Text(_) => "text",
            Event::Bytes(_) => "bytes",
            Event::Map(_) => "map",
            Event::Sequence(_) => "sequence",
            Event::Object(_) => "object",
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Event::Null, Event::Null) => true,
            (Event::Bool(a), Event::Bool(b)) => a == b,
            (Event::Int(a), Event::Int(b)) => a == b,
            (Event::UInt(a), Event::UInt(b)) => a == b,
            (Event::Float(a), Event::Float(b)) => a == b,
            (Event::Text(a), Event::Text(b)) => a == b,
            (Event::Bytes(a), Event::Bytes(b)) => a == b,
            (Event::Map(a), Event::Map(b)) => a == b,
            (Event::Sequence(a), Event::Sequence(b)) => a == b,
            // Objects are opaque: identity only.
            (Event::Object(a), Event::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

/// Capabilities an application type can expose to the encoders.
///
/// Both methods default to "not supported". A type may provide both; which
/// one wins is decided by the order of the configured encoders.
pub trait EventObject: fmt::Debug + Send + Sync {
    /// Self-describing encoding, consumed by the primitive encoder as-is.
    fn encode(&self) -> Option<Record> {
        None
    }

    /// Declared fields with their current values, consumed by the struct
    /// encoder. Generated by `#[derive(StructEvent)]`.
    fn struct_fields(&self) -> Option<Vec<StructField>> {
        None
    }
}

/// Compile-time description of one struct field.
///
/// `names` holds `(tag, name)` pairs from the field's `#[cloudlog(...)]`
/// attribute; the struct encoder picks the pair matching its tag and falls
/// back to the declared field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: &'static str,
    pub names: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    pub fn name_for(&self, tag: &str) -> &'static str {
        self.names
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| *name)
            .unwrap_or(self.field)
    }
}

/// A declared field paired with its value at encoding time.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub descriptor: &'static FieldDescriptor,
    pub value: Value,
}

impl StructField {
    pub fn new(descriptor: &'static FieldDescriptor, value: Value) -> Self {
        Self { descriptor, value }
    }
}

// ---------------------------------------------------------------------------
// From impls
// ---------------------------------------------------------------------------

impl From<&str> for Event {
    fn from(v: &str) -> Self {
        Event::Text(v.to_string())
    }
}

impl From<String> for Event {
    fn from(v: String) -> Self {
        Event::Text(v)
    }
}

impl From<&String> for Event {
    fn from(v: &String) -> Self {
        Event::Text(v.clone())
    }
}

impl From<Vec<u8>> for Event {
    fn from(v: Vec<u8>) -> Self {
        Event::Bytes(v)
    }
}

impl From<&[u8]> for Event {
    fn from(v: &[u8]) -> Self {
        Event::Bytes(v.to_vec())
    }
}

impl From<Record> for Event {
    fn from(v: Record) -> Self {
        Event::Map(v)
    }
}

impl From<Vec<Event>> for Event {
    fn from(v: Vec<Event>) -> Self {
        Event::Sequence(v)
    }
}

impl From<bool> for Event {
    fn from(v: bool) -> Self {
        Event::Bool(v)
    }
}

impl From<i64> for Event {
    fn from(v: i64) -> Self {
        Event::Int(v)
    }
}

impl From<i32> for Event {
    fn from(v: i32) -> Self {
        Event::Int(v.into())
    }
}

impl From<u64> for Event {
    fn from(v: u64) -> Self {
        Event::UInt(v)
    }
}

impl From<f64> for Event {
    fn from(v: f64) -> Self {
        Event::Float(v)
    }
}

impl From<Arc<dyn EventObject>> for Event {
    fn from(v: Arc<dyn EventObject>) -> Self {
        Event::Object(v)
    }
}

impl From<serde_json::Value> for Event {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Event::Null,
            serde_json::Value::Bool(b) => Event::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Event::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Event::UInt(u)
                } else {
                    Event::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Event::Text(s),
            serde_json::Value::Array(items) => {
                Event::Sequence(items.into_iter().map(Event::from).collect())
            }
            serde_json::Value::Object(map) => {
                Event::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
