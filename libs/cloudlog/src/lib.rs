//! Client-side event ingestion for CloudLog.
//!
//! Events of several shapes are encoded into flat records, stamped with a
//! canonical epoch-millisecond `timestamp` and provenance fields, and handed
//! to a [`Transport`] as one batch per push.

pub mod batch;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod event;
pub mod record;
pub mod timestamp;
pub mod transport;
pub mod value;

#[cfg(test)]
mod value_test;

pub use cloudlog_derive::StructEvent;

pub use batch::{Batch, RecordBuilder};
pub use client::CloudLog;
pub use config::Config;
pub use encoder::{CompositeEncoder, EncoderKind, EventEncoder, PrimitiveEncoder, StructEncoder};
pub use error::{BoxError, CloudLogError, EncodeError, MarshalError};
pub use event::{Event, EventObject, FieldDescriptor, StructField};
pub use record::Record;
pub use transport::{MemoryTransport, Transport};
pub use value::{ToValue, Value};
