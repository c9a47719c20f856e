//! Event encoders.
//!
//! An encoder turns one [`Event`] of unknown shape into a flat [`Record`].
//! Three variants:
//! - [`PrimitiveEncoder`]: self-describing objects, maps, text, bytes.
//! - [`StructEncoder`]: objects carrying a compile-time field descriptor.
//! - [`CompositeEncoder`]: ordered list of encoders, first success wins.

mod composite;
mod kind;
mod primitive;
mod structured;


use std::sync::Arc;

use crate::error::EncodeError;
use crate::event::Event;
use crate::record::Record;

pub use composite::CompositeEncoder;
pub use kind::EncoderKind;
pub use primitive::PrimitiveEncoder;
pub use structured::{DEFAULT_TAG_NAME, StructEncoder, fields_to_record};

/// Turns one event into a record. Pure: no side effects.
pub trait EventEncoder: Send + Sync {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError>;
}

impl<T: EventEncoder + ?Sized> EventEncoder for Arc<T> {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError> {
        (**self).encode_event(event)
    }
}

impl<T: EventEncoder + ?Sized> EventEncoder for Box<T> {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError> {
        (**self).encode_event(event)
    }
}
