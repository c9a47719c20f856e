use crate::encoder::EventEncoder;
use crate::error::EncodeError;
use crate::event::Event;
use crate::record::{MESSAGE_FIELD, Record};

/// Encoder for the shapes that need no schema.
///
/// Checked in order:
/// 1. `Object` with a self-describing `encode()`: used as-is.
/// 2. `Map`: passed through unchanged.
/// 3. `Text`: wrapped as `{"message": text}`.
/// 4. `Bytes`: decoded as UTF-8 (invalid sequences replaced) and wrapped
///    like text.
///
/// Everything else is rejected with `UnsupportedEventType`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveEncoder;

impl PrimitiveEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl EventEncoder for PrimitiveEncoder {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError> {
        match event {
            Event::Object(obj) => obj.encode().ok_or_else(|| EncodeError::unsupported(event)),
            Event::Map(map) => Ok(map.clone()),
            Event::Text(text) => Ok(message(text.clone())),
            Event::Bytes(bytes) => Ok(message(String::from_utf8_lossy(bytes).into_owned())),
            _ => Err(EncodeError::unsupported(event)),
        }
    }
}

fn message(text: String) -> Record {
    let mut record = Record::new();
    record.insert(MESSAGE_FIELD, text);
    record
}
