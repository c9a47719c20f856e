use std::fmt;
use std::sync::Arc;

use crate::encoder::{EncoderKind, EventEncoder};
use crate::error::EncodeError;
use crate::event::Event;
use crate::record::Record;

/// Ordered fallback over several encoders.
///
/// Encoders are tried in the order given; the first one that succeeds
/// wins. This is not a most-specific match: when more than one encoder
/// accepts an event, the order decides. If none succeeds the result is
/// `UnsupportedEventType` carrying the original event.
#[derive(Clone)]
pub struct CompositeEncoder {
    encoders: Vec<Arc<dyn EventEncoder>>,
}

impl CompositeEncoder {
    pub fn new(encoders: Vec<Arc<dyn EventEncoder>>) -> Self {
        Self { encoders }
    }

    /// Primitive shapes first, then structs with the default tag.
    pub fn automatic() -> Self {
        Self::new(EncoderKind::automatic().iter().map(EncoderKind::build).collect())
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

impl Default for CompositeEncoder {
    fn default() -> Self {
        Self::automatic()
    }
}

impl fmt::Debug for CompositeEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeEncoder")
            .field("encoders", &self.encoders.len())
            .finish()
    }
}

impl EventEncoder for CompositeEncoder {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError> {
        for (position, encoder) in self.encoders.iter().enumerate() {
            match encoder.encode_event(event) {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::trace!(position, kind = event.kind(), error = %e, "encoder declined event");
                }
            }
        }
        Err(EncodeError::unsupported(event))
    }
}
