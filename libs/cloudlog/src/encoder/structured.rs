use crate::encoder::EventEncoder;
use crate::error::EncodeError;
use crate::event::{Event, StructField};
use crate::record::Record;

/// Attribute tag consulted when no other tag is configured.
pub const DEFAULT_TAG_NAME: &str = "cloudlog";

/// Encoder for types deriving `StructEvent`.
///
/// Each declared field becomes one record key: the name given for this
/// encoder's tag in the field's `#[cloudlog(...)]` attribute, or the field's
/// own name when it has none. Anything without a field descriptor fails with
/// `NotAStruct`.
#[derive(Debug, Clone)]
pub struct StructEncoder {
    tag: String,
}

impl StructEncoder {
    pub fn new() -> Self {
        Self::with_tag(DEFAULT_TAG_NAME)
    }

    /// Use names registered under `tag` instead of the default tag.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for StructEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEncoder for StructEncoder {
    fn encode_event(&self, event: &Event) -> Result<Record, EncodeError> {
        let Event::Object(obj) = event else {
            return Err(EncodeError::NotAStruct);
        };
        obj.struct_fields()
            .map(|fields| fields_to_record(fields, &self.tag))
            .ok_or(EncodeError::NotAStruct)
    }
}

/// Map declared fields to a record using the names registered under `tag`.
///
/// When two fields resolve to the same key, the later declaration wins.
pub fn fields_to_record(fields: Vec<StructField>, tag: &str) -> Record {
    fields
        .into_iter()
        .map(|f| (f.descriptor.name_for(tag), f.value))
        .collect()
}
