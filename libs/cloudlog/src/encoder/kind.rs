use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::encoder::{DEFAULT_TAG_NAME, EventEncoder, PrimitiveEncoder, StructEncoder};

/// Built-in encoder variant, as named in configuration.
///
/// String form: `primitive`, `struct` (default tag) or `struct:<tag>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EncoderKind {
    Primitive,
    Struct { tag: String },
}

impl EncoderKind {
    /// The order used when nothing else is configured.
    pub fn automatic() -> Vec<EncoderKind> {
        vec![
            EncoderKind::Primitive,
            EncoderKind::Struct {
                tag: DEFAULT_TAG_NAME.to_string(),
            },
        ]
    }

    pub fn build(&self) -> Arc<dyn EventEncoder> {
        match self {
            EncoderKind::Primitive => Arc::new(PrimitiveEncoder::new()),
            EncoderKind::Struct { tag } => Arc::new(StructEncoder::with_tag(tag.clone())),
        }
    }
}

impl TryFrom<String> for EncoderKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.split_once(':') {
            None if s == "primitive" => Ok(EncoderKind::Primitive),
            None if s == "struct" => Ok(EncoderKind::Struct {
                tag: DEFAULT_TAG_NAME.to_string(),
            }),
            Some(("struct", tag)) if !tag.is_empty() => Ok(EncoderKind::Struct {
                tag: tag.to_string(),
            }),
            _ => Err(format!(
                "unknown encoder '{s}' (expected 'primitive', 'struct' or 'struct:<tag>')"
            )),
        }
    }
}

impl From<EncoderKind> for String {
    fn from(kind: EncoderKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderKind::Primitive => f.write_str("primitive"),
            EncoderKind::Struct { tag } if tag == DEFAULT_TAG_NAME => f.write_str("struct"),
            EncoderKind::Struct { tag } => write!(f, "struct:{tag}"),
        }
    }
}
