use crate::event::Event;
use crate::record::Record;

/// Boxed error from a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to turn one event into a record.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// No encoder recognizes the shape. Carries the rejected event.
    #[error("unsupported event type: {}", event.kind())]
    UnsupportedEventType { event: Event },

    #[error("event is not a struct")]
    NotAStruct,
}

impl EncodeError {
    pub fn unsupported(event: &Event) -> Self {
        EncodeError::UnsupportedEventType {
            event: event.clone(),
        }
    }
}

/// A record could not be serialized to the wire format.
#[derive(Debug, thiserror::Error)]
#[error("Marshal of event failed: {source}")]
pub struct MarshalError {
    /// The offending record, for diagnostics.
    pub record: Record,
    pub source: serde_json::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum CloudLogError {
    #[error("index name is not defined")]
    IndexNotDefined,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// Send failed or the backend rejected the batch. Passed through as-is.
    #[error(transparent)]
    Transport(BoxError),
}

impl CloudLogError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        CloudLogError::Transport(err.into())
    }

    /// The event that no encoder accepted, if this is an encoding failure.
    pub fn rejected_event(&self) -> Option<&Event> {
        match self {
            CloudLogError::Encode(EncodeError::UnsupportedEventType { event }) => Some(event),
            _ => None,
        }
    }

    /// Add context to the error.
    ///
    /// Only `Config` carries a free-form message; other variants are returned
    /// unchanged so callers can still match on them.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            CloudLogError::Config(msg) => CloudLogError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
