use std::fmt;
use std::sync::Arc;

use crate::encoder::{CompositeEncoder, EncoderKind, EventEncoder};

/// Client configuration. Immutable once handed to a client.
///
/// - `source_host`: written into `cloudlog_source_host`; defaults to the
///   OS host name.
/// - `encoder`: turns events into records; defaults to the automatic
///   order (primitive, then struct with the `cloudlog` tag).
#[derive(Clone)]
pub struct Config {
    source_host: String,
    encoder: Arc<dyn EventEncoder>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            source_host: local_hostname(),
            encoder: Arc::new(CompositeEncoder::automatic()),
        }
    }

    pub fn with_source_host(mut self, host: impl Into<String>) -> Self {
        self.source_host = host.into();
        self
    }

    /// Try the built-in encoders in the given order.
    pub fn with_encoders(mut self, kinds: &[EncoderKind]) -> Self {
        let encoders = kinds.iter().map(EncoderKind::build).collect();
        self.encoder = Arc::new(CompositeEncoder::new(encoders));
        self
    }

    /// Use a custom encoder in place of the built-in chain.
    pub fn with_encoder(mut self, encoder: impl EventEncoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    pub fn source_host(&self) -> &str {
        &self.source_host
    }

    pub fn encoder(&self) -> &Arc<dyn EventEncoder> {
        &self.encoder
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("source_host", &self.source_host)
            .finish_non_exhaustive()
    }
}

/// Host name reported by the OS, empty if it cannot be read.
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_default()
}
