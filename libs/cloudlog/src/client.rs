use std::sync::Arc;

use crate::batch::{Batch, RecordBuilder};
use crate::config::Config;
use crate::encoder::EventEncoder;
use crate::error::CloudLogError;
use crate::event::Event;
use crate::transport::Transport;

/// Client that pushes events through a [`Transport`].
///
/// Pushing is synchronous: it returns once the transport has accepted or
/// rejected the whole batch. Encoding failures abort the push before the
/// transport is involved, and nothing is retried.
pub struct CloudLog<T> {
    transport: T,
    encoder: Arc<dyn EventEncoder>,
    source_host: String,
}

impl<T: Transport> CloudLog<T> {
    /// Client with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, Config::default())
    }

    pub fn with_config(transport: T, config: Config) -> Self {
        Self {
            transport,
            encoder: config.encoder().clone(),
            source_host: config.source_host().to_string(),
        }
    }

    pub fn source_host(&self) -> &str {
        &self.source_host
    }

    pub fn client_type(&self) -> &str {
        self.transport.client_type()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Push a single event.
    pub fn push_event(&self, event: impl Into<Event>) -> Result<(), CloudLogError> {
        self.push(vec![event.into()])
    }

    /// Push several events as one batch.
    ///
    /// A single event that is itself a sequence is pushed as its elements.
    pub fn push_events<I>(&self, events: I) -> Result<(), CloudLogError>
    where
        I: IntoIterator,
        I::Item: Into<Event>,
    {
        self.push(events.into_iter().map(Into::into).collect())
    }

    /// Encode events into the batch a push would send, without sending it.
    pub fn build_batch(&self, events: Vec<Event>) -> Result<Batch, CloudLogError> {
        let builder = RecordBuilder::new(
            self.encoder.as_ref(),
            &self.source_host,
            self.transport.client_type(),
        );
        Ok(builder.build(events)?)
    }

    fn push(&self, events: Vec<Event>) -> Result<(), CloudLogError> {
        let batch = self.build_batch(events)?;
        if batch.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            records = batch.len(),
            client_type = self.transport.client_type(),
            "pushing batch"
        );
        self.transport.send(&batch)
    }

    /// Close the underlying transport.
    pub fn close(self) -> Result<(), CloudLogError> {
        self.transport.close()
    }
}
