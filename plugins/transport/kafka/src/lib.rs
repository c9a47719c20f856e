//! Message-queue transport.
//!
//! Each record of a batch becomes one message on the configured topic. The
//! whole batch is marshalled before anything is produced, so a record that
//! cannot be serialized aborts the push with nothing sent.
//!
//! The broker client sits behind [`MessageProducer`]. The `rdkafka` feature
//! provides a Kafka implementation.

use std::collections::BTreeMap;

use serde::Deserialize;

use cloudlog::{Batch, BoxError, CloudLogError, Transport};

#[cfg(feature = "rdkafka")]
mod kafka;
#[cfg(feature = "rdkafka")]
pub use kafka::KafkaProducer;

pub const DEFAULT_CLIENT_TYPE: &str = "rust-client-kafka";

/// Broker client used by [`QueueTransport`].
pub trait MessageProducer: Send + Sync {
    /// Enqueue one message for `topic`.
    fn produce(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError>;

    /// Wait for enqueued messages to be handed to the broker.
    fn flush(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<P: MessageProducer + ?Sized> MessageProducer for Box<P> {
    fn produce(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError> {
        (**self).produce(topic, payload)
    }

    fn flush(&self) -> Result<(), BoxError> {
        (**self).flush()
    }
}

impl<P: MessageProducer + ?Sized> MessageProducer for std::sync::Arc<P> {
    fn produce(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError> {
        (**self).produce(topic, payload)
    }

    fn flush(&self) -> Result<(), BoxError> {
        (**self).flush()
    }
}

/// Settings for a Kafka-backed queue transport.
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    /// Extra librdkafka properties, passed through verbatim.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
    #[serde(default = "default_client_type")]
    pub client_type: String,
}

fn default_flush_timeout_ms() -> u64 {
    10_000
}
fn default_client_type() -> String {
    DEFAULT_CLIENT_TYPE.to_string()
}

impl KafkaConfig {
    pub fn new(brokers: Vec<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers,
            topic: topic.into(),
            properties: BTreeMap::new(),
            flush_timeout_ms: default_flush_timeout_ms(),
            client_type: default_client_type(),
        }
    }

    /// Connect a producer and wrap it in a transport.
    #[cfg(feature = "rdkafka")]
    pub fn into_transport(self) -> Result<QueueTransport<KafkaProducer>, CloudLogError> {
        let producer = KafkaProducer::new(&self)?;
        Ok(QueueTransport::new(producer, self.topic)?.with_client_type(self.client_type))
    }
}

pub struct QueueTransport<P> {
    producer: P,
    topic: String,
    client_type: String,
}

impl<P: MessageProducer> QueueTransport<P> {
    pub fn new(producer: P, topic: impl Into<String>) -> Result<Self, CloudLogError> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(CloudLogError::IndexNotDefined);
        }
        Ok(Self {
            producer,
            topic,
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
        })
    }

    pub fn with_client_type(mut self, client_type: impl Into<String>) -> Self {
        self.client_type = client_type.into();
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }
}

impl<P: MessageProducer> Transport for QueueTransport<P> {
    fn client_type(&self) -> &str {
        &self.client_type
    }

    fn send(&self, batch: &Batch) -> Result<(), CloudLogError> {
        let messages = batch.to_json_messages()?;
        tracing::trace!(topic = %self.topic, messages = messages.len(), "producing batch");

        for payload in &messages {
            self.producer
                .produce(&self.topic, payload)
                .map_err(CloudLogError::Transport)?;
        }
        self.producer.flush().map_err(CloudLogError::Transport)
    }

    fn close(&self) -> Result<(), CloudLogError> {
        tracing::debug!(topic = %self.topic, "closing queue transport");
        self.producer.flush().map_err(CloudLogError::Transport)
    }
}
