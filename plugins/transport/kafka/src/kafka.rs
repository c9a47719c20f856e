use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rdkafka::ClientConfig;
use rdkafka::client::ClientContext;
use rdkafka::producer::{BaseProducer, BaseRecord, DeliveryResult, Producer, ProducerContext};

use cloudlog::{BoxError, CloudLogError};

use crate::{KafkaConfig, MessageProducer};

#[derive(Debug, thiserror::Error)]
pub enum KafkaDeliveryError {
    #[error("{failed} message(s) were not delivered: {first}")]
    Failed { failed: usize, first: String },
}

/// Collects delivery failures reported by librdkafka until the next flush.
#[derive(Default)]
struct DeliveryTracker {
    failures: Mutex<Vec<String>>,
}

impl ClientContext for DeliveryTracker {}

impl ProducerContext for DeliveryTracker {
    type DeliveryOpaque = ();

    fn delivery(&self, result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        if let Err((err, _)) = result {
            tracing::warn!(error = %err, "kafka delivery failed");
            self.failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(err.to_string());
        }
    }
}

impl DeliveryTracker {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

pub struct KafkaProducer {
    producer: BaseProducer<DeliveryTracker>,
    flush_timeout: Duration,
}

impl KafkaProducer {
    pub fn new(config: &KafkaConfig) -> Result<Self, CloudLogError> {
        if config.brokers.is_empty() {
            return Err(CloudLogError::Config("kafka: no brokers configured".into()));
        }

        let mut client_config = ClientConfig::new();
        client_config.set("bootstrap.servers", config.brokers.join(","));
        for (key, value) in &config.properties {
            client_config.set(key, value);
        }

        let producer = client_config
            .create_with_context(DeliveryTracker::default())
            .map_err(CloudLogError::transport)?;

        tracing::info!(brokers = %config.brokers.join(","), topic = %config.topic, "kafka producer created");
        Ok(Self {
            producer,
            flush_timeout: Duration::from_millis(config.flush_timeout_ms),
        })
    }
}

impl MessageProducer for KafkaProducer {
    fn produce(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError> {
        self.producer
            .send(BaseRecord::<(), [u8]>::to(topic).payload(payload))
            .map_err(|(err, _)| Box::new(err) as BoxError)?;
        self.producer.poll(Duration::ZERO);
        Ok(())
    }

    fn flush(&self) -> Result<(), BoxError> {
        self.producer.flush(self.flush_timeout)?;
        let failures = self.producer.context().take();
        match failures.first() {
            None => Ok(()),
            Some(first) => Err(Box::new(KafkaDeliveryError::Failed {
                failed: failures.len(),
                first: first.clone(),
            })),
        }
    }
}
