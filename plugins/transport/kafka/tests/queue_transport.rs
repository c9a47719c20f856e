//! Tests for the queue transport with an in-memory producer.

use std::sync::{Arc, Mutex};

use cloudlog::{BoxError, CloudLog, CloudLogError, Record, Transport, Value};
use cloudlog_transport_kafka::{KafkaConfig, MessageProducer, QueueTransport};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct RecordingProducer {
    messages: Mutex<Vec<(String, Vec<u8>)>>,
    flushes: Mutex<usize>,
    fail_produce: bool,
}

impl RecordingProducer {
    fn failing() -> Self {
        Self {
            fail_produce: true,
            ..Self::default()
        }
    }

    fn messages(&self) -> Vec<(String, serde_json::Value)> {
        self.messages
            .lock()
            .expect("lock")
            .iter()
            .map(|(topic, payload)| {
                let json = serde_json::from_slice(payload).expect("payload should be JSON");
                (topic.clone(), json)
            })
            .collect()
    }

    fn flushes(&self) -> usize {
        *self.flushes.lock().expect("lock")
    }
}

impl MessageProducer for RecordingProducer {
    fn produce(&self, topic: &str, payload: &[u8]) -> Result<(), BoxError> {
        if self.fail_produce {
            return Err("queue full".into());
        }
        self.messages
            .lock()
            .expect("lock")
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn flush(&self) -> Result<(), BoxError> {
        *self.flushes.lock().expect("lock") += 1;
        Ok(())
    }
}

fn client(producer: Arc<RecordingProducer>) -> CloudLog<QueueTransport<Arc<RecordingProducer>>> {
    CloudLog::new(QueueTransport::new(producer, "events").expect("should build transport"))
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_empty_topic_is_rejected() {
    let result = QueueTransport::new(RecordingProducer::default(), "");
    assert!(matches!(result, Err(CloudLogError::IndexNotDefined)));
}

#[test]
fn test_one_message_per_record() {
    let producer = Arc::new(RecordingProducer::default());
    let cl = client(producer.clone());

    cl.push_events(["a", "b", "c"]).expect("push should succeed");

    let messages = producer.messages();
    assert_eq!(messages.len(), 3);
    for (topic, json) in &messages {
        assert_eq!(topic, "events");
        assert_eq!(json["cloudlog_client_type"], "rust-client-kafka");
        assert_eq!(json["timestamp"], messages[0].1["timestamp"]);
    }
    assert_eq!(messages[2].1["message"], "c");
    assert_eq!(producer.flushes(), 1);
}

#[test]
fn test_custom_client_type() {
    let producer = Arc::new(RecordingProducer::default());
    let transport = QueueTransport::new(producer.clone(), "events")
        .expect("should build transport")
        .with_client_type("billing-worker");
    assert_eq!(transport.client_type(), "billing-worker");

    CloudLog::new(transport).push_event("x").expect("push should succeed");
    assert_eq!(producer.messages()[0].1["cloudlog_client_type"], "billing-worker");
}

#[test]
fn test_marshal_failure_produces_nothing() {
    let producer = Arc::new(RecordingProducer::default());
    let cl = client(producer.clone());

    let bad = Record::from([("ratio", Value::Float(f64::INFINITY))]);
    let err = cl
        .push_events([Record::from([("ok", 1)]), bad])
        .expect_err("infinite float should not marshal");

    assert!(matches!(err, CloudLogError::Marshal(_)));
    assert!(producer.messages().is_empty());
    assert_eq!(producer.flushes(), 0);
}

#[test]
fn test_produce_failure_is_transport_error() {
    let producer = Arc::new(RecordingProducer::failing());
    let err = client(producer).push_event("x").expect_err("push should fail");
    assert!(matches!(err, CloudLogError::Transport(_)));
    assert_eq!(err.to_string(), "queue full");
}

#[test]
fn test_close_flushes() {
    let producer = Arc::new(RecordingProducer::default());
    client(producer.clone()).close().expect("close should succeed");
    assert_eq!(producer.flushes(), 1);
}

#[test]
fn test_kafka_config_defaults() {
    let config: KafkaConfig =
        serde_json::from_str(r#"{"brokers": ["localhost:9092"], "topic": "logs"}"#)
            .expect("should deserialize");
    assert_eq!(config.brokers, vec!["localhost:9092".to_string()]);
    assert_eq!(config.topic, "logs");
    assert!(config.properties.is_empty());
    assert_eq!(config.flush_timeout_ms, 10_000);
    assert_eq!(config.client_type, "rust-client-kafka");
}
