pub mod check;
pub mod push;

use cloudlog::Transport;
use cloudlog_transport_http::HttpTransport;

use crate::config::{KafkaConfig, TransportConfig};
use crate::error::PushError;

pub fn build_transport(config: TransportConfig) -> Result<Box<dyn Transport>, PushError> {
    match config {
        TransportConfig::Http(http) => Ok(Box::new(HttpTransport::new(http)?)),
        TransportConfig::Kafka(kafka) => kafka_transport(kafka),
    }
}

#[cfg(feature = "kafka")]
fn kafka_transport(config: KafkaConfig) -> Result<Box<dyn Transport>, PushError> {
    Ok(Box::new(config.into_transport()?))
}

#[cfg(not(feature = "kafka"))]
fn kafka_transport(_config: KafkaConfig) -> Result<Box<dyn Transport>, PushError> {
    Err(PushError::Config {
        context: "transport",
        detail: "kafka support is not compiled in (build with --features kafka)".into(),
    })
}
