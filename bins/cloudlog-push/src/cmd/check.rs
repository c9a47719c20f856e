use cloudlog::{CloudLogError, Transport};
use cloudlog_transport_http::HttpTransport;

use crate::config::{CheckArgs, PushConfig, TransportConfig};
use crate::error::PushError;

pub fn run(args: CheckArgs) -> Result<(), PushError> {
    let config = PushConfig::load(&args.config)?;
    for line in describe(&config)? {
        println!("{line}");
    }
    Ok(())
}

/// Resolved settings, one `key: value` per line. Opens no connection.
pub fn describe(config: &PushConfig) -> Result<Vec<String>, PushError> {
    let client_config = config.client_config();
    let encoders: Vec<String> = config.encoders.iter().map(ToString::to_string).collect();

    let mut lines = vec![
        format!("source_host: {}", client_config.source_host()),
        format!("encoders: {}", encoders.join(", ")),
    ];
    match &config.transport {
        TransportConfig::Http(http) => {
            let transport = HttpTransport::new(http.clone())?;
            lines.push(format!("transport: http {}", transport.url()));
            lines.push(format!("client_type: {}", transport.client_type()));
        }
        TransportConfig::Kafka(kafka) => {
            if kafka.topic.is_empty() {
                return Err(CloudLogError::IndexNotDefined.into());
            }
            lines.push(format!(
                "transport: kafka {} topic {}",
                kafka.brokers.join(","),
                kafka.topic
            ));
            lines.push(format!("client_type: {}", kafka.client_type));
        }
    }
    Ok(lines)
}
