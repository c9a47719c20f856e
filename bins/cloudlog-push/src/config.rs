use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use cloudlog::EncoderKind;
pub use cloudlog_transport_http::HttpConfig;
pub use cloudlog_transport_kafka::KafkaConfig;

use crate::error::PushError;

#[derive(Parser)]
#[command(name = "cloudlog-push", about = "Push events to a CloudLog index")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push events given as arguments, or one per stdin line
    Push(PushArgs),
    /// Validate the config file and show the resolved transport
    Check(CheckArgs),
}

#[derive(Args, Clone, Debug)]
pub struct PushArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "cloudlog.toml", env = "CLOUDLOG_CONFIG")]
    pub config: String,

    /// Parse every event as JSON instead of sending it as a text message
    #[arg(long)]
    pub json: bool,

    /// Events to push. Read from stdin when none are given.
    pub events: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "cloudlog.toml", env = "CLOUDLOG_CONFIG")]
    pub config: String,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct PushConfig {
    /// Overrides the OS host name in `cloudlog_source_host`.
    #[serde(default)]
    pub source_host: Option<String>,
    #[serde(default = "default_encoders")]
    pub encoders: Vec<EncoderKind>,
    pub transport: TransportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportConfig {
    Http(HttpConfig),
    Kafka(KafkaConfig),
}

fn default_encoders() -> Vec<EncoderKind> {
    EncoderKind::automatic()
}

impl PushConfig {
    pub fn load(path: &str) -> Result<Self, PushError> {
        let content = std::fs::read_to_string(path).map_err(|e| PushError::Config {
            context: "read",
            detail: format!("'{path}': {e}"),
        })?;
        Self::parse(&content).map_err(|e| match e {
            PushError::Config { context, detail } => PushError::Config {
                context,
                detail: format!("'{path}': {detail}"),
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, PushError> {
        let config: Self = toml::from_str(content).map_err(|e| PushError::Config {
            context: "parse",
            detail: e.to_string(),
        })?;
        if config.encoders.is_empty() {
            return Err(PushError::Config {
                context: "validate",
                detail: "encoders must not be empty".into(),
            });
        }
        Ok(config)
    }

    /// Core client configuration described by this file.
    pub fn client_config(&self) -> cloudlog::Config {
        let config = cloudlog::Config::new().with_encoders(&self.encoders);
        match &self.source_host {
            Some(host) => config.with_source_host(host.clone()),
            None => config,
        }
    }
}
