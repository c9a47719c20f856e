//! HTTP bulk transport.
//!
//! One push is one `POST {base_url}/v1/index/{index}/data` carrying
//! `{"records":[...]}`, authorized with the raw token in `Authorization`.
//! The backend answers `201 Created` on success; any other status fails the
//! push. Blocking: do not call from inside an async runtime.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use cloudlog::{Batch, CloudLogError, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api0401.bdp.anexia-it.com";
pub const DEFAULT_CLIENT_TYPE: &str = "rust-client-rest";

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Target index; part of the endpoint path.
    pub index: String,
    /// Sent verbatim as the `Authorization` header.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_client_type")]
    pub client_type: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_client_type() -> String {
    DEFAULT_CLIENT_TYPE.to_string()
}

impl HttpConfig {
    pub fn new(index: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            token: token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            client_type: default_client_type(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("expecting status 201 but received {status}")]
    UnexpectedStatus { status: u16 },
}

pub struct HttpTransport {
    client: Client,
    url: String,
    token: String,
    client_type: String,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self, CloudLogError> {
        if config.index.is_empty() {
            return Err(CloudLogError::IndexNotDefined);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CloudLogError::transport)?;
        let url = format!(
            "{}/v1/index/{}/data",
            config.base_url.trim_end_matches('/'),
            urlencoding::encode(&config.index)
        );
        tracing::debug!(url = %url, "http transport ready");
        Ok(Self {
            client,
            url,
            token: config.token,
            client_type: config.client_type,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn client_type(&self) -> &str {
        &self.client_type
    }

    fn send(&self, batch: &Batch) -> Result<(), CloudLogError> {
        let body = batch.to_json_body()?;
        tracing::trace!(url = %self.url, records = batch.len(), bytes = body.len(), "posting batch");

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(CloudLogError::transport)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(CloudLogError::transport(HttpError::UnexpectedStatus {
                status: status.as_u16(),
            }));
        }
        Ok(())
    }
}
