///! HamDB directory client

use async_trait::async_trait;
use hamcall_common::OperatorRecord;
use reqwest::Client;

use super::parser::parse_directory_response;
use crate::config::HamcallConfig;
use crate::error::{LookupError, TransportFailure};

/// Anything that can resolve a call sign to an operator record
#[async_trait]
pub trait Directory: Send + Sync {
    async fn lookup(&self, callsign: &str) -> Result<OperatorRecord, LookupError>;
}

/// HTTP client for `https://api.hamdb.org/v1/<CALL>/json/<client-id>`.
///
/// One request per lookup, no retries, no timeout beyond reqwest's default.
pub struct HamDbClient {
    client: Client,
    base_url: String,
    client_id: String,
}

impl HamDbClient {
    pub fn new(base_url: impl Into<String>, client_id: impl Into<String>, user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build reqwest client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            client_id: client_id.into(),
        })
    }

    pub fn from_config(config: &HamcallConfig) -> anyhow::Result<Self> {
        Self::new(&config.directory_url, &config.client_id, &config.user_agent)
    }

    pub fn lookup_url(&self, callsign: &str) -> String {
        format!(
            "{}/{}/json/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(callsign),
            urlencoding::encode(&self.client_id)
        )
    }
}

#[async_trait]
impl Directory for HamDbClient {
    async fn lookup(&self, callsign: &str) -> Result<OperatorRecord, LookupError> {
        if callsign.is_empty() {
            return Err(LookupError::EmptyInput);
        }

        let url = self.lookup_url(callsign);
        tracing::debug!("Looking up {} via {}", callsign, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportFailure::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status(status.as_u16()).into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::Parse(format!("Failed to read response body: {}", e)))?;

        parse_directory_response(callsign, &body)
    }
}
