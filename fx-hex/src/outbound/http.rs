//! `reqwest` implementation of the upstream transport port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use fx_types::{TransportError, UpstreamResponse, UpstreamTransport};

/// Plain HTTP GET against the provider.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client that gives up on any single request after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fx-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<UpstreamResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(UpstreamResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status"),
            body,
        ))
    }
}
