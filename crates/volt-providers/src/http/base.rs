//! Base transport backed by a pooled reqwest client

use super::transport::HttpTransport;
use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use volt_domain::error::{Error, Result};
use volt_domain::HttpServiceConfig;

/// Transport that performs the actual network exchange
///
/// Connection pooling follows the service configuration. reqwest only
/// bounds idle connections per host, so `max_idle_conns` is not enforced
/// separately.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a pooled client from the service configuration
    pub fn from_config(config: &HttpServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_idle_conns_per_host)
            .pool_idle_timeout(config.idle_conn_timeout)
            .build()
            .map_err(|e| Error::network_with_source("Failed to build HTTP client", e))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client, used to build requests
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().clone();
        self.client
            .execute(request)
            .await
            .map_err(|e| Error::network_with_source(format!("{method} {url} failed"), e))
    }
}
