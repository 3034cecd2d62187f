//! HTTP service client
//!
//! The client handed to HTTP service constructors. It resolves request
//! paths against the service base URL, pushes every request through the
//! decorated transport, and bounds the whole call (retries and backoff
//! included) by the service timeout.

use super::base::ReqwestTransport;
use super::headers::{HeaderTransport, parse_default_headers};
use super::retry::{RetryPolicy, RetryTransport};
use super::transport::{SharedTransport, TransportStack};
use crate::constants::{LAYER_HEADERS, LAYER_RETRY, LAYER_TRACING};
use crate::observability::ObservabilityProvider;
use reqwest::{Client, Method, Request, RequestBuilder, Response, Url};
use std::sync::Arc;
use std::time::Duration;
use volt_domain::HttpServiceConfig;
use volt_domain::error::{Error, Result};

/// Instrumented, retrying, header-injecting client for one HTTP service
#[derive(Clone)]
pub struct HttpClient {
    service: Arc<str>,
    base_url: Option<Url>,
    timeout: Duration,
    client: Client,
    transport: SharedTransport,
}

impl HttpClient {
    /// Assemble the transport chain for `service` and build its client
    ///
    /// Layers, innermost first: reqwest base, host-supplied instrumentation
    /// (when `observability` is set), retry (when `max_retries > 0`),
    /// default headers (when any are configured).
    pub fn from_config(
        service: &str,
        config: &HttpServiceConfig,
        observability: Option<Arc<dyn ObservabilityProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        let (client, stack) = Self::transport_stack(service, config, observability)?;
        Self::new(service, config, client, stack.build())
    }

    /// The ordered decorator stack for `config`, together with the request-building client
    pub fn transport_stack(
        service: &str,
        config: &HttpServiceConfig,
        observability: Option<Arc<dyn ObservabilityProvider>>,
    ) -> Result<(Client, TransportStack)> {
        let base = ReqwestTransport::from_config(config)?;
        let client = base.client().clone();
        let mut stack = TransportStack::new(Arc::new(base));

        if let Some(provider) = observability {
            let service = service.to_string();
            stack = stack.layer(LAYER_TRACING, move |inner| {
                provider.instrument_transport(&service, inner)
            });
        }

        if config.max_retries > 0 {
            let policy = RetryPolicy::from_config(config);
            stack = stack.layer(LAYER_RETRY, move |inner| {
                Arc::new(RetryTransport::new(inner, policy))
            });
        }

        if !config.default_headers.is_empty() {
            let headers = parse_default_headers(&config.default_headers)?;
            stack = stack.layer(LAYER_HEADERS, move |inner| {
                Arc::new(HeaderTransport::new(inner, headers))
            });
        }

        Ok((client, stack))
    }

    /// Build a client over an explicit transport
    pub fn new(
        service: &str,
        config: &HttpServiceConfig,
        client: Client,
        transport: SharedTransport,
    ) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(parse_base_url)
            .transpose()?;

        Ok(Self {
            service: Arc::from(service),
            base_url,
            timeout: config.timeout,
            client,
            transport,
        })
    }

    /// Service name this client belongs to
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Base URL relative paths resolve against
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Total time allowed per call; zero means unbounded
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The outermost transport
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Resolve `path` against the base URL; absolute URLs pass through
    pub fn url(&self, path: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        let base = self.base_url.as_ref().ok_or_else(|| {
            Error::invalid_argument(format!(
                "relative path {path:?} used on service {:?} without a base URL",
                self.service
            ))
        })?;
        base.join(path.trim_start_matches('/'))
            .map_err(|e| Error::invalid_argument(format!("invalid request path {path:?}: {e}")))
    }

    /// Start a request; send it with [`HttpClient::send`]
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// Start a GET request
    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::GET, path)
    }

    /// Start a POST request
    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::POST, path)
    }

    /// Start a PUT request
    pub fn put(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PUT, path)
    }

    /// Start a PATCH request
    pub fn patch(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PATCH, path)
    }

    /// Start a DELETE request
    pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path)
    }

    /// Build and send a request started with this client
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder
            .build()
            .map_err(|e| Error::invalid_argument(format!("invalid request: {e}")))?;
        self.execute(request).await
    }

    /// Send a request through the transport chain
    pub async fn execute(&self, request: Request) -> Result<Response> {
        if self.timeout.is_zero() {
            return self.transport.send(request).await;
        }
        tokio::time::timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|_| Error::timeout(format!("HTTP call on service {:?}", self.service)))?
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Parse a base URL, forcing a trailing slash so joins keep the full path
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| Error::invalid_argument(format!("invalid base URL {raw:?}: {e}")))
}
