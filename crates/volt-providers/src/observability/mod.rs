//! Transport instrumentation
//!
//! The host owns the observability provider. When one is configured the
//! registry asks it to wrap the base transport of every HTTP service it
//! materializes, so spans and metrics cover each individual attempt.

use crate::constants::{HTTP_CLIENT_DURATION_METRIC, HTTP_CLIENT_REQUESTS_METRIC};
use crate::http::{HttpTransport, SharedTransport};
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::{Request, Response};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info_span, warn};
use volt_domain::error::Result;

/// Supplies instrumentation for outbound HTTP transports
pub trait ObservabilityProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Wrap `inner` so requests for `service` are traced and measured
    fn instrument_transport(&self, service: &str, inner: SharedTransport) -> SharedTransport;
}

/// Observability backed by `tracing` spans and `metrics` counters
#[derive(Debug, Clone, Default)]
pub struct TracingObservability;

impl TracingObservability {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

impl ObservabilityProvider for TracingObservability {
    fn name(&self) -> &str {
        "tracing"
    }

    fn instrument_transport(&self, service: &str, inner: SharedTransport) -> SharedTransport {
        Arc::new(TracingTransport::new(service, inner))
    }
}

/// Transport emitting one span, one counter increment and one histogram sample per request
pub struct TracingTransport {
    service: String,
    inner: SharedTransport,
}

impl TracingTransport {
    /// Instrument `inner` for `service`
    pub fn new<S: Into<String>>(service: S, inner: SharedTransport) -> Self {
        Self {
            service: service.into(),
            inner,
        }
    }
}

#[async_trait]
impl HttpTransport for TracingTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let method = request.method().to_string();
        let span = info_span!(
            "http.client",
            service = %self.service,
            method = %method,
            url = %request.url(),
        );

        let started = Instant::now();
        let result = self.inner.send(request).instrument(span.clone()).await;
        let elapsed = started.elapsed().as_secs_f64();

        let status = match &result {
            Ok(response) => response.status().as_u16().to_string(),
            Err(_) => "error".to_string(),
        };

        span.in_scope(|| match &result {
            Ok(response) => debug!(status = response.status().as_u16(), elapsed, "HTTP request completed"),
            Err(e) => warn!(error = %e, elapsed, "HTTP request failed"),
        });

        counter!(
            HTTP_CLIENT_REQUESTS_METRIC,
            "service" => self.service.clone(),
            "method" => method.clone(),
            "status" => status
        )
        .increment(1);
        histogram!(
            HTTP_CLIENT_DURATION_METRIC,
            "service" => self.service.clone(),
            "method" => method
        )
        .record(elapsed);

        result
    }
}
