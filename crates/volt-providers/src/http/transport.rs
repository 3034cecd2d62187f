//! Transport trait and decorator stack

use async_trait::async_trait;
use reqwest::{Request, Response};
use std::sync::Arc;
use volt_domain::error::Result;

/// Sends one HTTP request and returns its response
///
/// The moral equivalent of a round tripper: implementations either perform
/// the exchange or decorate another transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Type alias for a shared transport
pub type SharedTransport = Arc<dyn HttpTransport>;

/// A decorator: wraps one transport into another
pub type TransportLayer = Box<dyn FnOnce(SharedTransport) -> SharedTransport + Send>;

/// Ordered list of decorators applied over a base transport
///
/// Layers are applied in insertion order, so the last layer added is the
/// outermost one and sees each request first.
pub struct TransportStack {
    base: SharedTransport,
    layers: Vec<(&'static str, TransportLayer)>,
}

impl TransportStack {
    /// Start a stack over `base`
    pub fn new(base: SharedTransport) -> Self {
        Self {
            base,
            layers: Vec::new(),
        }
    }

    /// Append a named decorator
    pub fn layer<F>(mut self, name: &'static str, wrap: F) -> Self
    where
        F: FnOnce(SharedTransport) -> SharedTransport + Send + 'static,
    {
        self.layers.push((name, Box::new(wrap)));
        self
    }

    /// Names of the layers, innermost first
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|(name, _)| *name).collect()
    }

    /// Apply every layer and return the outermost transport
    pub fn build(self) -> SharedTransport {
        self.layers
            .into_iter()
            .fold(self.base, |inner, (_, wrap)| wrap(inner))
    }
}

impl std::fmt::Debug for TransportStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportStack")
            .field("layers", &self.layer_names())
            .finish()
    }
}
