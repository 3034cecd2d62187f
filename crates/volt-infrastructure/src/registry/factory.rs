//! Registry entries and lazy factories

use super::context::LifecycleContext;
use super::handle::ServiceRef;
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use volt_domain::{DatabaseConfig, HttpServiceConfig, SharedDatabasePool};
use volt_providers::HttpClient;

/// Teardown callback run once at shutdown
pub type ShutdownHook =
    Box<dyn FnOnce(LifecycleContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

pub(crate) type HttpConstructor = Box<dyn FnOnce(HttpClient) -> ServiceRef + Send + Sync>;

pub(crate) type DatabaseConstructor =
    Box<dyn FnOnce(SharedDatabasePool) -> ServiceRef + Send + Sync>;

/// Where a factory is in its lifecycle
///
/// Transitions only move forward: `Pending → Materialized → Closed`.
/// HTTP factories never close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryState {
    /// Registered, waiting for `initialize`
    Pending,
    /// Instance built and visible to lookups
    Materialized,
    /// Pool released at shutdown; no longer visible to lookups
    Closed,
}

impl fmt::Display for FactoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryState::Pending => write!(f, "pending"),
            FactoryState::Materialized => write!(f, "materialized"),
            FactoryState::Closed => write!(f, "closed"),
        }
    }
}

/// Kind of registration a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Service,
    HttpService,
    Database,
}

impl EntryKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            EntryKind::Service => "a service",
            EntryKind::HttpService => "an HTTP service",
            EntryKind::Database => "a database",
        }
    }
}

/// Immediately-available service
pub(crate) struct ServiceEntry {
    pub(crate) instance: ServiceRef,
    pub(crate) hook: Option<ShutdownHook>,
}

/// Lazily built HTTP service
pub(crate) struct HttpFactory {
    pub(crate) config: HttpServiceConfig,
    pub(crate) constructor: Option<HttpConstructor>,
    pub(crate) client: Option<HttpClient>,
    pub(crate) instance: Option<ServiceRef>,
}

impl HttpFactory {
    pub(crate) fn new(config: HttpServiceConfig, constructor: HttpConstructor) -> Self {
        Self {
            config,
            constructor: Some(constructor),
            client: None,
            instance: None,
        }
    }

    pub(crate) fn state(&self) -> FactoryState {
        if self.instance.is_some() {
            FactoryState::Materialized
        } else {
            FactoryState::Pending
        }
    }
}

/// Lazily opened database
pub(crate) struct DatabaseFactory {
    pub(crate) config: DatabaseConfig,
    pub(crate) constructor: Option<DatabaseConstructor>,
    pub(crate) pool: Option<SharedDatabasePool>,
    pub(crate) instance: Option<ServiceRef>,
    pub(crate) closed: bool,
}

impl DatabaseFactory {
    pub(crate) fn new(config: DatabaseConfig, constructor: DatabaseConstructor) -> Self {
        Self {
            config,
            constructor: Some(constructor),
            pool: None,
            instance: None,
            closed: false,
        }
    }

    pub(crate) fn state(&self) -> FactoryState {
        if self.closed {
            FactoryState::Closed
        } else if self.instance.is_some() {
            FactoryState::Materialized
        } else {
            FactoryState::Pending
        }
    }
}
