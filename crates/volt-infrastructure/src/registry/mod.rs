//! Service Registry
//!
//! Named container for the services an application depends on. Plain
//! services are available as soon as they are registered; HTTP services and
//! databases are registered as factories and materialized once by
//! [`ServiceRegistry::initialize`]. [`ServiceRegistry::shutdown`] tears
//! everything down in reverse order.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ServiceRegistry::new();
//!
//! let github = registry.register_http_service(
//!     "github",
//!     HttpServiceConfig::default().with_base_url("https://api.github.com"),
//!     GithubClient::new,
//! )?;
//! let db = registry.register_database("primary", DatabaseConfig::postgres(dsn))?;
//!
//! registry
//!     .initialize(&LifecycleContext::with_timeout(Duration::from_secs(30)), &HostServices::default())
//!     .await?;
//!
//! let github = registry.resolve(&github)?;
//! ```
//!
//! ## Locking
//!
//! One reader/writer lock guards the stores. Lookups take it shared;
//! registration and the state transitions inside `initialize`/`shutdown`
//! take it exclusively, but never across an `.await` or a user constructor.
//! A separate async gate keeps `initialize` and `shutdown` from overlapping.

pub mod context;
pub mod factory;
pub mod handle;

pub use context::LifecycleContext;
pub use factory::{FactoryState, ShutdownHook};
pub use handle::{ServiceHandle, ServiceRef};

use factory::{DatabaseFactory, EntryKind, HttpFactory, ServiceEntry};
use futures::future::BoxFuture;
use std::any::type_name;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use volt_domain::constants::DB_DEFAULT_CONNECT_TIMEOUT;
use volt_domain::error::{Error, Result, TeardownFailure, TeardownFailures};
use volt_domain::{DatabaseConfig, DatabaseDriver, HttpServiceConfig, SharedDatabasePool};
use volt_providers::{HttpClient, ObservabilityProvider};

/// Cross-cutting collaborators the host passes into `initialize`
#[derive(Clone, Default)]
pub struct HostServices {
    /// Wraps every HTTP service transport when set
    pub observability: Option<Arc<dyn ObservabilityProvider>>,
}

impl HostServices {
    /// Host services with an observability provider
    pub fn with_observability(provider: Arc<dyn ObservabilityProvider>) -> Self {
        Self {
            observability: Some(provider),
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field(
                "observability",
                &self.observability.as_ref().map(|provider| provider.name()),
            )
            .finish()
    }
}

#[derive(Default)]
struct RegistryState {
    services: HashMap<String, ServiceEntry>,
    /// Plain service names in registration order, no duplicates
    order: Vec<String>,
    http: HashMap<String, HttpFactory>,
    databases: HashMap<String, DatabaseFactory>,
    /// Factory names (HTTP and database) in registration order
    factory_order: Vec<String>,
    drivers: HashMap<String, Arc<dyn DatabaseDriver>>,
}

impl RegistryState {
    fn kind_of(&self, name: &str) -> Option<EntryKind> {
        if self.services.contains_key(name) {
            Some(EntryKind::Service)
        } else if self.http.contains_key(name) {
            Some(EntryKind::HttpService)
        } else if self.databases.contains_key(name) {
            Some(EntryKind::Database)
        } else {
            None
        }
    }

    fn lookup(&self, name: &str) -> Option<ServiceRef> {
        if let Some(entry) = self.services.get(name) {
            return Some(Arc::clone(&entry.instance));
        }
        if let Some(factory) = self.http.get(name) {
            return factory.instance.clone();
        }
        self.databases
            .get(name)
            .filter(|factory| !factory.closed)
            .and_then(|factory| factory.instance.clone())
    }

    /// Reject `name` if it belongs to a kind other than `kind`
    fn ensure_kind(&self, name: &str, kind: EntryKind) -> Result<()> {
        match self.kind_of(name) {
            Some(existing) if existing != kind => Err(Error::DuplicateService {
                name: name.to_string(),
                existing: existing.label(),
            }),
            _ => Ok(()),
        }
    }

    fn pending_factories(&self, kind: EntryKind) -> Vec<String> {
        self.factory_order
            .iter()
            .filter(|name| match kind {
                EntryKind::HttpService => self
                    .http
                    .get(*name)
                    .is_some_and(|f| f.state() == FactoryState::Pending),
                EntryKind::Database => self
                    .databases
                    .get(*name)
                    .is_some_and(|f| f.state() == FactoryState::Pending),
                EntryKind::Service => false,
            })
            .cloned()
            .collect()
    }
}

/// Concurrency-safe container of named services and lazy factories
pub struct ServiceRegistry {
    state: RwLock<RegistryState>,
    lifecycle: tokio::sync::Mutex<()>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry {
    /// Registry with the bundled PostgreSQL driver
    pub fn new() -> Self {
        let registry = Self::empty();
        #[cfg(feature = "database-postgres")]
        registry.register_driver(Arc::new(volt_providers::PostgresDriver::new()));
        registry
    }

    /// Registry without any database driver
    pub fn empty() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register an immediately-available service
    ///
    /// Registering a name again replaces the instance and drops the old
    /// shutdown hook; the name moves to the end of the registration order.
    pub fn register<T>(&self, name: &str, instance: T) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
    {
        self.insert_service(name, Arc::new(instance), None)
    }

    /// Register an already shared service
    pub fn register_shared<T>(&self, name: &str, instance: Arc<T>) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
    {
        self.insert_service(name, instance, None)
    }

    /// Register a shared service with a hook run once at shutdown
    pub fn register_with_shutdown<T, H, Fut>(
        &self,
        name: &str,
        instance: Arc<T>,
        hook: H,
    ) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
        H: FnOnce(LifecycleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: ShutdownHook =
            Box::new(move |ctx| -> BoxFuture<'static, anyhow::Result<()>> { Box::pin(hook(ctx)) });
        self.insert_service(name, instance, Some(hook))
    }

    fn insert_service<T>(
        &self,
        name: &str,
        instance: Arc<T>,
        hook: Option<ShutdownHook>,
    ) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
    {
        let mut state = self.write();
        state.ensure_kind(name, EntryKind::Service)?;

        let entry = ServiceEntry {
            instance,
            hook,
        };
        if state.services.insert(name.to_string(), entry).is_some() {
            state.order.retain(|existing| existing != name);
            debug!(service = name, "Replaced registered service");
        } else {
            debug!(service = name, "Registered service");
        }
        state.order.push(name.to_string());

        Ok(ServiceHandle::new(name))
    }

    /// Register an HTTP service built at `initialize`
    ///
    /// `constructor` receives the instrumented, retrying, header-injecting
    /// client for `config` and returns the service instance.
    pub fn register_http_service<T, F>(
        &self,
        name: &str,
        config: HttpServiceConfig,
        constructor: F,
    ) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce(HttpClient) -> T + Send + Sync + 'static,
    {
        config
            .validate()
            .map_err(|e| Error::config(format!("http service {name:?}: {e}")))?;

        let mut state = self.write();
        state.ensure_kind(name, EntryKind::HttpService)?;

        let factory = HttpFactory::new(
            config,
            Box::new(move |client| Arc::new(constructor(client)) as ServiceRef),
        );
        match state.http.get(name).map(HttpFactory::state) {
            Some(FactoryState::Pending) => {
                debug!(service = name, "Replaced pending HTTP service");
            }
            Some(_) => {
                return Err(Error::AlreadyMaterialized {
                    name: name.to_string(),
                });
            }
            None => {
                state.factory_order.push(name.to_string());
                debug!(service = name, "Registered HTTP service");
            }
        }
        state.http.insert(name.to_string(), factory);

        Ok(ServiceHandle::new(name))
    }

    /// Register an HTTP service whose instance is the client itself
    pub fn register_http_client(
        &self,
        name: &str,
        config: HttpServiceConfig,
    ) -> Result<ServiceHandle<HttpClient>> {
        self.register_http_service(name, config, |client| client)
    }

    /// Register a database whose instance is the pool itself
    pub fn register_database(
        &self,
        name: &str,
        config: DatabaseConfig,
    ) -> Result<ServiceHandle<SharedDatabasePool>> {
        self.register_database_service(name, config, |pool| pool)
    }

    /// Register a database service built at `initialize`
    ///
    /// The pool is opened and pinged first; `constructor` only runs on a
    /// reachable database.
    pub fn register_database_service<T, F>(
        &self,
        name: &str,
        config: DatabaseConfig,
        constructor: F,
    ) -> Result<ServiceHandle<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce(SharedDatabasePool) -> T + Send + Sync + 'static,
    {
        config
            .validate()
            .map_err(|e| Error::config(format!("database {name:?}: {e}")))?;

        let mut state = self.write();
        state.ensure_kind(name, EntryKind::Database)?;

        let factory = DatabaseFactory::new(
            config,
            Box::new(move |pool| Arc::new(constructor(pool)) as ServiceRef),
        );
        match state.databases.get(name).map(DatabaseFactory::state) {
            Some(FactoryState::Pending) => {
                debug!(service = name, "Replaced pending database");
            }
            Some(_) => {
                return Err(Error::AlreadyMaterialized {
                    name: name.to_string(),
                });
            }
            None => {
                state.factory_order.push(name.to_string());
                debug!(service = name, "Registered database");
            }
        }
        state.databases.insert(name.to_string(), factory);

        Ok(ServiceHandle::new(name))
    }

    /// Make a database driver available under its name, replacing any previous one
    pub fn register_driver(&self, driver: Arc<dyn DatabaseDriver>) {
        let name = driver.name().to_string();
        debug!(driver = %name, "Registered database driver");
        self.write().drivers.insert(name, driver);
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Look up a service by name
    ///
    /// Checks plain services, then HTTP services, then databases. Factories
    /// are invisible until materialized, and closed databases are invisible
    /// again.
    pub fn get(&self, name: &str) -> Option<ServiceRef> {
        self.read().lookup(name)
    }

    /// Look up a service by name and downcast it
    pub fn get_as<T>(&self, name: &str) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let instance = self
            .get(name)
            .ok_or_else(|| Error::service_not_found(name))?;
        downcast(name, instance)
    }

    /// Look up the service behind a registration handle
    pub fn resolve<T>(&self, handle: &ServiceHandle<T>) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.get_as(handle.name())
    }

    /// Look up a service that must exist
    ///
    /// # Panics
    ///
    /// Panics when [`get`](Self::get) would return `None`. Meant for wiring
    /// at startup, never for request handling.
    pub fn must_get(&self, name: &str) -> ServiceRef {
        match self.get(name) {
            Some(instance) => instance,
            None => panic!("service {name:?} is not registered or not initialized"),
        }
    }

    /// Resolve a handle whose service must exist with the handle's type
    ///
    /// # Panics
    ///
    /// Panics when [`resolve`](Self::resolve) fails. Meant for wiring at
    /// startup, never for request handling.
    pub fn must_resolve<T>(&self, handle: &ServiceHandle<T>) -> Arc<T>
    where
        T: Send + Sync + 'static,
    {
        match self.resolve(handle) {
            Ok(instance) => instance,
            Err(e) => panic!("{e}"),
        }
    }

    /// Whether `name` is registered in any store, materialized or not
    pub fn contains(&self, name: &str) -> bool {
        self.read().kind_of(name).is_some()
    }

    /// Registered names: plain services in registration order, then factories
    pub fn service_names(&self) -> Vec<String> {
        let state = self.read();
        state
            .order
            .iter()
            .chain(state.factory_order.iter())
            .cloned()
            .collect()
    }

    /// Lifecycle state of an HTTP or database factory
    pub fn factory_state(&self, name: &str) -> Option<FactoryState> {
        let state = self.read();
        state
            .http
            .get(name)
            .map(HttpFactory::state)
            .or_else(|| state.databases.get(name).map(DatabaseFactory::state))
    }

    /// The materialized client of an HTTP service
    pub fn http_client(&self, name: &str) -> Option<HttpClient> {
        self.read().http.get(name).and_then(|f| f.client.clone())
    }

    /// The materialized, still open pool of a database
    pub fn database(&self, name: &str) -> Option<SharedDatabasePool> {
        self.read()
            .databases
            .get(name)
            .filter(|f| !f.closed)
            .and_then(|f| f.pool.clone())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Materialize every pending factory
    ///
    /// HTTP services first, then databases, each in registration order.
    /// The first failure aborts the pass: a database that cannot be reached
    /// is closed again and never becomes visible. Already materialized
    /// factories are skipped, so a later call only retries what is pending.
    pub async fn initialize(&self, ctx: &LifecycleContext, host: &HostServices) -> Result<()> {
        let _gate = self.lifecycle.lock().await;

        let http_names = self.read().pending_factories(EntryKind::HttpService);
        for name in http_names {
            ctx.check(&format!("initialize HTTP service {name:?}"))?;
            self.materialize_http(&name, host)
                .map_err(|e| Error::provisioning(name.as_str(), e))?;
        }

        let database_names = self.read().pending_factories(EntryKind::Database);
        for name in database_names {
            self.materialize_database(&name, ctx)
                .await
                .map_err(|e| Error::provisioning(name.as_str(), e))?;
        }

        Ok(())
    }

    fn materialize_http(&self, name: &str, host: &HostServices) -> Result<()> {
        let config = match self.read().http.get(name) {
            Some(factory) if factory.constructor.is_some() => factory.config.clone(),
            Some(_) => return Err(constructor_consumed(name)),
            None => return Ok(()),
        };

        let client = HttpClient::from_config(name, &config, host.observability.clone())?;

        let Some(constructor) = self
            .write()
            .http
            .get_mut(name)
            .and_then(|factory| factory.constructor.take())
        else {
            return Err(constructor_consumed(name));
        };
        let instance = constructor(client.clone());

        if let Some(factory) = self.write().http.get_mut(name) {
            factory.client = Some(client);
            factory.instance = Some(instance);
        }
        info!(
            service = name,
            base_url = config.base_url.as_deref().unwrap_or_default(),
            "HTTP service initialized"
        );
        Ok(())
    }

    async fn materialize_database(&self, name: &str, ctx: &LifecycleContext) -> Result<()> {
        let (config, driver) = {
            let state = self.read();
            let Some(factory) = state.databases.get(name) else {
                return Ok(());
            };
            if factory.constructor.is_none() {
                return Err(constructor_consumed(name));
            }
            let driver = state.drivers.get(&factory.config.driver).cloned();
            (factory.config.clone(), driver)
        };
        let driver = driver.ok_or_else(|| {
            Error::database(format!("unknown database driver {:?}", config.driver))
        })?;

        ctx.check(&format!("open database {name:?}"))?;
        let pool = driver.open(&config)?;

        let ping_ctx = if config.connect_timeout.is_zero() {
            ctx.clone()
        } else {
            ctx.narrowed(config.connect_timeout)
        };
        let ping_timeout = ping_ctx.remaining().unwrap_or(DB_DEFAULT_CONNECT_TIMEOUT);
        let pinged = ping_ctx
            .run(&format!("ping database {name:?}"), pool.ping(ping_timeout))
            .await
            .and_then(|result| result);
        if let Err(e) = pinged {
            if let Err(close_err) = pool.close() {
                warn!(service = name, error = %close_err, "Failed to close unreachable database pool");
            }
            return Err(e);
        }

        let Some(constructor) = self
            .write()
            .databases
            .get_mut(name)
            .and_then(|factory| factory.constructor.take())
        else {
            if let Err(close_err) = pool.close() {
                warn!(service = name, error = %close_err, "Failed to close orphaned database pool");
            }
            return Err(constructor_consumed(name));
        };
        let instance = constructor(Arc::clone(&pool));

        if let Some(factory) = self.write().databases.get_mut(name) {
            factory.pool = Some(pool);
            factory.instance = Some(instance);
        }
        info!(service = name, driver = %config.driver, "Database initialized");
        Ok(())
    }

    /// Tear everything down
    ///
    /// Runs each shutdown hook once, in reverse registration order, then
    /// closes every materialized database in reverse registration order.
    /// Nothing aborts the pass; every failure ends up in the returned
    /// [`Error::Shutdown`] aggregate.
    pub async fn shutdown(&self, ctx: &LifecycleContext) -> Result<()> {
        let _gate = self.lifecycle.lock().await;
        let mut failures = TeardownFailures::new();

        let hooks: Vec<(String, ShutdownHook)> = {
            let mut state = self.write();
            let RegistryState {
                services, order, ..
            } = &mut *state;
            order
                .iter()
                .rev()
                .filter_map(|name| {
                    services
                        .get_mut(name)
                        .and_then(|entry| entry.hook.take())
                        .map(|hook| (name.clone(), hook))
                })
                .collect()
        };

        for (name, hook) in hooks {
            debug!(service = %name, "Running shutdown hook");
            let outcome = match ctx
                .run(&format!("shutdown hook {name:?}"), hook(ctx.clone()))
                .await
            {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(crate::error_ext::lifecycle_error("shutdown hook failed", e)),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                warn!(service = %name, error = %e, "Shutdown hook failed");
                failures.push(TeardownFailure::hook(name, e));
            }
        }

        let pools: Vec<(String, SharedDatabasePool)> = {
            let mut state = self.write();
            let RegistryState {
                databases,
                factory_order,
                ..
            } = &mut *state;
            factory_order
                .iter()
                .rev()
                .filter_map(|name| {
                    let factory = databases.get_mut(name)?;
                    if factory.closed {
                        return None;
                    }
                    let pool = factory.pool.take()?;
                    factory.closed = true;
                    factory.instance = None;
                    Some((name.clone(), pool))
                })
                .collect()
        };

        for (name, pool) in pools {
            match pool.close() {
                Ok(()) => debug!(service = %name, "Closed database pool"),
                Err(e) => {
                    warn!(service = %name, error = %e, "Failed to close database pool");
                    failures.push(TeardownFailure::close_pool(name, e));
                }
            }
        }

        failures.into_result()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("ServiceRegistry")
            .field("services", &state.order)
            .field("factories", &state.factory_order)
            .field("drivers", &state.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The constructor is taken before it runs, so one that panicked is gone
fn constructor_consumed(name: &str) -> Error {
    Error::lifecycle(format!(
        "constructor for {name:?} was consumed by an earlier failed initialize"
    ))
}

fn downcast<T>(name: &str, instance: ServiceRef) -> Result<Arc<T>>
where
    T: Send + Sync + 'static,
{
    instance.downcast::<T>().map_err(|_| Error::TypeMismatch {
        name: name.to_string(),
        expected: type_name::<T>(),
    })
}
