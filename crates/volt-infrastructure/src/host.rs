//! Application host
//!
//! Owns the registry and drives it through the process lifecycle:
//! start hooks, provisioning, waiting for a shutdown signal, stop hooks,
//! teardown. Every phase is bounded by the lifecycle timeouts from
//! configuration.

use crate::config::AppConfig;
use crate::error_ext::lifecycle_error;
use crate::registry::{HostServices, LifecycleContext, ServiceRegistry};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use volt_domain::error::{Error, Result, TeardownFailure, TeardownFailures};
use volt_providers::{ObservabilityProvider, RateLimiter};

/// Start or stop callback
pub type LifecycleHook =
    Box<dyn Fn(LifecycleContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Drives a [`ServiceRegistry`] through startup and shutdown
pub struct Host {
    config: AppConfig,
    registry: Arc<ServiceRegistry>,
    services: HostServices,
    start_hooks: Vec<(String, LifecycleHook)>,
    stop_hooks: Vec<(String, LifecycleHook)>,
    cancel_token: CancellationToken,
}

impl Host {
    /// Host over a fresh registry
    pub fn new(config: AppConfig) -> Self {
        Self::with_registry(config, Arc::new(ServiceRegistry::new()))
    }

    /// Host over an existing registry
    pub fn with_registry(config: AppConfig, registry: Arc<ServiceRegistry>) -> Self {
        Self {
            config,
            registry,
            services: HostServices::default(),
            start_hooks: Vec::new(),
            stop_hooks: Vec::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Instrument every HTTP service with `provider`
    pub fn with_observability(mut self, provider: Arc<dyn ObservabilityProvider>) -> Self {
        self.services.observability = Some(provider);
        self
    }

    /// The loaded configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The registry, to register services and to hand to request handlers
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Collaborators passed to `initialize`
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// Token cancelled when the host begins stopping
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Rate limiter for the configured limits, backed by an in-memory store
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.config.rate_limit.clone())
    }

    /// Run `hook` at start, in registration order, before services are provisioned
    pub fn on_start<F, Fut>(&mut self, name: &str, hook: F)
    where
        F: Fn(LifecycleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.start_hooks.push((name.to_string(), boxed_hook(hook)));
    }

    /// Run `hook` at stop, in reverse registration order, before services are torn down
    pub fn on_stop<F, Fut>(&mut self, name: &str, hook: F)
    where
        F: Fn(LifecycleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.stop_hooks.push((name.to_string(), boxed_hook(hook)));
    }

    /// Register every HTTP service and database declared in configuration
    ///
    /// HTTP services are registered as plain [`HttpClient`](volt_providers::HttpClient)s,
    /// databases as pools. Resolve them by name after [`start`](Self::start).
    pub fn register_configured_services(&self) -> Result<()> {
        for (name, config) in &self.config.http_services {
            self.registry.register_http_client(name, config.clone())?;
        }
        for (name, config) in &self.config.databases {
            self.registry.register_database(name, config.clone())?;
        }
        info!(
            http_services = self.config.http_services.len(),
            databases = self.config.databases.len(),
            "Registered configured services"
        );
        Ok(())
    }

    /// Run start hooks, then provision every registered service
    ///
    /// The first failure aborts startup and tears the registry down under
    /// the shutdown timeout: shutdown hooks run and every pool opened so far
    /// is closed. Stop hooks do not run. The host must not serve traffic
    /// afterwards.
    pub async fn start(&self) -> Result<()> {
        let ctx = LifecycleContext::with_timeout(self.config.lifecycle.startup_timeout)
            .with_cancellation(self.cancel_token.child_token());

        if let Err(e) = self.provision(&ctx).await {
            error!(error = %e, "Host failed to start, rolling back");
            return Err(self.roll_back(e).await);
        }

        info!(
            name = %self.config.name,
            version = %self.config.version,
            environment = %self.config.environment,
            "Host started"
        );
        Ok(())
    }

    async fn provision(&self, ctx: &LifecycleContext) -> Result<()> {
        for (name, hook) in &self.start_hooks {
            ctx.run(&format!("start hook {name:?}"), hook(ctx.clone()))
                .await?
                .map_err(|e| lifecycle_error(format!("start hook {name:?} failed"), e))?;
        }

        self.registry.initialize(ctx, &self.services).await
    }

    /// Tear down whatever a failed start provisioned
    async fn roll_back(&self, cause: Error) -> Error {
        self.cancel_token.cancel();
        let ctx = LifecycleContext::with_timeout(self.config.lifecycle.shutdown_timeout);

        match self.registry.shutdown(&ctx).await {
            Ok(()) => cause,
            Err(Error::Shutdown(rollback)) => {
                warn!(failures = rollback.len(), "Rollback after failed start had errors");
                Error::StartupAborted {
                    source: Box::new(cause),
                    rollback,
                }
            }
            Err(e) => {
                warn!(error = %e, "Rollback after failed start failed");
                cause
            }
        }
    }

    /// Run stop hooks in reverse, then shut the registry down
    ///
    /// Every step runs even after a failure; the result aggregates all of them.
    pub async fn stop(&self) -> Result<()> {
        self.cancel_token.cancel();
        let ctx = LifecycleContext::with_timeout(self.config.lifecycle.shutdown_timeout);
        let mut failures = TeardownFailures::new();

        for (name, hook) in self.stop_hooks.iter().rev() {
            let outcome = match ctx.run(&format!("stop hook {name:?}"), hook(ctx.clone())).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(lifecycle_error("stop hook failed", e)),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                error!(hook = %name, error = %e, "Stop hook failed");
                failures.push(TeardownFailure::hook(name.as_str(), e));
            }
        }

        match self.registry.shutdown(&ctx).await {
            Ok(()) => {}
            Err(Error::Shutdown(registry_failures)) => failures.extend(registry_failures),
            Err(e) => return Err(e),
        }

        if failures.is_empty() {
            info!("Host stopped");
        } else {
            warn!(failures = failures.len(), "Host stopped with errors");
        }
        failures.into_result()
    }

    /// Start, wait for `signal`, then stop
    ///
    /// A failed start has already rolled the registry back, so `signal` is
    /// never awaited and stop hooks do not run.
    pub async fn run_until<S>(&self, signal: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        self.start().await?;
        signal.await;
        info!("Shutdown signal received");
        self.stop().await
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("name", &self.config.name)
            .field("registry", &self.registry)
            .field("services", &self.services)
            .field("start_hooks", &self.start_hooks.len())
            .field("stop_hooks", &self.stop_hooks.len())
            .finish()
    }
}

/// Resolves when the process receives Ctrl-C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn boxed_hook<F, Fut>(hook: F) -> LifecycleHook
where
    F: Fn(LifecycleContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move |ctx| -> BoxFuture<'static, anyhow::Result<()>> { Box::pin(hook(ctx)) })
}
