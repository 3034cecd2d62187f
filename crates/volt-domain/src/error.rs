//! Error handling types

use std::fmt;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used as an optional source
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the Volt service registry
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Database-related error
    #[error("Database error: {message}")]
    Database {
        /// Description of the database error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// No service is registered (or materialized) under the name
    #[error("Service {name:?} not found")]
    ServiceNotFound {
        /// Name that was looked up
        name: String,
    },

    /// The service exists but holds a different type than requested
    #[error("Service {name:?} is not of type {expected}")]
    TypeMismatch {
        /// Name that was looked up
        name: String,
        /// Type the caller asked for
        expected: &'static str,
    },

    /// The name is already taken by a service of another kind
    #[error("Service {name:?} is already registered as {existing}")]
    DuplicateService {
        /// Conflicting name
        name: String,
        /// Kind of the existing registration
        existing: &'static str,
    },

    /// The factory already produced its instance and cannot be replaced
    #[error("Service {name:?} is already materialized")]
    AlreadyMaterialized {
        /// Name of the materialized service
        name: String,
    },

    /// A factory failed to materialize during initialization
    #[error("failed to initialize service {service:?}: {source}")]
    Provisioning {
        /// Service whose materialization failed
        service: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A lifecycle operation ran past its deadline
    #[error("{operation} timed out")]
    Timeout {
        /// Operation that timed out
        operation: String,
    },

    /// A lifecycle operation was cancelled
    #[error("{operation} was cancelled")]
    Cancelled {
        /// Operation that was cancelled
        operation: String,
    },

    /// A start/stop hook failed, or a factory can no longer be materialized
    #[error("Lifecycle error: {message}")]
    Lifecycle {
        /// Description of the lifecycle failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// One or more teardown steps failed
    #[error(transparent)]
    Shutdown(#[from] TeardownFailures),

    /// Startup failed and rolling back what it had provisioned failed too
    #[error("{source}; rollback failed: {rollback}")]
    StartupAborted {
        /// Failure that aborted startup
        #[source]
        source: Box<Error>,
        /// Teardown steps that failed during the rollback
        rollback: TeardownFailures,
    },
}

// Basic error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error (simple)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Network error creation methods
impl Error {
    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Database error creation methods
impl Error {
    /// Create a database error
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a database error with source
    pub fn database_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Registry and lifecycle error creation methods
impl Error {
    /// Create a service not found error
    pub fn service_not_found<S: Into<String>>(name: S) -> Self {
        Self::ServiceNotFound { name: name.into() }
    }

    /// Wrap a materialization failure with the service name
    pub fn provisioning<S: Into<String>>(service: S, source: Error) -> Self {
        Self::Provisioning {
            service: service.into(),
            source: Box::new(source),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create a lifecycle error
    pub fn lifecycle<S: Into<String>>(message: S) -> Self {
        Self::Lifecycle {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lifecycle error with a boxed source
    pub fn lifecycle_with_source<S: Into<String>>(message: S, source: BoxError) -> Self {
        Self::Lifecycle {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Whether the error came from an expired deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Provisioning { source, .. } | Self::StartupAborted { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

// ============================================================================
// Teardown aggregate
// ============================================================================

/// Teardown step that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    /// A registered shutdown hook
    Hook,
    /// Closing a materialized database pool
    ClosePool,
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownStep::Hook => write!(f, "shutdown"),
            TeardownStep::ClosePool => write!(f, "close database"),
        }
    }
}

/// A single failed teardown step
#[derive(Debug)]
pub struct TeardownFailure {
    /// Which step failed
    pub step: TeardownStep,
    /// Service the step belonged to
    pub service: String,
    /// The failure itself
    pub error: Error,
}

impl TeardownFailure {
    /// Failure of a shutdown hook
    pub fn hook<S: Into<String>>(service: S, error: Error) -> Self {
        Self {
            step: TeardownStep::Hook,
            service: service.into(),
            error,
        }
    }

    /// Failure to close a database pool
    pub fn close_pool<S: Into<String>>(service: S, error: Error) -> Self {
        Self {
            step: TeardownStep::ClosePool,
            service: service.into(),
            error,
        }
    }
}

impl fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.step, self.service, self.error)
    }
}

/// Every teardown failure collected during a shutdown pass
#[derive(Debug, Default)]
pub struct TeardownFailures {
    failures: Vec<TeardownFailure>,
}

impl TeardownFailures {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure
    pub fn push(&mut self, failure: TeardownFailure) {
        self.failures.push(failure);
    }

    /// Whether nothing failed
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failures
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterate over the recorded failures in the order they happened
    pub fn iter(&self) -> impl Iterator<Item = &TeardownFailure> {
        self.failures.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the aggregate as an error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Shutdown(self))
        }
    }
}

impl fmt::Display for TeardownFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shutdown errors: [")?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for TeardownFailures {}

impl IntoIterator for TeardownFailures {
    type Item = TeardownFailure;
    type IntoIter = std::vec::IntoIter<TeardownFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl Extend<TeardownFailure> for TeardownFailures {
    fn extend<I: IntoIterator<Item = TeardownFailure>>(&mut self, iter: I) {
        self.failures.extend(iter);
    }
}
