//! Deadline and cancellation carried through initialize and shutdown

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use volt_domain::error::{Error, Result};

/// Bounds a lifecycle pass
///
/// Every blocking step inside [`ServiceRegistry::initialize`] and
/// [`ServiceRegistry::shutdown`] runs through [`LifecycleContext::run`], so a
/// database ping or a stuck hook gives up once the deadline passes or the
/// token is cancelled.
///
/// [`ServiceRegistry::initialize`]: super::ServiceRegistry::initialize
/// [`ServiceRegistry::shutdown`]: super::ServiceRegistry::shutdown
#[derive(Debug, Clone, Default)]
pub struct LifecycleContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl LifecycleContext {
    /// No deadline, never cancelled unless the token is
    pub fn background() -> Self {
        Self::default()
    }

    /// Expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    /// Expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// Tie the context to an external cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Same token, deadline pulled in to at most `timeout` from now
    pub fn narrowed(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
        Self {
            deadline,
            token: self.token.clone(),
        }
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Whether the token was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The cancellation token
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancel the token, and every context sharing it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail with `Cancelled` or `Timeout` if the context is already done
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::cancelled(operation));
        }
        if self.is_expired() {
            return Err(Error::timeout(operation));
        }
        Ok(())
    }

    /// Drive `future` until it completes, the deadline passes, or the token is cancelled
    ///
    /// The future is polled first, so work that is already complete wins
    /// over an expired context.
    pub async fn run<F>(&self, operation: &str, future: F) -> Result<F::Output>
    where
        F: Future,
    {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            output = future => Ok(output),
            _ = self.token.cancelled() => Err(Error::cancelled(operation)),
            _ = expired => Err(Error::timeout(operation)),
        }
    }
}
