//! Database driver double and recording helpers

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use volt_domain::error::{Error, Result};
use volt_domain::ports::{DatabaseDriver, DatabasePool, PoolStats, SharedDatabasePool};
use volt_domain::DatabaseConfig;

pub const FAKE_DRIVER: &str = "fake";

/// Behaviour of pools opened by [`FakeDriver`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeBehaviour {
    pub ping_fails: bool,
    pub ping_hangs: bool,
    pub close_fails: bool,
}

/// Driver whose pools never touch the network
#[derive(Default)]
pub struct FakeDriver {
    pub behaviour: FakeBehaviour,
    pub opened: AtomicUsize,
    pub closed: Arc<AtomicUsize>,
}

impl FakeDriver {
    pub fn new(behaviour: FakeBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            ..Default::default()
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl DatabaseDriver for FakeDriver {
    fn name(&self) -> &str {
        FAKE_DRIVER
    }

    fn open(&self, config: &DatabaseConfig) -> Result<SharedDatabasePool> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakePool {
            dsn: config.dsn.clone(),
            behaviour: self.behaviour,
            closed: AtomicBool::new(false),
            close_count: Arc::clone(&self.closed),
        }))
    }
}

pub struct FakePool {
    pub dsn: String,
    behaviour: FakeBehaviour,
    closed: AtomicBool,
    close_count: Arc<AtomicUsize>,
}

#[async_trait]
impl DatabasePool for FakePool {
    fn driver(&self) -> &str {
        FAKE_DRIVER
    }

    async fn ping(&self, _timeout: Duration) -> Result<()> {
        if self.behaviour.ping_hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.behaviour.ping_fails {
            return Err(Error::database("connection refused"));
        }
        Ok(())
    }

    fn stats(&self) -> PoolStats {
        PoolStats::default()
    }

    fn close(&self) -> Result<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(Error::database("already closed"));
        }
        if self.behaviour.close_fails {
            return Err(Error::database("close failed"));
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub fn fake_db(dsn: &str) -> DatabaseConfig {
    DatabaseConfig::new(FAKE_DRIVER, dsn)
}

/// Shared log of events, in the order they happened
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
