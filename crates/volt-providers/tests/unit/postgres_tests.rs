//! Unit tests for the PostgreSQL driver that need no running server

use std::time::Duration;
use volt_domain::DatabaseConfig;
use volt_domain::error::Error;
use volt_domain::ports::{DatabaseDriver, DatabasePool};
use volt_providers::{PostgresDriver, PostgresPool};

const UNREACHABLE_DSN: &str = "host=127.0.0.1 port=1 user=volt dbname=volt";

fn unreachable_config() -> DatabaseConfig {
    DatabaseConfig::postgres(UNREACHABLE_DSN)
        .with_pool(4, 0)
        .with_connect_timeout(Duration::from_millis(200))
}

#[test]
fn test_driver_name() {
    assert_eq!(PostgresDriver::new().name(), "postgres");
}

#[test]
fn test_open_does_not_connect() {
    let pool = PostgresDriver::new().open(&unreachable_config()).unwrap();

    assert_eq!(pool.driver(), "postgres");
    assert_eq!(pool.stats().max_connections, 4);
    assert!(pool.downcast_ref::<PostgresPool>().is_some());
}

#[test]
fn test_open_rejects_bad_config() {
    let driver = PostgresDriver::new();

    assert!(driver.open(&DatabaseConfig::postgres("")).is_err());
    assert!(driver.open(&DatabaseConfig::postgres("not a dsn")).is_err());
}

#[tokio::test]
async fn test_ping_fails_against_unreachable_server() {
    let pool = PostgresDriver::new().open(&unreachable_config()).unwrap();

    let result = pool.ping(Duration::from_millis(500)).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_close_is_once_only() {
    let pool = PostgresDriver::new().open(&unreachable_config()).unwrap();

    assert!(!pool.is_closed());
    pool.close().unwrap();
    assert!(pool.is_closed());

    assert!(matches!(pool.close(), Err(Error::Database { .. })));
    assert!(pool.ping(Duration::from_millis(100)).await.is_err());
}
