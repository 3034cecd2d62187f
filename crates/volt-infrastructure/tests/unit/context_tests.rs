//! Unit tests for LifecycleContext

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use volt_domain::error::Error;
use volt_infrastructure::LifecycleContext;

#[tokio::test]
async fn test_background_never_expires() {
    let ctx = LifecycleContext::background();

    assert!(ctx.deadline().is_none());
    assert!(ctx.remaining().is_none());
    assert!(ctx.check("noop").is_ok());
    assert_eq!(ctx.run("noop", async { 7 }).await.unwrap(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_run_times_out() {
    let ctx = LifecycleContext::with_timeout(Duration::from_millis(100));

    let result = ctx
        .run("slow step", tokio::time::sleep(Duration::from_secs(10)))
        .await;

    assert!(matches!(result, Err(Error::Timeout { ref operation }) if operation == "slow step"));
    assert!(ctx.is_expired());
}

#[tokio::test(start_paused = true)]
async fn test_ready_future_wins_over_expired_deadline() {
    let ctx = LifecycleContext::with_timeout(Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(ctx.check("late").is_err());
    assert_eq!(ctx.run("late", async { "done" }).await.unwrap(), "done");
}

#[tokio::test]
async fn test_cancellation() {
    let token = CancellationToken::new();
    let ctx = LifecycleContext::background().with_cancellation(token.clone());

    token.cancel();

    assert!(ctx.is_cancelled());
    assert!(matches!(ctx.check("step"), Err(Error::Cancelled { .. })));
    let result = ctx.run("step", std::future::pending::<()>()).await;
    assert!(matches!(result, Err(Error::Cancelled { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_narrowed_never_extends_deadline() {
    let ctx = LifecycleContext::with_timeout(Duration::from_secs(1));

    let tighter = ctx.narrowed(Duration::from_millis(100));
    let looser = ctx.narrowed(Duration::from_secs(60));

    assert_eq!(tighter.remaining(), Some(Duration::from_millis(100)));
    assert_eq!(looser.deadline(), ctx.deadline());
}

#[tokio::test]
async fn test_narrowed_shares_cancellation() {
    let ctx = LifecycleContext::background();
    let child = ctx.narrowed(Duration::from_secs(5));

    ctx.cancel();

    assert!(child.is_cancelled());
}
