//! Unit tests for the retry and header decorators and the transport stack

use crate::test_utils::{ScriptedTransport, Step, request};
use reqwest::{Body, Method};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use volt_domain::HttpServiceConfig;
use volt_providers::http::headers::parse_default_headers;
use volt_providers::{
    HeaderTransport, HttpTransport, RetryPolicy, RetryTransport, SharedTransport, TransportStack,
};

fn policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        min_wait: Duration::from_millis(100),
        max_wait: Duration::from_secs(2),
        retry_on: vec![502, 503, 504],
    }
}

// =============================================================================
// RetryPolicy Tests
// =============================================================================

#[test]
fn test_backoff_doubles_and_caps() {
    let policy = policy(10);

    assert_eq!(policy.backoff(0), Duration::from_millis(100));
    assert_eq!(policy.backoff(1), Duration::from_millis(200));
    assert_eq!(policy.backoff(3), Duration::from_millis(800));
    assert_eq!(policy.backoff(5), Duration::from_secs(2));
    assert_eq!(policy.backoff(40), Duration::from_secs(2));
}

#[test]
fn test_policy_from_config() {
    let config = HttpServiceConfig::default()
        .with_retries(5, Duration::from_millis(10), Duration::from_millis(50))
        .with_retry_on_status([429]);
    let policy = RetryPolicy::from_config(&config);

    assert_eq!(policy.max_retries, 5);
    assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
    assert!(!policy.should_retry(StatusCode::SERVICE_UNAVAILABLE));
}

// =============================================================================
// RetryTransport Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_retry_until_success() {
    let inner = Arc::new(ScriptedTransport::statuses([503, 503, 200]));
    let transport = RetryTransport::new(inner.clone(), policy(3));

    let response = transport.send(request(Method::GET)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(inner.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_return_last_response() {
    let inner = Arc::new(ScriptedTransport::statuses([503]));
    let transport = RetryTransport::new(inner.clone(), policy(2));

    let response = transport.send(request(Method::GET)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(inner.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_is_not_retried() {
    let inner = Arc::new(ScriptedTransport::new([Step::Fail, Step::Status(200)]));
    let transport = RetryTransport::new(inner.clone(), policy(3));

    let result = transport.send(request(Method::GET)).await;

    assert!(result.is_err());
    assert_eq!(inner.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_status_returned_immediately() {
    let inner = Arc::new(ScriptedTransport::statuses([500, 200]));
    let transport = RetryTransport::new(inner.clone(), policy(3));

    let response = transport.send(request(Method::POST)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(inner.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_waits_for_backoff() {
    let inner = Arc::new(ScriptedTransport::statuses([502, 502, 200]));
    let transport = RetryTransport::new(inner.clone(), policy(3));

    let started = tokio::time::Instant::now();
    transport.send(request(Method::GET)).await.unwrap();

    // 100ms after the first failure, 200ms after the second
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_buffered_body_is_retried() {
    let inner = Arc::new(ScriptedTransport::statuses([503, 200]));
    let transport = RetryTransport::new(inner.clone(), policy(3));
    let mut post = request(Method::POST);
    *post.body_mut() = Some(Body::from("{\"amount\":42}"));

    let response = transport.send(post).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(inner.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_streaming_body_gets_a_single_attempt() {
    let inner = Arc::new(ScriptedTransport::statuses([503, 200]));
    let transport = RetryTransport::new(inner.clone(), policy(3));
    let chunks = futures::stream::iter(vec![
        Ok::<Vec<u8>, std::io::Error>(b"part-1".to_vec()),
        Ok(b"part-2".to_vec()),
    ]);
    let mut upload = request(Method::PUT);
    *upload.body_mut() = Some(Body::wrap_stream(chunks));

    let response = transport.send(upload).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(inner.calls(), 1);
}

// =============================================================================
// HeaderTransport Tests
// =============================================================================

fn header_map(pairs: &[(&str, &str)]) -> reqwest::header::HeaderMap {
    let map: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    parse_default_headers(&map).unwrap()
}

#[tokio::test]
async fn test_default_headers_added_when_absent() {
    let inner = Arc::new(ScriptedTransport::statuses([200]));
    let transport = HeaderTransport::new(
        inner.clone(),
        header_map(&[("User-Agent", "volt"), ("Authorization", "Bearer default")]),
    );

    transport.send(request(Method::GET)).await.unwrap();

    let seen = inner.last_headers();
    assert_eq!(seen.get(USER_AGENT).unwrap(), "volt");
    assert_eq!(seen.get(AUTHORIZATION).unwrap(), "Bearer default");
}

#[tokio::test]
async fn test_caller_header_is_never_overwritten() {
    let inner = Arc::new(ScriptedTransport::statuses([200]));
    let transport = HeaderTransport::new(
        inner.clone(),
        header_map(&[("Authorization", "Bearer default")]),
    );

    let mut req = request(Method::GET);
    req.headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
    transport.send(req).await.unwrap();

    assert_eq!(inner.last_headers().get(AUTHORIZATION).unwrap(), "Bearer caller");
}

#[test]
fn test_invalid_header_name_rejected() {
    let mut map = BTreeMap::new();
    map.insert("bad header".to_string(), "x".to_string());

    assert!(parse_default_headers(&map).is_err());
}

// =============================================================================
// TransportStack Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_stack_applies_layers_in_order() {
    let inner = Arc::new(ScriptedTransport::statuses([503, 200]));
    let base: SharedTransport = inner.clone();

    let stack = TransportStack::new(base)
        .layer("retry", |t| Arc::new(RetryTransport::new(t, policy(1))))
        .layer("headers", |t| {
            Arc::new(HeaderTransport::new(t, header_map(&[("X-Volt", "1")])))
        });
    assert_eq!(stack.layer_names(), vec!["retry", "headers"]);

    let response = stack.build().send(request(Method::GET)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(inner.calls(), 2);
    // Headers sit outside retry, so the retried copy carries them too
    assert_eq!(inner.last_headers().get("x-volt").unwrap(), "1");
}
