//! Timeout and cancellation over the wire.

mod common;

use common::*;
use integrations_http_client::{CancellationToken, HttpClient, HttpClientError};
use std::time::{Duration, Instant};
use wiremock::ResponseTemplate;

async fn slow_server(delay: Duration) -> wiremock::MockServer {
    let server = setup_mock_server().await;
    mock_route("GET", "/api/slow")
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_timeout_fires_near_configured_duration() {
    let server = slow_server(Duration::from_millis(500)).await;
    let config = rest_config(&server).with_timeout(Duration::from_millis(50));
    let client = HttpClient::from_config(config).unwrap();

    let started = Instant::now();
    let err = client.get("slow", None).await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        HttpClientError::Timeout { timeout } => assert_eq!(timeout, Duration::from_millis(50)),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(elapsed < Duration::from_millis(400), "took {elapsed:?}");
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let server = slow_server(Duration::from_secs(2)).await;
    let client = rest_client(&server);

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = client.get("slow", Some(&token)).await.unwrap_err();

    assert!(err.is_cancelled(), "got {err:?}");
    assert!(!err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_cancel_one_leaves_others_running() {
    let server = slow_server(Duration::from_millis(150)).await;
    let client = rest_client(&server);

    let cancelled = CancellationToken::new();
    let untouched = CancellationToken::new();
    cancelled.cancel();

    let (first, second) = tokio::join!(
        client.get("slow", Some(&cancelled)),
        client.get("slow", Some(&untouched)),
    );

    assert!(first.unwrap_err().is_cancelled());
    assert!(second.unwrap().is_success());
}

#[tokio::test]
async fn test_cancel_after_completion_has_no_effect() {
    let server = slow_server(Duration::from_millis(0)).await;
    let client = rest_client(&server);

    let token = CancellationToken::new();
    let response = client.get("slow", Some(&token)).await.unwrap();
    token.cancel();

    assert!(response.is_success());
}
