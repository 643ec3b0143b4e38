//! Blocking forms over the wire.
//!
//! Blocking calls park their thread, so each test drives them from a plain
//! `std::thread` or a `spawn_blocking` thread to keep the mock server live.

mod common;

use common::*;
use integrations_http_client::{CancellationToken, HttpClient, HttpClientError};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use wiremock::matchers::body_string;
use wiremock::ResponseTemplate;

fn off_runtime<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    std::thread::spawn(f).join().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_and_async_post_agree() {
    let server = setup_mock_server().await;
    mock_route("POST", "/api/items")
        .and(body_string(r#"{"x":1}"#))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-echo", "1")
                .set_body_string(r#"{"x":1}"#),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = rest_client(&server);

    let async_response = client.post("items", Some(r#"{"x":1}"#), None).await.unwrap();

    let blocking_client = client.clone();
    let blocking_response =
        off_runtime(move || blocking_client.post_blocking("items", Some(r#"{"x":1}"#), None))
            .unwrap();

    assert_eq!(blocking_response.status(), async_response.status());
    assert_eq!(blocking_response.body(), async_response.body());
    assert_eq!(blocking_response.header("x-echo"), async_response.header("x-echo"));

    let requests = received(&server).await;
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(
        header(&requests[0], "content-type"),
        header(&requests[1], "content-type")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_verbs() {
    let server = setup_mock_server().await;
    for verb in ["GET", "PUT", "DELETE"] {
        mock_route(verb, "/api/thing")
            .respond_with(ResponseTemplate::new(200).set_body_string(verb))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = rest_client(&server);
    let (get, put, delete) = off_runtime(move || {
        (
            observable(client.get_blocking("thing", None)),
            observable(client.put_blocking("thing", Some("{}"), None)),
            observable(client.delete_blocking("thing", None)),
        )
    });

    assert_eq!(get, (200, "GET".to_string()));
    assert_eq!(put, (200, "PUT".to_string()));
    assert_eq!(delete, (200, "DELETE".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_timeout() {
    let server = setup_mock_server().await;
    mock_route("GET", "/api/slow")
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = rest_config(&server).with_timeout(Duration::from_millis(50));
    let client = HttpClient::from_config(config).unwrap();

    let (err, elapsed) = off_runtime(move || {
        let started = Instant::now();
        let err = client.get_blocking("slow", None).unwrap_err();
        (err, started.elapsed())
    });

    assert!(err.is_timeout(), "got {err:?}");
    assert!(elapsed < Duration::from_millis(400), "took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_cancel() {
    let server = setup_mock_server().await;
    mock_route("GET", "/api/slow")
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();

    let waiter = std::thread::spawn(move || {
        let started = Instant::now();
        let result = client.get_blocking("slow", Some(&token));
        (result, started.elapsed())
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    trigger.cancel();

    let (result, elapsed) = waiter.join().unwrap();
    assert!(matches!(result, Err(HttpClientError::Cancelled)));
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_from_spawn_blocking() {
    let server = setup_mock_server().await;
    mock_route("GET", "/api/x")
        .respond_with(ResponseTemplate::new(200).set_body_string("from pool"))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let result = tokio::task::spawn_blocking(move || client.get_blocking("x", None))
        .await
        .unwrap();

    assert_eq!(observable(result), (200, "from pool".to_string()));
}
