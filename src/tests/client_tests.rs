//! Dispatcher tests against the mock transport.

use crate::client::HttpClient;
use crate::config::TransportConfig;
use crate::errors::HttpClientError;
use crate::mocks::{MockResponse, MockTransport};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

fn client_with(config: TransportConfig, mock: Arc<MockTransport>) -> HttpClient {
    HttpClient::with_transport(config, mock)
}

fn rest_client(mock: Arc<MockTransport>) -> HttpClient {
    client_with(TransportConfig::rest("http://api.test/v1/").unwrap(), mock)
}

#[tokio::test]
async fn test_get_resolves_against_base() {
    let mock = Arc::new(MockTransport::new().with_response(MockResponse::ok("hello")));
    let client = rest_client(mock.clone());

    let response = client.get("items?page=2", None).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text(), "hello");

    let request = mock.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.uri.as_str(), "http://api.test/v1/items?page=2");
    assert!(request.body.is_none());
}

#[test_case(Method::POST)]
#[test_case(Method::PUT)]
#[test_case(Method::PATCH)]
#[tokio::test]
async fn test_body_is_utf8_with_content_type(method: Method) {
    let mock = Arc::new(MockTransport::new());
    let client = rest_client(mock.clone());

    client
        .send("items", Some("{\"name\":\"caf\u{e9}\"}"), method.clone(), None)
        .await
        .unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request.method, method);
    assert_eq!(
        request.body.as_deref(),
        Some("{\"name\":\"caf\u{e9}\"}".as_bytes())
    );
    assert_eq!(request.content_type, "application/json; charset=utf-8");
}

#[tokio::test]
async fn test_verbs_map_to_methods() {
    let mock = Arc::new(MockTransport::new());
    let client = rest_client(mock.clone());

    assert_ok!(client.get("a", None).await);
    assert_ok!(client.post("b", Some("{}"), None).await);
    assert_ok!(client.put("c", None, None).await);
    assert_ok!(client.delete("d", None).await);

    let methods: Vec<Method> = mock.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![Method::GET, Method::POST, Method::PUT, Method::DELETE]
    );
    // PUT without a body stays bodyless.
    assert!(mock.requests()[2].body.is_none());
}

#[tokio::test]
async fn test_invalid_uri_is_rejected_before_transport() {
    let mock = Arc::new(MockTransport::new());
    let client = rest_client(mock.clone());

    let err = client.get("http://[::1", None).await.unwrap_err();
    assert!(matches!(err, HttpClientError::InvalidAddress { .. }));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_transport_error_propagates_unchanged() {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(MockResponse::error(HttpClientError::transport("refused"))),
    );
    let client = rest_client(mock);

    let err = client.get("x", None).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(MockResponse::with_status(StatusCode::NOT_FOUND, "missing")),
    );
    let client = rest_client(mock);

    let response = client.get("x", None).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "missing");
}

#[tokio::test(start_paused = true)]
async fn test_timeout() {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(MockResponse::ok("late").with_delay(Duration::from_millis(500))),
    );
    let config = TransportConfig::rest("http://api.test/")
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let client = client_with(config, mock);

    let err = client.get("slow", None).await.unwrap_err();
    match err {
        HttpClientError::Timeout { timeout } => assert_eq!(timeout, Duration::from_millis(50)),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_in_flight() {
    let mock = Arc::new(
        MockTransport::new()
            .with_response(MockResponse::ok("late").with_delay(Duration::from_millis(500))),
    );
    let config = TransportConfig::rest("http://api.test/")
        .unwrap()
        .with_timeout(Duration::from_secs(10));
    let client = client_with(config, mock);

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = client.get("slow", Some(&token)).await.unwrap_err();
    assert!(err.is_cancelled(), "got {err:?}");
}

#[tokio::test]
async fn test_cancel_before_start() {
    let mock = Arc::new(MockTransport::new());
    let client = rest_client(mock);

    let token = CancellationToken::new();
    token.cancel();

    let err = assert_err!(client.post("items", Some("{}"), Some(&token)).await);
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_untriggered_token_does_not_interfere() {
    let mock = Arc::new(MockTransport::new().with_response(MockResponse::ok("fine")));
    let client = rest_client(mock);

    let token = CancellationToken::new();
    let response = client.get("x", Some(&token)).await.unwrap();
    assert_eq!(response.text(), "fine");
}

#[tokio::test]
async fn test_clones_share_transport() {
    let mock = Arc::new(MockTransport::new());
    let client = rest_client(mock.clone());
    let clone = client.clone();

    client.get("a", None).await.unwrap();
    clone.get("b", None).await.unwrap();
    assert_eq!(mock.request_count(), 2);
    assert!(client.pool_stats().is_none());
}

#[test]
fn test_from_config_rejects_zero_connection_ceiling() {
    let config = TransportConfig::new("http://h/")
        .unwrap()
        .with_max_connections_per_server(0);
    let err = HttpClient::from_config(config).unwrap_err();
    assert!(matches!(err, HttpClientError::Configuration { .. }));
}

#[test]
fn test_constructors_validate_base_address() {
    assert!(matches!(
        HttpClient::new("nope").unwrap_err(),
        HttpClientError::InvalidAddress { .. }
    ));
    assert!(matches!(
        HttpClient::rest("/relative").unwrap_err(),
        HttpClientError::InvalidAddress { .. }
    ));
    assert!(matches!(
        HttpClient::with_media_type("", "text/plain").unwrap_err(),
        HttpClientError::InvalidAddress { .. }
    ));
}

#[test]
fn test_with_media_type_mirrors_accept() {
    let client = HttpClient::with_media_type("http://h/", "application/xml").unwrap();
    assert_eq!(client.config().content_type(), "application/xml");
    assert_eq!(client.config().accept_type(), "application/xml");
    assert!(client.pool_stats().is_some());
}
