//! Shared helpers for WireMock-backed integration tests.

#![allow(dead_code)]

use integrations_http_client::{HttpClient, HttpResult, InboundResponse, TransportConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer, Request, ResponseTemplate};

/// Start a fresh mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// REST configuration pointing at `/api/` on the mock server
pub fn rest_config(server: &MockServer) -> TransportConfig {
    TransportConfig::rest(&format!("{}/api/", server.uri()))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
}

/// REST client pointing at `/api/` on the mock server
pub fn rest_client(server: &MockServer) -> HttpClient {
    HttpClient::from_config(rest_config(server)).unwrap()
}

/// Mock matching a verb and a path
pub fn mock_route(verb: &str, route: &str) -> MockBuilder {
    Mock::given(method(verb)).and(path(route))
}

/// 302 to `location`
pub fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

/// Mount a redirect chain `/hop/0 -> /hop/1 -> ... -> /hop/{hops}` ending in 200
pub async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for i in 0..hops {
        mock_route("GET", &format!("/hop/{}", i))
            .respond_with(redirect_to(&format!("/hop/{}", i + 1)))
            .mount(server)
            .await;
    }
    mock_route("GET", &format!("/hop/{}", hops))
        .respond_with(ResponseTemplate::new(200).set_body_string("arrived"))
        .mount(server)
        .await;
}

/// All requests the server has seen
pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// Header value of a received request, if present
pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Status and body of a response, for comparing two calls
pub fn observable(result: HttpResult<InboundResponse>) -> (u16, String) {
    let response = result.unwrap();
    (response.status().as_u16(), response.text())
}
