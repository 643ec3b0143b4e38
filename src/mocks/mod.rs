//! Mock implementations for testing.
//!
//! Provides a scripted [`Transport`] for London-School TDD: responses are
//! queued up front and every executed request is recorded for assertions.

use crate::errors::{HttpClientError, HttpResult};
use crate::message::{InboundResponse, OutboundRequest};
use crate::transport::Transport;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, Version};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Mock response configuration
#[derive(Debug)]
pub struct MockResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body
    pub body: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Delay before responding
    pub delay: Option<Duration>,
    /// Error to return instead of a response
    pub error: Option<HttpClientError>,
}

impl MockResponse {
    /// 200 with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    /// Response with an explicit status
    pub fn with_status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HeaderMap::new(),
            delay: None,
            error: None,
        }
    }

    /// Fail the request with `error`
    pub fn error(error: HttpClientError) -> Self {
        Self {
            error: Some(error),
            ..Self::ok("")
        }
    }

    /// Add a response header
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    /// Wait before responding
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Transport that replays queued responses.
///
/// When the queue is empty every request receives `200 OK` with an empty
/// body.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn push_response(&self, response: MockResponse) {
        self.responses.lock().push_back(response);
    }

    /// Builder form of [`push_response`](Self::push_response)
    pub fn with_response(self, response: MockResponse) -> Self {
        self.push_response(response);
        self
    }

    /// Requests executed so far
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests executed so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<OutboundRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: OutboundRequest) -> HttpResult<InboundResponse> {
        let url = request.uri.clone();
        self.requests.lock().push(request);

        let scripted = self.responses.lock().pop_front();
        let response = scripted.unwrap_or_else(|| MockResponse::ok(""));

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = response.error {
            return Err(error);
        }

        Ok(InboundResponse {
            status: response.status,
            headers: response.headers,
            version: Version::HTTP_11,
            url,
            body: Bytes::from(response.body),
        })
    }
}
