use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use url::Url;

/// A completed response. The body is returned as received.
#[derive(Debug, Clone)]
pub struct InboundResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Negotiated protocol version
    pub version: Version,
    /// Final URL after any redirects
    pub url: Url,
    /// Body bytes after content decoding
    pub body: Bytes,
}

impl InboundResponse {
    /// Status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value as a string, if present and visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Final URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 3xx status
    pub fn is_redirection(&self) -> bool {
        self.status.is_redirection()
    }
}
