use bytes::Bytes;
use http::Method;
use url::Url;

/// A fully resolved request, ready for a transport
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URI
    pub uri: Url,
    /// UTF-8 encoded body, if any
    pub body: Option<Bytes>,
    /// `Content-Type` sent with the body
    pub content_type: String,
}

impl OutboundRequest {
    /// Build a request, encoding `body` as UTF-8 and tagging the media type
    /// with `charset=utf-8` unless it already names a charset.
    pub fn new(method: Method, uri: Url, body: Option<&str>, media_type: &str) -> Self {
        Self {
            method,
            uri,
            body: body.map(|b| Bytes::copy_from_slice(b.as_bytes())),
            content_type: with_utf8_charset(media_type),
        }
    }

    /// Whether the request carries a body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

fn with_utf8_charset(media_type: &str) -> String {
    match media_type.parse::<mime::Mime>() {
        Ok(parsed) if parsed.get_param(mime::CHARSET).is_some() => media_type.to_string(),
        _ => format!("{}; charset=utf-8", media_type),
    }
}
