//! Conversion of transport-level errors into [`HttpClientError`].

use super::HttpClientError;
use std::time::Duration;

impl HttpClientError {
    /// Map a reqwest error, using the transport limits that were in effect
    /// for the failed request.
    pub(crate) fn from_reqwest(
        error: reqwest::Error,
        timeout: Duration,
        max_redirections: u32,
    ) -> Self {
        if error.is_timeout() {
            Self::Timeout { timeout }
        } else if error.is_redirect() {
            Self::RedirectLimitExceeded { max_redirections }
        } else if error.is_builder() {
            Self::Configuration {
                message: error.to_string(),
            }
        } else {
            let message = if error.is_connect() {
                format!("connection failed: {}", error)
            } else if error.is_body() || error.is_decode() {
                format!("failed to read response body: {}", error)
            } else {
                error.to_string()
            };
            Self::TransportFailure {
                message,
                source: Some(Box::new(error)),
            }
        }
    }

    /// Map a URI parse failure for the given input.
    pub(crate) fn from_parse(input: &str, error: url::ParseError) -> Self {
        Self::InvalidAddress {
            input: input.to_string(),
            message: error.to_string(),
        }
    }
}
