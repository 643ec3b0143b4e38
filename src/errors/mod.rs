//! Error types for the HTTP client.
//!
//! Every dispatch resolves to exactly one of a response or an
//! [`HttpClientError`]. Timeouts, caller cancellation and transport failures
//! are kept as distinct variants so callers can tell them apart.

mod mapping;

use std::time::Duration;
use thiserror::Error;

/// Result type for HTTP client operations
pub type HttpResult<T> = Result<T, HttpClientError>;

/// Boxed source error carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Root error type for the HTTP client
#[derive(Error, Debug)]
pub enum HttpClientError {
    /// Base, per-call or proxy address is not a valid URI
    #[error("Invalid address '{input}': {message}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Parser message
        message: String,
    },

    /// Connection, DNS, TLS or body read failure
    #[error("Transport failure: {message}")]
    TransportFailure {
        /// Error message
        message: String,
        /// Underlying error
        #[source]
        source: Option<BoxError>,
    },

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {timeout:?}")]
    Timeout {
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// Request was cancelled by the caller
    #[error("Request was cancelled")]
    Cancelled,

    /// Redirect chain was longer than the configured maximum
    #[error("Redirect limit of {max_redirections} exceeded")]
    RedirectLimitExceeded {
        /// Configured maximum number of automatic redirections
        max_redirections: u32,
    },

    /// The transport rejected a configured value
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// The blocking bridge could not drive the request
    #[error("Runtime error: {message}")]
    Runtime {
        /// Error message
        message: String,
    },
}

impl HttpClientError {
    /// Create an invalid address error
    pub fn invalid_address(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a transport failure without an underlying source
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "HTTP_INVALID_ADDRESS",
            Self::TransportFailure { .. } => "HTTP_TRANSPORT",
            Self::Timeout { .. } => "HTTP_TIMEOUT",
            Self::Cancelled => "HTTP_CANCELLED",
            Self::RedirectLimitExceeded { .. } => "HTTP_REDIRECT_LIMIT",
            Self::Configuration { .. } => "HTTP_CONFIG",
            Self::Runtime { .. } => "HTTP_RUNTIME",
        }
    }

    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error is a caller cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure { .. })
    }
}
