//! Configurable HTTP client
//!
//! An HTTP client bound to a single base address, with transport behavior
//! configured up front:
//! - Timeouts, connection ceilings and redirect limits
//! - Proxying with optional credentials
//! - Seeded cookies and bearer-token authentication
//! - TLS version range and certificate policy for `https` endpoints
//!
//! Every verb is available as a cancellable `async` method and as a
//! `*_blocking` method.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_http_client::{HttpClient, TransportConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TransportConfig::rest("https://api.example.com/v1/")?
//!         .with_bearer_token("token")
//!         .with_timeout(Duration::from_secs(5));
//!     let client = HttpClient::from_config(config)?;
//!
//!     let response = client.get("items", None).await?;
//!     println!("{}: {}", response.status(), response.text());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `rustls` (default) - TLS via rustls
//! - `native-tls` - TLS via the platform library

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod errors;
pub mod message;
pub mod transport;

pub mod observability;

// Testing utilities
pub mod mocks;

#[cfg(test)]
mod tests;

pub use client::HttpClient;
pub use config::{
    CertificatePolicy, CookieDescriptor, ProxySettings, TlsVersion, TlsVersionRange,
    TransportConfig,
};
pub use errors::{HttpClientError, HttpResult};
pub use message::{InboundResponse, OutboundRequest};
pub use transport::{Transport, TransportFactory};

pub use http::Method;
pub use tokio_util::sync::CancellationToken;

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Default per-host concurrent connection ceiling
pub const DEFAULT_MAX_CONNECTIONS_PER_SERVER: usize = 1500;

/// Default number of redirects followed automatically
pub const DEFAULT_MAX_AUTOMATIC_REDIRECTIONS: u32 = 3;

/// Process-wide ceiling on outstanding connections across all clients
pub const GLOBAL_CONNECTION_LIMIT: usize = 15000;

/// Media type used when none is given
pub const TEXT_MEDIA_TYPE: &str = "text/html";

/// Media type of the REST preset
pub const JSON_MEDIA_TYPE: &str = "application/json";
