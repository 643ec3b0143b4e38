//! Request dispatch.
//!
//! [`HttpClient`] is the public request surface. Each verb has an async form
//! that accepts an optional [`CancellationToken`] and a `*_blocking` form
//! that drives the same future on a background runtime.
//!
//! ```rust,no_run
//! use integrations_http_client::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::rest("https://api.example.com/v1/")?;
//! let created = client.post("items", Some(r#"{"x":1}"#), None).await?;
//! println!("{} {}", created.status(), created.text());
//! # Ok(())
//! # }
//! ```

pub(crate) mod blocking;

use crate::config::TransportConfig;
use crate::errors::{HttpClientError, HttpResult};
use crate::message::{InboundResponse, OutboundRequest};
use crate::transport::{PoolStats, Transport, TransportFactory};
use http::Method;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// HTTP client bound to one base address and one transport.
///
/// Cloning is cheap; clones share the transport and its connection pool,
/// which is released when the last clone is dropped.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<TransportConfig>,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Client for `base_address` using the generic text media type
    pub fn new(base_address: &str) -> HttpResult<Self> {
        Self::from_config(TransportConfig::new(base_address)?)
    }

    /// Client whose accepted and produced media type is `media_type`
    pub fn with_media_type(base_address: &str, media_type: &str) -> HttpResult<Self> {
        Self::from_config(TransportConfig::with_media_type(base_address, media_type)?)
    }

    /// REST client: JSON in both directions
    pub fn rest(base_address: &str) -> HttpResult<Self> {
        Self::from_config(TransportConfig::rest(base_address)?)
    }

    /// Build the transport for `config` and bind it to a new client
    pub fn from_config(config: TransportConfig) -> HttpResult<Self> {
        let transport = TransportFactory::build(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Bind an existing transport
    pub fn with_transport(config: TransportConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// The frozen configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Connection pool statistics, if the transport keeps a pool
    pub fn pool_stats(&self) -> Option<PoolStats> {
        self.transport.pool_stats()
    }

    /// GET `uri`
    pub async fn get(
        &self,
        uri: &str,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send(uri, None, Method::GET, cancel).await
    }

    /// POST `body` to `uri`
    pub async fn post(
        &self,
        uri: &str,
        body: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send(uri, body, Method::POST, cancel).await
    }

    /// PUT `body` to `uri`
    pub async fn put(
        &self,
        uri: &str,
        body: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send(uri, body, Method::PUT, cancel).await
    }

    /// DELETE `uri`
    pub async fn delete(
        &self,
        uri: &str,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send(uri, None, Method::DELETE, cancel).await
    }

    /// Send a request with an arbitrary method.
    ///
    /// `uri` is resolved against the base address per RFC 3986. The whole
    /// exchange, including waiting for a pool permit and reading the body,
    /// is bounded by the configured timeout. Triggering `cancel` aborts the
    /// in-flight request with [`HttpClientError::Cancelled`].
    #[instrument(skip(self, body, cancel), fields(method = %method, uri = %uri))]
    pub async fn send(
        &self,
        uri: &str,
        body: Option<&str>,
        method: Method,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        let resolved = self.config.resolve(uri)?;
        let request = OutboundRequest::new(method, resolved, body, self.config.content_type());

        let timeout = self.config.timeout();
        let exchange = tokio::time::timeout(timeout, self.transport.execute(request));

        let outcome = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("Request cancelled");
                        return Err(HttpClientError::Cancelled);
                    }
                    outcome = exchange => outcome,
                }
            }
            None => exchange.await,
        };

        let result = outcome.unwrap_or_else(|_| Err(HttpClientError::Timeout { timeout }));
        if let Err(error) = &result {
            warn!(code = error.error_code(), error = %error, "Request failed");
        }
        result
    }

    /// Blocking GET
    pub fn get_blocking(
        &self,
        uri: &str,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send_blocking(uri, None, Method::GET, cancel)
    }

    /// Blocking POST
    pub fn post_blocking(
        &self,
        uri: &str,
        body: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send_blocking(uri, body, Method::POST, cancel)
    }

    /// Blocking PUT
    pub fn put_blocking(
        &self,
        uri: &str,
        body: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send_blocking(uri, body, Method::PUT, cancel)
    }

    /// Blocking DELETE
    pub fn delete_blocking(
        &self,
        uri: &str,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        self.send_blocking(uri, None, Method::DELETE, cancel)
    }

    /// Blocking form of [`send`](Self::send).
    ///
    /// Usable from plain threads and from `spawn_blocking`. The request runs
    /// on a background runtime, so calling this from an async worker parks
    /// that worker until the exchange ends; prefer the async form there.
    pub fn send_blocking(
        &self,
        uri: &str,
        body: Option<&str>,
        method: Method,
        cancel: Option<&CancellationToken>,
    ) -> HttpResult<InboundResponse> {
        let client = self.clone();
        let uri = uri.to_string();
        let body = body.map(str::to_string);
        let cancel = cancel.cloned();

        blocking::wait(async move {
            client
                .send(&uri, body.as_deref(), method, cancel.as_ref())
                .await
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("pool", &self.transport.pool_stats())
            .finish()
    }
}
