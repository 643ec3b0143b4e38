use super::pool::{ConnectionPool, PoolStats};
use super::Transport;
use crate::errors::{HttpClientError, HttpResult};
use crate::message::{InboundResponse, OutboundRequest};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Reqwest-backed transport with per-host admission control
pub struct ReqwestTransport {
    client: Client,
    pool: Arc<ConnectionPool>,
    timeout: Duration,
    max_redirections: u32,
}

impl ReqwestTransport {
    pub(crate) fn new(
        client: Client,
        pool: ConnectionPool,
        timeout: Duration,
        max_redirections: u32,
    ) -> Self {
        Self {
            client,
            pool: Arc::new(pool),
            timeout,
            max_redirections,
        }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn map_error(&self, error: reqwest::Error) -> HttpClientError {
        HttpClientError::from_reqwest(error, self.timeout, self.max_redirections)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.uri))]
    async fn execute(&self, request: OutboundRequest) -> HttpResult<InboundResponse> {
        let _permit = self.pool.acquire(&request.uri).await?;

        let mut builder = self.client.request(request.method, request.uri);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, request.content_type).body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let version = response.version();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        debug!(status = %status, bytes = body.len(), "Received response");
        if status.is_client_error() || status.is_server_error() {
            warn!(status = %status, "Request completed with error status");
        }

        Ok(InboundResponse {
            status,
            headers,
            version,
            url,
            body,
        })
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(self.pool.stats())
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("pool", &self.pool)
            .field("timeout", &self.timeout)
            .field("max_redirections", &self.max_redirections)
            .finish()
    }
}
