//! Transport layer abstraction for HTTP communication.
//!
//! A [`Transport`] is built once per client by [`TransportFactory`] and is
//! shared read-mostly by every request that client issues. The default
//! implementation is [`ReqwestTransport`]; tests can substitute
//! [`MockTransport`](crate::mocks::MockTransport).

mod factory;
pub mod pool;
mod reqwest_transport;

pub use factory::TransportFactory;
pub use pool::{ConnectionPool, PoolStats};
pub use reqwest_transport::ReqwestTransport;

use crate::errors::HttpResult;
use crate::message::{InboundResponse, OutboundRequest};
use async_trait::async_trait;

/// Executes fully resolved requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the redirect limit is
    /// exceeded, or the body cannot be read.
    async fn execute(&self, request: OutboundRequest) -> HttpResult<InboundResponse>;

    /// Connection pool statistics, if the transport keeps a pool
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
