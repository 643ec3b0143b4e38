//! Per-request message types exchanged with a [`Transport`](crate::transport::Transport).

mod request;
mod response;

pub use request::OutboundRequest;
pub use response::InboundResponse;

pub use http::{HeaderMap, Method, StatusCode, Version};
