//! Observability support.
//!
//! The client emits `tracing` spans and events; installing a subscriber is
//! left to the application, which can use [`LoggingConfig`] for a ready-made
//! setup.

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
