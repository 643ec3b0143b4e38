//! Tests for the HTTP client.

#[cfg(test)]
mod client_tests;
