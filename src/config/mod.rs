//! Transport configuration.
//!
//! Supports configuration via:
//! - Explicit values
//! - Environment variables
//! - Builder-style `with_*` setters
//!
//! A [`TransportConfig`] is assembled once, then moved into an
//! [`HttpClient`](crate::HttpClient) where it is frozen for the client's
//! lifetime. The base address has no setter.

mod cookies;
mod proxy;
mod tls;

pub use cookies::CookieDescriptor;
pub use proxy::{ProxyCredentials, ProxySettings};
pub use tls::{CertificatePolicy, TlsVersion, TlsVersionRange};

use crate::errors::{HttpClientError, HttpResult};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Declarative settings from which a transport is built
#[derive(Clone)]
pub struct TransportConfig {
    base_address: Url,
    content_type: String,
    accept_type: String,
    proxy: Option<ProxySettings>,
    cookies: Option<Vec<CookieDescriptor>>,
    bearer_token: Option<SecretString>,
    timeout: Duration,
    max_connections_per_server: usize,
    max_automatic_redirections: u32,
    user_agent: Option<String>,
    certificate_policy: CertificatePolicy,
    tls_versions: TlsVersionRange,
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("base_address", &self.base_address.as_str())
            .field("content_type", &self.content_type)
            .field("accept_type", &self.accept_type)
            .field("proxy", &self.proxy)
            .field("cookies", &self.cookies.as_ref().map(Vec::len))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("max_connections_per_server", &self.max_connections_per_server)
            .field("max_automatic_redirections", &self.max_automatic_redirections)
            .field("user_agent", &self.user_agent)
            .field("certificate_policy", &self.certificate_policy)
            .field("tls_versions", &self.tls_versions)
            .finish()
    }
}

impl TransportConfig {
    /// Create a configuration using the generic text media type
    pub fn new(base_address: &str) -> HttpResult<Self> {
        Self::with_media_types(base_address, crate::TEXT_MEDIA_TYPE, crate::TEXT_MEDIA_TYPE)
    }

    /// Create a configuration whose accepted and produced media type is `media_type`
    pub fn with_media_type(base_address: &str, media_type: &str) -> HttpResult<Self> {
        Self::with_media_types(base_address, media_type, media_type)
    }

    /// Create a configuration with distinct produced and accepted media types
    pub fn with_media_types(
        base_address: &str,
        content_type: &str,
        accept_type: &str,
    ) -> HttpResult<Self> {
        Ok(Self {
            base_address: parse_base_address(base_address)?,
            content_type: content_type.to_string(),
            accept_type: accept_type.to_string(),
            proxy: None,
            cookies: None,
            bearer_token: None,
            timeout: Duration::from_millis(crate::DEFAULT_TIMEOUT_MS),
            max_connections_per_server: crate::DEFAULT_MAX_CONNECTIONS_PER_SERVER,
            max_automatic_redirections: crate::DEFAULT_MAX_AUTOMATIC_REDIRECTIONS,
            user_agent: None,
            certificate_policy: CertificatePolicy::default(),
            tls_versions: TlsVersionRange::default(),
        })
    }

    /// REST preset: JSON in both directions
    pub fn rest(base_address: &str) -> HttpResult<Self> {
        Self::with_media_type(base_address, crate::JSON_MEDIA_TYPE)
    }

    /// Create configuration from environment variables.
    ///
    /// `HTTP_CLIENT_BASE_URL` is required. Numeric variables that do not
    /// parse are ignored.
    pub fn from_env() -> HttpResult<Self> {
        let base = std::env::var("HTTP_CLIENT_BASE_URL").map_err(|_| {
            HttpClientError::configuration("HTTP_CLIENT_BASE_URL is not set")
        })?;

        let content_type = std::env::var("HTTP_CLIENT_CONTENT_TYPE").ok();
        let accept_type = std::env::var("HTTP_CLIENT_ACCEPT").ok();
        let mut config = match (content_type, accept_type) {
            (Some(content), Some(accept)) => Self::with_media_types(&base, &content, &accept)?,
            (Some(media), None) | (None, Some(media)) => Self::with_media_type(&base, &media)?,
            (None, None) => Self::new(&base)?,
        };

        if let Ok(token) = std::env::var("HTTP_CLIENT_BEARER_TOKEN") {
            config = config.with_bearer_token(token);
        }

        if let Ok(timeout) = std::env::var("HTTP_CLIENT_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                config = config.with_timeout(Duration::from_millis(ms));
            }
        }

        if let Ok(max) = std::env::var("HTTP_CLIENT_MAX_CONNECTIONS") {
            if let Ok(n) = max.parse::<usize>() {
                config = config.with_max_connections_per_server(n);
            }
        }

        if let Ok(max) = std::env::var("HTTP_CLIENT_MAX_REDIRECTS") {
            if let Ok(n) = max.parse::<u32>() {
                config = config.with_max_automatic_redirections(n);
            }
        }

        if let Ok(agent) = std::env::var("HTTP_CLIENT_USER_AGENT") {
            config = config.with_user_agent(agent);
        }

        if let Ok(proxy) = std::env::var("HTTP_CLIENT_PROXY") {
            config.add_proxy(&proxy, None, None)?;
        }

        Ok(config)
    }

    /// Route all requests through a proxy.
    ///
    /// An absent or empty username means no credentials. Calling this again
    /// replaces the previous proxy.
    pub fn add_proxy(
        &mut self,
        address: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> HttpResult<()> {
        self.proxy = Some(ProxySettings::new(address, username, password)?);
        Ok(())
    }

    /// Append a cookie. Duplicate names are kept.
    pub fn add_cookie(
        &mut self,
        name: &str,
        value: &str,
        path: Option<&str>,
        domain: Option<&str>,
    ) {
        let cookie = CookieDescriptor {
            name: name.to_string(),
            value: value.to_string(),
            path: path.map(str::to_string),
            domain: domain.map(str::to_string),
        };
        self.cookies.get_or_insert_with(Vec::new).push(cookie);
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-host concurrent connection ceiling
    pub fn with_max_connections_per_server(mut self, max: usize) -> Self {
        self.max_connections_per_server = max;
        self
    }

    /// Set the maximum number of redirects followed automatically; 0 disables
    pub fn with_max_automatic_redirections(mut self, max: u32) -> Self {
        self.max_automatic_redirections = max;
        self
    }

    /// Override the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send `Authorization: Bearer <token>` on every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set the certificate validation policy for `https` base addresses
    pub fn with_certificate_policy(mut self, policy: CertificatePolicy) -> Self {
        self.certificate_policy = policy;
        self
    }

    /// Set the accepted TLS protocol versions for `https` base addresses
    pub fn with_tls_versions(mut self, versions: TlsVersionRange) -> Self {
        self.tls_versions = versions;
        self
    }

    /// Base address every request URI is resolved against
    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    /// Media type of request bodies
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Media type sent in `Accept`
    pub fn accept_type(&self) -> &str {
        &self.accept_type
    }

    /// Proxy settings, if configured
    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// Configured cookies; `None` means no cookie jar
    pub fn cookies(&self) -> Option<&[CookieDescriptor]> {
        self.cookies.as_deref()
    }

    /// Whether a bearer token is configured
    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub(crate) fn expose_bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Per-host concurrent connection ceiling
    pub fn max_connections_per_server(&self) -> usize {
        self.max_connections_per_server
    }

    /// Maximum automatic redirections
    pub fn max_automatic_redirections(&self) -> u32 {
        self.max_automatic_redirections
    }

    /// `User-Agent` override
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Certificate validation policy
    pub fn certificate_policy(&self) -> &CertificatePolicy {
        &self.certificate_policy
    }

    /// Accepted TLS protocol versions
    pub fn tls_versions(&self) -> TlsVersionRange {
        self.tls_versions
    }

    /// Whether the base address uses TLS
    pub fn is_https(&self) -> bool {
        self.base_address.scheme() == "https"
    }

    /// Resolve a per-call URI against the base address (RFC 3986).
    pub fn resolve(&self, uri: &str) -> HttpResult<Url> {
        self.base_address
            .join(uri)
            .map_err(|e| HttpClientError::from_parse(uri, e))
    }
}

fn parse_base_address(input: &str) -> HttpResult<Url> {
    let url = Url::parse(input).map_err(|e| HttpClientError::from_parse(input, e))?;

    if url.cannot_be_a_base() {
        return Err(HttpClientError::invalid_address(
            input,
            "address cannot be used as a base",
        ));
    }

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpClientError::invalid_address(
            input,
            format!("unsupported scheme '{}'", other),
        )),
    }
}
