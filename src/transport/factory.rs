//! Builds a [`ReqwestTransport`] from a [`TransportConfig`].

use super::pool::{self, ConnectionPool};
use super::ReqwestTransport;
use crate::config::{CertificatePolicy, TransportConfig};
use crate::errors::{HttpClientError, HttpResult};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, ClientBuilder, Proxy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Construction logic turning configuration into a live transport
pub struct TransportFactory;

impl TransportFactory {
    /// Build a transport. Called once per client; each call yields an
    /// independent connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Configuration`] when a configured value is
    /// rejected (zero connection ceiling, non-header-safe strings, malformed
    /// cookies, malformed PEM roots).
    pub fn build(config: &TransportConfig) -> HttpResult<ReqwestTransport> {
        if config.max_connections_per_server() == 0 {
            return Err(HttpClientError::configuration(
                "max_connections_per_server must be at least 1",
            ));
        }

        let global_available = pool::ensure_global_limit();

        let mut builder = ClientBuilder::new()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.max_connections_per_server())
            .default_headers(default_headers(config)?)
            .redirect(redirect_policy(config.max_automatic_redirections()))
            .gzip(true)
            .deflate(true);

        builder = match config.proxy() {
            Some(settings) => {
                let mut proxy = Proxy::all(settings.address().as_str())
                    .map_err(|e| HttpClientError::configuration(format!("invalid proxy: {}", e)))?;
                if let Some(creds) = settings.credentials() {
                    proxy = proxy.basic_auth(creds.username(), creds.expose_password());
                }
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        if let Some(cookies) = config.cookies() {
            let jar = Jar::default();
            for cookie in cookies {
                cookie.validate(config.base_address())?;
                debug!(
                    name = %cookie.name,
                    path = cookie.path.as_deref().unwrap_or("/"),
                    domain = cookie.domain.as_deref().unwrap_or_default(),
                    "Seeding cookie"
                );
                jar.add_cookie_str(&cookie.to_set_cookie(), config.base_address());
            }
            builder = builder.cookie_provider(Arc::new(jar));
        }

        if config.is_https() {
            builder = apply_tls(builder, config)?;
        }

        let client = builder
            .build()
            .map_err(|e| HttpClientError::configuration(format!("failed to build HTTP client: {}", e)))?;

        debug!(
            base_address = %config.base_address(),
            max_connections_per_server = config.max_connections_per_server(),
            max_redirections = config.max_automatic_redirections(),
            timeout_ms = config.timeout().as_millis() as u64,
            proxy = config.proxy().is_some(),
            cookies = config.cookies().map_or(0, <[_]>::len),
            global_available,
            "Built HTTP transport"
        );

        Ok(ReqwestTransport::new(
            client,
            ConnectionPool::new(config.max_connections_per_server()),
            config.timeout(),
            config.max_automatic_redirections(),
        ))
    }
}

fn redirect_policy(max: u32) -> redirect::Policy {
    if max == 0 {
        redirect::Policy::none()
    } else {
        redirect::Policy::limited(max as usize)
    }
}

fn default_headers(config: &TransportConfig) -> HttpResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("Accept", config.accept_type())?);
    headers.insert(CONTENT_TYPE, header_value("Content-Type", config.content_type())?);

    if let Some(agent) = config.user_agent() {
        headers.insert(USER_AGENT, header_value("User-Agent", agent)?);
    }

    if let Some(token) = config.expose_bearer_token() {
        let mut value = header_value("Authorization", &format!("Bearer {}", token))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> HttpResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| HttpClientError::configuration(format!("invalid {} header value", name)))
}

#[cfg(any(feature = "rustls", feature = "native-tls"))]
fn apply_tls(mut builder: ClientBuilder, config: &TransportConfig) -> HttpResult<ClientBuilder> {
    let versions = config.tls_versions();
    builder = builder
        .min_tls_version(versions.min.into())
        .max_tls_version(versions.max.into());

    match config.certificate_policy() {
        CertificatePolicy::Strict => {}
        CertificatePolicy::AdditionalRoots(roots) => {
            for pem in roots {
                let cert = reqwest::Certificate::from_pem(pem).map_err(|e| {
                    HttpClientError::configuration(format!("invalid root certificate: {}", e))
                })?;
                builder = builder.add_root_certificate(cert);
            }
        }
        CertificatePolicy::DangerAcceptInvalidCertificates => {
            warn!(
                base_address = %config.base_address(),
                "Certificate validation disabled for this transport"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
    }

    Ok(builder)
}

#[cfg(not(any(feature = "rustls", feature = "native-tls")))]
fn apply_tls(_builder: ClientBuilder, _config: &TransportConfig) -> HttpResult<ClientBuilder> {
    Err(HttpClientError::configuration(
        "https base address requires the `rustls` or `native-tls` feature",
    ))
}
