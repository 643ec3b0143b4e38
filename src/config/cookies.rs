//! Cookies seeded into the transport's jar.

use crate::errors::{HttpClientError, HttpResult};
use url::Url;

/// A single cookie to send with requests to the base address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDescriptor {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Optional path attribute
    pub path: Option<String>,
    /// Optional domain attribute
    pub domain: Option<String>,
}

impl CookieDescriptor {
    /// Create a cookie with no path or domain attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
        }
    }

    /// Set the path attribute
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the domain attribute
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Check that the cookie renders to exactly itself and will be sent to
    /// `base`.
    ///
    /// The name must be an RFC 6265 token and the value a run of cookie
    /// octets, so neither can smuggle in attributes. A domain attribute must
    /// domain-match the host of `base`; the jar drops it otherwise.
    pub fn validate(&self, base: &Url) -> HttpResult<()> {
        if self.name.is_empty() || !self.name.bytes().all(is_token_byte) {
            return Err(self.rejected("name is not a valid token"));
        }
        if !self.value.bytes().all(is_cookie_octet) {
            return Err(self.rejected("value contains a separator, space or control character"));
        }
        if let Some(path) = &self.path {
            if !path.starts_with('/') || path.bytes().any(|b| b == b';' || b.is_ascii_control()) {
                return Err(self.rejected("path must start with '/' and contain no ';'"));
            }
        }
        if let Some(domain) = &self.domain {
            let host = base.host_str().unwrap_or_default();
            if !domain_matches(host, domain) {
                return Err(self.rejected(&format!(
                    "domain '{}' does not match host '{}'",
                    domain, host
                )));
            }
        }
        Ok(())
    }

    fn rejected(&self, reason: &str) -> HttpClientError {
        HttpClientError::configuration(format!("invalid cookie '{}': {}", self.name, reason))
    }

    /// Render as a `Set-Cookie` header value for seeding a jar.
    pub fn to_set_cookie(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        out
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

fn is_cookie_octet(b: u8) -> bool {
    b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\')
}

fn domain_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.');
    if domain.is_empty() {
        return false;
    }
    let (host, domain) = (host.as_bytes(), domain.as_bytes());
    match host.len().checked_sub(domain.len()) {
        Some(0) => host.eq_ignore_ascii_case(domain),
        Some(split) => host[split - 1] == b'.' && host[split..].eq_ignore_ascii_case(domain),
        None => false,
    }
}
