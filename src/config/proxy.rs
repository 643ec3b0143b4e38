//! Outbound proxy settings.

use crate::errors::{HttpClientError, HttpResult};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Credentials presented to the proxy on every request
#[derive(Clone)]
pub struct ProxyCredentials {
    username: String,
    password: SecretString,
}

impl ProxyCredentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Get the username
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Proxy address with optional credentials
#[derive(Debug, Clone)]
pub struct ProxySettings {
    address: Url,
    credentials: Option<ProxyCredentials>,
}

impl ProxySettings {
    /// Parse a proxy address.
    ///
    /// An absent or empty username means an anonymous proxy; a username
    /// without a password is sent with an empty password.
    pub fn new(address: &str, username: Option<&str>, password: Option<&str>) -> HttpResult<Self> {
        let address =
            Url::parse(address).map_err(|e| HttpClientError::from_parse(address, e))?;

        let credentials = match username {
            Some(user) if !user.is_empty() => {
                Some(ProxyCredentials::new(user, password.unwrap_or_default()))
            }
            _ => None,
        };

        Ok(Self {
            address,
            credentials,
        })
    }

    /// Get the proxy address
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Get the credentials, if any
    pub fn credentials(&self) -> Option<&ProxyCredentials> {
        self.credentials.as_ref()
    }
}
