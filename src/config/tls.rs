//! TLS trust and protocol-version policy for `https` base addresses.

/// How server certificates are validated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CertificatePolicy {
    /// Full chain validation against the platform/webpki roots
    #[default]
    Strict,
    /// Full chain validation, additionally trusting these PEM-encoded roots
    AdditionalRoots(Vec<Vec<u8>>),
    /// Accept any server certificate, including expired, self-signed and
    /// hostname-mismatched ones. Opt-in only.
    DangerAcceptInvalidCertificates,
}

impl CertificatePolicy {
    /// Whether certificate validation is disabled
    pub fn is_permissive(&self) -> bool {
        matches!(self, Self::DangerAcceptInvalidCertificates)
    }
}

/// TLS protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    /// TLS 1.0
    Tls10,
    /// TLS 1.1
    Tls11,
    /// TLS 1.2
    Tls12,
    /// TLS 1.3
    Tls13,
}

#[cfg(any(feature = "rustls", feature = "native-tls"))]
impl From<TlsVersion> for reqwest::tls::Version {
    fn from(version: TlsVersion) -> Self {
        match version {
            TlsVersion::Tls10 => reqwest::tls::Version::TLS_1_0,
            TlsVersion::Tls11 => reqwest::tls::Version::TLS_1_1,
            TlsVersion::Tls12 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

/// Inclusive range of accepted TLS protocol versions.
///
/// Versions the active TLS backend does not implement are skipped, so the
/// default 1.0..=1.2 range negotiates TLS 1.2 under rustls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsVersionRange {
    /// Lowest accepted version
    pub min: TlsVersion,
    /// Highest accepted version
    pub max: TlsVersion,
}

impl TlsVersionRange {
    /// Create a range; the bounds are swapped if given in reverse
    pub fn new(min: TlsVersion, max: TlsVersion) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Check whether a version falls inside the range
    pub fn contains(&self, version: TlsVersion) -> bool {
        self.min <= version && version <= self.max
    }
}

impl Default for TlsVersionRange {
    fn default() -> Self {
        Self {
            min: TlsVersion::Tls10,
            max: TlsVersion::Tls12,
        }
    }
}
