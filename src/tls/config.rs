use std::str::FromStr;

/// Effective TLS settings for the database connection
///
/// Only built when TLS is enabled; "no TLS" is `Option::None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOptions {
    pub enabled: bool,
    /// Reject certificates that do not chain to a trusted CA
    pub verify: bool,
    /// Trusted CA material as PEM text
    pub ca_certificate: Option<String>,
}

/// Environment overrides that take part in TLS derivation
///
/// Values are kept raw; interpretation belongs to [`super::derive_tls`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOverrides {
    pub enable: Option<String>,
    pub reject_unauthorized: Option<String>,
    pub ca: Option<String>,
    pub ca_base64: Option<String>,
}

/// `sslmode` values understood in connection URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// No TLS encryption
    #[default]
    Disable,
    /// Let the server decide
    Allow,
    /// Use TLS when available
    Prefer,
    /// TLS required, but no certificate verification
    Require,
    /// Verify server certificate against CA
    VerifyCA,
    /// Verify certificate and hostname
    VerifyFull,
}

impl FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCA),
            "verify-full" => Ok(Self::VerifyFull),
            _ => Err(format!("Invalid TLS mode: {s}")),
        }
    }
}

impl TlsMode {
    /// Check if TLS is enabled
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disable)
    }

    /// Encrypt-but-trust modes
    #[must_use]
    pub const fn skips_verification(&self) -> bool {
        matches!(self, Self::Require | Self::Prefer)
    }
}
