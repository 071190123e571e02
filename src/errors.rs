use thiserror::Error;

/// Terminal failures of a pre-flight run
///
/// Every variant ends the run: the runner renders it once and exits with 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreflightError {
    /// Missing or invalid input, detected before any I/O
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport, authentication or TLS handshake failure while connecting
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Server version below the minimum or not parsable
    #[error("compatibility error: {0}")]
    Compatibility(String),

    /// Migration runner reported a non-zero outcome
    #[error("migration error: {0}")]
    Migration(String),

    /// The caller-level deadline expired
    #[error("timed out after {0}s")]
    Timeout(u64),
}

impl PreflightError {
    /// Short machine-friendly kind, used by the JSON report
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connectivity(_) => "connectivity",
            Self::Compatibility(_) => "compatibility",
            Self::Migration(_) => "migration",
            Self::Timeout(_) => "timeout",
        }
    }
}
