use super::{TlsMode, TlsOptions, TlsOverrides, pem};
use crate::{descriptor::ConnectionDescriptor, envs::is_truthy};

/// Derive the effective TLS settings from URL hints and environment overrides
///
/// Returns `None` when TLS is not enabled by any source. Verification follows
/// libpq conventions: `require` and `prefer` encrypt without verifying, every
/// other enabled mode verifies, unless the reject-unauthorized override says
/// otherwise.
#[must_use]
pub fn derive_tls(
    descriptor: &ConnectionDescriptor,
    overrides: &TlsOverrides,
) -> Option<TlsOptions> {
    // `?sslmode=` is the same as no sslmode at all
    let sslmode = descriptor
        .param("sslmode")
        .map(str::trim)
        .filter(|mode| !mode.is_empty());

    let enabled = overrides.enable.as_deref().is_some_and(is_truthy)
        || descriptor.param("ssl").is_some_and(is_truthy)
        || sslmode.is_some_and(|mode| mode.parse::<TlsMode>() != Ok(TlsMode::Disable));

    if !enabled {
        return None;
    }

    let verify = match overrides.reject_unauthorized.as_deref() {
        Some(value) => {
            let value = value.trim();
            !(value == "0" || value.eq_ignore_ascii_case("false"))
        }
        None => !sslmode
            .and_then(|mode| mode.parse::<TlsMode>().ok())
            .is_some_and(|mode| mode.skips_verification()),
    };

    let ca_certificate = pem::ca_material(overrides.ca.as_deref(), overrides.ca_base64.as_deref());

    Some(TlsOptions {
        enabled,
        verify,
        ca_certificate,
    })
}

/// One-line description of the derived TLS state, for diagnostics
#[must_use]
pub fn describe(tls: Option<&TlsOptions>) -> String {
    match tls {
        None => "tls disabled".to_string(),
        Some(options) => format!(
            "tls enabled={} verify={} ca={}",
            options.enabled,
            options.verify,
            match options.ca_certificate.as_deref() {
                Some(ca) if pem::looks_like_pem(ca) => "pem",
                Some(_) => "unrecognized",
                None => "none",
            }
        ),
    }
}
