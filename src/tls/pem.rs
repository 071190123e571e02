use base64::{Engine, engine::general_purpose::STANDARD};

/// Resolve trusted CA material from the environment overrides
///
/// The raw PEM override wins. Otherwise the base64 override is stripped of
/// whitespace and decoded; anything that fails to decode into UTF-8 text is
/// treated as if no CA had been provided.
#[must_use]
pub fn ca_material(raw: Option<&str>, base64: Option<&str>) -> Option<String> {
    if let Some(pem) = raw.filter(|pem| !pem.trim().is_empty()) {
        // env files often carry the PEM on one line with escaped newlines
        return Some(pem.replace("\\n", "\n"));
    }

    base64.and_then(decode_base64)
}

fn decode_base64(encoded: &str) -> Option<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8(bytes).ok(),
        Err(e) => {
            tracing::debug!("ignoring undecodable base64 CA certificate: {e}");
            None
        }
    }
}

/// True when the text holds at least one PEM `CERTIFICATE` section
#[must_use]
pub fn looks_like_pem(text: &str) -> bool {
    let mut reader = text.as_bytes();
    rustls_pemfile::certs(&mut reader).any(|cert| cert.is_ok())
}
