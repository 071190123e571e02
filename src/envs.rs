/// Interpret a boolean-ish configuration value
///
/// `1`, `true`, `yes` and `on` (any case, surrounding whitespace ignored) are
/// truthy, everything else is not.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Treat empty or whitespace-only values as unset
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
