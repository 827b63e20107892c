use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a presented API key against the configured one, if any.
///
/// `None` configured means the write endpoints are unguarded (internal
/// deployments behind an access proxy).
pub fn api_key_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    match configured {
        None => true,
        Some(expected) => presented
            .map(|key| constant_time_compare(expected, key))
            .unwrap_or(false),
    }
}
