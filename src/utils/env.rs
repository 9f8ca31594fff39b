/// Get environment variable with TENANCY_ prefix, falling back to unprefixed version
///
/// Checks `TENANCY_{key}` first, then `{key}`.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks TENANCY_ORG_HEADER first, then ORG_HEADER
/// let header = get_env_with_prefix("ORG_HEADER");
/// ```
pub(crate) fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TENANCY_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
