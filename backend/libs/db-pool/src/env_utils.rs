//! Environment variable parsing utilities
//!
//! Small helpers so configuration loaders never need `unwrap()` on
//! `std::env::var` results.

use std::str::FromStr;

/// Parse an environment variable with a default fallback.
///
/// Missing and unparsable values both yield `default`.
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("PORT", 8080);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning `None` if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read the first of `keys` that is set to a non-empty value.
///
/// # Example
/// ```ignore
/// let url = first_env_of(&["DATABASE_URL", "DB_ADDR"])?;
/// ```
pub fn first_env_of(keys: &[&str]) -> Result<String, String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| format!("none of {} is set", keys.join(", ")))
}
