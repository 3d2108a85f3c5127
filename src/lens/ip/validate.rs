//! IPv4 input validation

use regex::Regex;
use std::sync::LazyLock;

use super::error::ValidationError;

#[allow(clippy::expect_used)] // constant pattern
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("IPv4 pattern compiles")
});

/// Validate a user-entered address.
///
/// The input is trimmed; on success the trimmed address is returned. Leading
/// zeros within an octet are accepted (`"010.1.1.1"`), IPv6 literals and
/// hostnames are not.
pub fn validate_address(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if !IPV4_RE.is_match(trimmed) {
        return Err(ValidationError::MalformedAddress);
    }
    Ok(trimmed)
}
