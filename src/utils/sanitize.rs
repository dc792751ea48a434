//! Input sanitization utilities for security
//!
//! Extension names become directory names under the live tree and path
//! segments in registry URLs, so they are validated before any use.

use crate::error::{ExtmanError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Safe characters for extension names.
/// Allows: alphanumeric, dash, underscore, dot, plus.
static SAFE_EXTENSION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._+-]+$").expect("Invalid regex pattern"));

/// Validate an extension name is safe to use as a directory name and URL
/// path segment.
///
/// # Security
/// Prevents path traversal and command injection: names like `../escape` or
/// `foo; rm -rf /` are rejected before they reach the filesystem or a
/// subprocess argument list.
pub fn validate_extension_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ExtmanError::ConfigError(
            "Extension name cannot be empty".to_string(),
        ));
    }

    if name.len() > 214 {
        return Err(ExtmanError::ConfigError(format!(
            "Extension name too long (max 214 chars): {}",
            &name[..50]
        )));
    }

    if name.starts_with('.') {
        return Err(ExtmanError::ConfigError(format!(
            "Extension name cannot start with a dot: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(ExtmanError::ConfigError(format!(
            "Extension name cannot contain path traversal: {}",
            name
        )));
    }

    if !SAFE_EXTENSION_NAME.is_match(name) {
        return Err(ExtmanError::ConfigError(format!(
            "Extension name contains invalid characters: {}",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        validate_extension_name("ext-lint").unwrap();
        validate_extension_name("json_tools.v2").unwrap();
        validate_extension_name("c++-helper").unwrap();
    }

    #[test]
    fn rejects_traversal_and_separators() {
        assert!(validate_extension_name("../escape").is_err());
        assert!(validate_extension_name("a/b").is_err());
        assert!(validate_extension_name(".hidden").is_err());
    }

    #[test]
    fn rejects_shell_metacharacters() {
        assert!(validate_extension_name("foo; rm -rf /").is_err());
        assert!(validate_extension_name("foo$(id)").is_err());
        assert!(validate_extension_name("").is_err());
    }
}
