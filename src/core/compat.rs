//! Host compatibility gate
//!
//! Compares the host's version against the range an extension declares in
//! `engines.extman`. A leading caret is rewritten to an "at least" range:
//! `^X` is treated as `>=X`, deliberately dropping the upper bound so that
//! extensions published against an older host line keep installing on newer
//! hosts.

use crate::error::{ExtmanError, Result};
use semver::{Version, VersionReq};

/// Check `required` against `host_version`.
///
/// No requirement means no constraint. Runs before any filesystem mutation
/// in both install and update, so failure here is always clean.
pub fn check_host_compatibility(
    name: &str,
    required: Option<&str>,
    host_version: &str,
) -> Result<()> {
    let Some(required) = required else {
        return Ok(());
    };

    let range = floor_caret(required);
    let req = VersionReq::parse(&range).map_err(|e| {
        ExtmanError::Resolution(format!(
            "Extension '{}' declares an invalid host range '{}': {}",
            name, required, e
        ))
    })?;
    let host = Version::parse(host_version).map_err(|e| {
        ExtmanError::ConfigError(format!("Invalid host version '{}': {}", host_version, e))
    })?;

    if req.matches(&host) {
        Ok(())
    } else {
        Err(ExtmanError::IncompatibleHost {
            name: name.to_string(),
            required: required.to_string(),
            host: host_version.to_string(),
        })
    }
}

/// Rewrite a leading caret-range marker to a floor: `^1.2.3` -> `>=1.2.3`.
fn floor_caret(range: &str) -> String {
    let trimmed = range.trim();
    match trimmed.strip_prefix('^') {
        Some(rest) => format!(">={}", rest),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_is_treated_as_a_floor_only() {
        // Older host fails
        assert!(matches!(
            check_host_compatibility("ext", Some("^0.0.80"), "0.0.79"),
            Err(ExtmanError::IncompatibleHost { .. })
        ));
        // Equal host passes
        check_host_compatibility("ext", Some("^0.0.80"), "0.0.80").unwrap();
        // A caret range would normally cap 0.0.x at 0.0.80; the floor does not
        check_host_compatibility("ext", Some("^0.0.80"), "0.0.90").unwrap();
    }

    #[test]
    fn explicit_ranges_pass_through() {
        check_host_compatibility("ext", Some(">=0.1.0"), "0.2.5").unwrap();
        assert!(check_host_compatibility("ext", Some(">=0.3.0"), "0.2.5").is_err());
    }

    #[test]
    fn absent_requirement_means_no_constraint() {
        check_host_compatibility("ext", None, "0.0.1").unwrap();
    }

    #[test]
    fn malformed_range_is_a_resolution_error() {
        assert!(matches!(
            check_host_compatibility("ext", Some("not a range"), "1.0.0"),
            Err(ExtmanError::Resolution(_))
        ));
    }

    #[test]
    fn floor_caret_leaves_other_ranges_alone() {
        assert_eq!(floor_caret("^1.2.3"), ">=1.2.3");
        assert_eq!(floor_caret(">=1.0.0"), ">=1.0.0");
        assert_eq!(floor_caret(" ^0.0.80 "), ">=0.0.80");
    }
}
